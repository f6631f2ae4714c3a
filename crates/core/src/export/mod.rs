//! Report export to PDF, Excel, CSV and JSON.
//!
//! Reports are laid out once as a [`ReportTable`] and then rendered by the
//! format-specific writers. Any failure aborts the whole export; no partial
//! output is returned.

pub mod delimited;
pub mod error;
pub mod excel;
pub mod layout;
pub mod pdf;

use serde::Serialize;

pub use error::ExportError;
pub use layout::{Cell, Column, ReportTable, RowStyle, TableRow};

use crate::reports::{BalanceSheet, GeneralLedger, ProfitAndLoss, TrialBalance};

/// Output format for an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// PDF document.
    Pdf,
    /// Excel workbook (xlsx).
    Excel,
    /// Comma-separated values.
    Csv,
    /// JSON document.
    Json,
}

impl ExportFormat {
    /// Conventional file extension.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Excel => "xlsx",
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pdf" => Ok(Self::Pdf),
            "excel" | "xlsx" => Ok(Self::Excel),
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(ExportError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Any report the engine can render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FinancialReport {
    /// Balance Sheet.
    BalanceSheet(BalanceSheet),
    /// Profit & Loss.
    ProfitAndLoss(ProfitAndLoss),
    /// Trial Balance.
    TrialBalance(TrialBalance),
    /// General Ledger.
    GeneralLedger(GeneralLedger),
}

impl FinancialReport {
    /// Report title.
    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::BalanceSheet(r) => &r.title,
            Self::ProfitAndLoss(r) => &r.title,
            Self::TrialBalance(r) => &r.title,
            Self::GeneralLedger(r) => &r.title,
        }
    }
}

impl From<BalanceSheet> for FinancialReport {
    fn from(report: BalanceSheet) -> Self {
        Self::BalanceSheet(report)
    }
}

impl From<ProfitAndLoss> for FinancialReport {
    fn from(report: ProfitAndLoss) -> Self {
        Self::ProfitAndLoss(report)
    }
}

impl From<TrialBalance> for FinancialReport {
    fn from(report: TrialBalance) -> Self {
        Self::TrialBalance(report)
    }
}

impl From<GeneralLedger> for FinancialReport {
    fn from(report: GeneralLedger) -> Self {
        Self::GeneralLedger(report)
    }
}

/// Renders reports to bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportEngine;

impl ReportEngine {
    /// Creates a report engine.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Renders `report` in `format`.
    ///
    /// # Errors
    ///
    /// Returns the underlying writer error if rendering fails.
    pub fn export_report(
        &self,
        report: &FinancialReport,
        format: ExportFormat,
    ) -> Result<Vec<u8>, ExportError> {
        tracing::debug!(title = report.title(), ?format, "Exporting report");

        let bytes = match format {
            ExportFormat::Json => serde_json::to_vec_pretty(report)?,
            ExportFormat::Pdf => pdf::render(&ReportTable::from(report))?,
            ExportFormat::Excel => excel::render(&ReportTable::from(report))?,
            ExportFormat::Csv => delimited::render(&ReportTable::from(report))?,
        };

        tracing::info!(title = report.title(), ?format, size = bytes.len(), "Report exported");
        Ok(bytes)
    }
}

#[cfg(test)]
#[path = "export_tests.rs"]
mod tests;
