//! Format-neutral table layout for reports.
//!
//! Each report is flattened into a [`ReportTable`] once; the PDF, Excel and
//! CSV renderers only deal with tables.

use rust_decimal::Decimal;

use super::FinancialReport;
use crate::reports::{BalanceSheet, GeneralLedger, ProfitAndLoss, StatementSection, TrialBalance};

/// Visual role of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowStyle {
    /// Section heading, bold.
    Header,
    /// Ordinary account line.
    Line,
    /// Subsection total, bold.
    Subtotal,
    /// Section or grand total, bold.
    Total,
    /// Spacer.
    Blank,
}

impl RowStyle {
    /// Whether the row is rendered in bold.
    #[must_use]
    pub const fn is_bold(self) -> bool {
        matches!(self, Self::Header | Self::Subtotal | Self::Total)
    }
}

/// One table cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    /// Left-aligned text.
    Text(String),
    /// Right-aligned money amount.
    Amount(Decimal),
    /// Nothing.
    Empty,
}

impl Cell {
    fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }
}

/// A column definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Header text.
    pub header: String,
    /// Whether the column holds amounts (right-aligned).
    pub numeric: bool,
    /// Width in characters.
    pub width: usize,
}

impl Column {
    fn text(header: &str, width: usize) -> Self {
        Self {
            header: header.to_string(),
            numeric: false,
            width,
        }
    }

    fn amount(header: &str) -> Self {
        Self {
            header: header.to_string(),
            numeric: true,
            width: 16,
        }
    }
}

/// One table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    /// Visual role.
    pub style: RowStyle,
    /// Cells, one per column.
    pub cells: Vec<Cell>,
}

/// A report laid out as a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportTable {
    /// Report title.
    pub title: String,
    /// Company name.
    pub company_name: String,
    /// Date line, e.g. "As of 2026-12-31".
    pub subtitle: String,
    /// Column definitions.
    pub columns: Vec<Column>,
    /// Rows in display order.
    pub rows: Vec<TableRow>,
    /// Trailing notes (balance status).
    pub notes: Vec<String>,
}

impl ReportTable {
    fn push(&mut self, style: RowStyle, cells: Vec<Cell>) {
        let mut cells = cells;
        cells.resize(self.columns.len(), Cell::Empty);
        self.rows.push(TableRow { style, cells });
    }

    fn blank(&mut self) {
        self.push(RowStyle::Blank, Vec::new());
    }
}

impl From<&FinancialReport> for ReportTable {
    fn from(report: &FinancialReport) -> Self {
        match report {
            FinancialReport::BalanceSheet(bs) => balance_sheet_table(bs),
            FinancialReport::ProfitAndLoss(pl) => profit_and_loss_table(pl),
            FinancialReport::TrialBalance(tb) => trial_balance_table(tb),
            FinancialReport::GeneralLedger(gl) => general_ledger_table(gl),
        }
    }
}

fn statement_columns(comparative_label: Option<String>, current_label: String) -> Vec<Column> {
    let mut columns = vec![
        Column::text("Code", 10),
        Column::text("Account", 40),
        Column::amount(&current_label),
    ];
    if let Some(label) = comparative_label {
        columns.push(Column::amount(&label));
    }
    columns
}

fn amounts(balance: Decimal, comparative: Option<Decimal>, with_comparative: bool) -> Vec<Cell> {
    let mut cells = vec![Cell::Amount(balance)];
    if with_comparative {
        cells.push(Cell::Amount(comparative.unwrap_or_default()));
    }
    cells
}

fn push_section(table: &mut ReportTable, section: &StatementSection, with_comparative: bool) {
    table.push(RowStyle::Header, vec![Cell::text(&section.name)]);

    for group in &section.groups {
        let in_group = section.accounts.iter().filter(|line| {
            line.sub_type.as_deref().map_or_else(
                || group.name == format!("Other {}", section.name),
                |s| s == group.name,
            )
        });
        let show_group = section.groups.len() > 1;
        if show_group {
            table.push(RowStyle::Header, vec![Cell::Empty, Cell::text(&group.name)]);
        }
        for line in in_group {
            let mut cells = vec![Cell::text(&line.code), Cell::text(&line.name)];
            cells.extend(amounts(line.balance, line.comparative_balance, with_comparative));
            table.push(RowStyle::Line, cells);
        }
        if show_group {
            let mut cells = vec![Cell::Empty, Cell::text(format!("Total {}", group.name))];
            cells.extend(amounts(group.total, group.comparative_total, with_comparative));
            table.push(RowStyle::Subtotal, cells);
        }
    }

    let mut cells = vec![Cell::Empty, Cell::text(format!("Total {}", section.name))];
    cells.extend(amounts(section.total, section.comparative_total, with_comparative));
    table.push(RowStyle::Total, cells);
    table.blank();
}

fn balance_sheet_table(bs: &BalanceSheet) -> ReportTable {
    let with_comparative = bs.comparative_totals.is_some();
    let mut table = ReportTable {
        title: bs.title.clone(),
        company_name: bs.company_name.clone(),
        subtitle: format!("As of {}", bs.as_of_date),
        columns: statement_columns(
            bs.comparative_date.map(|d| d.to_string()),
            bs.as_of_date.to_string(),
        ),
        rows: Vec::new(),
        notes: Vec::new(),
    };

    push_section(&mut table, &bs.assets, with_comparative);
    push_section(&mut table, &bs.liabilities, with_comparative);
    push_section(&mut table, &bs.equity, with_comparative);

    let mut cells = vec![Cell::Empty, Cell::text("Total Liabilities and Equity")];
    cells.extend(amounts(
        bs.totals.total_liabilities_and_equity,
        bs.comparative_totals.map(|t| t.total_liabilities_and_equity),
        with_comparative,
    ));
    table.push(RowStyle::Total, cells);

    table.notes.push(if bs.totals.is_balanced {
        "Assets equal liabilities plus equity.".to_string()
    } else {
        "Balance sheet is out of balance.".to_string()
    });
    table
}

fn profit_and_loss_table(pl: &ProfitAndLoss) -> ReportTable {
    let with_comparative = pl.comparative_totals.is_some();
    let mut table = ReportTable {
        title: pl.title.clone(),
        company_name: pl.company_name.clone(),
        subtitle: format!("For the period {} to {}", pl.start_date, pl.end_date),
        columns: statement_columns(
            pl.comparative_period.map(|(s, e)| format!("{s} to {e}")),
            "Amount".to_string(),
        ),
        rows: Vec::new(),
        notes: Vec::new(),
    };

    push_section(&mut table, &pl.revenue, with_comparative);
    push_section(&mut table, &pl.expenses, with_comparative);

    let mut cells = vec![Cell::Empty, Cell::text("Net Profit")];
    cells.extend(amounts(
        pl.totals.net_profit,
        pl.comparative_totals.map(|t| t.net_profit),
        with_comparative,
    ));
    table.push(RowStyle::Total, cells);
    table
}

fn trial_balance_table(tb: &TrialBalance) -> ReportTable {
    let mut table = ReportTable {
        title: tb.title.clone(),
        company_name: tb.company_name.clone(),
        subtitle: format!("As of {}", tb.as_of_date),
        columns: vec![
            Column::text("Code", 10),
            Column::text("Account", 32),
            Column::text("Type", 10),
            Column::amount("Debit"),
            Column::amount("Credit"),
        ],
        rows: Vec::new(),
        notes: Vec::new(),
    };

    for line in &tb.accounts {
        table.push(
            RowStyle::Line,
            vec![
                Cell::text(&line.code),
                Cell::text(&line.name),
                Cell::text(line.category.as_str()),
                Cell::Amount(line.debit),
                Cell::Amount(line.credit),
            ],
        );
    }
    table.push(
        RowStyle::Total,
        vec![
            Cell::Empty,
            Cell::text("Total"),
            Cell::Empty,
            Cell::Amount(tb.total_debit),
            Cell::Amount(tb.total_credit),
        ],
    );

    table.notes.push(if tb.is_balanced {
        "Trial balance is balanced.".to_string()
    } else {
        format!(
            "Trial balance is out of balance by {}.",
            sgbooks_shared::types::format_amount(tb.total_debit - tb.total_credit)
        )
    });
    table
}

fn general_ledger_table(gl: &GeneralLedger) -> ReportTable {
    let mut table = ReportTable {
        title: gl.title.clone(),
        company_name: gl.company_name.clone(),
        subtitle: format!("For the period {} to {}", gl.start_date, gl.end_date),
        columns: vec![
            Column::text("Date", 10),
            Column::text("Entry No", 12),
            Column::text("Description", 30),
            Column::text("Reference", 12),
            Column::amount("Debit"),
            Column::amount("Credit"),
            Column::amount("Balance"),
        ],
        rows: Vec::new(),
        notes: Vec::new(),
    };

    table.push(
        RowStyle::Subtotal,
        vec![
            Cell::text(gl.start_date.to_string()),
            Cell::Empty,
            Cell::text("Opening Balance"),
            Cell::Empty,
            Cell::Empty,
            Cell::Empty,
            Cell::Amount(gl.opening_balance),
        ],
    );
    for line in &gl.lines {
        table.push(
            RowStyle::Line,
            vec![
                Cell::text(line.entry_date.to_string()),
                Cell::text(&line.entry_no),
                Cell::text(&line.description),
                Cell::text(&line.reference),
                Cell::Amount(line.debit),
                Cell::Amount(line.credit),
                Cell::Amount(line.balance),
            ],
        );
    }
    table.push(
        RowStyle::Total,
        vec![
            Cell::text(gl.end_date.to_string()),
            Cell::Empty,
            Cell::text("Closing Balance"),
            Cell::Empty,
            Cell::Amount(gl.total_debit),
            Cell::Amount(gl.total_credit),
            Cell::Amount(gl.closing_balance),
        ],
    );
    table
}
