//! SGBooks command-line driver.
//!
//! Generates and exports financial statements, prepares and files GST
//! returns, lists the chart of accounts and bootstraps the config file.

mod commands;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use sgbooks_app::BackgroundRuntime;
use sgbooks_core::{export::ExportFormat, fiscal::PeriodType};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(
    name = "sgbooks",
    version,
    about = "Singapore small-business bookkeeping",
    long_about = "Double-entry bookkeeping for Singapore companies: financial \
                  statements, GST F5 returns and report export."
)]
struct Cli {
    /// Config file to use instead of the default location.
    #[arg(long, global = true, env = "SGBOOKS_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Generate and export financial statements
    #[command(subcommand)]
    Report(ReportCommands),

    /// Prepare and file GST F5 returns
    #[command(subcommand)]
    Gst(GstCommands),

    /// Chart of accounts
    #[command(subcommand)]
    Accounts(AccountCommands),

    /// Fiscal years and periods
    #[command(subcommand)]
    Fiscal(FiscalCommands),

    /// Configuration file management
    #[command(subcommand)]
    Config(ConfigCommands),
}

/// Where and how to write a report.
#[derive(Debug, Args)]
struct OutputArgs {
    /// pdf, excel, csv or json
    #[arg(short, long, default_value = "json", value_parser = parse_format)]
    format: ExportFormat,

    /// Output file; defaults to stdout for csv and json.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Keep accounts whose balance is zero.
    #[arg(long)]
    include_zero: bool,
}

fn parse_format(value: &str) -> Result<ExportFormat, String> {
    value.parse().map_err(|e: sgbooks_core::export::ExportError| e.to_string())
}

#[derive(Debug, Subcommand)]
enum ReportCommands {
    /// Balance Sheet as of a date
    BalanceSheet {
        /// Report date (YYYY-MM-DD)
        #[arg(long)]
        as_of: NaiveDate,
        /// Comparative date
        #[arg(long)]
        compare: Option<NaiveDate>,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Profit & Loss for a period
    ProfitLoss {
        /// Period start
        #[arg(long)]
        from: NaiveDate,
        /// Period end
        #[arg(long)]
        to: NaiveDate,
        /// Comparative period start
        #[arg(long, requires = "compare_to")]
        compare_from: Option<NaiveDate>,
        /// Comparative period end
        #[arg(long, requires = "compare_from")]
        compare_to: Option<NaiveDate>,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Trial Balance as of a date
    TrialBalance {
        /// Report date
        #[arg(long)]
        as_of: NaiveDate,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// General Ledger for one account
    GeneralLedger {
        /// Account code
        #[arg(long)]
        account: String,
        /// Range start
        #[arg(long)]
        from: NaiveDate,
        /// Range end
        #[arg(long)]
        to: NaiveDate,
        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Debug, Subcommand)]
enum GstCommands {
    /// Compute F5 boxes for a period
    Prepare {
        /// Period start
        #[arg(long)]
        from: NaiveDate,
        /// Period end
        #[arg(long)]
        to: NaiveDate,
        /// Save the figures as a draft return
        #[arg(long)]
        save: bool,
        /// Notes stored with the draft
        #[arg(long, requires = "save")]
        notes: Option<String>,
    },
    /// File a draft return and post the settlement entry
    Finalize {
        /// Draft return ID
        #[arg(long)]
        return_id: Uuid,
        /// IRAS acknowledgement number
        #[arg(long)]
        reference: String,
        /// Filing date
        #[arg(long)]
        date: NaiveDate,
    },
    /// List saved returns
    List,
}

#[derive(Debug, Subcommand)]
enum AccountCommands {
    /// List accounts
    List {
        /// Include inactive accounts
        #[arg(long)]
        all: bool,
        /// Show the parent/child hierarchy
        #[arg(long)]
        tree: bool,
    },
}

#[derive(Debug, Subcommand)]
enum FiscalCommands {
    /// Open a fiscal year and generate its periods
    CreateYear {
        /// Display name, e.g. FY2026
        #[arg(long)]
        name: String,
        /// First day
        #[arg(long)]
        start: NaiveDate,
        /// Last day
        #[arg(long)]
        end: NaiveDate,
        /// month, quarter or year
        #[arg(long, default_value = "month")]
        periods: PeriodType,
    },
    /// List fiscal years with their periods
    List,
}

#[derive(Debug, Subcommand)]
enum ConfigCommands {
    /// Write the default config file if none exists
    Init,
    /// Print the config file location
    Path,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sgbooks=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config_path = match cli.config {
        Some(path) => path,
        None => sgbooks_shared::AppConfig::default_path()?,
    };

    if let Commands::Config(command) = &cli.command {
        return commands::config(command, &config_path);
    }

    let runtime = BackgroundRuntime::new()?;
    runtime.block_on(commands::run(cli.command, &config_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_balance_sheet_export() {
        let cli = Cli::try_parse_from([
            "sgbooks",
            "report",
            "balance-sheet",
            "--as-of",
            "2026-12-31",
            "--format",
            "excel",
            "--output",
            "bs.xlsx",
        ])
        .unwrap();

        let Commands::Report(ReportCommands::BalanceSheet { as_of, compare, output }) = cli.command
        else {
            panic!("expected balance-sheet");
        };
        assert_eq!(as_of, NaiveDate::from_ymd_opt(2026, 12, 31).unwrap());
        assert!(compare.is_none());
        assert_eq!(output.format, ExportFormat::Excel);
        assert_eq!(output.output, Some(PathBuf::from("bs.xlsx")));
    }

    #[test]
    fn test_comparative_period_needs_both_ends() {
        let result = Cli::try_parse_from([
            "sgbooks",
            "report",
            "profit-loss",
            "--from",
            "2026-01-01",
            "--to",
            "2026-12-31",
            "--compare-from",
            "2025-01-01",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_format_rejected() {
        let result = Cli::try_parse_from([
            "sgbooks",
            "report",
            "trial-balance",
            "--as-of",
            "2026-12-31",
            "--format",
            "docx",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_fiscal_year_quarters() {
        let cli = Cli::try_parse_from([
            "sgbooks",
            "fiscal",
            "create-year",
            "--name",
            "FY2026",
            "--start",
            "2026-01-01",
            "--end",
            "2026-12-31",
            "--periods",
            "quarter",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Fiscal(FiscalCommands::CreateYear {
                periods: PeriodType::Quarter,
                ..
            })
        ));
    }
}
