//! Command handlers.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, bail};
use sgbooks_app::{
    ApplicationCore,
    dto::{CreateFiscalYearDto, FinalizeGstReturnDto, GstPeriodDto},
};
use sgbooks_core::export::{ExportFormat, FinancialReport};
use sgbooks_db::AccountFilter;
use sgbooks_shared::AppConfig;

use crate::{
    AccountCommands, Commands, ConfigCommands, FiscalCommands, GstCommands, OutputArgs,
    ReportCommands,
};

/// Handles `config` subcommands, which never touch the database.
pub(crate) fn config(command: &ConfigCommands, path: &Path) -> anyhow::Result<()> {
    match command {
        ConfigCommands::Init => {
            if AppConfig::ensure_default_file(path)? {
                println!("Created {}", path.display());
            } else {
                println!("{} already exists", path.display());
            }
        }
        ConfigCommands::Path => println!("{}", path.display()),
    }
    Ok(())
}

/// Connects to the database and runs one command.
pub(crate) async fn run(command: Commands, config_path: &Path) -> anyhow::Result<()> {
    let config = AppConfig::load_from(config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;
    let core = ApplicationCore::connect(&config).await?;

    match command {
        Commands::Report(command) => report(&core, command).await,
        Commands::Gst(command) => gst(&core, command).await,
        Commands::Accounts(command) => accounts(&core, command).await,
        Commands::Fiscal(command) => fiscal(&core, command).await,
        Commands::Config(command) => self::config(&command, config_path),
    }
}

async fn report(core: &ApplicationCore, command: ReportCommands) -> anyhow::Result<()> {
    let statements = &core.statements;
    let (report, output): (FinancialReport, OutputArgs) = match command {
        ReportCommands::BalanceSheet {
            as_of,
            compare,
            output,
        } => (
            statements
                .generate_balance_sheet(as_of, compare, output.include_zero)
                .await?
                .into(),
            output,
        ),
        ReportCommands::ProfitLoss {
            from,
            to,
            compare_from,
            compare_to,
            output,
        } => {
            let comparative = compare_from.zip(compare_to);
            (
                statements
                    .generate_profit_and_loss(from, to, comparative, output.include_zero)
                    .await?
                    .into(),
                output,
            )
        }
        ReportCommands::TrialBalance { as_of, output } => (
            statements
                .generate_trial_balance(as_of, output.include_zero)
                .await?
                .into(),
            output,
        ),
        ReportCommands::GeneralLedger {
            account,
            from,
            to,
            output,
        } => {
            let Some(found) = core.accounts.get_by_code(&account).await? else {
                bail!("No account with code {account}");
            };
            (
                statements
                    .generate_general_ledger(found.id, from, to)
                    .await?
                    .into(),
                output,
            )
        }
    };

    let bytes = statements.export_report(&report, output.format)?;
    write_output(&bytes, output.format, output.output.as_deref(), &mut std::io::stdout())
}

/// Writes rendered bytes to `path`, or to `stdout` for text formats.
fn write_output(
    bytes: &[u8],
    format: ExportFormat,
    path: Option<&Path>,
    stdout: &mut impl Write,
) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))?;
            tracing::info!(path = %path.display(), bytes = bytes.len(), "Report written");
        }
        None if matches!(format, ExportFormat::Csv | ExportFormat::Json) => {
            stdout.write_all(bytes)?;
            stdout.flush()?;
        }
        None => bail!(
            "{format:?} output is binary; pass --output report.{}",
            format.extension()
        ),
    }
    Ok(())
}

async fn gst(core: &ApplicationCore, command: GstCommands) -> anyhow::Result<()> {
    match command {
        GstCommands::Prepare {
            from,
            to,
            save,
            notes,
        } => {
            let data = core
                .gst
                .prepare_gst_return_data(GstPeriodDto {
                    start_date: from,
                    end_date: to,
                })
                .await?;
            println!("{}", serde_json::to_string_pretty(&data)?);
            if save {
                let saved = core.gst.save_gst_return(data, notes).await?;
                println!("Saved draft {} for {}", saved.id, saved.return_period);
            }
        }
        GstCommands::Finalize {
            return_id,
            reference,
            date,
        } => {
            let filed = core
                .gst
                .finalize_gst_return(FinalizeGstReturnDto {
                    return_id,
                    submission_date: date,
                    submission_reference: reference,
                })
                .await?;
            match filed.journal_entry_id {
                Some(entry) => println!("Filed {} with settlement entry {entry}", filed.return_period),
                None => println!("Filed nil return {}", filed.return_period),
            }
        }
        GstCommands::List => {
            for row in core.gst.list_returns().await? {
                let status = format!("{:?}", row.status);
                println!(
                    "{}  {}  {status:<9}  payable {:>12}  due {}",
                    row.id, row.return_period, row.tax_payable, row.filing_due_date
                );
            }
        }
    }
    Ok(())
}

async fn accounts(core: &ApplicationCore, command: AccountCommands) -> anyhow::Result<()> {
    let AccountCommands::List { all, tree } = command;
    let filter = AccountFilter {
        is_active: if all { None } else { Some(true) },
        ..AccountFilter::default()
    };

    if tree {
        let nodes = core.accounts.list_tree(filter).await?;
        println!("{}", serde_json::to_string_pretty(&nodes)?);
    } else {
        for account in core.accounts.list_accounts(filter).await? {
            let marker = if account.is_active { "" } else { "  (inactive)" };
            println!("{:<16} {}{marker}", account.code, account.name);
        }
    }
    Ok(())
}

async fn fiscal(core: &ApplicationCore, command: FiscalCommands) -> anyhow::Result<()> {
    match command {
        FiscalCommands::CreateYear {
            name,
            start,
            end,
            periods,
        } => {
            let created = core
                .fiscal
                .create_fiscal_year(CreateFiscalYearDto {
                    year_name: name,
                    start_date: start,
                    end_date: end,
                    period_type: periods,
                })
                .await?;
            println!(
                "Created {} with {} periods",
                created.fiscal_year.year_name,
                created.periods.len()
            );
        }
        FiscalCommands::List => {
            for year in core.fiscal.list_fiscal_years().await? {
                let state = if year.fiscal_year.is_closed { "closed" } else { "open" };
                println!(
                    "{} {} to {} ({state})",
                    year.fiscal_year.year_name, year.fiscal_year.start_date, year.fiscal_year.end_date
                );
                for period in &year.periods {
                    println!(
                        "  {:<12} {} to {}  {:?}",
                        period.name, period.start_date, period.end_date, period.status
                    );
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_goes_to_stdout_without_path() {
        let mut stdout = Vec::new();
        write_output(b"{\"ok\":true}", ExportFormat::Json, None, &mut stdout).unwrap();
        assert_eq!(stdout, b"{\"ok\":true}");
    }

    #[test]
    fn test_binary_format_requires_path() {
        let mut stdout = Vec::new();
        let err = write_output(b"%PDF", ExportFormat::Pdf, None, &mut stdout).unwrap_err();
        assert!(err.to_string().contains("report.pdf"));
        assert!(stdout.is_empty());
    }

    #[test]
    fn test_writes_file_when_path_given() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tb.xlsx");
        let mut stdout = Vec::new();
        write_output(b"PK", ExportFormat::Excel, Some(&path), &mut stdout).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"PK");
        assert!(stdout.is_empty());
    }

    #[test]
    fn test_config_init_creates_file_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sgbooks.ini");
        config(&ConfigCommands::Init, &path).unwrap();
        assert!(path.exists());
        config(&ConfigCommands::Init, &path).unwrap();
    }
}
