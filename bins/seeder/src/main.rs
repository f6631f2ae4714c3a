//! Reference data seeder for a new SGBooks company database.
//!
//! Seeds currencies, account types, a Singapore chart of accounts with the
//! GST system accounts, IRAS tax codes, document sequences, company
//! settings and the default control-account configuration. Rows that
//! already exist are left untouched, so the seeder can be re-run.
//!
//! Usage: seeder [--company-name "Acme Pte Ltd"]

use clap::Parser;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, sea_query::OnConflict,
};
use sgbooks_core::gst::{GST_CONTROL_ACCOUNT, GST_INPUT_ACCOUNT, GST_OUTPUT_ACCOUNT};
use sgbooks_db::{
    entities::{
        account_types, accounts, company_settings, configuration, currencies, sequences,
        sea_orm_active_enums::{AccountCategory, ReportType, TaxType},
        tax_codes,
    },
    sequence_names,
};
use sgbooks_shared::AppConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

const RECEIVABLES_CODE: &str = "1100";
const PAYABLES_CODE: &str = "2000";

#[derive(Debug, Parser)]
#[command(name = "seeder", about = "Seed SGBooks reference data")]
struct Cli {
    /// Connection URL; overrides the config file.
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Company name written to the settings row when it is first created.
    #[arg(long, default_value = "My Company Pte Ltd")]
    company_name: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sgbooks=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    println!("Connecting to database...");
    let db = match &cli.database_url {
        Some(url) => sgbooks_db::connect_url(url).await?,
        None => sgbooks_db::connect(&AppConfig::load()?.database).await?,
    };

    println!("Seeding currencies...");
    seed_currencies(&db).await?;

    println!("Seeding account types...");
    seed_account_types(&db).await?;

    println!("Seeding chart of accounts...");
    seed_accounts(&db).await?;

    println!("Seeding tax codes...");
    seed_tax_codes(&db).await?;

    println!("Seeding sequences...");
    seed_sequences(&db).await?;

    println!("Seeding company settings...");
    seed_company(&db, &cli.company_name).await?;

    println!("Seeding configuration...");
    seed_configuration(&db).await?;

    println!("Seeding complete!");
    Ok(())
}

/// (code, name, symbol, decimal places)
const CURRENCIES: &[(&str, &str, &str, i16)] = &[
    ("SGD", "Singapore Dollar", "S$", 2),
    ("USD", "US Dollar", "US$", 2),
    ("EUR", "Euro", "€", 2),
    ("GBP", "British Pound", "£", 2),
    ("MYR", "Malaysian Ringgit", "RM", 2),
    ("IDR", "Indonesian Rupiah", "Rp", 2),
    ("CNY", "Chinese Yuan", "¥", 2),
    ("HKD", "Hong Kong Dollar", "HK$", 2),
    ("AUD", "Australian Dollar", "A$", 2),
    ("JPY", "Japanese Yen", "¥", 0),
];

async fn seed_currencies(db: &DatabaseConnection) -> anyhow::Result<()> {
    let rows = CURRENCIES
        .iter()
        .map(|&(code, name, symbol, decimal_places)| currencies::ActiveModel {
            code: Set(code.to_string()),
            name: Set(name.to_string()),
            symbol: Set(symbol.to_string()),
            decimal_places: Set(decimal_places),
            is_active: Set(true),
            is_base: Set(code == "SGD"),
        });
    let inserted = currencies::Entity::insert_many(rows)
        .on_conflict(
            OnConflict::column(currencies::Column::Code)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    println!("  {inserted} currencies added");
    Ok(())
}

/// (name, category, report type, display order)
const ACCOUNT_TYPES: &[(&str, AccountCategory, ReportType, i32)] = &[
    ("Current Asset", AccountCategory::Asset, ReportType::BalanceSheet, 10),
    ("Bank", AccountCategory::Asset, ReportType::BalanceSheet, 11),
    ("Fixed Asset", AccountCategory::Asset, ReportType::BalanceSheet, 20),
    ("Current Liability", AccountCategory::Liability, ReportType::BalanceSheet, 30),
    ("Long-term Liability", AccountCategory::Liability, ReportType::BalanceSheet, 40),
    ("Equity", AccountCategory::Equity, ReportType::BalanceSheet, 50),
    ("Retained Earnings", AccountCategory::Equity, ReportType::BalanceSheet, 51),
    ("Revenue", AccountCategory::Revenue, ReportType::ProfitLoss, 60),
    ("Other Income", AccountCategory::Revenue, ReportType::ProfitLoss, 61),
    ("Cost of Sales", AccountCategory::Expense, ReportType::ProfitLoss, 70),
    ("Expense", AccountCategory::Expense, ReportType::ProfitLoss, 80),
    ("Other Expense", AccountCategory::Expense, ReportType::ProfitLoss, 81),
];

const fn is_debit_normal(category: AccountCategory) -> bool {
    matches!(category, AccountCategory::Asset | AccountCategory::Expense)
}

async fn seed_account_types(db: &DatabaseConnection) -> anyhow::Result<()> {
    let rows = ACCOUNT_TYPES
        .iter()
        .map(|&(name, category, report_type, display_order)| account_types::ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(name.to_string()),
            category: Set(category),
            is_debit_balance: Set(is_debit_normal(category)),
            report_type: Set(report_type),
            display_order: Set(display_order),
            description: Set(None),
        });
    let inserted = account_types::Entity::insert_many(rows)
        .on_conflict(
            OnConflict::column(account_types::Column::Name)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    println!("  {inserted} account types added");
    Ok(())
}

struct SeedAccount {
    code: &'static str,
    name: &'static str,
    category: AccountCategory,
    sub_type: &'static str,
    control: bool,
    bank: bool,
    gst: bool,
}

const fn account(
    code: &'static str,
    name: &'static str,
    category: AccountCategory,
    sub_type: &'static str,
) -> SeedAccount {
    SeedAccount {
        code,
        name,
        category,
        sub_type,
        control: false,
        bank: false,
        gst: false,
    }
}

const CHART: &[SeedAccount] = &[
    account("1000", "Cash on Hand", AccountCategory::Asset, "Current Asset"),
    SeedAccount {
        bank: true,
        ..account("1010", "Bank - Current Account", AccountCategory::Asset, "Bank")
    },
    SeedAccount {
        control: true,
        ..account(RECEIVABLES_CODE, "Accounts Receivable", AccountCategory::Asset, "Current Asset")
    },
    account("1200", "Prepayments and Deposits", AccountCategory::Asset, "Current Asset"),
    account("1300", "Inventory", AccountCategory::Asset, "Current Asset"),
    SeedAccount {
        control: true,
        gst: true,
        ..account(GST_INPUT_ACCOUNT, "GST Input Tax", AccountCategory::Asset, "Current Asset")
    },
    account("1500", "Office Equipment", AccountCategory::Asset, "Fixed Asset"),
    account("1510", "Accumulated Depreciation", AccountCategory::Asset, "Fixed Asset"),
    SeedAccount {
        control: true,
        ..account(PAYABLES_CODE, "Accounts Payable", AccountCategory::Liability, "Current Liability")
    },
    account("2100", "Accrued Liabilities", AccountCategory::Liability, "Current Liability"),
    account("2200", "CPF Payable", AccountCategory::Liability, "Current Liability"),
    SeedAccount {
        control: true,
        gst: true,
        ..account(GST_OUTPUT_ACCOUNT, "GST Output Tax", AccountCategory::Liability, "Current Liability")
    },
    SeedAccount {
        control: true,
        gst: true,
        ..account(GST_CONTROL_ACCOUNT, "GST Payable", AccountCategory::Liability, "Current Liability")
    },
    account("2500", "Bank Loan", AccountCategory::Liability, "Long-term Liability"),
    account("3000", "Share Capital", AccountCategory::Equity, "Equity"),
    account("3100", "Retained Earnings", AccountCategory::Equity, "Retained Earnings"),
    SeedAccount {
        gst: true,
        ..account("4000", "Sales Revenue", AccountCategory::Revenue, "Revenue")
    },
    SeedAccount {
        gst: true,
        ..account("4100", "Service Revenue", AccountCategory::Revenue, "Revenue")
    },
    account("4900", "Other Income", AccountCategory::Revenue, "Other Income"),
    SeedAccount {
        gst: true,
        ..account("5000", "Cost of Goods Sold", AccountCategory::Expense, "Cost of Sales")
    },
    account("6000", "Salaries and Wages", AccountCategory::Expense, "Expense"),
    account("6010", "CPF Contributions", AccountCategory::Expense, "Expense"),
    SeedAccount {
        gst: true,
        ..account("6100", "Rent", AccountCategory::Expense, "Expense")
    },
    SeedAccount {
        gst: true,
        ..account("6200", "Utilities", AccountCategory::Expense, "Expense")
    },
    account("6300", "Bank Charges", AccountCategory::Expense, "Expense"),
    SeedAccount {
        gst: true,
        ..account("6400", "Office Supplies", AccountCategory::Expense, "Expense")
    },
    account("6500", "Depreciation", AccountCategory::Expense, "Expense"),
    account("6900", "Exchange Gain or Loss", AccountCategory::Expense, "Other Expense"),
];

async fn seed_accounts(db: &DatabaseConnection) -> anyhow::Result<()> {
    let rows = CHART.iter().map(|seed| accounts::ActiveModel {
        id: Set(Uuid::now_v7()),
        code: Set(seed.code.to_string()),
        name: Set(seed.name.to_string()),
        account_type: Set(seed.category),
        sub_type: Set(Some(seed.sub_type.to_string())),
        parent_id: Set(None),
        description: Set(None),
        is_active: Set(true),
        is_control_account: Set(seed.control),
        is_bank_account: Set(seed.bank),
        gst_applicable: Set(seed.gst),
        tax_treatment: Set(None),
        report_group: Set(None),
        opening_balance: Set(Decimal::ZERO),
        opening_balance_date: Set(None),
        ..Default::default()
    });
    let inserted = accounts::Entity::insert_many(rows)
        .on_conflict(
            OnConflict::column(accounts::Column::Code)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    println!("  {inserted} accounts added");
    Ok(())
}

/// (code, description, rate, GST account it books to)
const TAX_CODES: &[(&str, &str, Decimal, Option<&str>)] = &[
    ("SR", "Standard-rated supplies", dec!(9), Some(GST_OUTPUT_ACCOUNT)),
    ("ZR", "Zero-rated supplies", dec!(0), None),
    ("ES", "Exempt supplies", dec!(0), None),
    ("OS", "Out-of-scope supplies", dec!(0), None),
    ("TX", "Standard-rated purchases", dec!(9), Some(GST_INPUT_ACCOUNT)),
    ("ZP", "Zero-rated purchases", dec!(0), None),
    ("IM", "Imports with GST paid", dec!(9), Some(GST_INPUT_ACCOUNT)),
    ("BL", "Disallowed input tax", dec!(9), None),
    ("NR", "Purchases from non-registered suppliers", dec!(0), None),
];

async fn seed_tax_codes(db: &DatabaseConnection) -> anyhow::Result<()> {
    let mut rows = Vec::with_capacity(TAX_CODES.len());
    for &(code, description, rate, account_code) in TAX_CODES {
        let affects_account_id = match account_code {
            Some(account_code) => accounts::Entity::find()
                .filter(accounts::Column::Code.eq(account_code))
                .one(db)
                .await?
                .map(|account| account.id),
            None => None,
        };
        rows.push(tax_codes::ActiveModel {
            id: Set(Uuid::now_v7()),
            code: Set(code.to_string()),
            description: Set(description.to_string()),
            tax_type: Set(TaxType::Gst),
            rate: Set(rate),
            is_default: Set(code == "SR"),
            is_active: Set(true),
            affects_account_id: Set(affects_account_id),
        });
    }
    let inserted = tax_codes::Entity::insert_many(rows)
        .on_conflict(
            OnConflict::column(tax_codes::Column::Code)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    println!("  {inserted} tax codes added");
    Ok(())
}

const SEQUENCES: &[(&str, &str)] = &[
    (sequence_names::JOURNAL_ENTRY, "JE-"),
    (sequence_names::SALES_INVOICE, "INV-"),
    (sequence_names::PURCHASE_INVOICE, "BILL-"),
    (sequence_names::PAYMENT, "PAY-"),
];

async fn seed_sequences(db: &DatabaseConnection) -> anyhow::Result<()> {
    let rows = SEQUENCES.iter().map(|&(name, prefix)| sequences::ActiveModel {
        id: Set(Uuid::now_v7()),
        sequence_name: Set(name.to_string()),
        prefix: Set(prefix.to_string()),
        suffix: Set(String::new()),
        next_value: Set(1),
        increment_by: Set(1),
        min_value: Set(1),
        max_value: Set(999_999_999),
        cycle: Set(false),
        format_template: Set(sgbooks_core::sequence::DEFAULT_TEMPLATE.to_string()),
        ..Default::default()
    });
    let inserted = sequences::Entity::insert_many(rows)
        .on_conflict(
            OnConflict::column(sequences::Column::SequenceName)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    println!("  {inserted} sequences added");
    Ok(())
}

async fn seed_company(db: &DatabaseConnection, company_name: &str) -> anyhow::Result<()> {
    let row = company_settings::ActiveModel {
        id: Set(company_settings::SETTINGS_ROW_ID),
        company_name: Set(company_name.to_string()),
        legal_name: Set(None),
        uen_no: Set(None),
        gst_registration_no: Set(None),
        gst_registered: Set(true),
        base_currency: Set("SGD".to_string()),
        fiscal_year_start_month: Set(1),
        fiscal_year_start_day: Set(1),
        date_format: Set("dd/MM/yyyy".to_string()),
        ..Default::default()
    };
    let inserted = company_settings::Entity::insert(row)
        .on_conflict(
            OnConflict::column(company_settings::Column::Id)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    if inserted == 0 {
        println!("  Company settings already exist, skipping...");
    } else {
        println!("  Created company settings for {company_name}");
    }
    Ok(())
}

async fn seed_configuration(db: &DatabaseConnection) -> anyhow::Result<()> {
    let rows = [
        ("default_receivables_account", RECEIVABLES_CODE),
        ("default_payables_account", PAYABLES_CODE),
    ]
    .into_iter()
    .map(|(key, value)| configuration::ActiveModel {
        config_key: Set(key.to_string()),
        config_value: Set(value.to_string()),
        ..Default::default()
    });
    let inserted = configuration::Entity::insert_many(rows)
        .on_conflict(
            OnConflict::column(configuration::Column::ConfigKey)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    println!("  {inserted} configuration values added");
    Ok(())
}
