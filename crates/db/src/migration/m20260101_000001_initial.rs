//! Initial database migration.
//!
//! Creates the `core`, `accounting`, `business` and `audit` schemas with
//! their tables, CHECK constraints and the journal integrity triggers.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(SCHEMAS_SQL).await?;

        // ============================================================
        // PART 1: CORE
        // ============================================================
        db.execute_unprepared(COMPANY_SETTINGS_SQL).await?;
        db.execute_unprepared(SEQUENCES_SQL).await?;
        db.execute_unprepared(CONFIGURATION_SQL).await?;

        // ============================================================
        // PART 2: ACCOUNTING REFERENCE DATA
        // ============================================================
        db.execute_unprepared(CURRENCIES_SQL).await?;
        db.execute_unprepared(EXCHANGE_RATES_SQL).await?;
        db.execute_unprepared(ACCOUNT_TYPES_SQL).await?;
        db.execute_unprepared(ACCOUNTS_SQL).await?;
        db.execute_unprepared(TAX_CODES_SQL).await?;

        // ============================================================
        // PART 3: FISCAL PERIODS & JOURNAL
        // ============================================================
        db.execute_unprepared(FISCAL_YEARS_SQL).await?;
        db.execute_unprepared(FISCAL_PERIODS_SQL).await?;
        db.execute_unprepared(JOURNAL_ENTRIES_SQL).await?;
        db.execute_unprepared(JOURNAL_ENTRY_LINES_SQL).await?;
        db.execute_unprepared(GST_RETURNS_SQL).await?;

        // ============================================================
        // PART 4: BUSINESS
        // ============================================================
        db.execute_unprepared(CUSTOMERS_SQL).await?;
        db.execute_unprepared(VENDORS_SQL).await?;
        db.execute_unprepared(PRODUCTS_SQL).await?;
        db.execute_unprepared(SALES_INVOICES_SQL).await?;
        db.execute_unprepared(PURCHASE_INVOICES_SQL).await?;
        db.execute_unprepared(BANKING_SQL).await?;
        db.execute_unprepared(PAYMENTS_SQL).await?;

        // ============================================================
        // PART 5: AUDIT
        // ============================================================
        db.execute_unprepared(AUDIT_LOG_SQL).await?;

        // ============================================================
        // PART 6: TRIGGERS & FUNCTIONS
        // ============================================================
        db.execute_unprepared(TRIGGERS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const SCHEMAS_SQL: &str = r"
CREATE SCHEMA IF NOT EXISTS core;
CREATE SCHEMA IF NOT EXISTS accounting;
CREATE SCHEMA IF NOT EXISTS business;
CREATE SCHEMA IF NOT EXISTS audit;
";

const COMPANY_SETTINGS_SQL: &str = r"
CREATE TABLE core.company_settings (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    company_name VARCHAR(255) NOT NULL,
    legal_name VARCHAR(255),
    uen_no VARCHAR(20),
    gst_registration_no VARCHAR(20),
    gst_registered BOOLEAN NOT NULL DEFAULT false,
    base_currency CHAR(3) NOT NULL DEFAULT 'SGD',
    fiscal_year_start_month SMALLINT NOT NULL DEFAULT 1 CHECK (fiscal_year_start_month BETWEEN 1 AND 12),
    fiscal_year_start_day SMALLINT NOT NULL DEFAULT 1 CHECK (fiscal_year_start_day BETWEEN 1 AND 31),
    date_format VARCHAR(20) NOT NULL DEFAULT 'dd/MM/yyyy',
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const SEQUENCES_SQL: &str = r"
CREATE TABLE core.sequences (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    sequence_name VARCHAR(50) NOT NULL UNIQUE,
    prefix VARCHAR(20) NOT NULL DEFAULT '',
    suffix VARCHAR(20) NOT NULL DEFAULT '',
    next_value BIGINT NOT NULL DEFAULT 1,
    increment_by BIGINT NOT NULL DEFAULT 1 CHECK (increment_by > 0),
    min_value BIGINT NOT NULL DEFAULT 1,
    max_value BIGINT NOT NULL DEFAULT 999999999,
    cycle BOOLEAN NOT NULL DEFAULT false,
    format_template VARCHAR(50) NOT NULL DEFAULT '{PREFIX}{VALUE:06}{SUFFIX}',
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_sequence_bounds CHECK (min_value <= max_value)
);
";

const CONFIGURATION_SQL: &str = r"
CREATE TABLE core.configuration (
    config_key VARCHAR(100) PRIMARY KEY,
    config_value TEXT NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const CURRENCIES_SQL: &str = r"
CREATE TABLE accounting.currencies (
    code CHAR(3) PRIMARY KEY,
    name VARCHAR(100) NOT NULL,
    symbol VARCHAR(10) NOT NULL,
    decimal_places SMALLINT NOT NULL DEFAULT 2,
    is_active BOOLEAN NOT NULL DEFAULT true,
    is_base BOOLEAN NOT NULL DEFAULT false
);

CREATE UNIQUE INDEX idx_currencies_single_base ON accounting.currencies(is_base) WHERE is_base;
";

const EXCHANGE_RATES_SQL: &str = r"
CREATE TABLE accounting.exchange_rates (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    from_currency CHAR(3) NOT NULL REFERENCES accounting.currencies(code),
    to_currency CHAR(3) NOT NULL REFERENCES accounting.currencies(code),
    rate_date DATE NOT NULL,
    exchange_rate NUMERIC(19, 8) NOT NULL CHECK (exchange_rate > 0),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    UNIQUE (from_currency, to_currency, rate_date),
    CONSTRAINT chk_different_currencies CHECK (from_currency <> to_currency)
);

CREATE INDEX idx_exchange_rates_lookup ON accounting.exchange_rates(from_currency, to_currency, rate_date DESC);
";

const ACCOUNT_TYPES_SQL: &str = r"
CREATE TABLE accounting.account_types (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(50) NOT NULL UNIQUE,
    category VARCHAR(20) NOT NULL
        CHECK (category IN ('Asset', 'Liability', 'Equity', 'Revenue', 'Expense')),
    is_debit_balance BOOLEAN NOT NULL,
    report_type VARCHAR(20) NOT NULL CHECK (report_type IN ('BalanceSheet', 'ProfitLoss')),
    display_order INTEGER NOT NULL DEFAULT 0,
    description TEXT
);
";

const ACCOUNTS_SQL: &str = r"
CREATE TABLE accounting.accounts (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    code VARCHAR(20) NOT NULL UNIQUE,
    name VARCHAR(255) NOT NULL,
    account_type VARCHAR(20) NOT NULL
        CHECK (account_type IN ('Asset', 'Liability', 'Equity', 'Revenue', 'Expense')),
    sub_type VARCHAR(50) REFERENCES accounting.account_types(name),
    parent_id UUID REFERENCES accounting.accounts(id),
    description TEXT,
    is_active BOOLEAN NOT NULL DEFAULT true,
    is_control_account BOOLEAN NOT NULL DEFAULT false,
    is_bank_account BOOLEAN NOT NULL DEFAULT false,
    gst_applicable BOOLEAN NOT NULL DEFAULT false,
    tax_treatment VARCHAR(20),
    report_group VARCHAR(50),
    opening_balance NUMERIC(19, 4) NOT NULL DEFAULT 0,
    opening_balance_date DATE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_not_own_parent CHECK (parent_id IS NULL OR parent_id <> id)
);

CREATE INDEX idx_accounts_active ON accounting.accounts(code) WHERE is_active = true;
CREATE INDEX idx_accounts_type ON accounting.accounts(account_type);
CREATE INDEX idx_accounts_parent ON accounting.accounts(parent_id) WHERE parent_id IS NOT NULL;
";

const TAX_CODES_SQL: &str = r"
CREATE TABLE accounting.tax_codes (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    code VARCHAR(10) NOT NULL UNIQUE,
    description VARCHAR(255) NOT NULL,
    tax_type VARCHAR(20) NOT NULL CHECK (tax_type IN ('Gst', 'Withholding', 'Income')),
    rate NUMERIC(7, 4) NOT NULL DEFAULT 0 CHECK (rate >= 0 AND rate <= 100),
    is_default BOOLEAN NOT NULL DEFAULT false,
    is_active BOOLEAN NOT NULL DEFAULT true,
    affects_account_id UUID REFERENCES accounting.accounts(id)
);
";

const FISCAL_YEARS_SQL: &str = r"
CREATE TABLE accounting.fiscal_years (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    year_name VARCHAR(50) NOT NULL UNIQUE,
    start_date DATE NOT NULL,
    end_date DATE NOT NULL,
    is_closed BOOLEAN NOT NULL DEFAULT false,
    closed_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_fiscal_year_dates CHECK (end_date > start_date)
);
";

const FISCAL_PERIODS_SQL: &str = r"
CREATE TABLE accounting.fiscal_periods (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    fiscal_year_id UUID NOT NULL REFERENCES accounting.fiscal_years(id) ON DELETE CASCADE,
    name VARCHAR(50) NOT NULL,
    period_type VARCHAR(10) NOT NULL CHECK (period_type IN ('Month', 'Quarter', 'Year')),
    period_number INTEGER NOT NULL CHECK (period_number > 0),
    start_date DATE NOT NULL,
    end_date DATE NOT NULL,
    status VARCHAR(10) NOT NULL DEFAULT 'Open' CHECK (status IN ('Open', 'Closed', 'Archived')),
    is_adjustment BOOLEAN NOT NULL DEFAULT false,
    closed_at TIMESTAMPTZ,
    UNIQUE (fiscal_year_id, period_type, period_number),
    CONSTRAINT chk_fiscal_period_dates CHECK (end_date >= start_date)
);

CREATE INDEX idx_fiscal_periods_dates ON accounting.fiscal_periods(start_date, end_date);
";

const JOURNAL_ENTRIES_SQL: &str = r"
CREATE TABLE accounting.journal_entries (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    entry_no VARCHAR(30) NOT NULL UNIQUE,
    journal_type VARCHAR(20) NOT NULL CHECK (journal_type IN (
        'General', 'Sales', 'Purchase', 'CashReceipt', 'CashDisbursement',
        'Payroll', 'OpeningBalance', 'Adjustment', 'Gst'
    )),
    entry_date DATE NOT NULL,
    fiscal_period_id UUID NOT NULL REFERENCES accounting.fiscal_periods(id),
    description TEXT NOT NULL,
    reference VARCHAR(100),
    is_posted BOOLEAN NOT NULL DEFAULT false,
    posted_at TIMESTAMPTZ,
    is_reversed BOOLEAN NOT NULL DEFAULT false,
    reversing_entry_id UUID REFERENCES accounting.journal_entries(id),
    source_type VARCHAR(30),
    source_id UUID,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_journal_entries_date ON accounting.journal_entries(entry_date);
CREATE INDEX idx_journal_entries_posted ON accounting.journal_entries(entry_date) WHERE is_posted = true;
CREATE INDEX idx_journal_entries_source ON accounting.journal_entries(source_type, source_id)
    WHERE source_id IS NOT NULL;
";

const JOURNAL_ENTRY_LINES_SQL: &str = r"
CREATE TABLE accounting.journal_entry_lines (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    journal_entry_id UUID NOT NULL REFERENCES accounting.journal_entries(id) ON DELETE CASCADE,
    line_number INTEGER NOT NULL,
    account_id UUID NOT NULL REFERENCES accounting.accounts(id),
    description TEXT,
    debit_amount NUMERIC(19, 4) NOT NULL DEFAULT 0,
    credit_amount NUMERIC(19, 4) NOT NULL DEFAULT 0,
    currency_code CHAR(3) NOT NULL REFERENCES accounting.currencies(code),
    exchange_rate NUMERIC(19, 8) NOT NULL DEFAULT 1 CHECK (exchange_rate > 0),
    tax_code VARCHAR(10),
    tax_amount NUMERIC(19, 4) NOT NULL DEFAULT 0,
    UNIQUE (journal_entry_id, line_number),
    CONSTRAINT chk_one_side CHECK (
        debit_amount >= 0 AND credit_amount >= 0
        AND ((debit_amount > 0 AND credit_amount = 0) OR (debit_amount = 0 AND credit_amount > 0))
    )
);

CREATE INDEX idx_journal_lines_account ON accounting.journal_entry_lines(account_id);
CREATE INDEX idx_journal_lines_tax ON accounting.journal_entry_lines(tax_code) WHERE tax_code IS NOT NULL;
";

const GST_RETURNS_SQL: &str = r"
CREATE TABLE accounting.gst_returns (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    return_period VARCHAR(30) NOT NULL,
    start_date DATE NOT NULL,
    end_date DATE NOT NULL,
    filing_due_date DATE NOT NULL,
    standard_rated_supplies NUMERIC(19, 4) NOT NULL DEFAULT 0,
    zero_rated_supplies NUMERIC(19, 4) NOT NULL DEFAULT 0,
    exempt_supplies NUMERIC(19, 4) NOT NULL DEFAULT 0,
    total_supplies NUMERIC(19, 4) NOT NULL DEFAULT 0,
    taxable_purchases NUMERIC(19, 4) NOT NULL DEFAULT 0,
    output_tax NUMERIC(19, 4) NOT NULL DEFAULT 0,
    input_tax NUMERIC(19, 4) NOT NULL DEFAULT 0,
    tax_adjustments NUMERIC(19, 4) NOT NULL DEFAULT 0,
    tax_payable NUMERIC(19, 4) NOT NULL DEFAULT 0,
    status VARCHAR(20) NOT NULL DEFAULT 'Draft' CHECK (status IN ('Draft', 'Submitted', 'Amended')),
    submission_date DATE,
    submission_reference VARCHAR(50),
    journal_entry_id UUID REFERENCES accounting.journal_entries(id),
    notes TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_gst_dates CHECK (end_date >= start_date)
);

CREATE INDEX idx_gst_returns_period ON accounting.gst_returns(start_date, end_date);
";

const CUSTOMERS_SQL: &str = r"
CREATE TABLE business.customers (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    customer_code VARCHAR(20) NOT NULL UNIQUE,
    name VARCHAR(255) NOT NULL,
    legal_name VARCHAR(255),
    uen_no VARCHAR(20),
    gst_registered BOOLEAN NOT NULL DEFAULT false,
    gst_no VARCHAR(20),
    contact_person VARCHAR(100),
    email VARCHAR(255),
    phone VARCHAR(30),
    address_line1 VARCHAR(255),
    address_line2 VARCHAR(255),
    postal_code VARCHAR(10),
    city VARCHAR(100),
    country VARCHAR(100) NOT NULL DEFAULT 'Singapore',
    credit_terms INTEGER NOT NULL DEFAULT 30 CHECK (credit_terms >= 0),
    credit_limit NUMERIC(19, 4),
    currency_code CHAR(3) NOT NULL DEFAULT 'SGD' REFERENCES accounting.currencies(code),
    is_active BOOLEAN NOT NULL DEFAULT true,
    receivables_account_id UUID REFERENCES accounting.accounts(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_customers_name ON business.customers(name) WHERE is_active = true;
";

const VENDORS_SQL: &str = r"
CREATE TABLE business.vendors (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    vendor_code VARCHAR(20) NOT NULL UNIQUE,
    name VARCHAR(255) NOT NULL,
    legal_name VARCHAR(255),
    uen_no VARCHAR(20),
    gst_registered BOOLEAN NOT NULL DEFAULT false,
    gst_no VARCHAR(20),
    contact_person VARCHAR(100),
    email VARCHAR(255),
    phone VARCHAR(30),
    address_line1 VARCHAR(255),
    address_line2 VARCHAR(255),
    postal_code VARCHAR(10),
    city VARCHAR(100),
    country VARCHAR(100) NOT NULL DEFAULT 'Singapore',
    credit_terms INTEGER NOT NULL DEFAULT 30 CHECK (credit_terms >= 0),
    currency_code CHAR(3) NOT NULL DEFAULT 'SGD' REFERENCES accounting.currencies(code),
    is_active BOOLEAN NOT NULL DEFAULT true,
    withholding_tax_applicable BOOLEAN NOT NULL DEFAULT false,
    bank_name VARCHAR(100),
    bank_account_no VARCHAR(50),
    bank_swift_code VARCHAR(20),
    payables_account_id UUID REFERENCES accounting.accounts(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_vendors_name ON business.vendors(name) WHERE is_active = true;
";

const PRODUCTS_SQL: &str = r"
CREATE TABLE business.products (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    product_code VARCHAR(30) NOT NULL UNIQUE,
    name VARCHAR(255) NOT NULL,
    description TEXT,
    product_type VARCHAR(20) NOT NULL CHECK (product_type IN ('Inventory', 'Service', 'NonInventory')),
    unit_of_measure VARCHAR(20),
    sales_price NUMERIC(19, 4) CHECK (sales_price >= 0),
    purchase_price NUMERIC(19, 4) CHECK (purchase_price >= 0),
    sales_account_id UUID REFERENCES accounting.accounts(id),
    purchase_account_id UUID REFERENCES accounting.accounts(id),
    tax_code VARCHAR(10),
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const SALES_INVOICES_SQL: &str = r"
CREATE TABLE business.sales_invoices (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    invoice_no VARCHAR(30) NOT NULL UNIQUE,
    customer_id UUID NOT NULL REFERENCES business.customers(id),
    invoice_date DATE NOT NULL,
    due_date DATE NOT NULL,
    currency_code CHAR(3) NOT NULL REFERENCES accounting.currencies(code),
    exchange_rate NUMERIC(19, 8) NOT NULL DEFAULT 1 CHECK (exchange_rate > 0),
    subtotal NUMERIC(19, 4) NOT NULL DEFAULT 0,
    tax_amount NUMERIC(19, 4) NOT NULL DEFAULT 0,
    total_amount NUMERIC(19, 4) NOT NULL DEFAULT 0,
    amount_paid NUMERIC(19, 4) NOT NULL DEFAULT 0,
    status VARCHAR(20) NOT NULL DEFAULT 'Draft' CHECK (status IN (
        'Draft', 'Approved', 'PartiallyPaid', 'Paid', 'Overdue', 'Voided'
    )),
    notes TEXT,
    journal_entry_id UUID REFERENCES accounting.journal_entries(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_sales_due_date CHECK (due_date >= invoice_date),
    CONSTRAINT chk_sales_paid CHECK (amount_paid >= 0 AND amount_paid <= total_amount)
);

CREATE INDEX idx_sales_invoices_customer ON business.sales_invoices(customer_id);
CREATE INDEX idx_sales_invoices_status ON business.sales_invoices(status, due_date);

CREATE TABLE business.sales_invoice_lines (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    invoice_id UUID NOT NULL REFERENCES business.sales_invoices(id) ON DELETE CASCADE,
    line_number INTEGER NOT NULL,
    product_id UUID REFERENCES business.products(id),
    account_id UUID NOT NULL REFERENCES accounting.accounts(id),
    description TEXT NOT NULL,
    quantity NUMERIC(19, 4) NOT NULL CHECK (quantity > 0),
    unit_price NUMERIC(19, 4) NOT NULL CHECK (unit_price >= 0),
    discount_percent NUMERIC(7, 4) NOT NULL DEFAULT 0 CHECK (discount_percent BETWEEN 0 AND 100),
    discount_amount NUMERIC(19, 4) NOT NULL DEFAULT 0,
    line_subtotal NUMERIC(19, 4) NOT NULL,
    tax_code VARCHAR(10),
    tax_amount NUMERIC(19, 4) NOT NULL DEFAULT 0,
    line_total NUMERIC(19, 4) NOT NULL,
    UNIQUE (invoice_id, line_number)
);
";

const PURCHASE_INVOICES_SQL: &str = r"
CREATE TABLE business.purchase_invoices (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    invoice_no VARCHAR(30) NOT NULL UNIQUE,
    vendor_id UUID NOT NULL REFERENCES business.vendors(id),
    vendor_invoice_no VARCHAR(50),
    invoice_date DATE NOT NULL,
    due_date DATE NOT NULL,
    currency_code CHAR(3) NOT NULL REFERENCES accounting.currencies(code),
    exchange_rate NUMERIC(19, 8) NOT NULL DEFAULT 1 CHECK (exchange_rate > 0),
    subtotal NUMERIC(19, 4) NOT NULL DEFAULT 0,
    tax_amount NUMERIC(19, 4) NOT NULL DEFAULT 0,
    total_amount NUMERIC(19, 4) NOT NULL DEFAULT 0,
    amount_paid NUMERIC(19, 4) NOT NULL DEFAULT 0,
    status VARCHAR(20) NOT NULL DEFAULT 'Draft' CHECK (status IN (
        'Draft', 'Approved', 'PartiallyPaid', 'Paid', 'Overdue', 'Voided'
    )),
    notes TEXT,
    journal_entry_id UUID REFERENCES accounting.journal_entries(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_purchase_due_date CHECK (due_date >= invoice_date),
    CONSTRAINT chk_purchase_paid CHECK (amount_paid >= 0 AND amount_paid <= total_amount)
);

CREATE INDEX idx_purchase_invoices_vendor ON business.purchase_invoices(vendor_id);
CREATE UNIQUE INDEX idx_purchase_invoices_vendor_no ON business.purchase_invoices(vendor_id, vendor_invoice_no)
    WHERE vendor_invoice_no IS NOT NULL;

CREATE TABLE business.purchase_invoice_lines (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    invoice_id UUID NOT NULL REFERENCES business.purchase_invoices(id) ON DELETE CASCADE,
    line_number INTEGER NOT NULL,
    product_id UUID REFERENCES business.products(id),
    account_id UUID NOT NULL REFERENCES accounting.accounts(id),
    description TEXT NOT NULL,
    quantity NUMERIC(19, 4) NOT NULL CHECK (quantity > 0),
    unit_price NUMERIC(19, 4) NOT NULL CHECK (unit_price >= 0),
    discount_percent NUMERIC(7, 4) NOT NULL DEFAULT 0 CHECK (discount_percent BETWEEN 0 AND 100),
    discount_amount NUMERIC(19, 4) NOT NULL DEFAULT 0,
    line_subtotal NUMERIC(19, 4) NOT NULL,
    tax_code VARCHAR(10),
    tax_amount NUMERIC(19, 4) NOT NULL DEFAULT 0,
    line_total NUMERIC(19, 4) NOT NULL,
    UNIQUE (invoice_id, line_number)
);
";

const BANKING_SQL: &str = r"
CREATE TABLE business.bank_accounts (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    account_name VARCHAR(100) NOT NULL,
    account_number VARCHAR(50) NOT NULL UNIQUE,
    bank_name VARCHAR(100) NOT NULL,
    currency_code CHAR(3) NOT NULL REFERENCES accounting.currencies(code),
    opening_balance NUMERIC(19, 4) NOT NULL DEFAULT 0,
    current_balance NUMERIC(19, 4) NOT NULL DEFAULT 0,
    gl_account_id UUID NOT NULL REFERENCES accounting.accounts(id),
    is_active BOOLEAN NOT NULL DEFAULT true,
    last_reconciled_date DATE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE business.bank_transactions (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    bank_account_id UUID NOT NULL REFERENCES business.bank_accounts(id),
    transaction_date DATE NOT NULL,
    value_date DATE,
    transaction_type VARCHAR(20) NOT NULL CHECK (transaction_type IN (
        'Deposit', 'Withdrawal', 'Transfer', 'Interest', 'Fee', 'Adjustment'
    )),
    description TEXT NOT NULL,
    reference VARCHAR(100),
    amount NUMERIC(19, 4) NOT NULL CHECK (amount <> 0),
    is_reconciled BOOLEAN NOT NULL DEFAULT false,
    reconciled_date DATE,
    journal_entry_id UUID REFERENCES accounting.journal_entries(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_bank_transactions_account ON business.bank_transactions(bank_account_id, transaction_date);
";

const PAYMENTS_SQL: &str = r"
CREATE TABLE business.payments (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    payment_no VARCHAR(30) NOT NULL UNIQUE,
    payment_type VARCHAR(20) NOT NULL CHECK (payment_type IN ('CustomerPayment', 'VendorPayment')),
    payment_method VARCHAR(20) NOT NULL CHECK (payment_method IN (
        'Cash', 'Check', 'BankTransfer', 'CreditCard', 'GiroPayNow', 'Other'
    )),
    payment_date DATE NOT NULL,
    entity_id UUID NOT NULL,
    bank_account_id UUID NOT NULL REFERENCES business.bank_accounts(id),
    currency_code CHAR(3) NOT NULL REFERENCES accounting.currencies(code),
    exchange_rate NUMERIC(19, 8) NOT NULL DEFAULT 1 CHECK (exchange_rate > 0),
    amount NUMERIC(19, 4) NOT NULL CHECK (amount > 0),
    reference VARCHAR(100),
    description TEXT,
    status VARCHAR(20) NOT NULL DEFAULT 'Draft' CHECK (status IN ('Draft', 'Approved', 'Voided')),
    journal_entry_id UUID REFERENCES accounting.journal_entries(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE business.payment_allocations (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    payment_id UUID NOT NULL REFERENCES business.payments(id) ON DELETE CASCADE,
    document_type VARCHAR(20) NOT NULL CHECK (document_type IN ('SalesInvoice', 'PurchaseInvoice')),
    document_id UUID NOT NULL,
    amount NUMERIC(19, 4) NOT NULL CHECK (amount > 0)
);

CREATE INDEX idx_payment_allocations_document ON business.payment_allocations(document_type, document_id);
";

const AUDIT_LOG_SQL: &str = r"
CREATE TABLE audit.audit_log (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    entity_type VARCHAR(50) NOT NULL,
    entity_id UUID NOT NULL,
    action VARCHAR(10) NOT NULL CHECK (action IN ('Insert', 'Update', 'Delete', 'Post', 'Reverse', 'Void')),
    changes JSONB,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_audit_log_entity ON audit.audit_log(entity_type, entity_id, created_at);
";

const TRIGGERS_SQL: &str = r"
-- ============================================================
-- FUNCTION: check_entry_balance
-- A journal entry may only become posted when its lines balance
-- ============================================================
CREATE OR REPLACE FUNCTION accounting.check_entry_balance()
RETURNS TRIGGER AS $$
DECLARE
    total_debit NUMERIC(19, 4);
    total_credit NUMERIC(19, 4);
    line_count INTEGER;
BEGIN
    SELECT COALESCE(SUM(debit_amount), 0), COALESCE(SUM(credit_amount), 0), COUNT(*)
    INTO total_debit, total_credit, line_count
    FROM accounting.journal_entry_lines
    WHERE journal_entry_id = NEW.id;

    IF line_count < 2 THEN
        RAISE EXCEPTION 'ledger rule: Journal entry % needs at least two lines', NEW.entry_no;
    END IF;

    IF total_debit <> total_credit THEN
        RAISE EXCEPTION 'ledger rule: Journal entry % is not balanced. Debit: %, Credit: %',
            NEW.entry_no, total_debit, total_credit;
    END IF;

    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_check_entry_balance
BEFORE UPDATE ON accounting.journal_entries
FOR EACH ROW
WHEN (NEW.is_posted AND NOT OLD.is_posted)
EXECUTE FUNCTION accounting.check_entry_balance();

-- ============================================================
-- FUNCTION: validate_period_open
-- Posting requires an open fiscal period
-- ============================================================
CREATE OR REPLACE FUNCTION accounting.validate_period_open()
RETURNS TRIGGER AS $$
DECLARE
    period_status VARCHAR(10);
BEGIN
    SELECT status INTO period_status
    FROM accounting.fiscal_periods
    WHERE id = NEW.fiscal_period_id;

    IF period_status IS DISTINCT FROM 'Open' THEN
        RAISE EXCEPTION 'ledger rule: Cannot post to a % fiscal period', COALESCE(period_status, 'missing');
    END IF;

    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_validate_period_open
BEFORE UPDATE ON accounting.journal_entries
FOR EACH ROW
WHEN (NEW.is_posted AND NOT OLD.is_posted)
EXECUTE FUNCTION accounting.validate_period_open();

-- ============================================================
-- FUNCTION: prevent_posted_modification
-- Posted entries only accept the reversal flags
-- ============================================================
CREATE OR REPLACE FUNCTION accounting.prevent_posted_modification()
RETURNS TRIGGER AS $$
BEGIN
    IF TG_OP = 'DELETE' THEN
        IF OLD.is_posted THEN
            RAISE EXCEPTION 'ledger rule: Cannot delete posted journal entry %', OLD.entry_no;
        END IF;
        RETURN OLD;
    END IF;

    IF OLD.is_posted AND (
        NOT NEW.is_posted
        OR NEW.entry_date <> OLD.entry_date
        OR NEW.description <> OLD.description
        OR NEW.fiscal_period_id <> OLD.fiscal_period_id
    ) THEN
        RAISE EXCEPTION 'ledger rule: Cannot modify posted journal entry %. Create a reversing entry instead.',
            OLD.entry_no;
    END IF;

    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_prevent_posted_mod
BEFORE UPDATE OR DELETE ON accounting.journal_entries
FOR EACH ROW
EXECUTE FUNCTION accounting.prevent_posted_modification();

-- ============================================================
-- FUNCTION: prevent_posted_line_modification
-- ============================================================
CREATE OR REPLACE FUNCTION accounting.prevent_posted_line_modification()
RETURNS TRIGGER AS $$
DECLARE
    entry_posted BOOLEAN;
BEGIN
    SELECT is_posted INTO entry_posted
    FROM accounting.journal_entries
    WHERE id = COALESCE(NEW.journal_entry_id, OLD.journal_entry_id);

    IF entry_posted THEN
        RAISE EXCEPTION 'ledger rule: Cannot change lines of a posted journal entry';
    END IF;

    IF TG_OP = 'DELETE' THEN
        RETURN OLD;
    END IF;
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_prevent_posted_line_mod
BEFORE INSERT OR UPDATE OR DELETE ON accounting.journal_entry_lines
FOR EACH ROW
EXECUTE FUNCTION accounting.prevent_posted_line_modification();
";

const DROP_ALL_SQL: &str = r"
DROP SCHEMA IF EXISTS audit CASCADE;
DROP SCHEMA IF EXISTS business CASCADE;
DROP SCHEMA IF EXISTS accounting CASCADE;
DROP SCHEMA IF EXISTS core CASCADE;
";
