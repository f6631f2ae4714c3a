//! Customer receipts and vendor payments.

use rust_decimal::Decimal;
use sea_orm::{ConnectionTrait};
use sgbooks_core::ledger::JournalType;
use sgbooks_db::{
    DbConn,
    BankingRepository, CurrencyRepository, CustomerRepository, NewAllocation, NewBankTransaction,
    NewPayment, PaymentFilter, PaymentRepository, PaymentWithAllocations,
    PurchaseInvoiceRepository, SalesInvoiceRepository, VendorRepository,
    entities::{
        payments,
        sea_orm_active_enums::{
            AllocationDocumentType, AuditAction, BankTransactionType, PaymentType,
        },
    },
    sequence_names,
};
use sgbooks_shared::{AppError, AppResult};
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use super::banking::bank_journal_lines;
use super::invoicing::LineResolver;
use super::posting::{EntryHeader, JournalPoster};
use super::settings::config_keys;
use super::{audit, begin, commit};
use crate::dto::{PaymentAllocationDto, PaymentDto};

const ENTITY: &str = "payment";

/// The counterparty of a payment, resolved from the customer or vendor.
struct Party {
    id: Uuid,
    name: String,
    control_account: Option<Uuid>,
}

/// Records payments, settles invoices and books the cash movement.
#[derive(Debug, Clone)]
pub struct PaymentManager {
    db: DbConn,
    payments: PaymentRepository,
    banking: BankingRepository,
    currencies: CurrencyRepository,
    customers: CustomerRepository,
    vendors: VendorRepository,
    sales: SalesInvoiceRepository,
    purchases: PurchaseInvoiceRepository,
    resolver: LineResolver,
    poster: JournalPoster,
}

impl PaymentManager {
    /// Creates a new manager.
    #[must_use]
    pub fn new(db: DbConn) -> Self {
        Self {
            payments: PaymentRepository::new(db.clone()),
            banking: BankingRepository::new(db.clone()),
            currencies: CurrencyRepository::new(db.clone()),
            customers: CustomerRepository::new(db.clone()),
            vendors: VendorRepository::new(db.clone()),
            sales: SalesInvoiceRepository::new(db.clone()),
            purchases: PurchaseInvoiceRepository::new(db.clone()),
            resolver: LineResolver::new(&db),
            poster: JournalPoster::new(&db),
            db,
        }
    }

    /// Stores and posts a payment in one transaction.
    ///
    /// Allocated invoices get their `amount_paid` and status updated, a cash
    /// journal entry is posted against the party's control account, and the
    /// bank account balance moves through a linked bank transaction.
    #[instrument(skip(self, dto), fields(entity_id = %dto.entity_id, amount = %dto.amount))]
    pub async fn create_payment(&self, dto: PaymentDto) -> AppResult<PaymentWithAllocations> {
        dto.validate()?;

        let txn = begin(self.db.as_ref()).await?;
        let bank = self.banking.require_account(&txn, dto.bank_account_id).await?;
        let currency_code = dto.currency_code.trim().to_uppercase();
        self.currencies.require_active(&txn, &currency_code).await?;
        if bank.currency_code != currency_code {
            return Err(AppError::BusinessRule(format!(
                "Payment currency {currency_code} does not match bank account currency {}",
                bank.currency_code
            )));
        }

        let party = self.party(&txn, dto.payment_type, dto.entity_id).await?;
        let allocations = self
            .allocate(&txn, dto.payment_type, party.id, &currency_code, &dto.allocations)
            .await?;

        let payment_no = self.poster.next_number(&txn, sequence_names::PAYMENT).await?;
        let stored = self
            .payments
            .insert_approved(
                &txn,
                NewPayment {
                    payment_no,
                    payment_type: dto.payment_type,
                    payment_method: dto.payment_method,
                    payment_date: dto.payment_date,
                    entity_id: party.id,
                    bank_account_id: bank.id,
                    currency_code: currency_code.clone(),
                    exchange_rate: dto.exchange_rate,
                    amount: dto.amount,
                    reference: dto.reference.clone(),
                    description: dto.description.clone(),
                },
                &allocations,
            )
            .await?;
        let payment = &stored.payment;

        let config_key = match dto.payment_type {
            PaymentType::CustomerPayment => config_keys::DEFAULT_RECEIVABLES_ACCOUNT,
            PaymentType::VendorPayment => config_keys::DEFAULT_PAYABLES_ACCOUNT,
        };
        let control_account = self
            .resolver
            .control_account(&txn, &self.poster, party.control_account, config_key)
            .await?;

        let (signed, journal_type, transaction_type, verb) = match dto.payment_type {
            PaymentType::CustomerPayment => (
                payment.amount,
                JournalType::CashReceipt,
                BankTransactionType::Deposit,
                "Receipt from",
            ),
            PaymentType::VendorPayment => (
                -payment.amount,
                JournalType::CashDisbursement,
                BankTransactionType::Withdrawal,
                "Payment to",
            ),
        };
        let description = dto
            .description
            .clone()
            .unwrap_or_else(|| format!("{verb} {}", party.name));
        let lines = bank_journal_lines(
            bank.gl_account_id,
            control_account,
            signed,
            &currency_code,
            payment.exchange_rate,
        );
        let entry = self
            .poster
            .post_new(
                &txn,
                EntryHeader {
                    journal_type,
                    entry_date: payment.payment_date,
                    description: format!("{} - {description}", payment.payment_no),
                    reference: Some(
                        payment
                            .reference
                            .clone()
                            .unwrap_or_else(|| payment.payment_no.clone()),
                    ),
                    source: Some((ENTITY, payment.id)),
                },
                &lines,
            )
            .await?;
        let payment = self
            .payments
            .link_journal_entry(&txn, payment.id, entry.id)
            .await?;

        let (_, account) = self
            .banking
            .record_transaction(
                &txn,
                NewBankTransaction {
                    bank_account_id: bank.id,
                    transaction_date: payment.payment_date,
                    value_date: None,
                    transaction_type,
                    description,
                    reference: Some(payment.payment_no.clone()),
                    amount: payment.amount,
                    journal_entry_id: Some(entry.id),
                },
            )
            .await?;

        audit(&txn, ENTITY, payment.id, AuditAction::Insert, Some(&payment)).await?;
        commit(txn).await?;

        tracing::info!(
            payment_no = %payment.payment_no,
            entry_no = %entry.entry_no,
            allocations = stored.allocations.len(),
            bank_balance = %account.current_balance,
            "Payment posted"
        );
        Ok(PaymentWithAllocations {
            payment,
            allocations: stored.allocations,
        })
    }

    /// Loads a payment with its allocations.
    pub async fn get_payment(&self, id: Uuid) -> AppResult<PaymentWithAllocations> {
        Ok(self.payments.find_with_allocations(self.db.as_ref(), id).await?)
    }

    /// Lists payments, newest first.
    pub async fn list_payments(&self, filter: PaymentFilter) -> AppResult<Vec<payments::Model>> {
        Ok(self.payments.list(filter).await?)
    }

    async fn party<C: ConnectionTrait>(
        &self,
        conn: &C,
        payment_type: PaymentType,
        id: Uuid,
    ) -> AppResult<Party> {
        match payment_type {
            PaymentType::CustomerPayment => {
                let customer = self.customers.require(conn, id).await?;
                Ok(Party {
                    id: customer.id,
                    name: customer.name,
                    control_account: customer.receivables_account_id,
                })
            }
            PaymentType::VendorPayment => {
                let vendor = self.vendors.require(conn, id).await?;
                Ok(Party {
                    id: vendor.id,
                    name: vendor.name,
                    control_account: vendor.payables_account_id,
                })
            }
        }
    }

    /// Applies each allocation to its invoice after checking ownership and currency.
    async fn allocate<C: ConnectionTrait>(
        &self,
        conn: &C,
        payment_type: PaymentType,
        party_id: Uuid,
        currency_code: &str,
        allocations: &[PaymentAllocationDto],
    ) -> AppResult<Vec<NewAllocation>> {
        let mut applied = Vec::with_capacity(allocations.len());
        for allocation in allocations {
            let document_type = match payment_type {
                PaymentType::CustomerPayment => {
                    let invoice = self.sales.require(conn, allocation.invoice_id).await?;
                    check_allocation(
                        &invoice.invoice_no,
                        invoice.customer_id == party_id,
                        &invoice.currency_code,
                        currency_code,
                    )?;
                    self.sales
                        .apply_payment(conn, invoice.id, allocation.amount)
                        .await?;
                    AllocationDocumentType::SalesInvoice
                }
                PaymentType::VendorPayment => {
                    let invoice = self.purchases.require(conn, allocation.invoice_id).await?;
                    check_allocation(
                        &invoice.invoice_no,
                        invoice.vendor_id == party_id,
                        &invoice.currency_code,
                        currency_code,
                    )?;
                    self.purchases
                        .apply_payment(conn, invoice.id, allocation.amount)
                        .await?;
                    AllocationDocumentType::PurchaseInvoice
                }
            };
            applied.push(NewAllocation {
                document_type,
                document_id: allocation.invoice_id,
                amount: allocation.amount,
            });
        }

        let allocated: Decimal = applied.iter().map(|a| a.amount).sum();
        tracing::debug!(count = applied.len(), %allocated, "Allocations applied");
        Ok(applied)
    }
}

fn check_allocation(
    invoice_no: &str,
    same_party: bool,
    invoice_currency: &str,
    payment_currency: &str,
) -> AppResult<()> {
    if !same_party {
        return Err(AppError::BusinessRule(format!(
            "Invoice {invoice_no} belongs to a different party"
        )));
    }
    if invoice_currency != payment_currency {
        return Err(AppError::BusinessRule(format!(
            "Invoice {invoice_no} is in {invoice_currency}, payment is in {payment_currency}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_allocation_to_other_party_rejected() {
        let err = check_allocation("INV-000007", false, "SGD", "SGD").unwrap_err();
        assert_eq!(err.error_code(), "BUSINESS_RULE_VIOLATION");
        assert!(err.to_string().contains("INV-000007"));
    }

    #[test]
    fn test_allocation_currency_must_match() {
        assert!(check_allocation("INV-000008", true, "USD", "SGD").is_err());
        assert!(check_allocation("INV-000008", true, "SGD", "SGD").is_ok());
    }

    #[test]
    fn test_vendor_payment_credits_bank() {
        let bank = Uuid::from_u128(1);
        let payables = Uuid::from_u128(2);
        let lines = bank_journal_lines(bank, payables, -dec!(545.00), "SGD", Decimal::ONE);

        assert_eq!(lines[0].account_id.into_inner(), payables);
        assert_eq!(lines[0].debit_amount, dec!(545.00));
        assert_eq!(lines[1].account_id.into_inner(), bank);
        assert_eq!(lines[1].credit_amount, dec!(545.00));
    }
}
