//! Customer repository.

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbErr,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use sgbooks_shared::AppError;
use uuid::Uuid;

use crate::{DbConn, entities::customers};

/// Error types for customer operations.
#[derive(Debug, thiserror::Error)]
pub enum CustomerError {
    /// Code already taken.
    #[error("Customer code '{0}' already exists")]
    DuplicateCode(String),

    /// Customer not found.
    #[error("Customer not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<CustomerError> for AppError {
    fn from(err: CustomerError) -> Self {
        match err {
            CustomerError::DuplicateCode(_) => Self::Conflict(err.to_string()),
            CustomerError::NotFound(_) => Self::NotFound(err.to_string()),
            CustomerError::Database(db) => super::db_error(db),
        }
    }
}

/// Contact and address fields shared by customers and vendors.
#[derive(Debug, Clone, Default)]
pub struct PartyDetails {
    /// Registered legal name.
    pub legal_name: Option<String>,
    /// Unique Entity Number.
    pub uen_no: Option<String>,
    /// Whether the party is GST-registered.
    pub gst_registered: bool,
    /// GST registration number.
    pub gst_no: Option<String>,
    /// Contact person.
    pub contact_person: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Phone number.
    pub phone: Option<String>,
    /// Address line 1.
    pub address_line1: Option<String>,
    /// Address line 2.
    pub address_line2: Option<String>,
    /// Postal code.
    pub postal_code: Option<String>,
    /// City.
    pub city: Option<String>,
    /// Country (defaults to Singapore when empty).
    pub country: String,
    /// Payment terms in days.
    pub credit_terms: i32,
    /// Billing currency.
    pub currency_code: String,
}

/// Input for creating or replacing a customer.
#[derive(Debug, Clone)]
pub struct CustomerInput {
    /// Unique customer code.
    pub customer_code: String,
    /// Display name.
    pub name: String,
    /// Contact and terms.
    pub details: PartyDetails,
    /// Credit limit.
    pub credit_limit: Option<Decimal>,
    /// AR control account override.
    pub receivables_account_id: Option<Uuid>,
}

/// Default country for parties without one.
pub const DEFAULT_COUNTRY: &str = "Singapore";

pub(crate) fn country_or_default(country: String) -> String {
    if country.trim().is_empty() {
        DEFAULT_COUNTRY.to_string()
    } else {
        country
    }
}

/// Customer repository.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    db: DbConn,
}

impl CustomerRepository {
    /// Creates a new customer repository.
    #[must_use]
    pub const fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// Creates a customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the code is taken or the insert fails.
    pub async fn create<C: ConnectionTrait>(
        &self,
        conn: &C,
        input: CustomerInput,
    ) -> Result<customers::Model, CustomerError> {
        ensure_code_free(conn, &input.customer_code, None).await?;

        let now = chrono::Utc::now().into();
        let details = input.details;
        let created = customers::ActiveModel {
            id: Set(Uuid::now_v7()),
            customer_code: Set(input.customer_code),
            name: Set(input.name),
            legal_name: Set(details.legal_name),
            uen_no: Set(details.uen_no),
            gst_registered: Set(details.gst_registered),
            gst_no: Set(details.gst_no),
            contact_person: Set(details.contact_person),
            email: Set(details.email),
            phone: Set(details.phone),
            address_line1: Set(details.address_line1),
            address_line2: Set(details.address_line2),
            postal_code: Set(details.postal_code),
            city: Set(details.city),
            country: Set(country_or_default(details.country)),
            credit_terms: Set(details.credit_terms),
            credit_limit: Set(input.credit_limit),
            currency_code: Set(details.currency_code),
            is_active: Set(true),
            receivables_account_id: Set(input.receivables_account_id),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(conn)
        .await?;

        tracing::info!(customer_id = %created.id, code = %created.customer_code, "Customer created");
        Ok(created)
    }

    /// Replaces a customer's editable fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the customer is missing, the new code is taken,
    /// or the update fails.
    pub async fn update<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
        input: CustomerInput,
    ) -> Result<customers::Model, CustomerError> {
        let existing = self.require(conn, id).await?;
        if existing.customer_code != input.customer_code {
            ensure_code_free(conn, &input.customer_code, Some(id)).await?;
        }

        let details = input.details;
        let mut active: customers::ActiveModel = existing.into();
        active.customer_code = Set(input.customer_code);
        active.name = Set(input.name);
        active.legal_name = Set(details.legal_name);
        active.uen_no = Set(details.uen_no);
        active.gst_registered = Set(details.gst_registered);
        active.gst_no = Set(details.gst_no);
        active.contact_person = Set(details.contact_person);
        active.email = Set(details.email);
        active.phone = Set(details.phone);
        active.address_line1 = Set(details.address_line1);
        active.address_line2 = Set(details.address_line2);
        active.postal_code = Set(details.postal_code);
        active.city = Set(details.city);
        active.country = Set(country_or_default(details.country));
        active.credit_terms = Set(details.credit_terms);
        active.credit_limit = Set(input.credit_limit);
        active.currency_code = Set(details.currency_code);
        active.receivables_account_id = Set(input.receivables_account_id);
        active.updated_at = Set(chrono::Utc::now().into());

        let updated = active.update(conn).await?;
        tracing::info!(customer_id = %updated.id, "Customer updated");
        Ok(updated)
    }

    /// Marks a customer inactive.
    ///
    /// # Errors
    ///
    /// Returns an error if the customer is missing or the update fails.
    pub async fn deactivate<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<customers::Model, CustomerError> {
        let existing = self.require(conn, id).await?;
        let mut active: customers::ActiveModel = existing.into();
        active.is_active = Set(false);
        active.updated_at = Set(chrono::Utc::now().into());
        let updated = active.update(conn).await?;
        tracing::info!(customer_id = %updated.id, "Customer deactivated");
        Ok(updated)
    }

    /// Loads a customer or fails with `NotFound`.
    ///
    /// # Errors
    ///
    /// Returns an error if the customer is missing or the query fails.
    pub async fn require<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<customers::Model, CustomerError> {
        customers::Entity::find_by_id(id)
            .one(conn)
            .await?
            .ok_or(CustomerError::NotFound(id))
    }

    /// Finds a customer by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<customers::Model>, CustomerError> {
        Ok(customers::Entity::find_by_id(id).one(self.db.as_ref()).await?)
    }

    /// Searches customers by code, name or email.
    ///
    /// An empty search returns every customer, limited to `limit` rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn search(
        &self,
        term: &str,
        active_only: bool,
        limit: u64,
    ) -> Result<Vec<customers::Model>, CustomerError> {
        let mut query = customers::Entity::find()
            .order_by_asc(customers::Column::Name)
            .limit(limit);
        if active_only {
            query = query.filter(customers::Column::IsActive.eq(true));
        }
        let term = term.trim();
        if !term.is_empty() {
            query = query.filter(
                Condition::any()
                    .add(customers::Column::CustomerCode.contains(term))
                    .add(customers::Column::Name.contains(term))
                    .add(customers::Column::Email.contains(term)),
            );
        }
        Ok(query.all(self.db.as_ref()).await?)
    }
}

async fn ensure_code_free<C: ConnectionTrait>(
    conn: &C,
    code: &str,
    except: Option<Uuid>,
) -> Result<(), CustomerError> {
    let mut query = customers::Entity::find().filter(customers::Column::CustomerCode.eq(code));
    if let Some(id) = except {
        query = query.filter(customers::Column::Id.ne(id));
    }
    if query.one(conn).await?.is_some() {
        return Err(CustomerError::DuplicateCode(code.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn customer(code: &str) -> customers::Model {
        let now = chrono::Utc::now().into();
        customers::Model {
            id: Uuid::now_v7(),
            customer_code: code.to_string(),
            name: "Lion City Traders".to_string(),
            legal_name: None,
            uen_no: Some("201912345K".to_string()),
            gst_registered: true,
            gst_no: None,
            contact_person: None,
            email: None,
            phone: None,
            address_line1: None,
            address_line2: None,
            postal_code: None,
            city: None,
            country: DEFAULT_COUNTRY.to_string(),
            credit_terms: 30,
            credit_limit: None,
            currency_code: "SGD".to_string(),
            is_active: true,
            receivables_account_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn input(code: &str) -> CustomerInput {
        CustomerInput {
            customer_code: code.to_string(),
            name: "Lion City Traders".to_string(),
            details: PartyDetails {
                currency_code: "SGD".to_string(),
                credit_terms: 30,
                ..PartyDetails::default()
            },
            credit_limit: None,
            receivables_account_id: None,
        }
    }

    #[test]
    fn test_country_default() {
        assert_eq!(country_or_default(String::new()), "Singapore");
        assert_eq!(country_or_default("  ".to_string()), "Singapore");
        assert_eq!(country_or_default("Malaysia".to_string()), "Malaysia");
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_code() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![customer("C001")]])
            .into_connection());
        let repo = CustomerRepository::new(db.clone());
        let result = repo.create(db.as_ref(), input("C001")).await;
        assert!(matches!(result, Err(CustomerError::DuplicateCode(code)) if code == "C001"));
    }

    #[tokio::test]
    async fn test_create_inserts() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<customers::Model>::new()])
            .append_query_results([vec![customer("C002")]])
            .into_connection());
        let repo = CustomerRepository::new(db.clone());
        let created = repo.create(db.as_ref(), input("C002")).await.unwrap();
        assert_eq!(created.customer_code, "C002");
        assert_eq!(created.country, "Singapore");
    }

    #[tokio::test]
    async fn test_deactivate_missing() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<customers::Model>::new()])
            .into_connection());
        let repo = CustomerRepository::new(db.clone());
        let result = repo.deactivate(db.as_ref(), Uuid::now_v7()).await;
        assert!(matches!(result, Err(CustomerError::NotFound(_))));
    }
}
