//! Vendor repository.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbErr,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use sgbooks_shared::AppError;
use uuid::Uuid;

use super::customer::{PartyDetails, country_or_default};
use crate::{DbConn, entities::vendors};

/// Error types for vendor operations.
#[derive(Debug, thiserror::Error)]
pub enum VendorError {
    /// Code already taken.
    #[error("Vendor code '{0}' already exists")]
    DuplicateCode(String),

    /// Vendor not found.
    #[error("Vendor not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<VendorError> for AppError {
    fn from(err: VendorError) -> Self {
        match err {
            VendorError::DuplicateCode(_) => Self::Conflict(err.to_string()),
            VendorError::NotFound(_) => Self::NotFound(err.to_string()),
            VendorError::Database(db) => super::db_error(db),
        }
    }
}

/// Vendor bank details for outgoing payments.
#[derive(Debug, Clone, Default)]
pub struct VendorBankDetails {
    /// Bank name.
    pub bank_name: Option<String>,
    /// Account number.
    pub bank_account_no: Option<String>,
    /// SWIFT code.
    pub bank_swift_code: Option<String>,
}

/// Input for creating or replacing a vendor.
#[derive(Debug, Clone)]
pub struct VendorInput {
    /// Unique vendor code.
    pub vendor_code: String,
    /// Display name.
    pub name: String,
    /// Contact and terms.
    pub details: PartyDetails,
    /// Whether withholding tax applies.
    pub withholding_tax_applicable: bool,
    /// Bank details.
    pub bank: VendorBankDetails,
    /// AP control account override.
    pub payables_account_id: Option<Uuid>,
}

/// Vendor repository.
#[derive(Debug, Clone)]
pub struct VendorRepository {
    db: DbConn,
}

impl VendorRepository {
    /// Creates a new vendor repository.
    #[must_use]
    pub const fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// Creates a vendor.
    ///
    /// # Errors
    ///
    /// Returns an error if the code is taken or the insert fails.
    pub async fn create<C: ConnectionTrait>(
        &self,
        conn: &C,
        input: VendorInput,
    ) -> Result<vendors::Model, VendorError> {
        ensure_code_free(conn, &input.vendor_code, None).await?;

        let now = chrono::Utc::now().into();
        let details = input.details;
        let created = vendors::ActiveModel {
            id: Set(Uuid::now_v7()),
            vendor_code: Set(input.vendor_code),
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
            currency_code: Set(details.currency_code),
            is_active: Set(true),
            withholding_tax_applicable: Set(input.withholding_tax_applicable),
            bank_name: Set(input.bank.bank_name),
            bank_account_no: Set(input.bank.bank_account_no),
            bank_swift_code: Set(input.bank.bank_swift_code),
            payables_account_id: Set(input.payables_account_id),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(conn)
        .await?;

        tracing::info!(vendor_id = %created.id, code = %created.vendor_code, "Vendor created");
        Ok(created)
    }

    /// Replaces a vendor's editable fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the vendor is missing, the new code is taken,
    /// or the update fails.
    pub async fn update<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
        input: VendorInput,
    ) -> Result<vendors::Model, VendorError> {
        let existing = self.require(conn, id).await?;
        if existing.vendor_code != input.vendor_code {
            ensure_code_free(conn, &input.vendor_code, Some(id)).await?;
        }

        let details = input.details;
        let mut active: vendors::ActiveModel = existing.into();
        active.vendor_code = Set(input.vendor_code);
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
        active.currency_code = Set(details.currency_code);
        active.withholding_tax_applicable = Set(input.withholding_tax_applicable);
        active.bank_name = Set(input.bank.bank_name);
        active.bank_account_no = Set(input.bank.bank_account_no);
        active.bank_swift_code = Set(input.bank.bank_swift_code);
        active.payables_account_id = Set(input.payables_account_id);
        active.updated_at = Set(chrono::Utc::now().into());

        let updated = active.update(conn).await?;
        tracing::info!(vendor_id = %updated.id, "Vendor updated");
        Ok(updated)
    }

    /// Marks a vendor inactive.
    ///
    /// # Errors
    ///
    /// Returns an error if the vendor is missing or the update fails.
    pub async fn deactivate<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<vendors::Model, VendorError> {
        let existing = self.require(conn, id).await?;
        let mut active: vendors::ActiveModel = existing.into();
        active.is_active = Set(false);
        active.updated_at = Set(chrono::Utc::now().into());
        let updated = active.update(conn).await?;
        tracing::info!(vendor_id = %updated.id, "Vendor deactivated");
        Ok(updated)
    }

    /// Loads a vendor or fails with `NotFound`.
    ///
    /// # Errors
    ///
    /// Returns an error if the vendor is missing or the query fails.
    pub async fn require<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<vendors::Model, VendorError> {
        vendors::Entity::find_by_id(id)
            .one(conn)
            .await?
            .ok_or(VendorError::NotFound(id))
    }

    /// Finds a vendor by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<vendors::Model>, VendorError> {
        Ok(vendors::Entity::find_by_id(id).one(self.db.as_ref()).await?)
    }

    /// Searches vendors by code, name or email.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn search(
        &self,
        term: &str,
        active_only: bool,
        limit: u64,
    ) -> Result<Vec<vendors::Model>, VendorError> {
        let mut query = vendors::Entity::find()
            .order_by_asc(vendors::Column::Name)
            .limit(limit);
        if active_only {
            query = query.filter(vendors::Column::IsActive.eq(true));
        }
        let term = term.trim();
        if !term.is_empty() {
            query = query.filter(
                Condition::any()
                    .add(vendors::Column::VendorCode.contains(term))
                    .add(vendors::Column::Name.contains(term))
                    .add(vendors::Column::Email.contains(term)),
            );
        }
        Ok(query.all(self.db.as_ref()).await?)
    }
}

async fn ensure_code_free<C: ConnectionTrait>(
    conn: &C,
    code: &str,
    except: Option<Uuid>,
) -> Result<(), VendorError> {
    let mut query = vendors::Entity::find().filter(vendors::Column::VendorCode.eq(code));
    if let Some(id) = except {
        query = query.filter(vendors::Column::Id.ne(id));
    }
    if query.one(conn).await?.is_some() {
        return Err(VendorError::DuplicateCode(code.to_string()));
    }
    Ok(())
}
