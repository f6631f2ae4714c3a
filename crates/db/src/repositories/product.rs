//! Product and service repository.

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbErr,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use sgbooks_shared::AppError;
use uuid::Uuid;

use crate::{DbConn, entities::{products, sea_orm_active_enums::ProductType}};

/// Error types for product operations.
#[derive(Debug, thiserror::Error)]
pub enum ProductError {
    /// Code already taken.
    #[error("Product code '{0}' already exists")]
    DuplicateCode(String),

    /// Product not found.
    #[error("Product not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::DuplicateCode(_) => Self::Conflict(err.to_string()),
            ProductError::NotFound(_) => Self::NotFound(err.to_string()),
            ProductError::Database(db) => super::db_error(db),
        }
    }
}

/// Input for creating or replacing a product.
#[derive(Debug, Clone)]
pub struct ProductInput {
    /// Unique product code.
    pub product_code: String,
    /// Display name.
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Kind of item.
    pub product_type: ProductType,
    /// Unit of measure.
    pub unit_of_measure: Option<String>,
    /// Default selling price.
    pub sales_price: Option<Decimal>,
    /// Default cost.
    pub purchase_price: Option<Decimal>,
    /// Revenue account for sales lines.
    pub sales_account_id: Option<Uuid>,
    /// Expense account for purchase lines.
    pub purchase_account_id: Option<Uuid>,
    /// Default tax code.
    pub tax_code: Option<String>,
}

/// Product repository.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    db: DbConn,
}

impl ProductRepository {
    /// Creates a new product repository.
    #[must_use]
    pub const fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// Creates a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the code is taken or the insert fails.
    pub async fn create<C: ConnectionTrait>(
        &self,
        conn: &C,
        input: ProductInput,
    ) -> Result<products::Model, ProductError> {
        ensure_code_free(conn, &input.product_code, None).await?;

        let now = chrono::Utc::now().into();
        let created = products::ActiveModel {
            id: Set(Uuid::now_v7()),
            product_code: Set(input.product_code),
            name: Set(input.name),
            description: Set(input.description),
            product_type: Set(input.product_type),
            unit_of_measure: Set(input.unit_of_measure),
            sales_price: Set(input.sales_price),
            purchase_price: Set(input.purchase_price),
            sales_account_id: Set(input.sales_account_id),
            purchase_account_id: Set(input.purchase_account_id),
            tax_code: Set(input.tax_code),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(conn)
        .await?;

        tracing::info!(product_id = %created.id, code = %created.product_code, "Product created");
        Ok(created)
    }

    /// Replaces a product's editable fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is missing, the new code is taken,
    /// or the update fails.
    pub async fn update<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
        input: ProductInput,
    ) -> Result<products::Model, ProductError> {
        let existing = self.require(conn, id).await?;
        if existing.product_code != input.product_code {
            ensure_code_free(conn, &input.product_code, Some(id)).await?;
        }

        let mut active: products::ActiveModel = existing.into();
        active.product_code = Set(input.product_code);
        active.name = Set(input.name);
        active.description = Set(input.description);
        active.product_type = Set(input.product_type);
        active.unit_of_measure = Set(input.unit_of_measure);
        active.sales_price = Set(input.sales_price);
        active.purchase_price = Set(input.purchase_price);
        active.sales_account_id = Set(input.sales_account_id);
        active.purchase_account_id = Set(input.purchase_account_id);
        active.tax_code = Set(input.tax_code);
        active.updated_at = Set(chrono::Utc::now().into());

        let updated = active.update(conn).await?;
        tracing::info!(product_id = %updated.id, "Product updated");
        Ok(updated)
    }

    /// Marks a product inactive.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is missing or the update fails.
    pub async fn deactivate<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<products::Model, ProductError> {
        let existing = self.require(conn, id).await?;
        let mut active: products::ActiveModel = existing.into();
        active.is_active = Set(false);
        active.updated_at = Set(chrono::Utc::now().into());
        let updated = active.update(conn).await?;
        tracing::info!(product_id = %updated.id, "Product deactivated");
        Ok(updated)
    }

    /// Loads a product or fails with `NotFound`.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is missing or the query fails.
    pub async fn require<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<products::Model, ProductError> {
        products::Entity::find_by_id(id)
            .one(conn)
            .await?
            .ok_or(ProductError::NotFound(id))
    }

    /// Searches products by code or name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn search(
        &self,
        term: &str,
        product_type: Option<ProductType>,
        active_only: bool,
        limit: u64,
    ) -> Result<Vec<products::Model>, ProductError> {
        let mut query = products::Entity::find()
            .order_by_asc(products::Column::ProductCode)
            .limit(limit);
        if active_only {
            query = query.filter(products::Column::IsActive.eq(true));
        }
        if let Some(product_type) = product_type {
            query = query.filter(products::Column::ProductType.eq(product_type));
        }
        let term = term.trim();
        if !term.is_empty() {
            query = query.filter(
                Condition::any()
                    .add(products::Column::ProductCode.contains(term))
                    .add(products::Column::Name.contains(term)),
            );
        }
        Ok(query.all(self.db.as_ref()).await?)
    }
}

async fn ensure_code_free<C: ConnectionTrait>(
    conn: &C,
    code: &str,
    except: Option<Uuid>,
) -> Result<(), ProductError> {
    let mut query = products::Entity::find().filter(products::Column::ProductCode.eq(code));
    if let Some(id) = except {
        query = query.filter(products::Column::Id.ne(id));
    }
    if query.one(conn).await?.is_some() {
        return Err(ProductError::DuplicateCode(code.to_string()));
    }
    Ok(())
}
