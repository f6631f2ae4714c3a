//! Customers, vendors and products.

use sgbooks_db::{
    DbConn,
    CustomerError, CustomerRepository, ProductRepository, VendorError, VendorRepository,
    entities::{
        customers, products,
        sea_orm_active_enums::{AuditAction, ProductType},
        vendors,
    },
};
use sgbooks_shared::AppResult;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use super::{audit, begin, commit};
use crate::dto::{CustomerDto, ProductDto, VendorDto};

/// Default row limit for search pickers.
pub const DEFAULT_SEARCH_LIMIT: u64 = 100;

/// Manages customers.
#[derive(Debug, Clone)]
pub struct CustomerManager {
    db: DbConn,
    customers: CustomerRepository,
}

impl CustomerManager {
    /// Creates a new manager.
    #[must_use]
    pub fn new(db: DbConn) -> Self {
        Self {
            customers: CustomerRepository::new(db.clone()),
            db,
        }
    }

    /// Adds a customer.
    #[instrument(skip(self, dto), fields(code = %dto.customer_code))]
    pub async fn create_customer(&self, dto: CustomerDto) -> AppResult<customers::Model> {
        dto.validate()?;

        let txn = begin(self.db.as_ref()).await?;
        let customer = self.customers.create(&txn, dto.into()).await?;
        audit(&txn, "customer", customer.id, AuditAction::Insert, Some(&customer)).await?;
        commit(txn).await?;
        Ok(customer)
    }

    /// Replaces a customer's editable fields.
    #[instrument(skip(self, dto))]
    pub async fn update_customer(&self, id: Uuid, dto: CustomerDto) -> AppResult<customers::Model> {
        dto.validate()?;

        let txn = begin(self.db.as_ref()).await?;
        let customer = self.customers.update(&txn, id, dto.into()).await?;
        audit(&txn, "customer", id, AuditAction::Update, Some(&customer)).await?;
        commit(txn).await?;
        Ok(customer)
    }

    /// Marks a customer inactive; history is kept.
    #[instrument(skip(self))]
    pub async fn deactivate_customer(&self, id: Uuid) -> AppResult<customers::Model> {
        let txn = begin(self.db.as_ref()).await?;
        let customer = self.customers.deactivate(&txn, id).await?;
        audit(&txn, "customer", id, AuditAction::Update, Some(&customer)).await?;
        commit(txn).await?;
        Ok(customer)
    }

    /// Loads a customer.
    pub async fn get_customer(&self, id: Uuid) -> AppResult<customers::Model> {
        Ok(self
            .customers
            .find_by_id(id)
            .await?
            .ok_or(CustomerError::NotFound(id))?)
    }

    /// Searches by code, name or email.
    pub async fn search_customers(
        &self,
        term: &str,
        active_only: bool,
    ) -> AppResult<Vec<customers::Model>> {
        Ok(self
            .customers
            .search(term, active_only, DEFAULT_SEARCH_LIMIT)
            .await?)
    }
}

/// Manages vendors.
#[derive(Debug, Clone)]
pub struct VendorManager {
    db: DbConn,
    vendors: VendorRepository,
}

impl VendorManager {
    /// Creates a new manager.
    #[must_use]
    pub fn new(db: DbConn) -> Self {
        Self {
            vendors: VendorRepository::new(db.clone()),
            db,
        }
    }

    /// Adds a vendor.
    #[instrument(skip(self, dto), fields(code = %dto.vendor_code))]
    pub async fn create_vendor(&self, dto: VendorDto) -> AppResult<vendors::Model> {
        dto.validate()?;

        let txn = begin(self.db.as_ref()).await?;
        let vendor = self.vendors.create(&txn, dto.into()).await?;
        audit(&txn, "vendor", vendor.id, AuditAction::Insert, Some(&vendor)).await?;
        commit(txn).await?;
        Ok(vendor)
    }

    /// Replaces a vendor's editable fields.
    #[instrument(skip(self, dto))]
    pub async fn update_vendor(&self, id: Uuid, dto: VendorDto) -> AppResult<vendors::Model> {
        dto.validate()?;

        let txn = begin(self.db.as_ref()).await?;
        let vendor = self.vendors.update(&txn, id, dto.into()).await?;
        audit(&txn, "vendor", id, AuditAction::Update, Some(&vendor)).await?;
        commit(txn).await?;
        Ok(vendor)
    }

    /// Marks a vendor inactive.
    #[instrument(skip(self))]
    pub async fn deactivate_vendor(&self, id: Uuid) -> AppResult<vendors::Model> {
        let txn = begin(self.db.as_ref()).await?;
        let vendor = self.vendors.deactivate(&txn, id).await?;
        audit(&txn, "vendor", id, AuditAction::Update, Some(&vendor)).await?;
        commit(txn).await?;
        Ok(vendor)
    }

    /// Loads a vendor.
    pub async fn get_vendor(&self, id: Uuid) -> AppResult<vendors::Model> {
        Ok(self
            .vendors
            .find_by_id(id)
            .await?
            .ok_or(VendorError::NotFound(id))?)
    }

    /// Searches by code, name or email.
    pub async fn search_vendors(
        &self,
        term: &str,
        active_only: bool,
    ) -> AppResult<Vec<vendors::Model>> {
        Ok(self
            .vendors
            .search(term, active_only, DEFAULT_SEARCH_LIMIT)
            .await?)
    }
}

/// Manages products and services.
#[derive(Debug, Clone)]
pub struct ProductManager {
    db: DbConn,
    products: ProductRepository,
}

impl ProductManager {
    /// Creates a new manager.
    #[must_use]
    pub fn new(db: DbConn) -> Self {
        Self {
            products: ProductRepository::new(db.clone()),
            db,
        }
    }

    /// Adds a product.
    #[instrument(skip(self, dto), fields(code = %dto.product_code))]
    pub async fn create_product(&self, dto: ProductDto) -> AppResult<products::Model> {
        dto.validate()?;

        let txn = begin(self.db.as_ref()).await?;
        let product = self.products.create(&txn, dto.into()).await?;
        audit(&txn, "product", product.id, AuditAction::Insert, Some(&product)).await?;
        commit(txn).await?;
        Ok(product)
    }

    /// Replaces a product's editable fields.
    #[instrument(skip(self, dto))]
    pub async fn update_product(&self, id: Uuid, dto: ProductDto) -> AppResult<products::Model> {
        dto.validate()?;

        let txn = begin(self.db.as_ref()).await?;
        let product = self.products.update(&txn, id, dto.into()).await?;
        audit(&txn, "product", id, AuditAction::Update, Some(&product)).await?;
        commit(txn).await?;
        Ok(product)
    }

    /// Marks a product inactive.
    #[instrument(skip(self))]
    pub async fn deactivate_product(&self, id: Uuid) -> AppResult<products::Model> {
        let txn = begin(self.db.as_ref()).await?;
        let product = self.products.deactivate(&txn, id).await?;
        audit(&txn, "product", id, AuditAction::Update, Some(&product)).await?;
        commit(txn).await?;
        Ok(product)
    }

    /// Loads a product.
    pub async fn get_product(&self, id: Uuid) -> AppResult<products::Model> {
        Ok(self.products.require(self.db.as_ref(), id).await?)
    }

    /// Searches by code or name, optionally by type.
    pub async fn search_products(
        &self,
        term: &str,
        product_type: Option<ProductType>,
        active_only: bool,
    ) -> AppResult<Vec<products::Model>> {
        Ok(self
            .products
            .search(term, product_type, active_only, DEFAULT_SEARCH_LIMIT)
            .await?)
    }
}
