//! Core bookkeeping logic for SGBooks.
//!
//! This crate contains pure business logic with ZERO database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `accounts` - Account categories and natural balance sides
//! - `ledger` - Double-entry journal validation and running balances
//! - `fiscal` - Fiscal year and period generation
//! - `invoice` - Sales/purchase invoice arithmetic
//! - `gst` - Singapore GST F5 computation
//! - `reports` - Financial statement aggregation
//! - `export` - PDF, Excel and CSV rendering of reports
//! - `sequence` - Document number formatting

pub mod accounts;
pub mod export;
pub mod fiscal;
pub mod gst;
pub mod invoice;
pub mod ledger;
pub mod reports;
pub mod sequence;
