//! Singapore GST F5 computation.
//!
//! Classifies tax-coded journal lines into the F5 boxes and derives the
//! settlement amounts. Database access and posting live in the app crate.

pub mod calculator;
pub mod error;
pub mod types;

pub use calculator::{calculate_tax, compute_f5, filing_due_date};
pub use error::GstError;
pub use types::{
    GST_CONTROL_ACCOUNT, GST_INPUT_ACCOUNT, GST_OUTPUT_ACCOUNT, GstReturnData, GstReturnStatus,
    GstTaxCode, STANDARD_RATE, TaxableLine,
};
