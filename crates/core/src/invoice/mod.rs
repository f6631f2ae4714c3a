//! Sales and purchase invoice arithmetic.
//!
//! Line amounts, header totals, due dates and payment status. Everything
//! here is pure; persistence lives in the db crate.

pub mod calc;
pub mod error;

pub use calc::{
    InvoiceLineAmounts, InvoiceLineInput, InvoiceStatus, InvoiceTotals, apply_payment,
    calculate_line, calculate_totals, due_date, is_overdue,
};
pub use error::InvoiceError;
