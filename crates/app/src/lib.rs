//! Application services for SGBooks.
//!
//! This crate provides:
//! - Validated DTOs for every user-facing operation
//! - Managers that run each operation in one database transaction
//! - Financial statement generation and export
//! - A background runtime bridge for synchronous front ends

pub mod application;
pub mod dto;
pub mod managers;
pub mod runtime;
pub mod statements;

pub use application::ApplicationCore;
pub use runtime::{BackgroundRuntime, TaskError, TaskHandle};
pub use statements::{FinancialStatementGenerator, ReportEngine};
