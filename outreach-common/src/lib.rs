//! # Outreach Common Library
//!
//! Shared code for the outreach dashboard including:
//! - Visit record normalization and the derived-view pipeline
//! - Feed row source abstraction and CSV tokenization
//! - Structured diagnostics
//! - Configuration loading
//! - Time utilities

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod feed;
pub mod time;
pub mod visits;

pub use diagnostics::{Diagnostic, DiagnosticSink};
pub use error::{Error, Result};
pub use feed::{FetchError, RowSource};
pub use visits::{RawRow, RawValue, VisitRecord};
