//! Core domain concepts shared across all subdomains.
//!
//! - [`error::DomainError`]: registry construction and embedding faults
//! - [`string`]: string helpers for diagnostics

pub mod error;
pub mod string;
