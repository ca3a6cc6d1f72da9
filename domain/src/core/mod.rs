//! Core domain concepts shared across all subdomains.
//!
//! - [`error::DomainError`]: validation errors raised by value objects

pub mod error;
