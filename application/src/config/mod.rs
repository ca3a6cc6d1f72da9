//! Application-level configuration.
//!
//! - [`DispatchPolicy`]: timeout and logout-eviction rules for the dispatcher

pub mod dispatch_policy;

pub use dispatch_policy::DispatchPolicy;
