//! Salesforce adapter
//!
//! Implements CrmGateway/CrmSession over the Salesforce partner SOAP API
//! (login, logout) and the REST API (query, search, describe).

pub mod error;
pub mod gateway;
pub mod limit;
pub mod protocol;
pub mod session;
pub mod soap;

#[cfg(test)]
pub(crate) mod test_support;
