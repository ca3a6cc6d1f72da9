//! Record payloads returned by the remote API.
//!
//! - [`QueryResult`] / [`SearchResult`]: raw SOQL and SOSL responses
//! - [`RecordSet`]: the `{records, totalSize}` shape the interface renders
//! - [`SObjectDescribe`]: object metadata from a describe call
//! - [`organization_query`]: synthesizes the "select every field" query

mod describe;
mod org_explore;
mod query;

pub use describe::{FieldDescribe, SObjectDescribe, SObjectName};
pub use org_explore::{ORGANIZATION_SOBJECT, organization_query, select_all_query};
pub use query::{QueryResult, RecordSet, SearchResult, TotalSize};
