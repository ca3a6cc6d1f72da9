//! Response envelope protocol.
//!
//! Every operation outcome, success or failure, is wrapped in the same
//! four-field [`ResponseEnvelope`] so the interface never has to special-case
//! an operation.

mod limit;
mod response;

pub use limit::{ApiUsage, LimitInfo};
pub use response::{ErrorDetail, ResponseEnvelope};
