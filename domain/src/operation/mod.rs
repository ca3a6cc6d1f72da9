//! Operation requests and their static routing tables.
//!
//! - [`OperationRequest`]: one variant per remote operation, strongly typed
//! - [`OperationKind`]: the operation name, mapped statically to its
//!   outbound [`ResponseChannel`]s and messages

mod kind;
mod request;

pub use kind::{OperationKind, ResponseChannel};
pub use request::{OperationRequest, SoqlQuery, SoslSearch};
