//! Organizations and authenticated sessions.
//!
//! - [`OrgId`]: stable key of a remote organization
//! - [`Credentials`]: username/password(+token) login input
//! - [`Session`]: an authenticated handle's identity (org, user, instance)
//! - [`UserInfo`]: the login payload returned to the interface

mod credentials;
mod org_id;
mod session;

pub use credentials::{Credentials, DEFAULT_LOGIN_URL};
pub use org_id::OrgId;
pub use session::{AccessToken, Session, UserInfo};
