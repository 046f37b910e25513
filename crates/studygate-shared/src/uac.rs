//! Shared items related to user account control

mod permissions;
mod responses;
mod user;

pub use permissions::{PermissionFlags, PermissionKind, PermissionSet};
pub use responses::{ErrorBody, LoginResponse, MessageBody};
pub use user::{UserProfile, Username};
