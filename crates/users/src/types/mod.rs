//! Shared types for the accounts handlers.

pub mod errors;
pub mod requests;
pub mod responses;

pub use errors::{Code, ServiceError, ServiceResult};
pub use requests::{AuthRequest, DeleteUserRequest, UpdateUserRequest, UserId, UserIds};
pub use responses::Empty;
