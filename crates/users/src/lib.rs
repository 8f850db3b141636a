//! # Accounts Users Crate
//!
//! Request handling for the accounts service: the Auth, GetUsers, GetUser,
//! UpdateUser and DeleteUser operations, their validation rules, and the store
//! seam they run against.
//!
//! ## Architecture
//!
//! - **Services**: the five operation handlers and the [`UserStore`] seam
//! - **Types**: request/response shapes and [`ServiceError`]
//! - **Utils**: declarative request validation
//!
//! ## Usage
//!
//! ```rust,no_run
//! use accounts_users::{AuthRequest, UserService};
//!
//! # async fn run(pool: accounts_users::SqlitePool) -> Result<(), accounts_users::ServiceError> {
//! let service = UserService::new(pool);
//! let user = service
//!     .auth(AuthRequest { email: "ada@example.com".into(), sub: "auth0|ada".into() })
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod services;
pub mod types;
pub mod utils;

pub use accounts_database::{SqlitePool, User, UserError, UserRepository, UserRole};

pub use services::{MockUserStore, UserSender, UserService, UserStore};
pub use types::{
    AuthRequest, Code, DeleteUserRequest, Empty, ServiceError, ServiceResult, UpdateUserRequest,
    UserId, UserIds,
};
pub use utils::{Rule, Validate, ValidationError};
