//! Business logic services for the accounts handlers.
//!
//! The handlers are written against the [`UserStore`] seam; the database-backed
//! [`UserRepository`](accounts_database::UserRepository) and the in-memory
//! [`MockUserStore`] both implement it.

pub mod mock_repositories;
pub mod store;
pub mod user_service;

pub use mock_repositories::MockUserStore;
pub use store::UserStore;
pub use user_service::{UserSender, UserService};
