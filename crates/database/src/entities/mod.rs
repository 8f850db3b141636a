//! Database entities

pub mod user;

pub use user::{UnknownRole, User, UserRole};
