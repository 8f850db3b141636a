//! Internal utilities for the accounts handlers.

pub mod validation;

pub use validation::{Constraint, Rule, Validate, ValidationError};
