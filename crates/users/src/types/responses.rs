//! Response types for the accounts handlers.

use serde::{Deserialize, Serialize};

/// Acknowledgement with no payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Empty {}
