//! Declaration visibility modifiers.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Access {
    Private,
    Protected,
    Package,
    Internal,
    Public,
}
