//! Category record - `GET /view-categories/`.

use super::RawId;
use serde::{Deserialize, Serialize};

/// Category as returned by the backend.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawCategory {
    /// Unique identifier
    #[serde(default)]
    pub id: Option<RawId>,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// `"income"` or `"expense"`
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// Free-form priority label
    #[serde(default)]
    pub priority: Option<String>,
}
