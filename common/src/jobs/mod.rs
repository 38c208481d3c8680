use serde::{Deserialize, Serialize};

/// Delivery state of the receipt written for a signed session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArchiveStatus {
    Pending,
    /// Path of the written receipt.
    Archived(String),
    Failed(String),
}
