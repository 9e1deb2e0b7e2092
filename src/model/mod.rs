use serde::{Deserialize, Serialize};

/// Order event published on the orders topic.
///
/// Absent fields fall back to their defaults and unknown fields are ignored.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Order {
    pub id: i64,
    pub amount: f64,
}
