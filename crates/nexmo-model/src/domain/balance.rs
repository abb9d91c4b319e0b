use serde::{Deserialize, Serialize};

/// Account balance as reported by `GET /account/get-balance`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSample {
    /// Remaining prepaid credit, in currency units.
    pub value: f64,
    /// Whether the account tops itself up automatically.
    #[serde(default)]
    pub auto_reload: bool,
}

impl BalanceSample {
    pub fn new(value: f64) -> Self {
        Self {
            value,
            auto_reload: false,
        }
    }
}
