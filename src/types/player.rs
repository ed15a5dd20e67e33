use serde::{Deserialize, Serialize};

/// Connected player as reported by the live roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnlinePlayer {
    pub net_id: u32,
    pub display_name: String,
    /// Connection identifiers such as `fivem:271816` or `discord:2728...`
    pub ids: Vec<String>,
}

impl OnlinePlayer {
    pub fn new(net_id: u32, display_name: impl Into<String>, ids: Vec<String>) -> Self {
        Self {
            net_id,
            display_name: display_name.into(),
            ids,
        }
    }
}
