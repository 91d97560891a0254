use serde::{Deserialize, Serialize};

/// Authenticated caller, resolved from the session token upstream of the order flow.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub phone: String,
    pub nick_name: Option<String>,
}

impl UserInfo {
    pub fn new(phone: impl Into<String>) -> Self {
        Self {
            phone: phone.into(),
            nick_name: None,
        }
    }
}
