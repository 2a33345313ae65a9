use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeChatAccount {
    pub id: String,
    pub name: String,
    pub app_id: String,
    pub is_connected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sync_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct NewAccount {
    pub name: String,
    pub app_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountUpdate {
    pub name: Option<String>,
    pub is_connected: Option<bool>,
    pub last_sync_at: Option<DateTime<Utc>>,
}

impl AccountUpdate {
    pub fn apply(self, account: &mut WeChatAccount) {
        if let Some(name) = self.name {
            account.name = name;
        }
        if let Some(is_connected) = self.is_connected {
            account.is_connected = is_connected;
        }
        if let Some(last_sync_at) = self.last_sync_at {
            account.last_sync_at = Some(last_sync_at);
        }
    }
}
