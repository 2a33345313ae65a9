use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// Process-wide settings held by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    pub ai_api_key: String,
    pub ai_model: String,
    /// Minutes. Expected positive, not validated.
    pub collect_interval: u32,
    pub auto_rewrite: bool,
    pub theme: Theme,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ai_api_key: String::new(),
            ai_model: "gpt-4".to_string(),
            collect_interval: 60,
            auto_rewrite: false,
            theme: Theme::Light,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigUpdate {
    pub ai_api_key: Option<String>,
    pub ai_model: Option<String>,
    pub collect_interval: Option<u32>,
    pub auto_rewrite: Option<bool>,
    pub theme: Option<Theme>,
}

impl ConfigUpdate {
    pub fn apply(self, config: &mut AppConfig) {
        if let Some(ai_api_key) = self.ai_api_key {
            config.ai_api_key = ai_api_key;
        }
        if let Some(ai_model) = self.ai_model {
            config.ai_model = ai_model;
        }
        if let Some(collect_interval) = self.collect_interval {
            config.collect_interval = collect_interval;
        }
        if let Some(auto_rewrite) = self.auto_rewrite {
            config.auto_rewrite = auto_rewrite;
        }
        if let Some(theme) = self.theme {
            config.theme = theme;
        }
    }
}
