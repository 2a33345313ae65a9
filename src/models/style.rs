use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RewriteStyle {
    #[default]
    General,
    Professional,
    Friendly,
    Marketing,
    /// Directive comes from the caller's custom prompt
    Custom,
}

impl RewriteStyle {
    pub const ALL: [RewriteStyle; 5] = [
        RewriteStyle::General,
        RewriteStyle::Professional,
        RewriteStyle::Friendly,
        RewriteStyle::Marketing,
        RewriteStyle::Custom,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            RewriteStyle::General => "General",
            RewriteStyle::Professional => "Professional",
            RewriteStyle::Friendly => "Friendly",
            RewriteStyle::Marketing => "Marketing",
            RewriteStyle::Custom => "Custom",
        }
    }

    pub fn prompt(&self) -> Option<&'static str> {
        match self {
            RewriteStyle::General => Some(
                "Keep the core points of the original, polish the wording, make it flow and read easily",
            ),
            RewriteStyle::Professional => {
                Some("Rewrite with domain terminology to add authority and expertise")
            }
            RewriteStyle::Friendly => {
                Some("Rewrite in plain, approachable language close to everyday readers")
            }
            RewriteStyle::Marketing => {
                Some("Make it more persuasive and engaging, suitable for promotion")
            }
            RewriteStyle::Custom => None,
        }
    }

    /// The directive sent to the rewrite service.
    pub fn directive(&self, custom_prompt: Option<&str>) -> String {
        match self.prompt() {
            Some(prompt) => prompt.to_string(),
            None => custom_prompt.unwrap_or_default().to_string(),
        }
    }

    pub fn cycle(&self) -> Self {
        let index = Self::ALL.iter().position(|s| s == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

/// Collection sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Wechat,
    Zhihu,
    Weibo,
    Baidu,
}

impl Platform {
    pub const ALL: [Platform; 4] = [
        Platform::Wechat,
        Platform::Zhihu,
        Platform::Weibo,
        Platform::Baidu,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Platform::Wechat => "wechat",
            Platform::Zhihu => "zhihu",
            Platform::Weibo => "weibo",
            Platform::Baidu => "baidu",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Platform::Wechat => "WeChat Official Accounts",
            Platform::Zhihu => "Zhihu",
            Platform::Weibo => "Weibo",
            Platform::Baidu => "Baidu Trending",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Platform {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AppError::UnknownPlatform(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_parses_from_key() {
        assert_eq!("zhihu".parse::<Platform>().unwrap(), Platform::Zhihu);
        assert_eq!(" WeChat ".parse::<Platform>().unwrap(), Platform::Wechat);
        assert!(matches!(
            "myspace".parse::<Platform>(),
            Err(AppError::UnknownPlatform(_))
        ));
    }

    #[test]
    fn custom_style_uses_caller_prompt() {
        assert_eq!(
            RewriteStyle::Custom.directive(Some("Write it as a haiku")),
            "Write it as a haiku"
        );
        assert_eq!(RewriteStyle::Custom.directive(None), "");
        assert!(RewriteStyle::Marketing
            .directive(Some("ignored"))
            .contains("persuasive"));
    }

    #[test]
    fn style_cycle_wraps_around() {
        assert_eq!(RewriteStyle::Custom.cycle(), RewriteStyle::General);
        assert_eq!(RewriteStyle::General.cycle(), RewriteStyle::Professional);
    }
}
