mod handler;
mod ui;

pub use handler::{handle_key_event, AppAction};
pub use ui::draw;

/// Top-level views, keyed by the name stored in the app state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Module {
    Dashboard,
    Collection,
    Materials,
    Rewrite,
    Illustration,
    Publish,
    Settings,
}

impl Module {
    pub const ALL: [Module; 7] = [
        Module::Dashboard,
        Module::Collection,
        Module::Materials,
        Module::Rewrite,
        Module::Illustration,
        Module::Publish,
        Module::Settings,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Module::Dashboard => "dashboard",
            Module::Collection => "collection",
            Module::Materials => "materials",
            Module::Rewrite => "rewrite",
            Module::Illustration => "illustration",
            Module::Publish => "publish",
            Module::Settings => "settings",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Module::Dashboard => "Dashboard",
            Module::Collection => "Collect",
            Module::Materials => "Materials",
            Module::Rewrite => "AI Rewrite",
            Module::Illustration => "Illustrate",
            Module::Publish => "Publish",
            Module::Settings => "Settings",
        }
    }

    /// Unknown names resolve to the dashboard.
    pub fn from_name(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|m| m.key() == name)
            .unwrap_or(Module::Dashboard)
    }

    pub fn next(&self) -> Self {
        let index = Self::ALL.iter().position(|m| m == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_module_falls_back_to_dashboard() {
        assert_eq!(Module::from_name("publish"), Module::Publish);
        assert_eq!(Module::from_name("reports"), Module::Dashboard);
        assert_eq!(Module::from_name(""), Module::Dashboard);
    }

    #[test]
    fn next_wraps_around() {
        assert_eq!(Module::Settings.next(), Module::Dashboard);
    }
}
