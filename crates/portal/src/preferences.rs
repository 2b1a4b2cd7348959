use serde::{Deserialize, Serialize};
use shared::domain::{Language, Theme};

/// Display settings owned by the running app, independent of who is signed in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub theme: Theme,
    pub language: Language,
}

impl Preferences {
    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.theme
    }

    pub fn toggle_language(&mut self) -> Language {
        self.language = self.language.toggled();
        self.language
    }
}
