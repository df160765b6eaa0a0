//! The two screens and how the keyboard reaches them.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScreenId {
    #[default]
    Dashboard,
    Settings,
}

impl ScreenId {
    /// Tab-bar order.
    pub const ALL: [ScreenId; 2] = [Self::Dashboard, Self::Settings];

    /// Digit that jumps straight to this screen.
    pub fn hotkey(self) -> char {
        match self {
            Self::Dashboard => '1',
            Self::Settings => '2',
        }
    }

    pub fn from_hotkey(c: char) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.hotkey() == c)
    }

    /// Tab, BackTab and `,` all flip between the two screens.
    pub fn other(self) -> Self {
        match self {
            Self::Dashboard => Self::Settings,
            Self::Settings => Self::Dashboard,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Settings => "Settings",
        }
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
