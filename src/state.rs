use crate::model::{Ci, Profile, SiteConfig};

/// What the main content currently shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum View {
    /// Startup, before the first view is painted
    #[default]
    Loading,
    /// Card grid; `query` is set while a search filter is applied
    Grid { query: Option<String> },
    /// Detail view of one profile
    Profile(Ci),
    /// A profile was requested but could not be fetched
    Unavailable(Ci),
}

impl View {
    pub fn is_grid(&self) -> bool {
        matches!(self, View::Grid { .. })
    }

    pub fn profile(&self) -> Option<&Ci> {
        match self {
            View::Profile(ci) => Some(ci),
            _ => None,
        }
    }
}

/// Session state owned by the controller.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub lang: String,
    /// Label table for `lang`; empty when the fetch failed
    pub config: SiteConfig,
    /// Baseline for search, as last fetched
    pub profiles: Vec<Profile>,
    pub view: View,
}

impl AppState {
    pub fn new(lang: &str) -> Self {
        Self {
            lang: lang.to_string(),
            ..Self::default()
        }
    }

    /// Filter the baseline list by name. `None` means the query is
    /// blank and the whole baseline applies. Non-blank queries match
    /// verbatim, surrounding spaces included.
    pub fn search(&self, query: &str) -> Option<Vec<Profile>> {
        if query.trim().is_empty() {
            return None;
        }
        Some(
            self.profiles
                .iter()
                .filter(|profile| profile.matches(query))
                .cloned()
                .collect(),
        )
    }
}
