//! Client for the ATI student directory.
//!
//! Fetches the localized label table and the student profiles from the
//! backend, renders them into a [`render::RenderTarget`] and reacts to
//! user events through [`app::App`].

use std::sync::Once;

pub mod api;
pub mod app;
pub mod cookies;
mod errors;
pub mod model;
pub mod render;
pub mod settings;
pub mod state;

pub use api::{ApiClient, Backend};
pub use app::{App, Event};
pub use cookies::CookieJar;
pub use errors::{AppError, Result};
pub use model::{Ci, FieldValue, Profile, SiteConfig};
pub use render::{Action, Document, RenderTarget};
pub use settings::Settings;
pub use state::{AppState, View};

pub const API_PREFIX: [&str; 2] = ["ATI", "api"];
pub const PROFILES_FOLDER: &str = "/ATI/perfiles";
pub const DEFAULT_IMAGE: &str = "/ATI/static/default.jpg";

pub const LANG_COOKIE: &str = "lang";
pub const CURRENT_CI_COOKIE: &str = "currentCI";
pub const DEFAULT_LANG: &str = "ES";
pub const COOKIE_DAYS: i64 = 7;

// DOM anchors
pub const MAIN_CONTENT: &str = "main-content";
pub const NAV_BRAND: &str = "nav-brand";
pub const SEARCH_INPUT: &str = "nombre";
pub const SEARCH_BUTTON: &str = "buscar";
pub const COPYRIGHT: &str = "copyRight";
pub const GREETING: &str = "saludo";
pub const LANG_SELECT: &str = "lang-select";
pub const SEARCH_FORM: &str = "search-form";

pub static INIT: Once = Once::new();

/// Set up logging once per process; tests call this before touching
/// the network so `RUST_LOG` works for them too.
pub fn initialize() {
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
        log::info!("Initializing ati-spa");
    });
}
