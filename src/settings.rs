use std::{env, fmt::Display, str::FromStr};

use url::Url;

use crate::{AppError, Result, COOKIE_DAYS, DEFAULT_LANG};

pub const BASE_URL_VAR: &str = "ATI_BASE_URL";
pub const DEFAULT_LANG_VAR: &str = "ATI_DEFAULT_LANG";
pub const GREETING_NAME_VAR: &str = "ATI_GREETING_NAME";
pub const COOKIE_DAYS_VAR: &str = "ATI_COOKIE_DAYS";

const DEFAULT_BASE_URL: &str = "http://localhost:8000";
const DEFAULT_GREETING_NAME: &str = "Gabriel";

#[derive(Debug, Clone)]
pub struct Settings {
    /// Origin of the backend; API paths are absolute under it
    pub base_url: Url,
    /// Language used when no `lang` cookie is present
    pub default_lang: String,
    /// Name appended to the localized greeting
    pub greeting_name: String,
    /// Lifetime of the `currentCI` cookie
    pub cookie_days: i64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL)
                .expect("default base url is valid"),
            default_lang: DEFAULT_LANG.to_string(),
            greeting_name: DEFAULT_GREETING_NAME.to_string(),
            cookie_days: COOKIE_DAYS,
        }
    }
}

impl Settings {
    /// Read settings from the environment, falling back to defaults
    /// for unset variables. A variable that is set but unparsable is
    /// an error rather than a silent default.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            base_url: try_load(BASE_URL_VAR, DEFAULT_BASE_URL)?,
            default_lang: try_load(DEFAULT_LANG_VAR, DEFAULT_LANG)?,
            greeting_name: try_load(GREETING_NAME_VAR, DEFAULT_GREETING_NAME)?,
            cookie_days: try_load(COOKIE_DAYS_VAR, &COOKIE_DAYS.to_string())?,
        })
    }

    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T>
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        log::info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.trim().parse::<T>().map_err(|e| {
        log::warn!("Invalid {key} value {raw:?}: {e}");
        AppError::Settings(format!("{key}: {e}"))
    })
}
