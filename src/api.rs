use std::sync::Arc;

use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Response};
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::cookies::CookieJar;
use crate::model::{Ci, Profile, SiteConfig};
use crate::{AppError, Result, API_PREFIX};

/// The four backend calls the controller depends on. Every failure is
/// absorbed here: callers only ever see absence, an empty list or
/// `false`.
#[allow(async_fn_in_trait)]
pub trait Backend {
    async fn get_config(&self, lang: &str) -> Option<SiteConfig>;

    async fn list_students(&self) -> Vec<Profile>;

    async fn get_profile(&self, ci: &Ci) -> Option<Profile>;

    async fn set_language(&self, lang: &str) -> bool;
}

#[derive(Serialize)]
struct SetLang<'a> {
    lang: &'a str,
}

/// HTTP implementation of [`Backend`] talking to the `/ATI/api` routes.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Build a client whose requests carry, and whose responses update,
    /// the cookies in `jar`.
    pub fn new(base_url: Url, jar: Arc<CookieJar>) -> Result<Self> {
        let client = Client::builder().cookie_provider(jar).build()?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute endpoint URL; every segment is percent-encoded.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                AppError::Other(anyhow::anyhow!(
                    "{} cannot be a base URL",
                    self.base_url
                ))
            })?
            .clear()
            .extend(API_PREFIX)
            .extend(segments);
        url.set_query(None);
        Ok(url)
    }

    async fn get_json(&self, url: Url) -> Result<Value> {
        log::trace!("GET {}", url);
        let response = self.client.get(url).send().await?;
        let body = check_status(response)?.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    pub async fn try_get_config(&self, lang: &str) -> Result<SiteConfig> {
        let url = self.endpoint(&["config", lang])?;
        let value = self.get_json(url).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Entries that do not parse as profiles are skipped so a single bad
    /// record does not empty the whole grid.
    pub async fn try_list_students(&self) -> Result<Vec<Profile>> {
        let url = self.endpoint(&["estudiantes"])?;
        let entries: Vec<Value> =
            serde_json::from_value(self.get_json(url).await?)?;

        let profiles = entries
            .into_iter()
            .enumerate()
            .filter_map(|(position, entry)| {
                serde_json::from_value::<Profile>(entry)
                    .map_err(|e| {
                        log::warn!(
                            "Skipping student entry {}: {}",
                            position,
                            e
                        )
                    })
                    .ok()
            })
            .collect();
        Ok(profiles)
    }

    pub async fn try_get_profile(&self, ci: &Ci) -> Result<Profile> {
        let url = self.endpoint(&["perfil", ci.as_str()])?;
        let value = self.get_json(url).await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn try_set_language(&self, lang: &str) -> Result<()> {
        let url = self.endpoint(&["set_lang"])?;
        log::trace!("POST {}", url);
        let body = serde_json::to_string(&SetLang { lang })?;
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .body(body)
            .send()
            .await?;
        check_status(response)?;
        Ok(())
    }
}

fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(AppError::Status(status.as_u16()))
    }
}

impl Backend for ApiClient {
    async fn get_config(&self, lang: &str) -> Option<SiteConfig> {
        self.try_get_config(lang)
            .await
            .map_err(|e| log::error!("Error loading config {}: {}", lang, e))
            .ok()
    }

    async fn list_students(&self) -> Vec<Profile> {
        self.try_list_students()
            .await
            .unwrap_or_else(|e| {
                log::error!("Error loading students: {}", e);
                Vec::new()
            })
    }

    async fn get_profile(&self, ci: &Ci) -> Option<Profile> {
        self.try_get_profile(ci)
            .await
            .map_err(|e| log::error!("Error loading profile {}: {}", ci, e))
            .ok()
    }

    async fn set_language(&self, lang: &str) -> bool {
        match self.try_set_language(lang).await {
            Ok(()) => true,
            Err(e) => {
                log::error!("Error changing language to {}: {}", lang, e);
                false
            }
        }
    }
}
