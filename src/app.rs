use std::sync::Arc;

use crate::api::{ApiClient, Backend};
use crate::cookies::CookieJar;
use crate::model::Ci;
use crate::render::{
    render_grid, render_loading, render_no_matches, render_profile,
    update_chrome_texts, Action, Loading, RenderTarget,
};
use crate::settings::Settings;
use crate::state::{AppState, View};
use crate::{Result, CURRENT_CI_COOKIE, LANG_COOKIE, LANG_SELECT, SEARCH_INPUT};

/// User interaction delivered to [`App::dispatch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The search box changed (search as you type)
    SearchInput(String),
    /// The search form was submitted; the box's value is the query
    SearchSubmit,
    /// A new language was picked in the selector
    LanguageChanged(String),
    /// An element was clicked, identified by its selector
    Click(String),
}

/// The controller: owns the session state and drives the backend and
/// the render target.
///
/// Handlers take `&mut self`, so one event, awaited fetches included,
/// completes before the next is processed.
pub struct App<B: Backend, T: RenderTarget> {
    backend: B,
    target: T,
    cookies: Arc<CookieJar>,
    settings: Settings,
    state: AppState,
    listening: bool,
}

impl<T: RenderTarget> App<ApiClient, T> {
    /// App talking HTTP to `settings.base_url`, sharing `cookies` with
    /// the HTTP client.
    pub fn connect(
        settings: Settings,
        cookies: Arc<CookieJar>,
        target: T,
    ) -> Result<Self> {
        let backend = ApiClient::new(settings.base_url.clone(), cookies.clone())?;
        Ok(Self::new(backend, target, cookies, settings))
    }
}

impl<B: Backend, T: RenderTarget> App<B, T> {
    pub fn new(
        backend: B,
        target: T,
        cookies: Arc<CookieJar>,
        settings: Settings,
    ) -> Self {
        let state = AppState::new(&settings.default_lang);
        Self {
            backend,
            target,
            cookies,
            settings,
            state,
            listening: false,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut T {
        &mut self.target
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn cookies(&self) -> &CookieJar {
        &self.cookies
    }

    pub fn view(&self) -> &View {
        &self.state.view
    }

    /// Startup: language, labels, student list, then the saved profile
    /// or the grid. Events are accepted once this returns.
    pub async fn start(&mut self) {
        let lang = self
            .cookies
            .get(LANG_COOKIE)
            .filter(|lang| !lang.trim().is_empty())
            .unwrap_or_else(|| self.settings.default_lang.clone());
        log::info!("Starting with language {}", lang);

        self.state = AppState::new(&lang);
        self.reload_config().await;

        render_loading(&mut self.target, Loading::Students);
        self.state.profiles = self.backend.list_students().await;

        match self.saved_profile() {
            Some(ci) => self.load_profile(ci).await,
            None => self.paint_grid(),
        }

        self.listening = true;
    }

    /// Handle one user event. Returns `false` when the event had no
    /// effect (not started yet, or a click on an unbound element).
    pub async fn dispatch(&mut self, event: Event) -> bool {
        if !self.listening {
            log::warn!("Ignoring {:?} before startup finished", event);
            return false;
        }
        log::debug!("Event {:?} in view {:?}", event, self.state.view);

        match event {
            Event::SearchInput(query) => {
                self.target.set_value(SEARCH_INPUT, &query);
                self.search(&query);
                true
            }
            Event::SearchSubmit => {
                let query = self.target.value(SEARCH_INPUT).unwrap_or_default();
                self.search(&query);
                true
            }
            Event::LanguageChanged(lang) => self.change_language(&lang).await,
            Event::Click(element) => match self.target.click(&element) {
                Some(action) => {
                    self.perform(action).await;
                    true
                }
                None => {
                    log::debug!("Nothing bound to {}", element);
                    false
                }
            },
        }
    }

    pub async fn perform(&mut self, action: Action) {
        match action {
            Action::OpenProfile(ci) => self.load_profile(ci).await,
            Action::ShowGrid => self.show_grid().await,
        }
    }

    /// Back button and brand: forget the saved profile and list every
    /// student again.
    pub async fn show_grid(&mut self) {
        self.cookies.remove(CURRENT_CI_COOKIE);
        self.load_students().await;
    }

    pub async fn load_students(&mut self) {
        render_loading(&mut self.target, Loading::Students);
        self.state.profiles = self.backend.list_students().await;
        self.paint_grid();
    }

    pub async fn load_profile(&mut self, ci: Ci) {
        render_loading(&mut self.target, Loading::Profile);
        let profile = self.backend.get_profile(&ci).await;
        render_profile(
            &mut self.target,
            &self.state.config,
            &self.cookies,
            self.settings.cookie_days,
            profile.as_ref(),
        );
        self.state.view = match profile {
            Some(profile) => View::Profile(profile.ci),
            None => View::Unavailable(ci),
        };
    }

    /// Filter the baseline list by name without touching the network.
    pub fn search(&mut self, query: &str) {
        if !self.state.view.is_grid() {
            // leaving the profile: a reload must show the grid too
            self.cookies.remove(CURRENT_CI_COOKIE);
        }

        match self.state.search(query) {
            None => self.paint_grid(),
            Some(found) => {
                if found.is_empty() {
                    render_no_matches(&mut self.target, &self.state.config, query);
                } else {
                    render_grid(&mut self.target, &self.state.config, &found);
                }
                self.state.view = View::Grid {
                    query: Some(query.to_string()),
                };
            }
        }
    }

    /// Switch language on the backend first; only when it accepts are
    /// the labels and the active view fetched again.
    pub async fn change_language(&mut self, lang: &str) -> bool {
        if !self.backend.set_language(lang).await {
            log::warn!("Language {} rejected, keeping {}", lang, self.state.lang);
            self.target.set_value(LANG_SELECT, &self.state.lang);
            return false;
        }

        self.state.lang = lang.to_string();
        self.reload_config().await;

        match self.saved_profile() {
            Some(ci) => self.load_profile(ci).await,
            None => self.load_students().await,
        }
        true
    }

    async fn reload_config(&mut self) {
        self.state.config = self
            .backend
            .get_config(&self.state.lang)
            .await
            .unwrap_or_default();
        update_chrome_texts(
            &mut self.target,
            &self.state.config,
            &self.state.lang,
            &self.settings.greeting_name,
        );
    }

    fn paint_grid(&mut self) {
        render_grid(&mut self.target, &self.state.config, &self.state.profiles);
        self.state.view = View::Grid { query: None };
    }

    fn saved_profile(&self) -> Option<Ci> {
        self.cookies
            .get(CURRENT_CI_COOKIE)
            .filter(|ci| !ci.trim().is_empty())
            .map(Ci::new)
    }
}
