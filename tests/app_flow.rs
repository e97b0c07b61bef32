mod common;

use std::sync::Arc;

use ati_spa::render::{card_selector, BACK_BUTTON};
use ati_spa::{
    ApiClient, App, Ci, CookieJar, Document, Event, RenderTarget, Settings,
    View, CURRENT_CI_COOKIE, LANG_COOKIE, LANG_SELECT, MAIN_CONTENT,
    SEARCH_BUTTON,
};
use common::{ati_backend, Response, StubBackend};

fn connect(
    backend: &StubBackend,
    cookies: Arc<CookieJar>,
) -> App<ApiClient, Document> {
    ati_spa::initialize();
    let settings = Settings::default().with_base_url(backend.base_url.clone());
    App::connect(settings, cookies, Document::shell()).unwrap()
}

fn card_names(app: &App<ApiClient, Document>) -> Vec<String> {
    app.target().select_texts(MAIN_CONTENT, ".estudiante-card p")
}

#[tokio::test]
async fn browse_profile_switch_language_and_go_back() {
    let backend = StubBackend::start(ati_backend).await;
    let cookies = Arc::new(CookieJar::new());
    let mut app = connect(&backend, cookies.clone());

    app.start().await;
    assert_eq!(app.target().title(), "ATI [UCV] 2025-2");
    assert_eq!(app.target().text(SEARCH_BUTTON).as_deref(), Some("Buscar"));
    assert_eq!(card_names(&app), vec!["Ana", "Bob", "Mariana"]);

    assert!(app.dispatch(Event::Click(card_selector(&Ci::from("123")))).await);
    assert_eq!(app.view(), &View::Profile(Ci::from("123")));
    assert_eq!(cookies.get(CURRENT_CI_COOKIE).as_deref(), Some("123"));
    assert_eq!(
        app.target().select_texts(MAIN_CONTENT, ".descripcion"),
        vec!["Estudiante"]
    );
    assert_eq!(
        app.target().select_texts(MAIN_CONTENT, "#email-container"),
        vec!["Mi email es: ana@example.com"]
    );

    assert!(app.dispatch(Event::LanguageChanged("EN".into())).await);
    assert_eq!(cookies.get(LANG_COOKIE).as_deref(), Some("EN"));
    assert_eq!(app.target().text(SEARCH_BUTTON).as_deref(), Some("Search"));
    assert_eq!(app.target().value(LANG_SELECT).as_deref(), Some("EN"));
    // the backend saw the new cookie and answered in English
    assert_eq!(
        app.target().select_texts(MAIN_CONTENT, ".descripcion"),
        vec!["Student"]
    );
    assert_eq!(
        app.target().select_texts(MAIN_CONTENT, ".label-libro"),
        vec!["My favorite book is:"]
    );

    assert!(app.dispatch(Event::Click(BACK_BUTTON.to_string())).await);
    assert!(app.view().is_grid());
    assert_eq!(cookies.get(CURRENT_CI_COOKIE), None);

    assert_eq!(
        backend.calls(),
        vec![
            "GET /ATI/api/config/ES",
            "GET /ATI/api/estudiantes",
            "GET /ATI/api/perfil/123",
            "POST /ATI/api/set_lang",
            "GET /ATI/api/config/EN",
            "GET /ATI/api/perfil/123",
            "GET /ATI/api/estudiantes",
        ]
    );
}

#[tokio::test]
async fn reload_returns_to_saved_profile() {
    let backend = StubBackend::start(ati_backend).await;
    let cookies = Arc::new(CookieJar::new());

    let mut first = connect(&backend, cookies.clone());
    first.start().await;
    first.perform(ati_spa::Action::OpenProfile(Ci::from("124"))).await;

    // a new page load sharing the same cookies
    let mut second = connect(&backend, cookies.clone());
    second.start().await;

    assert_eq!(second.view(), &View::Profile(Ci::from("124")));
    assert_eq!(
        second.target().select_texts(MAIN_CONTENT, "#libro"),
        vec!["C"]
    );
    assert!(second
        .target()
        .history()
        .iter()
        .all(|(_, html)| !html.contains("estudiantes-grid")));
}

#[tokio::test]
async fn search_runs_locally() {
    let backend = StubBackend::start(ati_backend).await;
    let mut app = connect(&backend, Arc::new(CookieJar::new()));
    app.start().await;
    let requests = backend.calls().len();

    app.dispatch(Event::SearchInput("ANA".into())).await;
    assert_eq!(card_names(&app), vec!["Ana", "Mariana"]);

    app.dispatch(Event::SearchInput("zz".into())).await;
    assert_eq!(
        app.target().text(MAIN_CONTENT).as_deref(),
        Some("No hay alumnos que tengan en su nombre: zz")
    );

    assert_eq!(backend.calls().len(), requests);
}

#[tokio::test]
async fn rejected_language_keeps_the_page() {
    let backend = StubBackend::start(|request| {
        if request.method == "POST" {
            Response::raw(400, r#"{"error": "Idioma no soportado"}"#)
        } else {
            ati_backend(request)
        }
    })
    .await;
    let cookies = Arc::new(CookieJar::from_document_cookie("lang=ES"));
    let mut app = connect(&backend, cookies.clone());
    app.start().await;
    let page = app.target().html(MAIN_CONTENT).map(str::to_string);

    app.target_mut().set_value(LANG_SELECT, "XX");
    assert!(!app.dispatch(Event::LanguageChanged("XX".into())).await);

    assert_eq!(app.state().lang, "ES");
    assert_eq!(app.target().value(LANG_SELECT).as_deref(), Some("ES"));
    assert_eq!(app.target().html(MAIN_CONTENT).map(str::to_string), page);
    assert_eq!(cookies.get(LANG_COOKIE).as_deref(), Some("ES"));
    assert_eq!(backend.calls().len(), 3);
}

#[tokio::test]
async fn unreachable_backend_still_renders() {
    let backend = StubBackend::start(|_| Response::raw(500, "{}")).await;
    let mut app = connect(&backend, Arc::new(CookieJar::new()));

    app.start().await;

    assert!(app.view().is_grid());
    assert!(app.state().config.is_empty());
    assert_eq!(
        app.target().text(MAIN_CONTENT).as_deref(),
        Some("No hay estudiantes para mostrar")
    );
}
