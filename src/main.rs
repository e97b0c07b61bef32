use std::sync::Arc;

use anyhow::{anyhow, Context};
use ati_spa::{
    App, CookieJar, Document, Event, RenderTarget, Settings, COPYRIGHT,
    GREETING, LANG_SELECT, MAIN_CONTENT, SEARCH_BUTTON,
};
use clap::{Parser, Subcommand};
use url::Url;

#[derive(Parser, Debug)]
#[clap(name = "ati-spa")]
#[clap(about = "Browse the ATI student directory from the terminal", long_about = None)]
struct Cli {
    /// Backend origin, overrides ATI_BASE_URL
    #[clap(long)]
    base_url: Option<Url>,

    /// Language to start with, stored as the `lang` cookie
    #[clap(long)]
    lang: Option<String>,

    /// Initial cookies, as in `document.cookie`
    #[clap(long, default_value = "")]
    cookie: String,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the students, optionally filtered by name
    Grid {
        #[clap(long)]
        query: Option<String>,
    },
    /// Show one profile
    Profile { ci: String },
    /// Switch language and show the resulting page
    SetLang { lang: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let mut settings = Settings::from_env().context("Reading settings")?;
    if let Some(base_url) = cli.base_url {
        settings = settings.with_base_url(base_url);
    }

    let cookies = Arc::new(CookieJar::from_document_cookie(&cli.cookie));
    if let Some(lang) = &cli.lang {
        cookies.set_default(ati_spa::LANG_COOKIE, lang);
    }

    let mut app = App::connect(settings, cookies.clone(), Document::shell())?;
    app.start().await;

    match cli.command {
        Command::Grid { query } => {
            if let Some(query) = query {
                app.dispatch(Event::SearchInput(query)).await;
            }
        }
        Command::Profile { ci } => {
            app.perform(ati_spa::Action::OpenProfile(ci.as_str().into()))
                .await;
        }
        Command::SetLang { lang } => {
            if !app.dispatch(Event::LanguageChanged(lang.clone())).await {
                return Err(anyhow!("Backend refused language {}", lang));
            }
        }
    }

    print!("{}", page_text(app.target(), &cookies.document_cookie()));
    Ok(())
}

/// Plain-text rendering of the page: title, chrome texts, then the
/// cards (or the main content as text) and the cookies.
fn page_text(document: &Document, cookies: &str) -> String {
    let mut lines = vec![document.title().to_string()];
    for (label, slot) in [
        ("search", SEARCH_BUTTON),
        ("greeting", GREETING),
        ("footer", COPYRIGHT),
    ] {
        if let Some(text) = document.text(slot).filter(|t| !t.is_empty()) {
            lines.push(format!("{}: {}", label, text));
        }
    }
    if let Some(lang) = document.value(LANG_SELECT) {
        lines.push(format!("language: {}", lang));
    }
    lines.push(String::new());

    let names = document.select_texts(MAIN_CONTENT, ".estudiante-card p");
    if names.is_empty() {
        lines.push(document.text(MAIN_CONTENT).unwrap_or_default());
    } else {
        let ids =
            document.select_attrs(MAIN_CONTENT, "a.estudiante-link", "data-ci");
        for (ci, name) in ids.iter().zip(names.iter()) {
            lines.push(format!("{:>12}  {}", ci, name));
        }
    }

    lines.push(format!("cookies: {}", cookies));
    lines.push(String::new());
    lines.join("\n")
}
