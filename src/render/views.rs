use super::{escape, Action, RenderTarget};
use crate::cookies::CookieJar;
use crate::model::{display_or_empty, Ci, FieldValue, Profile, SiteConfig};
use crate::{
    COPYRIGHT, CURRENT_CI_COOKIE, DEFAULT_IMAGE, GREETING, LANG_SELECT,
    MAIN_CONTENT, NAV_BRAND, SEARCH_BUTTON, SEARCH_INPUT,
};

pub const BACK_BUTTON: &str = "#back-button";
pub const BRAND: &str = "#nav-brand";

const EMAIL_TOKEN: &str = "[email]";
const QUERY_TOKEN: &str = "[query]";

const NO_RESULTS: &str = "No hay estudiantes para mostrar";
const NO_MATCHES: &str = "No hay alumnos que tengan en su nombre: [query]";
const PROFILE_ERROR: &str = "Error cargando perfil";
const BACK_LABEL: &str = "Volver";

/// Attribute rows of the profile view, in display order:
/// (config key, default label, value span id, label class).
const PROFILE_ROWS: [(&str, &str, &str, &str); 5] = [
    ("color", "Mi color favorito es:", "color", "label-color"),
    ("libro", "Mi libro favorito es:", "libro", "label-libro"),
    (
        "musica",
        "Mi estilo de música preferida:",
        "musica",
        "label-musica",
    ),
    (
        "video_juego",
        "Video juegos favoritos:",
        "video-juego",
        "label-videojuego",
    ),
    (
        "lenguajes",
        "Lenguajes aprendidos:",
        "lenguajes",
        "label-lenguajes",
    ),
];

/// Placeholder shown while a fetch is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Loading {
    Students,
    Profile,
}

impl Loading {
    fn message(self) -> &'static str {
        match self {
            Loading::Students => "Cargando estudiantes...",
            Loading::Profile => "Cargando perfil...",
        }
    }
}

/// Selector a card is bound under.
pub fn card_selector(ci: &Ci) -> String {
    format!("a.estudiante-link[data-ci=\"{}\"]", escape(ci.as_str()))
}

/// Rewrite the fixed page texts from `config`. Each update stands on
/// its own: a missing anchor or label only skips that one update.
pub fn update_chrome_texts<T: RenderTarget>(
    target: &mut T,
    config: &SiteConfig,
    lang: &str,
    greeting_name: &str,
) {
    if let Some(title) = config.title() {
        target.set_title(&title);
        target.set_text(NAV_BRAND, &title);
    }

    if let Some(nombre) = config.text("nombre") {
        target.set_attr(SEARCH_INPUT, "placeholder", &format!("{}...", nombre));
    }

    if let Some(buscar) = config.text("buscar") {
        target.set_text(SEARCH_BUTTON, &buscar);
    }

    if let Some(copyright) = config.text("copyRight") {
        target.set_text(COPYRIGHT, &copyright);
    }

    if let Some(saludo) = config.text("saludo") {
        target.set_text(GREETING, &format!("{}, {}!", saludo, greeting_name));
    }

    target.set_value(LANG_SELECT, lang);
}

pub fn render_loading<T: RenderTarget>(target: &mut T, what: Loading) {
    target.set_html(
        MAIN_CONTENT,
        format!("<div id=\"loading\">{}</div>", what.message()),
    );
}

fn message_html(text: &str) -> String {
    format!(
        "<p class=\"mensaje\" style=\"text-align: center; padding: 20px;\">{}</p>",
        text
    )
}

/// Card grid for `profiles`, or the no-results message when empty.
pub fn render_grid<T: RenderTarget>(
    target: &mut T,
    config: &SiteConfig,
    profiles: &[Profile],
) {
    if profiles.is_empty() {
        let text = config.text_or("noResultados", NO_RESULTS);
        target.set_html(MAIN_CONTENT, message_html(&escape(&text)));
        return;
    }

    let mut html = String::from("<div class=\"estudiantes-grid\">");
    for profile in profiles {
        html.push_str(&card_html(profile));
    }
    html.push_str("</div>");
    target.set_html(MAIN_CONTENT, html);

    for profile in profiles {
        target.bind(
            MAIN_CONTENT,
            &card_selector(&profile.ci),
            Action::OpenProfile(profile.ci.clone()),
        );
    }
}

fn card_html(profile: &Profile) -> String {
    let name = escape(&profile.nombre);
    format!(
        concat!(
            "<a href=\"#\" class=\"estudiante-link\" data-ci=\"{ci}\">",
            "<div class=\"estudiante-card\">",
            "<img src=\"{src}\" alt=\"{name}\" class=\"estudiante-foto\" ",
            "onerror=\"this.src='{fallback}'\">",
            "<p>{name}</p>",
            "</div></a>"
        ),
        ci = escape(profile.ci.as_str()),
        src = escape(&profile.thumbnail_path()),
        name = name,
        fallback = DEFAULT_IMAGE,
    )
}

/// The localized "no student has [query] in their name" message.
pub fn render_no_matches<T: RenderTarget>(
    target: &mut T,
    config: &SiteConfig,
    query: &str,
) {
    let template = config.text_or("noCoincidencias", NO_MATCHES);
    let text = escape(&template).replace(QUERY_TOKEN, &escape(query));
    target.set_html(MAIN_CONTENT, message_html(&text));
}

/// Detail view for one profile. Remembers the profile in the
/// `currentCI` cookie so a reload comes back to it.
pub fn render_profile<T: RenderTarget>(
    target: &mut T,
    config: &SiteConfig,
    cookies: &CookieJar,
    cookie_days: i64,
    profile: Option<&Profile>,
) {
    let Some(profile) = profile else {
        target.set_html(MAIN_CONTENT, format!("<p>{}</p>", PROFILE_ERROR));
        return;
    };

    cookies.set(CURRENT_CI_COOKIE, profile.ci.as_str(), cookie_days);

    let photo = escape(&profile.photo_path());
    let mut html = format!(
        "<button id=\"back-button\" class=\"back-button\">← {}</button>",
        escape(&config.text_or("home", BACK_LABEL))
    );
    html.push_str("<div class=\"perfil-container\">");
    html.push_str(&format!(
        concat!(
            "<picture>",
            "<source media=\"(min-width: 769px)\" srcset=\"{photo}\">",
            "<img src=\"{photo}\" alt=\"Foto de perfil\" class=\"foto-perfil\" ",
            "onerror=\"this.src='{fallback}'\">",
            "</picture>"
        ),
        photo = photo,
        fallback = DEFAULT_IMAGE,
    ));
    html.push_str("<div class=\"info-perfil\">");
    html.push_str(&format!(
        "<h1 class=\"nombre-titulo\">{}</h1><p class=\"descripcion\">{}</p>",
        escape(&profile.nombre),
        escape(profile.descripcion.as_deref().unwrap_or_default())
    ));

    html.push_str("<ul class=\"datos-lista\">");
    for (key, default, id, class) in PROFILE_ROWS {
        html.push_str(&format!(
            "<li><span class=\"{}\">{}</span><span id=\"{}\">{}</span></li>",
            class,
            escape(&config.text_or(key, default)),
            id,
            escape(&display_or_empty(attribute(profile, key)))
        ));
    }
    html.push_str("</ul>");

    html.push_str(&format!(
        "<div id=\"email-container\">{}</div>",
        email_html(config, profile)
    ));
    html.push_str("</div></div>");

    target.set_html(MAIN_CONTENT, html);
    target.bind(MAIN_CONTENT, BACK_BUTTON, Action::ShowGrid);
    target.bind(MAIN_CONTENT, BRAND, Action::ShowGrid);
}

fn attribute<'a>(profile: &'a Profile, key: &str) -> Option<&'a FieldValue> {
    match key {
        "color" => profile.color.as_ref(),
        "libro" => profile.libro.as_ref(),
        "musica" => profile.musica.as_ref(),
        "video_juego" => profile.video_juego.as_ref(),
        "lenguajes" => profile.lenguajes.as_ref(),
        _ => None,
    }
}

fn email_html(config: &SiteConfig, profile: &Profile) -> String {
    let Some(email) = profile.email() else {
        return String::new();
    };
    let email = escape(email);
    let link = format!(
        "<a href=\"mailto:{}\" class=\"email-link\">{}</a>",
        email, email
    );

    match config.text("email") {
        Some(template) => escape(&template).replace(EMAIL_TOKEN, &link),
        None => link,
    }
}
