//! In-process stand-in for the ATI backend.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, Method, Uri};
use axum::Router;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use url::Url;

#[derive(Debug, Clone)]
pub struct Request {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Request {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Value of a cookie sent with the request.
    pub fn cookie(&self, name: &str) -> Option<String> {
        self.header("cookie")?.split(';').find_map(|pair| {
            let (key, value) = pair.trim().split_once('=')?;
            (key == name).then(|| value.to_string())
        })
    }
}

#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Response {
    pub fn json(value: Value) -> Self {
        Self::raw(200, &value.to_string())
    }

    pub fn raw(status: u16, body: &str) -> Self {
        Self {
            status,
            headers: vec![],
            body: body.to_string(),
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

type Handler = dyn Fn(&Request) -> Response + Send + Sync;

#[derive(Clone)]
struct Shared {
    handler: Arc<Handler>,
    requests: Arc<Mutex<Vec<Request>>>,
}

pub struct StubBackend {
    pub base_url: Url,
    requests: Arc<Mutex<Vec<Request>>>,
}

impl StubBackend {
    /// Serve every route through `handler` on an ephemeral local port.
    pub async fn start<F>(handler: F) -> Self
    where
        F: Fn(&Request) -> Response + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));

        let app = Router::new().fallback(route).with_state(Shared {
            handler: Arc::new(handler),
            requests: requests.clone(),
        });
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: Url::parse(&format!("http://{}", address)).unwrap(),
            requests,
        }
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    /// `METHOD /path` of every request so far.
    pub fn calls(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|r| format!("{} {}", r.method, r.path))
            .collect()
    }
}

async fn route(
    State(shared): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> axum::response::Response {
    let request = Request {
        method: method.to_string(),
        path: uri.path().to_string(),
        headers: headers
            .iter()
            .map(|(name, value)| {
                let value = value.to_str().unwrap_or_default();
                (name.to_string(), value.to_string())
            })
            .collect(),
        body,
    };
    shared.requests.lock().unwrap().push(request.clone());

    let response = (shared.handler)(&request);
    let mut builder = axum::http::Response::builder()
        .status(response.status)
        .header(CONTENT_TYPE, "application/json; charset=utf-8");
    for (name, value) in &response.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder.body(Body::from(response.body)).unwrap()
}

/// Labels for the languages the fake backend knows.
pub fn config_for(lang: &str) -> Option<Value> {
    match lang {
        "ES" => Some(json!({
            "sitio": ["ATI", "[UCV]", "2025-2"],
            "nombre": "Nombre",
            "buscar": "Buscar",
            "saludo": "Hola",
            "copyRight": "Copyright 2025",
            "libro": "Mi libro favorito es:",
            "email": "Mi email es: [email]",
            "noCoincidencias": "No hay alumnos que tengan en su nombre: [query]"
        })),
        "EN" => Some(json!({
            "sitio": ["ATI", "[UCV]", "2025-2"],
            "nombre": "Name",
            "buscar": "Search",
            "saludo": "Hello",
            "copyRight": "Copyright 2025",
            "libro": "My favorite book is:",
            "email": "My email is: [email]",
            "noCoincidencias": "No students named: [query]"
        })),
        _ => None,
    }
}

pub fn students() -> Value {
    json!([
        {"ci": "123", "nombre": "Ana", "imagen": "ATI/perfiles/123/123.jpg"},
        {"ci": 124, "nombre": "Bob"},
        {"nombre": "sin cédula"},
        {"ci": "125", "nombre": "Mariana"}
    ])
}

/// A backend behaving like the ATI server: the `lang` cookie picks the
/// profile text and `set_lang` answers with a `Set-Cookie`.
pub fn ati_backend(request: &Request) -> Response {
    let lang = request.cookie("lang").unwrap_or_else(|| "ES".to_string());
    let path = request.path.as_str();

    match (request.method.as_str(), path) {
        ("GET", "/ATI/api/estudiantes") => Response::json(students()),
        ("GET", _) if path.starts_with("/ATI/api/config/") => {
            match config_for(&path["/ATI/api/config/".len()..]) {
                Some(config) => Response::json(config),
                None => Response::json(json!({})),
            }
        }
        ("GET", "/ATI/api/perfil/123") => Response::json(json!({
            "ci": "123",
            "nombre": "Ana",
            "descripcion": if lang == "EN" { "Student" } else { "Estudiante" },
            "libro": ["A", "B"],
            "email": "ana@example.com"
        })),
        ("GET", "/ATI/api/perfil/124") => Response::json(json!({
            "ci": 124,
            "nombre": "Bob",
            "libro": "C"
        })),
        ("GET", _) if path.starts_with("/ATI/api/perfil/") => {
            Response::json(json!({}))
        }
        ("POST", "/ATI/api/set_lang") => {
            let body: Value = match serde_json::from_str(&request.body) {
                Ok(body) => body,
                Err(e) => {
                    return Response::json(json!({"error": e.to_string()}))
                        .with_status(400)
                }
            };
            let new_lang = body["lang"].as_str().unwrap_or("ES").to_string();
            Response::json(json!({"status": "ok", "lang": new_lang}))
                .with_header(
                    "Set-Cookie",
                    &format!("lang={}; Path=/; Max-Age=86400", new_lang),
                )
        }
        _ => Response::raw(404, "{}"),
    }
}
