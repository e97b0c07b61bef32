use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::FieldValue;
use crate::{AppError, DEFAULT_IMAGE, PROFILES_FOLDER};

/// Citizen identifier, the opaque key of a profile. The backend sends
/// it either as a JSON string or as a number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Ci(String);

impl Ci {
    pub fn new<S: Into<String>>(ci: S) -> Self {
        Self(ci.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ci {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Ci {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl TryFrom<Value> for Ci {
    type Error = AppError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(s) if !s.is_empty() => Ok(Self(s)),
            Value::Number(n) => Ok(Self(n.to_string())),
            _ => Err(AppError::Parse),
        }
    }
}

impl<'de> Deserialize<'de> for Ci {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ci::try_from(value).map_err(|_| {
            serde::de::Error::custom("ci must be a non-empty string or number")
        })
    }
}

/// A student profile as served by `/ATI/api/perfil/{ci}` and listed by
/// `/ATI/api/estudiantes`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    pub ci: Ci,
    #[serde(default)]
    pub nombre: String,
    #[serde(default)]
    pub descripcion: Option<String>,
    #[serde(default)]
    pub imagen: Option<String>,
    #[serde(default)]
    pub color: Option<FieldValue>,
    #[serde(default)]
    pub libro: Option<FieldValue>,
    #[serde(default)]
    pub musica: Option<FieldValue>,
    #[serde(default)]
    pub video_juego: Option<FieldValue>,
    #[serde(default)]
    pub lenguajes: Option<FieldValue>,
    #[serde(default)]
    pub email: Option<String>,
}

impl Profile {
    pub fn new<C: Into<Ci>>(ci: C, nombre: &str) -> Self {
        Self {
            ci: ci.into(),
            nombre: nombre.to_string(),
            descripcion: None,
            imagen: None,
            color: None,
            libro: None,
            musica: None,
            video_juego: None,
            lenguajes: None,
            email: None,
        }
    }

    /// Case-insensitive substring match on the name only.
    pub fn matches(&self, query: &str) -> bool {
        self.nombre
            .to_lowercase()
            .contains(&query.to_lowercase())
    }

    /// Full-size photo under the profile folder.
    pub fn photo_path(&self) -> String {
        format!("{}/{}/{}.jpg", PROFILES_FOLDER, self.ci, self.ci)
    }

    /// Grid thumbnail, relative to the site root.
    pub fn thumbnail_path(&self) -> String {
        match self.imagen.as_deref().map(str::trim) {
            Some(path) if !path.is_empty() => {
                format!("/{}", path.trim_start_matches('/'))
            }
            _ => DEFAULT_IMAGE.to_string(),
        }
    }

    /// Email, if present and non-blank.
    pub fn email(&self) -> Option<&str> {
        self.email
            .as_deref()
            .filter(|email| !email.trim().is_empty())
    }
}
