use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, TimeDelta, Utc};
use itertools::Itertools;
use reqwest::header::HeaderValue;
use url::Url;

use crate::COOKIE_DAYS;

const LOG_PREFIX: &str = "[cookies]";
const ROOT_PATH: &str = "/";
const EXPIRES_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

#[derive(Debug, Clone, PartialEq, Eq)]
struct Cookie {
    value: String,
    path: String,
    /// `None` marks a session cookie
    expires: Option<DateTime<Utc>>,
}

impl Cookie {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires.map_or(false, |expires| expires <= now)
    }

    fn matches_path(&self, path: &str) -> bool {
        if self.path == ROOT_PATH || self.path == path {
            return true;
        }
        path.starts_with(&self.path)
            && (self.path.ends_with('/')
                || path[self.path.len()..].starts_with('/'))
    }
}

/// Browser-style cookie jar shared by the controller and the HTTP
/// client. Reads never fail; a poisoned lock still yields its data.
#[derive(Debug, Default)]
pub struct CookieJar {
    cookies: RwLock<BTreeMap<String, Cookie>>,
}

impl CookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a jar from a `document.cookie` style string.
    pub fn from_document_cookie(raw: &str) -> Self {
        let jar = Self::new();
        jar.load_document_cookie(raw);
        jar
    }

    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<String, Cookie>> {
        self.cookies
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<String, Cookie>> {
        self.cookies
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Store `name=value` for the whole site, expiring `days` from now.
    /// Negative `days` expire the cookie immediately.
    pub fn set(&self, name: &str, value: &str, days: i64) {
        let expires = offset_from_now(TimeDelta::try_days(days), days >= 0);
        log::debug!(
            "{} set {}={} expires {}",
            LOG_PREFIX,
            name,
            value,
            expires.format(EXPIRES_FORMAT)
        );
        self.insert(name, value, ROOT_PATH, Some(expires));
    }

    /// [`CookieJar::set`] with the default lifetime.
    pub fn set_default(&self, name: &str, value: &str) {
        self.set(name, value, COOKIE_DAYS)
    }

    /// Overwrite with a past expiry, which deletes the cookie.
    pub fn remove(&self, name: &str) {
        self.set(name, "", -1)
    }

    pub fn get(&self, name: &str) -> Option<String> {
        let now = Utc::now();
        self.read()
            .get(name)
            .filter(|cookie| !cookie.is_expired(now))
            .map(|cookie| cookie.value.clone())
    }

    /// Live cookies as `a=b; c=d`, like `document.cookie`.
    pub fn document_cookie(&self) -> String {
        self.header_for(ROOT_PATH)
    }

    /// The string the browser form of [`CookieJar::set`] would assign
    /// to `document.cookie` for this cookie.
    pub fn to_set_cookie(&self, name: &str) -> Option<String> {
        self.read().get(name).map(|cookie| match cookie.expires {
            Some(expires) => format!(
                "{}={}; expires={}; path={}",
                name,
                cookie.value,
                expires.format(EXPIRES_FORMAT),
                cookie.path
            ),
            None => format!("{}={}; path={}", name, cookie.value, cookie.path),
        })
    }

    /// Add every `name=value` pair of a `document.cookie` string as a
    /// session cookie.
    pub fn load_document_cookie(&self, raw: &str) {
        for pair in raw.split(';') {
            if let Some((name, value)) = split_pair(pair) {
                self.insert(name, value, ROOT_PATH, None);
            }
        }
    }

    /// Absorb a `Set-Cookie` header from the backend.
    pub fn store_set_cookie(&self, header: &str) {
        let mut parts = header.split(';');
        let Some((name, value)) = parts.next().and_then(split_pair) else {
            log::warn!("{} ignoring malformed Set-Cookie {:?}", LOG_PREFIX, header);
            return;
        };

        let mut path = ROOT_PATH.to_string();
        let mut expires = None;
        let mut max_age = None;
        for attribute in parts {
            let (key, attr_value) = match attribute.split_once('=') {
                Some((key, attr_value)) => (key.trim(), attr_value.trim()),
                None => (attribute.trim(), ""),
            };
            match key.to_ascii_lowercase().as_str() {
                "path" if attr_value.starts_with('/') => {
                    path = attr_value.to_string()
                }
                "max-age" => match attr_value.parse::<i64>() {
                    Ok(seconds) => {
                        max_age = Some(offset_from_now(
                            TimeDelta::try_seconds(seconds),
                            seconds >= 0,
                        ))
                    }
                    Err(e) => log::warn!(
                        "{} bad Max-Age {:?}: {}",
                        LOG_PREFIX,
                        attr_value,
                        e
                    ),
                },
                "expires" => {
                    match DateTime::parse_from_rfc2822(attr_value) {
                        Ok(date) => expires = Some(date.with_timezone(&Utc)),
                        Err(e) => log::warn!(
                            "{} bad Expires {:?}: {}",
                            LOG_PREFIX,
                            attr_value,
                            e
                        ),
                    }
                }
                _ => (),
            }
        }

        // Max-Age wins over Expires
        self.insert(name, value, &path, max_age.or(expires));
    }

    /// `Cookie` header value for a request path.
    pub fn header_for(&self, path: &str) -> String {
        let now = Utc::now();
        self.read()
            .iter()
            .filter(|(_, cookie)| {
                !cookie.is_expired(now) && cookie.matches_path(path)
            })
            .map(|(name, cookie)| format!("{}={}", name, cookie.value))
            .join("; ")
    }

    fn insert(
        &self,
        name: &str,
        value: &str,
        path: &str,
        expires: Option<DateTime<Utc>>,
    ) {
        let now = Utc::now();
        let mut cookies = self.write();
        cookies.retain(|_, cookie| !cookie.is_expired(now));
        cookies.insert(
            name.to_string(),
            Cookie {
                value: value.to_string(),
                path: path.to_string(),
                expires,
            },
        );
    }
}

/// `now + delta`, saturating at the ends of the representable range
/// when `delta` is missing or the sum overflows.
fn offset_from_now(delta: Option<TimeDelta>, forward: bool) -> DateTime<Utc> {
    let saturated = if forward {
        DateTime::<Utc>::MAX_UTC
    } else {
        DateTime::<Utc>::MIN_UTC
    };
    delta
        .and_then(|delta| Utc::now().checked_add_signed(delta))
        .unwrap_or(saturated)
}

fn split_pair(pair: &str) -> Option<(&str, &str)> {
    let (name, value) = pair.trim().split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some((name, value.trim()))
}

impl reqwest::cookie::CookieStore for CookieJar {
    fn set_cookies(
        &self,
        cookie_headers: &mut dyn Iterator<Item = &HeaderValue>,
        _url: &Url,
    ) {
        for header in cookie_headers {
            match header.to_str() {
                Ok(raw) => self.store_set_cookie(raw),
                Err(e) => log::warn!(
                    "{} non-ASCII Set-Cookie header: {}",
                    LOG_PREFIX,
                    e
                ),
            }
        }
    }

    fn cookies(&self, url: &Url) -> Option<HeaderValue> {
        let header = self.header_for(url.path());
        if header.is_empty() {
            return None;
        }
        HeaderValue::from_str(&header).ok()
    }
}
