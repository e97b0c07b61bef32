use std::collections::BTreeMap;

use scraper::{Html, Selector};

use super::{escape, Action, RenderTarget};
use crate::{
    COPYRIGHT, DEFAULT_LANG, GREETING, LANG_SELECT, MAIN_CONTENT, NAV_BRAND,
    SEARCH_BUTTON, SEARCH_FORM, SEARCH_INPUT,
};

const SHELL_TITLE: &str = "ATI[UCV] 2025-2";
/// HTML replacements kept in the history
const HISTORY_LIMIT: usize = 32;

#[derive(Debug, Clone, Default)]
struct Slot {
    html: String,
    attrs: BTreeMap<String, String>,
    value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Binding {
    scope: String,
    element: String,
    action: Action,
}

/// In-memory page: slot contents, attributes, form values and the
/// click bindings currently attached.
#[derive(Debug, Clone, Default)]
pub struct Document {
    title: String,
    slots: BTreeMap<String, Slot>,
    bindings: Vec<Binding>,
    history: Vec<(String, String)>,
}

impl Document {
    /// A page with no slots at all.
    pub fn new() -> Self {
        Self::default()
    }

    /// The page shell with every anchor the client expects.
    pub fn shell() -> Self {
        let mut document = Self::with_slots(&[
            MAIN_CONTENT,
            NAV_BRAND,
            SEARCH_INPUT,
            SEARCH_BUTTON,
            COPYRIGHT,
            GREETING,
            LANG_SELECT,
            SEARCH_FORM,
        ]);
        document.title = SHELL_TITLE.to_string();
        document.set_text(NAV_BRAND, SHELL_TITLE);
        document.set_value(LANG_SELECT, DEFAULT_LANG);
        document.set_value(SEARCH_INPUT, "");
        document.history.clear();
        document
    }

    pub fn with_slots(ids: &[&str]) -> Self {
        let mut document = Self::new();
        for id in ids {
            document.add_slot(id);
        }
        document
    }

    pub fn add_slot(&mut self, id: &str) {
        self.slots.entry(id.to_string()).or_default();
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn html(&self, slot: &str) -> Option<&str> {
        self.slots.get(slot).map(|s| s.html.as_str())
    }

    pub fn attr(&self, slot: &str, name: &str) -> Option<&str> {
        self.slots
            .get(slot)
            .and_then(|s| s.attrs.get(name))
            .map(String::as_str)
    }

    /// Plain text of a slot, whitespace collapsed.
    pub fn text(&self, slot: &str) -> Option<String> {
        let html = self.html(slot)?;
        let fragment = Html::parse_fragment(html);
        let text = fragment.root_element().text().collect::<Vec<_>>();
        Some(collapse_whitespace(&text.join(" ")))
    }

    /// Text of every element matching `css` inside `slot`.
    pub fn select_texts(&self, slot: &str, css: &str) -> Vec<String> {
        self.select(slot, css, |element| {
            Some(collapse_whitespace(&element.text().collect::<String>()))
        })
    }

    /// Attribute `name` of every element matching `css` inside `slot`.
    pub fn select_attrs(
        &self,
        slot: &str,
        css: &str,
        name: &str,
    ) -> Vec<String> {
        self.select(slot, css, |element| {
            element.value().attr(name).map(str::to_string)
        })
    }

    pub fn count(&self, slot: &str, css: &str) -> usize {
        self.select(slot, css, |_| Some(())).len()
    }

    fn select<T>(
        &self,
        slot: &str,
        css: &str,
        mut extract: impl FnMut(scraper::ElementRef) -> Option<T>,
    ) -> Vec<T> {
        let Some(html) = self.html(slot) else {
            return Vec::new();
        };
        let Ok(selector) = Selector::parse(css) else {
            log::warn!("Invalid selector {:?}", css);
            return Vec::new();
        };
        let fragment = Html::parse_fragment(html);
        let found = fragment.select(&selector).filter_map(&mut extract).collect();
        found
    }

    /// Elements that currently react to clicks.
    pub fn bound_elements(&self) -> Vec<&str> {
        self.bindings
            .iter()
            .map(|binding| binding.element.as_str())
            .collect()
    }

    /// The latest HTML replacements, oldest first, as `(slot, html)`.
    /// Only the most recent renders are kept.
    pub fn history(&self) -> &[(String, String)] {
        &self.history
    }
}

impl RenderTarget for Document {
    fn has_slot(&self, slot: &str) -> bool {
        self.slots.contains_key(slot)
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn set_text(&mut self, slot: &str, text: &str) -> bool {
        self.set_html(slot, escape(text))
    }

    fn set_attr(&mut self, slot: &str, name: &str, value: &str) -> bool {
        match self.slots.get_mut(slot) {
            Some(s) => {
                s.attrs.insert(name.to_string(), value.to_string());
                true
            }
            None => false,
        }
    }

    fn set_html(&mut self, slot: &str, html: String) -> bool {
        let Some(s) = self.slots.get_mut(slot) else {
            log::debug!("No slot #{}, skipping render", slot);
            return false;
        };
        if self.history.len() >= HISTORY_LIMIT {
            self.history.remove(0);
        }
        self.history.push((slot.to_string(), html.clone()));
        s.html = html;
        self.bindings.retain(|binding| binding.scope != slot);
        true
    }

    fn value(&self, slot: &str) -> Option<String> {
        self.slots.get(slot).and_then(|s| s.value.clone())
    }

    fn set_value(&mut self, slot: &str, value: &str) -> bool {
        match self.slots.get_mut(slot) {
            Some(s) => {
                s.value = Some(value.to_string());
                true
            }
            None => false,
        }
    }

    fn bind(&mut self, scope: &str, element: &str, action: Action) {
        self.bindings.retain(|binding| binding.element != element);
        self.bindings.push(Binding {
            scope: scope.to_string(),
            element: element.to_string(),
            action,
        });
    }

    fn click(&self, element: &str) -> Option<Action> {
        self.bindings
            .iter()
            .find(|binding| binding.element == element)
            .map(|binding| binding.action.clone())
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
