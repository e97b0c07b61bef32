//! Rendering into named page slots.
//!
//! Views never touch a real document tree. They write into a
//! [`RenderTarget`], which maps DOM ids to content and keeps the click
//! bindings attached after each render. [`Document`] is the in-memory
//! target used headlessly.

mod document;
mod views;

pub use document::Document;
pub use views::{
    card_selector, render_grid, render_loading, render_no_matches,
    render_profile, update_chrome_texts, Loading, BACK_BUTTON, BRAND,
};

use crate::model::Ci;

/// What a bound element does when clicked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Fetch and show one profile
    OpenProfile(Ci),
    /// Forget the saved profile and show the full grid
    ShowGrid,
}

/// A page made of named slots (DOM ids).
///
/// Writes to a slot that does not exist are skipped and reported with
/// `false`, so one missing anchor never blocks the other updates.
pub trait RenderTarget {
    fn has_slot(&self, slot: &str) -> bool;

    fn set_title(&mut self, title: &str);

    fn set_text(&mut self, slot: &str, text: &str) -> bool;

    fn set_attr(&mut self, slot: &str, name: &str, value: &str) -> bool;

    /// Replace the slot's content wholesale. Bindings scoped to the slot
    /// are dropped with the old content.
    fn set_html(&mut self, slot: &str, html: String) -> bool;

    /// Current value of a form control.
    fn value(&self, slot: &str) -> Option<String>;

    fn set_value(&mut self, slot: &str, value: &str) -> bool;

    /// Attach a click action to `element` (a CSS selector) living in
    /// `scope`.
    fn bind(&mut self, scope: &str, element: &str, action: Action);

    /// Action bound to `element`, as a click on it would trigger.
    fn click(&self, element: &str) -> Option<Action>;
}

/// Escape text for use in element content and quoted attributes.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}
