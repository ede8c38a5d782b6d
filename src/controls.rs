//! Small page controls: theme switch, navigation menu and project panels.

use crate::error::Result;
use crate::storage::{KeyValueStore, THEME_KEY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    /// Icon shown on the toggle: the theme a click switches to.
    pub fn icon(self) -> &'static str {
        match self {
            Theme::Dark => "☀️",
            Theme::Light => "🌙",
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

#[derive(Debug)]
pub struct ThemeController<S> {
    store: S,
    theme: Theme,
}

impl<S: KeyValueStore> ThemeController<S> {
    /// Anything other than a stored `light` leaves the dark default.
    pub fn load(store: S) -> Self {
        let theme = match store.get(THEME_KEY) {
            Ok(Some(value)) if value == "light" => Theme::Light,
            Ok(_) => Theme::Dark,
            Err(err) => {
                tracing::warn!(error = %err, "failed reading theme");
                Theme::Dark
            }
        };
        Self { store, theme }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn icon(&self) -> &'static str {
        self.theme.icon()
    }

    pub fn toggle(&mut self) -> Result<Theme> {
        self.theme = self.theme.flipped();
        self.store.set(THEME_KEY, self.theme.as_str())?;
        tracing::debug!(theme = self.theme.as_str(), "theme toggled");
        Ok(self.theme)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Section {
    #[default]
    Home,
    Projects,
    Tasks,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::Home, Section::Projects, Section::Tasks];

    pub fn label(self) -> &'static str {
        match self {
            Section::Home => "Home",
            Section::Projects => "Projects",
            Section::Tasks => "Tasks",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NavMenu {
    open: bool,
    highlighted: usize,
}

impl NavMenu {
    pub fn is_active(&self) -> bool {
        self.open
    }

    pub fn aria_expanded(&self) -> &'static str {
        if self.open {
            "true"
        } else {
            "false"
        }
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// A click that hit neither the toggle nor the menu.
    pub fn click_outside(&mut self) {
        if self.open {
            self.close();
        }
    }

    pub fn highlighted(&self) -> usize {
        self.highlighted
    }

    pub fn highlight_next(&mut self) {
        self.highlighted = (self.highlighted + 1) % Section::ALL.len();
    }

    pub fn highlight_prev(&mut self) {
        self.highlighted = (self.highlighted + Section::ALL.len() - 1) % Section::ALL.len();
    }

    /// Picks a section and closes the menu.
    pub fn choose(&mut self, index: usize) -> Option<Section> {
        let section = Section::ALL.get(index).copied()?;
        self.highlighted = index;
        self.close();
        Some(section)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panel {
    pub title: String,
    pub body: String,
}

/// Panels of which at most one is open.
#[derive(Debug, Clone, Default)]
pub struct PanelGroup {
    panels: Vec<Panel>,
    open: Option<usize>,
}

impl PanelGroup {
    pub fn new(panels: Vec<Panel>) -> Self {
        Self { panels, open: None }
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn is_open(&self, index: usize) -> bool {
        self.open == Some(index)
    }

    pub fn toggle(&mut self, index: usize) {
        if index >= self.panels.len() {
            return;
        }
        let was_open = self.is_open(index);
        self.open = None;
        if !was_open {
            self.open = Some(index);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn panels(n: usize) -> PanelGroup {
        PanelGroup::new(
            (0..n)
                .map(|i| Panel {
                    title: format!("p{i}"),
                    body: String::new(),
                })
                .collect(),
        )
    }

    #[test]
    fn theme_defaults_to_dark() {
        let controller = ThemeController::load(MemoryStore::new());
        assert_eq!(controller.theme(), Theme::Dark);
        assert_eq!(controller.icon(), "☀️");
    }

    #[test]
    fn stored_light_theme_is_applied() {
        let store = MemoryStore::new();
        store.set(THEME_KEY, "light").unwrap();
        let controller = ThemeController::load(store);
        assert_eq!(controller.theme(), Theme::Light);
        assert_eq!(controller.icon(), "🌙");
    }

    #[test]
    fn unknown_theme_value_falls_back_to_dark() {
        let store = MemoryStore::new();
        store.set(THEME_KEY, "sepia").unwrap();
        assert_eq!(ThemeController::load(store).theme(), Theme::Dark);
    }

    #[test]
    fn toggle_flips_and_persists() {
        let store = MemoryStore::new();
        let mut controller = ThemeController::load(store.clone());
        assert_eq!(controller.toggle().unwrap(), Theme::Light);
        assert_eq!(store.get(THEME_KEY).unwrap().as_deref(), Some("light"));
        assert_eq!(controller.toggle().unwrap(), Theme::Dark);
        assert_eq!(store.get(THEME_KEY).unwrap().as_deref(), Some("dark"));
        assert_eq!(controller.icon(), "☀️");
    }

    #[test]
    fn nav_toggle_and_outside_click() {
        let mut nav = NavMenu::default();
        assert_eq!(nav.aria_expanded(), "false");
        nav.toggle();
        assert!(nav.is_active());
        assert_eq!(nav.aria_expanded(), "true");
        nav.click_outside();
        assert!(!nav.is_active());
        nav.click_outside();
        assert!(!nav.is_active());
    }

    #[test]
    fn choosing_a_section_closes_menu() {
        let mut nav = NavMenu::default();
        nav.toggle();
        assert_eq!(nav.choose(2), Some(Section::Tasks));
        assert!(!nav.is_active());
        assert_eq!(nav.choose(9), None);
    }

    #[test]
    fn nav_highlight_wraps() {
        let mut nav = NavMenu::default();
        nav.highlight_prev();
        assert_eq!(nav.highlighted(), 2);
        nav.highlight_next();
        assert_eq!(nav.highlighted(), 0);
    }

    #[test]
    fn opening_a_panel_closes_the_others() {
        let mut group = panels(3);
        group.toggle(0);
        assert!(group.is_open(0));
        group.toggle(2);
        assert!(group.is_open(2));
        assert!(!group.is_open(0));
        assert!(!group.is_open(1));
    }

    #[test]
    fn toggling_open_panel_closes_it() {
        let mut group = panels(2);
        group.toggle(1);
        group.toggle(1);
        assert!(!group.is_open(1));
        group.toggle(7);
        assert!(!group.is_open(0) && !group.is_open(1));
    }
}
