use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Result;
use vello::Scene;

use crate::gallery::card::{Card, CardId};
use crate::gallery::manifest;
use crate::gallery::{Gallery, Toggle};
use crate::layout::LayoutConfig;
use crate::render::scene::{build_scene, expanded_card_height, GalleryFrame};
use crate::render::text::TextRenderer;
use crate::ui::config_dialog::DialogResult;
use crate::ui::input::{self, InputAction, MouseState};
use crate::ui::modal::VideoModal;
use crate::ui::navigation::{NavEntry, NavMenu};
use crate::ui::overlay::{self, ChromeHitId, ChromeHitRegion};
use crate::ui::scheduler::{Job, Scheduler, OPEN_SETTLE_DELAY, SCROLL_DELAY};

/// Top-level application state.
pub struct App {
    // Data
    pub gallery: Gallery,
    pub manifest_path: Option<PathBuf>,
    pub text_renderer: TextRenderer,

    // UI state
    pub menu: NavMenu,
    pub nav_entries: Vec<NavEntry>,
    pub modal: VideoModal,
    pub scheduler: Scheduler,
    pub mouse: MouseState,
    pub hover_card: Option<CardId>,
    pub hover_chrome: Option<ChromeHitId>,
    pub chrome_regions: Vec<ChromeHitRegion>,
    /// Vertical scroll offset of the gallery (px)
    pub scroll: f32,

    // Rendering
    pub scene: Scene,
    pub needs_relayout: bool,
    pub viewport_width: f32,
    pub viewport_height: f32,
}

impl App {
    pub fn new(cards: Vec<Card>, manifest_path: Option<PathBuf>) -> Self {
        let mut text_renderer = TextRenderer::new();
        if let Err(e) = text_renderer.load_system_font("default") {
            tracing::warn!("Failed to load system font, card titles will not be drawn: {}", e);
        }

        let gallery = Gallery::new(cards, LayoutConfig::default());
        let nav_entries = NavMenu::entries(&gallery);

        let mut app = Self {
            gallery,
            manifest_path,
            text_renderer,
            menu: NavMenu::new(),
            nav_entries,
            modal: VideoModal::new(),
            scheduler: Scheduler::default(),
            mouse: MouseState::default(),
            hover_card: None,
            hover_chrome: None,
            chrome_regions: Vec::new(),
            scroll: 0.0,
            scene: Scene::new(),
            needs_relayout: true,
            viewport_width: 1280.0,
            viewport_height: 800.0,
        };
        app.refresh_chrome();
        app
    }

    /// Cards from `path`, or the built-in demo gallery when it cannot be read.
    pub fn load_cards(path: Option<&Path>) -> Vec<Card> {
        let Some(path) = path else {
            tracing::info!("No manifest given, showing the demo gallery");
            return manifest::demo_cards();
        };
        match manifest::load_manifest(path) {
            Ok(cards) => cards,
            Err(e) => {
                tracing::warn!("{:#}; showing the demo gallery instead", e);
                manifest::demo_cards()
            }
        }
    }

    /// Screen placement of the current layout.
    pub fn frame(&self) -> Option<GalleryFrame> {
        self.gallery
            .layout()
            .map(|l| GalleryFrame::new(self.viewport_width, l.container_width(), self.scroll))
    }

    /// Run a layout pass for the current viewport.
    pub fn relayout(&mut self) {
        let width = GalleryFrame::available_width(self.viewport_width);
        self.gallery.relayout(width, expanded_card_height);
        self.needs_relayout = false;
        self.clamp_scroll();
    }

    /// Recompute chrome hit regions after the menu, modal or window changed.
    pub fn refresh_chrome(&mut self) {
        self.chrome_regions = overlay::chrome_regions(
            self.menu.is_active(),
            &self.nav_entries,
            self.modal.is_open(),
            (self.viewport_width, self.viewport_height),
        );
    }

    /// Rebuild the Vello scene from the current layout.
    pub fn rebuild_scene(&mut self) {
        let viewport = (self.viewport_width, self.viewport_height);
        match (self.gallery.layout(), self.frame()) {
            (Some(layout), Some(frame)) => build_scene(
                &mut self.scene,
                &self.gallery,
                layout,
                frame,
                viewport,
                self.hover_card,
                &mut self.text_renderer,
            ),
            _ => self.scene.reset(),
        }

        overlay::render_header(
            &mut self.scene,
            &mut self.text_renderer,
            "Portfolio",
            self.menu.burger_open(),
            self.viewport_width,
        );
        if self.menu.is_active() {
            overlay::render_menu(
                &mut self.scene,
                &mut self.text_renderer,
                &self.chrome_regions,
                &self.nav_entries,
                self.hover_chrome,
                self.viewport_height,
            );
        }
        if let Some(content) = self.modal.content() {
            overlay::render_modal(&mut self.scene, &mut self.text_renderer, content, viewport);
        }
    }

    /// Handle viewport resize. The relayout itself is debounced.
    pub fn resize(&mut self, width: u32, height: u32, now: Instant) {
        self.viewport_width = width as f32;
        self.viewport_height = height as f32;
        self.scheduler.on_resize(now);
        self.refresh_chrome();
    }

    /// Run whatever the scheduler has due. Returns whether anything changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let jobs = self.scheduler.poll(now);
        for job in &jobs {
            match *job {
                Job::Relayout => self.relayout(),
                Job::ScrollTo(card) => self.scroll_to(card),
            }
        }
        !jobs.is_empty()
    }

    /// Bring `card` into view using its last known position.
    pub fn scroll_to(&mut self, card: CardId) {
        match self.gallery.scroll_target(card) {
            Some(target) => {
                self.scroll = target as f32;
                self.clamp_scroll();
                tracing::debug!("Scrolled to {:?} at {:.0}px", card, self.scroll);
            }
            None => tracing::debug!("No position recorded for {:?}, not scrolling", card),
        }
    }

    pub fn scroll_by(&mut self, delta: f32) {
        self.scroll += delta;
        self.clamp_scroll();
    }

    fn clamp_scroll(&mut self) {
        let max = match (self.gallery.layout(), self.frame()) {
            (Some(layout), Some(frame)) => frame.max_scroll(layout.height, self.viewport_height),
            _ => 0.0,
        };
        self.scroll = self.scroll.clamp(0.0, max);
    }

    /// Click on a card: expand or collapse it, lay out right away and keep
    /// the newly expanded card in view.
    pub fn toggle_card(&mut self, card: CardId) {
        match self.gallery.toggle(card) {
            Toggle::Expanded => {
                self.relayout();
                self.scroll_to(card);
            }
            Toggle::Collapsed => self.relayout(),
            Toggle::Missing => tracing::warn!("Click on unknown card {:?}", card),
        }
    }

    /// Open the card for subpage `page` from the navigation menu.
    pub fn open_page(&mut self, page: u32, now: Instant) {
        self.menu.close();
        self.refresh_chrome();
        let Some(card) = self.gallery.open_page(page) else {
            return;
        };
        self.scheduler.relayout_next_frame();
        self.scheduler.relayout_after(now, OPEN_SETTLE_DELAY);
        self.scheduler.scroll_after(now, SCROLL_DELAY, card);
    }

    /// Escape: close the innermost open thing.
    pub fn close_overlay(&mut self) {
        if self.modal.close() {
            tracing::debug!("Video modal closed");
        } else if self.menu.is_active() {
            self.menu.close();
        } else if let Some(card) = self.gallery.expanded() {
            self.gallery.collapse(card);
            self.relayout();
        }
        self.refresh_chrome();
    }

    /// Update hover state from the current mouse position. Returns whether
    /// anything visible changed.
    pub fn update_hover(&mut self) -> bool {
        let chrome = input::hit_test_chrome(&self.chrome_regions, self.mouse.x, self.mouse.y);
        let card = if chrome.is_some() || self.modal.is_open() {
            None
        } else {
            match (self.gallery.layout(), self.frame()) {
                (Some(layout), Some(frame)) => {
                    input::card_at(layout, frame, self.mouse.x, self.mouse.y)
                }
                _ => None,
            }
        };
        let changed = chrome != self.hover_chrome || card != self.hover_card;
        self.hover_chrome = chrome;
        self.hover_card = card;
        changed
    }

    /// Apply an input action. Returns whether a redraw is needed.
    pub fn handle_action(&mut self, action: InputAction, now: Instant) -> bool {
        match action {
            InputAction::Hover { x, y } => {
                self.mouse.x = x;
                self.mouse.y = y;
                self.update_hover()
            }
            InputAction::ToggleCard { card } => {
                self.toggle_card(card);
                true
            }
            InputAction::OpenVideo { card } => {
                let opened = self.gallery.card(card).is_some_and(|c| self.modal.open(c));
                if opened {
                    self.refresh_chrome();
                } else {
                    // Cards without a video just collapse
                    self.toggle_card(card);
                }
                true
            }
            InputAction::ToggleMenu => {
                self.menu.toggle();
                self.refresh_chrome();
                true
            }
            InputAction::OpenPage { page } => {
                self.open_page(page, now);
                true
            }
            InputAction::CloseOverlay => {
                self.close_overlay();
                true
            }
            InputAction::Scroll { delta } => {
                self.scroll_by(delta);
                true
            }
            InputAction::ScrollPages { pages } => {
                self.scroll_by(pages * self.viewport_height);
                true
            }
            InputAction::Resize { width, height } => {
                self.resize(width, height, now);
                true
            }
            InputAction::None => false,
        }
    }

    /// Apply the settings dialog result.
    pub fn apply_settings(&mut self, settings: DialogResult) -> Result<()> {
        let path_changed = settings.manifest_path.is_some() && settings.manifest_path != self.manifest_path;
        if path_changed {
            if let Some(path) = &settings.manifest_path {
                let cards = manifest::load_manifest(path)?;
                self.gallery = Gallery::new(cards, settings.layout);
                self.manifest_path = settings.manifest_path;
                self.nav_entries = NavMenu::entries(&self.gallery);
                self.modal.close();
                self.scroll = 0.0;
            }
        } else {
            self.gallery.set_config(settings.layout);
        }
        self.hover_card = None;
        self.refresh_chrome();
        self.needs_relayout = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn app() -> App {
        let mut app = App::new(manifest::demo_cards(), None);
        app.viewport_width = 1280.0;
        app.viewport_height = 720.0;
        app.relayout();
        app
    }

    #[test]
    fn toggling_a_card_expands_then_collapses() {
        let mut app = app();
        let card = CardId(4);
        let before = app.gallery.layout().unwrap().get(card).copied().unwrap();

        app.toggle_card(card);
        assert_eq!(app.gallery.expanded(), Some(card));
        assert!(app.gallery.layout().unwrap().get(card).unwrap().expanded);

        app.toggle_card(card);
        assert_eq!(app.gallery.expanded(), None);
        assert_eq!(app.gallery.layout().unwrap().get(card).copied().unwrap(), before);
    }

    #[test]
    fn open_page_defers_relayout_and_scroll() {
        let mut app = app();
        let now = Instant::now();
        app.menu.toggle();
        let page = app.nav_entries.last().unwrap().page;

        app.open_page(page, now);
        assert!(!app.menu.is_active());
        let card = app.gallery.expanded().unwrap();
        assert!(app.scheduler.wants_frame());

        // Next frame: relayout only
        assert!(app.tick(now));
        assert!(app.gallery.layout().unwrap().get(card).unwrap().expanded);
        assert!(!app.tick(now + Duration::from_millis(50)));

        assert!(app.tick(now + SCROLL_DELAY));
        let target = app.gallery.scroll_target(card).unwrap() as f32;
        let max = app.frame().unwrap().max_scroll(app.gallery.layout().unwrap().height, 720.0);
        assert_eq!(app.scroll, target.min(max));
        assert!(app.scheduler.is_idle());
    }

    #[test]
    fn escape_closes_innermost_first() {
        let mut app = app();
        let now = Instant::now();
        app.toggle_card(CardId(0));
        app.handle_action(InputAction::ToggleMenu, now);
        assert!(app.menu.is_active());

        app.handle_action(InputAction::CloseOverlay, now);
        assert!(!app.menu.is_active());
        assert_eq!(app.gallery.expanded(), Some(CardId(0)));

        app.handle_action(InputAction::CloseOverlay, now);
        assert_eq!(app.gallery.expanded(), None);
    }

    #[test]
    fn resize_relayouts_once_after_debounce() {
        let mut app = app();
        let now = Instant::now();
        app.resize(800, 600, now);
        app.resize(820, 600, now + Duration::from_millis(30));
        assert!(!app.tick(now + Duration::from_millis(70)));
        assert!(app.tick(now + Duration::from_millis(95)));
        let width = GalleryFrame::available_width(820.0);
        assert_eq!(
            app.gallery.layout().unwrap().grid.count,
            crate::layout::columns::decide_cols(width, app.gallery.config())
        );
    }

    #[test]
    fn settings_with_a_new_manifest_replace_the_cards() {
        use std::io::Write;

        let mut app = app();
        app.toggle_card(CardId(1));
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "cards": [ {{ "title": "Solo", "page": 1 }} ] }}"#).unwrap();

        let layout = LayoutConfig {
            gap: 10,
            ..LayoutConfig::default()
        };
        app.apply_settings(DialogResult {
            manifest_path: Some(file.path().to_path_buf()),
            layout: layout.clone(),
        })
        .unwrap();

        assert_eq!(app.gallery.len(), 1);
        assert_eq!(app.gallery.expanded(), None);
        assert_eq!(app.gallery.config(), &layout);
        assert_eq!(app.nav_entries.len(), 1);
        assert!(app.needs_relayout);

        let missing = DialogResult {
            manifest_path: Some(PathBuf::from("/nonexistent/gallery.json")),
            layout,
        };
        assert!(app.apply_settings(missing).is_err());
        assert_eq!(app.gallery.len(), 1);
    }

    #[test]
    fn scroll_is_clamped_to_content() {
        let mut app = app();
        app.scroll_by(-500.0);
        assert_eq!(app.scroll, 0.0);
        app.scroll_by(1.0e9);
        let max = app.frame().unwrap().max_scroll(app.gallery.layout().unwrap().height, 720.0);
        assert_eq!(app.scroll, max);
    }
}
