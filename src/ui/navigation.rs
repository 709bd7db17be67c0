use crate::gallery::Gallery;

/// Hamburger navigation state.
///
/// The burger icon shows the open state whenever the menu is active.
#[derive(Debug, Default)]
pub struct NavMenu {
    active: bool,
}

/// One row in the navigation panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavEntry {
    pub page: u32,
    pub title: String,
}

impl NavMenu {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the menu. Returns the new state.
    pub fn toggle(&mut self) -> bool {
        self.active = !self.active;
        tracing::debug!("Navigation menu {}", if self.active { "opened" } else { "closed" });
        self.active
    }

    pub fn close(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn burger_open(&self) -> bool {
        self.active
    }

    /// Menu rows: every card that has a page number, by page.
    pub fn entries(gallery: &Gallery) -> Vec<NavEntry> {
        let mut entries: Vec<NavEntry> = gallery
            .cards()
            .iter()
            .filter_map(|c| {
                c.page.map(|page| NavEntry {
                    page,
                    title: c.title.to_string(),
                })
            })
            .collect();
        entries.sort_by_key(|e| e.page);
        entries
    }
}
