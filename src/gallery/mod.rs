pub mod card;
pub mod manifest;

use compact_str::CompactString;

use self::card::{Card, CardId};
use crate::layout::rng::layout_order;
use crate::layout::{self, Item, LayoutConfig, MasonryLayout, PositionCache, Tier};

/// Ratios handed out, in rotation, to cards that do not specify one.
const DEFAULT_RATIOS: [&str; 3] = ["1:1", "3:2", "16:9"];
/// When nothing is marked featured or main, this many leading cards are.
const AUTO_FEATURED: usize = 3;
const AUTO_FEATURED_RATIO: &str = "16:9";

/// Fill in tiers and ratios the author left out.
///
/// If no card is featured or main, the first three become featured (and
/// default to 16:9). Any card still without a ratio gets one from the
/// 1:1 / 3:2 / 16:9 rotation by its position.
pub fn apply_defaults(cards: &mut [Card]) {
    let any_prominent = cards.iter().any(|c| c.tier != Tier::Standard);
    if !any_prominent {
        for card in cards.iter_mut().take(AUTO_FEATURED) {
            card.tier = Tier::Featured;
            card.ratio.get_or_insert_with(|| CompactString::new(AUTO_FEATURED_RATIO));
        }
    }

    for (i, card) in cards.iter_mut().enumerate() {
        card.ratio
            .get_or_insert_with(|| CompactString::new(DEFAULT_RATIOS[i % DEFAULT_RATIOS.len()]));
    }
}

/// Outcome of a click on a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Expanded,
    Collapsed,
    /// No card with that id
    Missing,
}

/// The gallery: cards, which one is expanded, and the latest layout.
///
/// At most one card is expanded at a time; expanding a card collapses
/// whichever was expanded before.
pub struct Gallery {
    cards: Vec<Card>,
    /// Seeded visiting order (indices into `cards`)
    order: Vec<usize>,
    expanded: Option<CardId>,
    config: LayoutConfig,
    cache: PositionCache,
    layout: Option<MasonryLayout>,
}

impl Gallery {
    /// Build a gallery. Ids are reassigned in document order.
    pub fn new(mut cards: Vec<Card>, config: LayoutConfig) -> Self {
        for (i, card) in cards.iter_mut().enumerate() {
            card.id = CardId(i as u32);
        }
        apply_defaults(&mut cards);
        let order = layout_order(cards.len(), config.order_seed);

        tracing::info!(
            "Gallery ready: {} cards ({} featured, {} main)",
            cards.len(),
            cards.iter().filter(|c| c.tier == Tier::Featured).count(),
            cards.iter().filter(|c| c.tier == Tier::Main).count()
        );

        Self {
            cards,
            order,
            expanded: None,
            config,
            cache: PositionCache::new(),
            layout: None,
        }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.cards.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Replace the layout configuration. The visiting order is reseeded;
    /// the caller is expected to relayout.
    pub fn set_config(&mut self, config: LayoutConfig) {
        self.order = layout_order(self.cards.len(), config.order_seed);
        self.config = config;
        self.layout = None;
    }

    pub fn expanded(&self) -> Option<CardId> {
        self.expanded
    }

    pub fn is_expanded(&self, id: CardId) -> bool {
        self.expanded == Some(id)
    }

    /// Visiting order used by the packer.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Item records for the packer, in document order.
    pub fn items(&self) -> Vec<Item> {
        self.cards
            .iter()
            .map(|c| c.to_item(self.is_expanded(c.id)))
            .collect()
    }

    /// Expand `id`, collapsing any other card first.
    pub fn expand(&mut self, id: CardId) -> bool {
        if self.card(id).is_none() {
            return false;
        }
        self.collapse_all(Some(id));
        self.expanded = Some(id);
        true
    }

    /// Collapse `id` if it is the expanded card.
    pub fn collapse(&mut self, id: CardId) {
        if self.expanded == Some(id) {
            self.expanded = None;
        }
    }

    /// Collapse every card except `except`.
    pub fn collapse_all(&mut self, except: Option<CardId>) {
        if self.expanded != except {
            self.expanded = None;
        }
    }

    /// Click-to-expand: expand a collapsed card, collapse an expanded one.
    pub fn toggle(&mut self, id: CardId) -> Toggle {
        if self.card(id).is_none() {
            return Toggle::Missing;
        }
        if self.is_expanded(id) {
            self.collapse(id);
            Toggle::Collapsed
        } else {
            self.expand(id);
            Toggle::Expanded
        }
    }

    pub fn find_page(&self, page: u32) -> Option<CardId> {
        self.cards.iter().find(|c| c.page == Some(page)).map(|c| c.id)
    }

    /// Expand the card for subpage `page`, collapsing the rest.
    pub fn open_page(&mut self, page: u32) -> Option<CardId> {
        let Some(id) = self.find_page(page) else {
            tracing::warn!("No card for page {}", page);
            return None;
        };
        self.expand(id);
        Some(id)
    }

    /// Run a layout pass at `width`. `measure` reports the natural height
    /// of the expanded card; `None` falls back to its aspect ratio.
    pub fn relayout<M>(&mut self, width: f32, mut measure: M) -> &MasonryLayout
    where
        M: FnMut(&Card, i32) -> Option<i32>,
    {
        let items = self.items();
        let cards = &self.cards;
        let mut adapter =
            |item: &Item, w: i32| cards.get(item.id.index()).and_then(|card| measure(card, w));

        let computed = layout::compute_layout(
            &items,
            &self.order,
            width,
            &self.config,
            &mut adapter,
            &mut self.cache,
        );

        tracing::info!(
            "Gallery laid out at {:.0}px: {} cols x {}px, height {}px",
            width,
            computed.grid.count,
            computed.grid.width,
            computed.height
        );

        self.layout.insert(computed)
    }

    pub fn layout(&self) -> Option<&MasonryLayout> {
        self.layout.as_ref()
    }

    pub fn positions(&self) -> &PositionCache {
        &self.cache
    }

    /// Scroll offset that brings `id` into view, from the last pass.
    pub fn scroll_target(&self, id: CardId) -> Option<i32> {
        self.cache.scroll_target(id, self.config.scroll_margin)
    }
}
