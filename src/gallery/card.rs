use compact_str::CompactString;

use crate::layout::{AspectRatio, Item, Tier};

/// Index into the gallery's card list. Assigned in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CardId(pub u32);

impl CardId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One project card.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub id: CardId,
    /// Heading shown on the preview
    pub title: CompactString,
    /// Subpage number, used by `Gallery::open_page`
    pub page: Option<u32>,
    /// Preview ratio as authored ("16:9", "3/2", "4x5"). `None` until
    /// defaults are applied.
    pub ratio: Option<CompactString>,
    pub tier: Tier,
    pub expand_factor: Option<f32>,
    /// Video source played in the modal
    pub video: Option<CompactString>,
    /// Body text shown while expanded, one entry per line
    pub summary: Vec<CompactString>,
}

impl Card {
    pub fn new(id: CardId, title: &str) -> Self {
        Self {
            id,
            title: CompactString::new(title),
            page: None,
            ratio: None,
            tier: Tier::Standard,
            expand_factor: None,
            video: None,
            summary: Vec::new(),
        }
    }

    pub fn aspect_ratio(&self) -> AspectRatio {
        AspectRatio::parse_or_square(self.ratio.as_deref())
    }

    /// The packer's view of this card.
    pub fn to_item(&self, expanded: bool) -> Item {
        Item {
            id: self.id,
            ratio: self.aspect_ratio(),
            tier: self.tier,
            expanded,
            expand_factor: self.expand_factor,
        }
    }
}
