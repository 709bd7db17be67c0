use compact_str::CompactString;

use crate::gallery::card::{Card, CardId};

/// What the modal is currently showing.
#[derive(Debug, Clone, PartialEq)]
pub struct ModalContent {
    pub card: CardId,
    pub title: CompactString,
    pub video: CompactString,
}

/// Full-screen viewer for a card's project video.
#[derive(Debug, Default)]
pub struct VideoModal {
    current: Option<ModalContent>,
}

impl VideoModal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the modal for `card`. Cards without a video are ignored.
    pub fn open(&mut self, card: &Card) -> bool {
        let Some(video) = &card.video else {
            tracing::debug!("Card {:?} has no video, modal stays closed", card.id);
            return false;
        };
        tracing::info!("Opening video modal for '{}' ({})", card.title, video);
        self.current = Some(ModalContent {
            card: card.id,
            title: card.title.clone(),
            video: video.clone(),
        });
        true
    }

    pub fn close(&mut self) -> bool {
        self.current.take().is_some()
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    pub fn content(&self) -> Option<&ModalContent> {
        self.current.as_ref()
    }
}
