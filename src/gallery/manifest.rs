use std::path::Path;

use anyhow::{Context, Result};
use compact_str::CompactString;
use serde::Deserialize;

use super::card::{Card, CardId};
use crate::layout::Tier;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ManifestFile {
    #[serde(default)]
    cards: Vec<CardEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CardEntry {
    title: CompactString,
    page: Option<u32>,
    ratio: Option<CompactString>,
    #[serde(default)]
    tier: Tier,
    expand_factor: Option<f32>,
    video: Option<CompactString>,
    #[serde(default)]
    summary: Vec<CompactString>,
}

/// Parse a gallery manifest. Card ids follow document order.
pub fn parse_manifest(text: &str) -> Result<Vec<Card>> {
    let file: ManifestFile = serde_json::from_str(text).context("Malformed gallery manifest")?;
    let cards = file
        .cards
        .into_iter()
        .enumerate()
        .map(|(i, entry)| Card {
            id: CardId(i as u32),
            title: entry.title,
            page: entry.page,
            ratio: entry.ratio,
            tier: entry.tier,
            expand_factor: entry.expand_factor,
            video: entry.video,
            summary: entry.summary,
        })
        .collect();
    Ok(cards)
}

/// Read and parse a manifest file.
pub fn load_manifest(path: &Path) -> Result<Vec<Card>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest {}", path.display()))?;
    let cards = parse_manifest(&text).with_context(|| format!("In {}", path.display()))?;
    tracing::info!("Loaded {} cards from {}", cards.len(), path.display());
    Ok(cards)
}

/// Built-in gallery used when no manifest is given or it fails to load.
pub fn demo_cards() -> Vec<Card> {
    const TITLES: [&str; 14] = [
        "Tidepool Renderer",
        "Paper Lanterns",
        "Orbital Shelf",
        "Glass Harmonica",
        "Night Market",
        "Fieldnotes",
        "Low Poly Garden",
        "Signal Fire",
        "Cartographer",
        "Moth Study",
        "Clockwork Tide",
        "Salt Flats",
        "Echo Chamber",
        "Thread & Needle",
    ];
    const RATIOS: [Option<&str>; 14] = [
        None,
        None,
        None,
        Some("4:5"),
        Some("3:2"),
        None,
        Some("1:1"),
        Some("9:16"),
        Some("21:9"),
        None,
        Some("3x4"),
        Some("16/9"),
        None,
        Some("2:3"),
    ];

    TITLES
        .iter()
        .zip(RATIOS)
        .enumerate()
        .map(|(i, (title, ratio))| {
            let mut card = Card::new(CardId(i as u32), title);
            card.page = Some(i as u32 + 1);
            card.ratio = ratio.map(CompactString::new);
            card.video = Some(CompactString::new(format!("media/project-{:02}.mp4", i + 1)));
            card.summary = vec![
                CompactString::new("Case study, process notes and a short video walkthrough."),
                CompactString::new(format!("Project {} of {}", i + 1, TITLES.len())),
            ];
            card
        })
        .collect()
}
