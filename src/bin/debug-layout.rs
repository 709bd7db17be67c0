/// Diagnostic tool to verify manifest → gallery → layout pipeline
use folio_rs::gallery::manifest;
use folio_rs::gallery::Gallery;
use folio_rs::layout::{compute_layout, LayoutConfig, MasonryLayout, PositionCache, RatioOnly};
use folio_rs::render::scene::{expanded_card_height, GalleryFrame};
use rayon::prelude::*;
use std::path::PathBuf;

const SWEEP_MAX_WIDTH: u32 = 10_000;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("folio_rs=debug".parse()?),
        )
        .init();

    // Usage: debug-layout [manifest.json] [window-width] [expanded-page]
    let mut args = std::env::args().skip(1);
    let manifest_path = args.next().filter(|a| a != "-").map(PathBuf::from);
    let window_width: f32 = match args.next() {
        Some(w) => w.parse()?,
        None => 1280.0,
    };
    let expanded_page: Option<u32> = args.next().map(|p| p.parse()).transpose()?;

    println!("=== DIAGNOSTIC: Manifest → Layout Pipeline ===");
    let cards = match &manifest_path {
        Some(path) => {
            println!("Manifest: {}", path.display());
            manifest::load_manifest(path)?
        }
        None => {
            println!("Manifest: <built-in demo>");
            manifest::demo_cards()
        }
    };
    println!("\n[1] Loaded {} cards", cards.len());

    let mut gallery = Gallery::new(cards, LayoutConfig::default());
    println!("\n[2] Visiting order: {:?}", gallery.order());
    if let Some(page) = expanded_page {
        match gallery.open_page(page) {
            Some(id) => println!("    Expanded page {} ({:?})", page, id),
            None => println!("    No card for page {}", page),
        }
    }

    let width = GalleryFrame::available_width(window_width);
    let layout = gallery.relayout(width, expanded_card_height).clone();
    print_layout(&gallery, &layout, width);

    println!("\n[5] Sweeping widths 0..={}:", SWEEP_MAX_WIDTH);
    let failures = sweep(&gallery);
    if failures.is_empty() {
        println!("    All widths OK");
    } else {
        for failure in failures.iter().take(20) {
            println!("    {}", failure);
        }
        anyhow::bail!("{} width(s) failed the sweep", failures.len());
    }

    Ok(())
}

fn print_layout(gallery: &Gallery, layout: &MasonryLayout, width: f32) {
    println!(
        "\n[3] Layout at {:.0}px: {} cols x {}px (gap {}), container {}px wide, {}px tall",
        width,
        layout.grid.count,
        layout.grid.width,
        layout.grid.gap,
        layout.container_width(),
        layout.height
    );
    println!("    Column heights: {:?}", layout.column_heights);

    println!("\n[4] Placed cards (visiting order):");
    for rect in &layout.rects {
        let title = gallery.card(rect.id).map(|c| c.title.as_str()).unwrap_or("?");
        println!(
            "    {:>3} '{}' - {}x{} at ({}, {}) cols {}..{} z={}{}",
            rect.id.0,
            title,
            rect.w,
            rect.h,
            rect.x,
            rect.y,
            rect.column,
            rect.column + rect.span,
            rect.z_index,
            if rect.expanded { " [expanded]" } else { "" }
        );
    }
}

/// Lay out at every integer width in parallel and check column bounds,
/// spans and determinism. Returns one message per failing width.
fn sweep(gallery: &Gallery) -> Vec<String> {
    let items = gallery.items();
    let order = gallery.order();
    let config = gallery.config();

    let pass = |width: f32| {
        let mut cache = PositionCache::new();
        compute_layout(&items, order, width, config, &mut RatioOnly, &mut cache)
    };

    let mut failures: Vec<(u32, String)> = (0..=SWEEP_MAX_WIDTH)
        .into_par_iter()
        .filter_map(|w| {
            let width = w as f32;
            let first = pass(width);
            let cols = first.grid.count;
            if cols < config.min_cols || cols > config.max_cols {
                return Some((w, format!("width {w}: {cols} columns out of bounds")));
            }
            if let Some(rect) = first.rects.iter().find(|r| r.span == 0 || r.column + r.span > cols) {
                return Some((w, format!("width {w}: card {:?} spans past the grid", rect.id)));
            }
            if first.column_heights.iter().any(|&h| h < 0) {
                return Some((w, format!("width {w}: negative column height")));
            }
            let second = pass(width);
            if first.rects != second.rects {
                return Some((w, format!("width {w}: layout is not deterministic")));
            }
            None
        })
        .collect();

    failures.sort_by_key(|(w, _)| *w);
    failures.into_iter().map(|(_, msg)| msg).collect()
}
