pub mod columns;
pub mod rng;
pub mod span;

use std::collections::HashMap;

use crate::gallery::card::CardId;
pub use columns::ColumnGrid;
use span::SpanConfig;

/// Card prominence class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    #[default]
    Standard,
    Featured,
    Main,
}

/// Width:height ratio of a card preview. Both components are always
/// finite and positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AspectRatio {
    pub w: f64,
    pub h: f64,
}

impl AspectRatio {
    pub const SQUARE: AspectRatio = AspectRatio { w: 1.0, h: 1.0 };

    /// Parse `"W:H"`, `"W/H"` or `"WxH"`. Returns `None` for anything that
    /// does not yield two finite, positive numbers.
    pub fn parse(text: &str) -> Option<Self> {
        let mut parts = text.trim().split([':', '/', 'x']);
        let w = parts.next()?.trim().parse::<f64>().ok()?;
        let h = parts.next()?.trim().parse::<f64>().ok()?;
        let valid = |v: f64| v.is_finite() && v > 0.0;
        (valid(w) && valid(h)).then_some(AspectRatio { w, h })
    }

    /// Parse with the 1:1 fallback.
    pub fn parse_or_square(text: Option<&str>) -> Self {
        match text {
            None => Self::SQUARE,
            Some(s) => Self::parse(s).unwrap_or_else(|| {
                tracing::warn!("Unparseable aspect ratio '{}', using 1:1", s);
                Self::SQUARE
            }),
        }
    }

    /// Preview height for the given pixel width.
    pub fn height_for(&self, width: i32) -> i32 {
        (width as f64 * self.h / self.w).round() as i32
    }
}

impl Default for AspectRatio {
    fn default() -> Self {
        Self::SQUARE
    }
}

/// One card as seen by the packer.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: CardId,
    pub ratio: AspectRatio,
    pub tier: Tier,
    pub expanded: bool,
    /// Width multiplier for non-main cards when expanded (default 1.5)
    pub expand_factor: Option<f32>,
}

/// Measures the natural height of an expanded card at a given width.
///
/// Returning `None` means no measurement is available; the packer then
/// sizes the card from its aspect ratio.
pub trait Measure {
    fn natural_height(&mut self, item: &Item, width: i32) -> Option<i32>;
}

impl<F> Measure for F
where
    F: FnMut(&Item, i32) -> Option<i32>,
{
    fn natural_height(&mut self, item: &Item, width: i32) -> Option<i32> {
        self(item, width)
    }
}

/// A `Measure` that never has an answer.
#[derive(Debug, Default, Clone, Copy)]
pub struct RatioOnly;

impl Measure for RatioOnly {
    fn natural_height(&mut self, _item: &Item, _width: i32) -> Option<i32> {
        None
    }
}

/// Configuration for the masonry layout.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Gap between columns and between stacked cards (px)
    pub gap: i32,
    /// Narrowest column worth laying out (px)
    pub min_col_width: i32,
    /// Soft upper bound on column width (px)
    pub max_col_width: i32,
    pub min_cols: usize,
    pub max_cols: usize,
    /// Seed for the card visiting order
    pub order_seed: u32,
    /// Base seed for per-card span rolls (card `i` uses `span_seed + i`)
    pub span_seed: u32,
    pub span: SpanConfig,
    /// Expand factor for cards that do not specify one
    pub default_expand_factor: f32,
    /// Space left above a card when scrolling it into view (px)
    pub scroll_margin: i32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            gap: 18,
            min_col_width: 200,
            max_col_width: 300,
            min_cols: 2,
            max_cols: 8,
            order_seed: 2025,
            span_seed: 1000,
            span: SpanConfig::default(),
            default_expand_factor: 1.5,
            scroll_margin: 12,
        }
    }
}

/// A placed card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardRect {
    pub id: CardId,
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
    /// First column occupied
    pub column: usize,
    /// Number of columns occupied
    pub span: usize,
    pub expanded: bool,
    /// Stacking order: cards further down the page draw on top
    pub z_index: u32,
}

impl CardRect {
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x as f32
            && x < (self.x + self.w) as f32
            && y >= self.y as f32
            && y < (self.y + self.h) as f32
    }
}

/// The full layout result (rects + fast lookup).
#[derive(Debug, Clone)]
pub struct MasonryLayout {
    /// Placed cards, in visiting order
    pub rects: Vec<CardRect>,
    /// card → index into `rects`
    pub id_to_rect: HashMap<CardId, usize>,
    pub grid: ColumnGrid,
    /// Running height of every column after the pass
    pub column_heights: Vec<i32>,
    /// Total container height (tallest column)
    pub height: i32,
}

impl MasonryLayout {
    pub fn get(&self, id: CardId) -> Option<&CardRect> {
        self.id_to_rect.get(&id).map(|&i| &self.rects[i])
    }

    pub fn container_width(&self) -> i32 {
        self.grid.container_width()
    }

    /// Rects sorted for painting (lowest `z_index` first).
    pub fn paint_order(&self) -> Vec<&CardRect> {
        let mut out: Vec<&CardRect> = self.rects.iter().collect();
        out.sort_by_key(|r| r.z_index);
        out
    }
}

/// Last known top-left offset of every card that has been placed.
///
/// Each pass overwrites the entries of the cards it places; cards that
/// disappear keep their last entry.
#[derive(Debug, Default, Clone)]
pub struct PositionCache {
    positions: HashMap<CardId, (i32, i32)>,
}

impl PositionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, id: CardId, x: i32, y: i32) {
        self.positions.insert(id, (x, y));
    }

    pub fn get(&self, id: CardId) -> Option<(i32, i32)> {
        self.positions.get(&id).copied()
    }

    pub fn top_of(&self, id: CardId) -> Option<i32> {
        self.get(id).map(|(_, y)| y)
    }

    /// Scroll offset that brings `id` into view with `margin` px above it.
    pub fn scroll_target(&self, id: CardId, margin: i32) -> Option<i32> {
        self.top_of(id).map(|y| (y - margin).max(0))
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Compute the masonry layout for `items`, visiting them in `order`
/// (indices into `items`).
///
/// Each card goes to the run of columns whose tallest entry is lowest,
/// leftmost on ties. Placed cards are never moved.
pub fn compute_layout(
    items: &[Item],
    order: &[usize],
    available_width: f32,
    config: &LayoutConfig,
    measure: &mut dyn Measure,
    cache: &mut PositionCache,
) -> MasonryLayout {
    let grid = ColumnGrid::resolve(available_width, config);
    let cols = grid.count;
    let mut heights = vec![0i32; cols];
    let mut rects = Vec::with_capacity(items.len());
    let mut id_to_rect = HashMap::with_capacity(items.len());

    for &doc_index in order {
        let Some(item) = items.get(doc_index) else {
            tracing::warn!(
                "Layout order references card #{} but only {} cards exist, skipping",
                doc_index,
                items.len()
            );
            continue;
        };

        let span = span::resolve_span(item, doc_index, cols, config).clamp(1, cols);
        let (column, top) = best_fit(&heights, span);

        let x = grid.column_x(column);
        let w = grid.span_width(span);
        let h = if item.expanded {
            measure
                .natural_height(item, w)
                .unwrap_or_else(|| item.ratio.height_for(w))
        } else {
            item.ratio.height_for(w)
        };

        let bottom = top.saturating_add(h.max(0)).saturating_add(grid.gap);
        for col_height in &mut heights[column..column + span] {
            *col_height = bottom;
        }

        cache.record(item.id, x, top);

        tracing::debug!(
            "Placed card {:?} at col {} span {} -> ({}, {}) {}x{}{}",
            item.id,
            column,
            span,
            x,
            top,
            w,
            h,
            if item.expanded { " [expanded]" } else { "" }
        );

        id_to_rect.insert(item.id, rects.len());
        rects.push(CardRect {
            id: item.id,
            x,
            y: top,
            w,
            h,
            column,
            span,
            expanded: item.expanded,
            z_index: 0,
        });
    }

    assign_stacking(&mut rects);

    let height = heights.iter().copied().max().unwrap_or(0);

    tracing::debug!(
        "Masonry pass: {} cards, {} cols x {}px, height {}px",
        rects.len(),
        cols,
        grid.width,
        height
    );

    MasonryLayout {
        rects,
        id_to_rect,
        grid,
        column_heights: heights,
        height,
    }
}

/// Leftmost start column whose span has the lowest top.
fn best_fit(heights: &[i32], span: usize) -> (usize, i32) {
    let mut best_col = 0;
    let mut best_top = i32::MAX;
    for start in 0..=heights.len().saturating_sub(span) {
        let top = heights[start..start + span]
            .iter()
            .copied()
            .max()
            .unwrap_or(0);
        if top < best_top {
            best_top = top;
            best_col = start;
        }
    }
    (best_col, best_top)
}

/// Cards lower on the page get a higher z-index; ties keep placement order.
fn assign_stacking(rects: &mut [CardRect]) {
    let mut by_top: Vec<usize> = (0..rects.len()).collect();
    by_top.sort_by_key(|&i| (rects[i].y, i));
    for (rank, i) in by_top.into_iter().enumerate() {
        rects[i].z_index = rank as u32 + 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn standard(id: u32, ratio: &str) -> Item {
        Item {
            id: CardId(id),
            ratio: AspectRatio::parse_or_square(Some(ratio)),
            tier: Tier::Standard,
            expanded: false,
            expand_factor: None,
        }
    }

    fn run(items: &[Item], width: f32, config: &LayoutConfig) -> MasonryLayout {
        let order = rng::layout_order(items.len(), config.order_seed);
        let mut cache = PositionCache::new();
        compute_layout(items, &order, width, config, &mut RatioOnly, &mut cache)
    }

    #[test]
    fn ratio_parsing() {
        assert_eq!(AspectRatio::parse("16:9"), Some(AspectRatio { w: 16.0, h: 9.0 }));
        assert_eq!(AspectRatio::parse("3/2"), Some(AspectRatio { w: 3.0, h: 2.0 }));
        assert_eq!(AspectRatio::parse(" 4x5 "), Some(AspectRatio { w: 4.0, h: 5.0 }));
        assert_eq!(AspectRatio::parse("16:0"), None);
        assert_eq!(AspectRatio::parse("-1:2"), None);
        assert_eq!(AspectRatio::parse("wide"), None);
        assert_eq!(AspectRatio::parse(""), None);
        assert_eq!(AspectRatio::parse_or_square(Some("nope")), AspectRatio::SQUARE);
        assert_eq!(AspectRatio::parse_or_square(None), AspectRatio::SQUARE);
    }

    #[test]
    fn three_cards_fill_three_columns() {
        let config = LayoutConfig {
            max_col_width: 200,
            ..LayoutConfig::default()
        };
        let items = [standard(0, "1:1"), standard(1, "3:2"), standard(2, "16:9")];
        let layout = run(&items, 640.0, &config);

        assert_eq!(layout.grid.count, 3);
        assert_eq!(layout.grid.width, 201);

        let heights: Vec<i32> = (0..3).map(|i| layout.get(CardId(i)).unwrap().h).collect();
        assert_eq!(heights, vec![201, 134, 113]);

        // Visiting order for 3 cards with seed 2025 is [0, 2, 1].
        assert_eq!(layout.get(CardId(0)).unwrap().column, 0);
        assert_eq!(layout.get(CardId(2)).unwrap().column, 1);
        assert_eq!(layout.get(CardId(1)).unwrap().column, 2);
        assert_eq!(layout.column_heights, vec![219, 131, 152]);
        assert_eq!(layout.height, 219);
        for rect in &layout.rects {
            assert_eq!(rect.y, 0);
            assert_eq!(rect.span, 1);
        }
    }

    #[test]
    fn empty_input_is_a_zero_height_layout() {
        let layout = run(&[], 800.0, &LayoutConfig::default());
        assert!(layout.rects.is_empty());
        assert_eq!(layout.height, 0);
        assert_eq!(layout.column_heights, vec![0, 0]);
    }

    #[test]
    fn degenerate_container_does_not_panic() {
        let items: Vec<Item> = (0..6).map(|i| standard(i, "3:2")).collect();
        let layout = run(&items, 0.0, &LayoutConfig::default());
        assert_eq!(layout.rects.len(), 6);
        assert!(layout.column_heights.iter().all(|&h| h >= 0));
    }

    #[test]
    fn greedy_picks_lowest_run_and_breaks_ties_left() {
        assert_eq!(best_fit(&[10, 5, 5, 20], 1), (1, 5));
        assert_eq!(best_fit(&[10, 5, 5, 20], 2), (1, 5));
        assert_eq!(best_fit(&[0, 0, 0], 3), (0, 0));
        assert_eq!(best_fit(&[30, 10, 40, 0], 2), (0, 30));
    }

    #[test]
    fn expanded_card_uses_measurement() {
        let config = LayoutConfig::default();
        let mut items: Vec<Item> = (0..4).map(|i| standard(i, "1:1")).collect();
        items[2].tier = Tier::Main;
        items[2].expanded = true;

        let order = rng::layout_order(items.len(), config.order_seed);
        let mut cache = PositionCache::new();
        let mut measure = |item: &Item, width: i32| {
            assert_eq!(item.id, CardId(2));
            Some(width / 2 + 100)
        };
        let layout = compute_layout(&items, &order, 1920.0, &config, &mut measure, &mut cache);

        let rect = layout.get(CardId(2)).unwrap();
        assert_eq!(rect.span, layout.grid.count);
        assert_eq!(rect.w, layout.container_width());
        assert_eq!(rect.h, rect.w / 2 + 100);
        assert!(rect.expanded);
    }

    #[test]
    fn missing_measurement_falls_back_to_ratio() {
        let config = LayoutConfig::default();
        let mut items = vec![standard(0, "2:1"), standard(1, "1:1")];
        items[0].expanded = true;
        let layout = run(&items, 1000.0, &config);
        let rect = layout.get(CardId(0)).unwrap();
        assert_eq!(rect.h, (rect.w as f64 / 2.0).round() as i32);
    }

    #[test]
    fn cache_tracks_last_positions_and_scroll_targets() {
        let config = LayoutConfig::default();
        let items: Vec<Item> = (0..8).map(|i| standard(i, "4:3")).collect();
        let order = rng::layout_order(items.len(), config.order_seed);
        let mut cache = PositionCache::new();
        let layout = compute_layout(&items, &order, 1200.0, &config, &mut RatioOnly, &mut cache);

        assert_eq!(cache.len(), 8);
        for rect in &layout.rects {
            assert_eq!(cache.get(rect.id), Some((rect.x, rect.y)));
            assert_eq!(cache.scroll_target(rect.id, 12), Some((rect.y - 12).max(0)));
        }
        assert_eq!(cache.top_of(CardId(99)), None);

        // A later pass over fewer cards leaves the old entries in place.
        compute_layout(&items[..2], &[1, 0], 1200.0, &config, &mut RatioOnly, &mut cache);
        assert_eq!(cache.len(), 8);
    }

    #[test]
    fn lower_cards_stack_above_higher_ones() {
        let items: Vec<Item> = (0..12).map(|i| standard(i, "1:1")).collect();
        let layout = run(&items, 1400.0, &LayoutConfig::default());
        for a in &layout.rects {
            for b in &layout.rects {
                if a.y < b.y {
                    assert!(a.z_index < b.z_index);
                }
            }
        }
        let painted = layout.paint_order();
        assert!(painted.windows(2).all(|p| p[0].y <= p[1].y));
    }

    #[test]
    fn out_of_range_order_entries_are_skipped() {
        let items = vec![standard(0, "1:1")];
        let mut cache = PositionCache::new();
        let layout = compute_layout(
            &items,
            &[0, 5],
            800.0,
            &LayoutConfig::default(),
            &mut RatioOnly,
            &mut cache,
        );
        assert_eq!(layout.rects.len(), 1);
    }

    #[test]
    fn huge_width_saturates_instead_of_panicking() {
        let items: Vec<Item> = (0..12).map(|i| standard(i, "1:1000")).collect();
        let layout = run(&items, 1.0e12, &LayoutConfig::default());
        assert_eq!(layout.rects.len(), 12);
        assert_eq!(layout.grid.count, 8);
        assert!(layout.rects.iter().all(|r| r.x >= 0 && r.w > 0));
        assert_eq!(layout.height, i32::MAX);
    }

    fn arb_items() -> impl Strategy<Value = Vec<Item>> {
        let ratio = prop_oneof![Just("1:1"), Just("3:2"), Just("16:9"), Just("9:16"), Just("bad")];
        let tier = prop_oneof![Just(Tier::Standard), Just(Tier::Featured), Just(Tier::Main)];
        proptest::collection::vec((ratio, tier), 0..40).prop_map(|cards| {
            cards
                .into_iter()
                .enumerate()
                .map(|(i, (ratio, tier))| Item {
                    id: CardId(i as u32),
                    ratio: AspectRatio::parse_or_square(Some(ratio)),
                    tier,
                    expanded: false,
                    expand_factor: None,
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn layout_is_deterministic(items in arb_items(), width in 0u32..4000) {
            let config = LayoutConfig::default();
            let a = run(&items, width as f32, &config);
            let b = run(&items, width as f32, &config);
            prop_assert_eq!(a.rects, b.rects);
            prop_assert_eq!(a.column_heights, b.column_heights);
        }

        #[test]
        fn heights_are_sane(items in arb_items(), width in 0u32..4000) {
            let layout = run(&items, width as f32, &LayoutConfig::default());
            prop_assert!(layout.column_heights.iter().all(|&h| h >= 0));
            prop_assert_eq!(layout.height, layout.column_heights.iter().copied().max().unwrap_or(0));
            for rect in &layout.rects {
                prop_assert!(rect.span >= 1 && rect.span <= layout.grid.count);
                prop_assert!(rect.column + rect.span <= layout.grid.count);
            }
        }

        #[test]
        fn column_heights_never_decrease_during_a_pass(
            items in arb_items(),
            width in prop_oneof![0u32..40, 0u32..4000],
        ) {
            let layout = run(&items, width as f32, &LayoutConfig::default());
            let gap = layout.grid.gap;
            let mut heights = vec![0i32; layout.grid.count];
            // Rects come back in visiting order, so this walks the pass step by step.
            for rect in &layout.rects {
                let columns = rect.column..rect.column + rect.span;
                let top = heights[columns.clone()].iter().copied().max().unwrap_or(0);
                prop_assert_eq!(rect.y, top);
                let bottom = rect.y + rect.h.max(0) + gap;
                for c in columns {
                    prop_assert!(bottom >= heights[c]);
                    heights[c] = bottom;
                }
            }
            prop_assert_eq!(heights, layout.column_heights);
        }

        #[test]
        fn cards_in_shared_columns_do_not_overlap(items in arb_items(), width in 400u32..4000) {
            let layout = run(&items, width as f32, &LayoutConfig::default());
            for (i, a) in layout.rects.iter().enumerate() {
                for b in &layout.rects[i + 1..] {
                    let share = a.column < b.column + b.span && b.column < a.column + a.span;
                    if share {
                        prop_assert!(b.y >= a.y + a.h || a.y >= b.y + b.h);
                    }
                }
            }
        }
    }
}
