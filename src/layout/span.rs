use super::rng::Mulberry32;
use super::{Item, LayoutConfig, Tier};

/// Column-count density bucket used to pick widening odds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Density {
    /// Up to 3 columns: nothing widens
    Narrow,
    /// 4–5 columns
    Medium,
    /// 6 or more columns
    Wide,
}

impl Density {
    pub fn classify(cols: usize) -> Self {
        match cols {
            0..=3 => Density::Narrow,
            4..=5 => Density::Medium,
            _ => Density::Wide,
        }
    }
}

/// Probability that a collapsed card widens to two columns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WidenOdds {
    pub medium: f64,
    pub wide: f64,
}

impl WidenOdds {
    fn for_density(&self, density: Density) -> f64 {
        match density {
            Density::Narrow => 0.0,
            Density::Medium => self.medium,
            Density::Wide => self.wide,
        }
    }
}

/// Tunable span-widening odds. Featured and main cards never roll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpanConfig {
    pub standard: WidenOdds,
}

impl Default for SpanConfig {
    fn default() -> Self {
        Self {
            standard: WidenOdds {
                medium: 0.15,
                wide: 0.35,
            },
        }
    }
}

/// Span of a collapsed card. Featured and main cards take two columns;
/// standard cards draw exactly one value from `rng`.
pub fn collapsed_span(tier: Tier, cols: usize, rng: &mut Mulberry32, config: &SpanConfig) -> usize {
    let cols = cols.max(1);
    if tier != Tier::Standard {
        return 2.min(cols);
    }

    let roll = rng.next_f64();
    let span = if roll < config.standard.for_density(Density::classify(cols)) {
        2
    } else {
        1
    };
    span.min(cols)
}

/// Span of an expanded card, derived from its collapsed span.
pub fn expanded_span(tier: Tier, collapsed: usize, cols: usize, factor: f32) -> usize {
    let cols = cols.max(1);
    if tier == Tier::Main {
        return cols;
    }
    let widened = (collapsed.max(1) as f64 * factor as f64).round();
    let widened = if widened.is_finite() { widened.max(1.0) as usize } else { 1 };
    widened.clamp(1, cols)
}

/// Full span decision for `item`, using its own generator seeded from its
/// document index so other cards do not disturb its roll.
pub fn resolve_span(item: &Item, doc_index: usize, cols: usize, config: &LayoutConfig) -> usize {
    let seed = config.span_seed.wrapping_add(doc_index as u32);
    let mut rng = Mulberry32::new(seed);
    let collapsed = collapsed_span(item.tier, cols, &mut rng, &config.span);
    if !item.expanded {
        return collapsed;
    }
    let factor = item
        .expand_factor
        .filter(|f| f.is_finite() && *f > 0.0)
        .unwrap_or(config.default_expand_factor);
    expanded_span(item.tier, collapsed, cols, factor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gallery::card::CardId;
    use crate::layout::AspectRatio;
    use proptest::prelude::*;

    fn item(tier: Tier, expanded: bool, expand_factor: Option<f32>) -> Item {
        Item {
            id: CardId(0),
            ratio: AspectRatio::SQUARE,
            tier,
            expanded,
            expand_factor,
        }
    }

    #[test]
    fn density_buckets() {
        assert_eq!(Density::classify(2), Density::Narrow);
        assert_eq!(Density::classify(3), Density::Narrow);
        assert_eq!(Density::classify(4), Density::Medium);
        assert_eq!(Density::classify(5), Density::Medium);
        assert_eq!(Density::classify(6), Density::Wide);
    }

    #[test]
    fn main_spans_two_when_collapsed_and_everything_when_expanded() {
        let config = LayoutConfig::default();
        let main = item(Tier::Main, false, None);
        assert_eq!(resolve_span(&main, 0, 6, &config), 2);
        assert_eq!(resolve_span(&main, 0, 1, &config), 1);

        let main = item(Tier::Main, true, None);
        assert_eq!(resolve_span(&main, 0, 6, &config), 6);
    }

    #[test]
    fn narrow_grids_never_widen_standard_cards() {
        let config = LayoutConfig::default();
        for index in 0..50 {
            let card = item(Tier::Standard, false, None);
            assert_eq!(resolve_span(&card, index, 3, &config), 1);
        }
    }

    #[test]
    fn featured_cards_span_two_at_every_density() {
        let config = LayoutConfig::default();
        for cols in [2, 6] {
            let spans: Vec<usize> = (0..3)
                .map(|i| resolve_span(&item(Tier::Featured, false, None), i, cols, &config))
                .collect();
            assert_eq!(spans, vec![2, 2, 2]);
        }
        assert_eq!(resolve_span(&item(Tier::Featured, false, None), 0, 1, &config), 1);
        // Expanded: round(2 * 1.5) = 3
        assert_eq!(resolve_span(&item(Tier::Featured, true, None), 0, 6, &config), 3);
    }

    #[test]
    fn rolls_follow_the_per_card_seed() {
        // Seeds 1000 + i give first draws of 0.795, 0.141, 0.434, 0.334, 0.175.
        let config = LayoutConfig::default();
        let spans: Vec<usize> = (0..5)
            .map(|i| resolve_span(&item(Tier::Standard, false, None), i, 6, &config))
            .collect();
        assert_eq!(spans, vec![1, 2, 1, 2, 2]);

        let spans: Vec<usize> = (0..5)
            .map(|i| resolve_span(&item(Tier::Standard, false, None), i, 4, &config))
            .collect();
        assert_eq!(spans, vec![1, 2, 1, 1, 1]);
    }

    #[test]
    fn expand_factor_rounds_and_clamps() {
        assert_eq!(expanded_span(Tier::Standard, 1, 6, 1.5), 2);
        assert_eq!(expanded_span(Tier::Standard, 2, 6, 1.5), 3);
        assert_eq!(expanded_span(Tier::Featured, 2, 6, 4.0), 6);
        assert_eq!(expanded_span(Tier::Standard, 1, 6, 0.1), 1);
    }

    #[test]
    fn invalid_expand_factor_uses_default() {
        let config = LayoutConfig::default();
        let card = item(Tier::Standard, true, Some(f32::NAN));
        // index 0 rolls 0.795 at 6 cols: collapsed 1, expanded round(1.5) = 2
        assert_eq!(resolve_span(&card, 0, 6, &config), 2);
    }

    proptest! {
        #[test]
        fn span_never_exceeds_columns(
            cols in 1usize..=8,
            index in 0usize..500,
            tier in prop_oneof![Just(Tier::Standard), Just(Tier::Featured), Just(Tier::Main)],
            expanded in any::<bool>(),
            factor in proptest::option::of(0.0f32..10.0),
        ) {
            let config = LayoutConfig::default();
            let span = resolve_span(&item(tier, expanded, factor), index, cols, &config);
            prop_assert!(span >= 1);
            prop_assert!(span <= cols);
        }
    }
}
