use super::LayoutConfig;

/// Resolved column grid for one layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnGrid {
    /// Number of columns, always within the configured bounds
    pub count: usize,
    /// Pixel width of one column. Zero or negative for degenerate containers.
    pub width: i32,
    /// Gap between adjacent columns (px)
    pub gap: i32,
}

impl ColumnGrid {
    /// Resolve the grid for the given available width. Pure; never cached.
    pub fn resolve(available_width: f32, config: &LayoutConfig) -> Self {
        let avail = sanitize_width(available_width);
        let gap = config.gap.max(0);
        let count = decide_cols(available_width, config);
        let width = ((avail - ((count - 1) as i64 * gap as i64) as f64) / count as f64).floor() as i32;
        Self { count, width, gap }
    }

    /// Horizontal offset of the given column's left edge.
    pub fn column_x(&self, column: usize) -> i32 {
        saturate(column as i64 * (self.width as i64 + self.gap as i64))
    }

    /// Pixel width of an item spanning `span` adjacent columns.
    pub fn span_width(&self, span: usize) -> i32 {
        let span = span.max(1) as i64;
        saturate(span * self.width as i64 + (span - 1) * self.gap as i64)
    }

    /// Width actually occupied by all columns plus the gaps between them.
    pub fn container_width(&self) -> i32 {
        self.span_width(self.count)
    }
}

/// Widest container laid out as-is; anything wider is laid out at this
/// width so pixel geometry stays within `i32`.
pub const MAX_LAYOUT_WIDTH: f64 = 100_000_000.0;

fn sanitize_width(available_width: f32) -> f64 {
    let w = available_width as f64;
    if w.is_finite() { w.clamp(0.0, MAX_LAYOUT_WIDTH) } else { 0.0 }
}

fn saturate(v: i64) -> i32 {
    v.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

/// Bounds normalized so that `lo <= hi` and `lo >= 1`.
fn column_bounds(config: &LayoutConfig) -> (usize, usize) {
    let lo = config.min_cols.max(1);
    let hi = config.max_cols.max(lo);
    (lo, hi)
}

/// How many columns fit into `available_width`.
///
/// First count how many `min_col_width` columns fit, then soft-cap that
/// count with the number of `max_col_width` columns that fit. A soft cap
/// of zero leaves the first count untouched. The result is always within
/// `[min_cols, max_cols]`.
pub fn decide_cols(available_width: f32, config: &LayoutConfig) -> usize {
    let avail = sanitize_width(available_width);
    let gap = config.gap.max(0) as f64;
    let (lo, hi) = column_bounds(config);

    let fit_min = fit_count(avail, config.min_col_width as f64, gap);
    let cols = fit_min.map_or(lo, |n| n.clamp(lo, hi));

    let cols = match fit_count(avail, config.max_col_width as f64, gap) {
        Some(soft) if soft > 0 => cols.min(soft),
        _ => cols,
    };

    cols.clamp(lo, hi)
}

/// `floor((avail + gap) / (col_width + gap))`, or `None` when undefined.
fn fit_count(avail: f64, col_width: f64, gap: f64) -> Option<usize> {
    let pitch = col_width + gap;
    if pitch <= 0.0 {
        return None;
    }
    let n = ((avail + gap) / pitch).floor();
    n.is_finite().then(|| n.max(0.0) as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn default_constants() {
        let config = LayoutConfig::default();
        // 640px: three 200px columns fit, but the 300px soft cap allows two.
        let grid = ColumnGrid::resolve(640.0, &config);
        assert_eq!(grid.count, 2);
        assert_eq!(grid.width, 311);
        assert_eq!(grid.container_width(), 640);

        assert_eq!(decide_cols(1920.0, &config), 6);
        assert_eq!(decide_cols(4000.0, &config), 8);
    }

    #[test]
    fn three_columns_of_201_when_soft_cap_does_not_bind() {
        let config = LayoutConfig {
            max_col_width: 200,
            ..LayoutConfig::default()
        };
        let grid = ColumnGrid::resolve(640.0, &config);
        assert_eq!(grid.count, 3);
        assert_eq!(grid.width, 201);
        assert_eq!(grid.column_x(2), 438);
        assert_eq!(grid.span_width(2), 420);
    }

    #[test]
    fn zero_width_keeps_minimum_columns() {
        let config = LayoutConfig::default();
        let grid = ColumnGrid::resolve(0.0, &config);
        assert_eq!(grid.count, 2);
        assert_eq!(grid.width, -9);
    }

    #[test]
    fn garbage_width_is_treated_as_zero() {
        let config = LayoutConfig::default();
        assert_eq!(decide_cols(f32::NAN, &config), 2);
        assert_eq!(decide_cols(-500.0, &config), 2);
        assert_eq!(decide_cols(f32::INFINITY, &config), 2);
    }

    #[test]
    fn inverted_bounds_do_not_panic() {
        let config = LayoutConfig {
            min_cols: 5,
            max_cols: 3,
            ..LayoutConfig::default()
        };
        assert_eq!(decide_cols(10_000.0, &config), 5);
    }

    #[test]
    fn huge_widths_are_capped_instead_of_overflowing() {
        let config = LayoutConfig::default();
        let grid = ColumnGrid::resolve(1.0e12, &config);
        assert_eq!(grid, ColumnGrid::resolve(MAX_LAYOUT_WIDTH as f32, &config));
        assert_eq!(grid.count, 8);
        assert!(grid.width > 0);
        assert!(grid.column_x(grid.count - 1) < grid.container_width());
        assert!(grid.container_width() as f64 <= MAX_LAYOUT_WIDTH);

        // Hand-built grids saturate rather than wrap.
        let wide = ColumnGrid {
            count: 8,
            width: i32::MAX,
            gap: 18,
        };
        assert_eq!(wide.column_x(7), i32::MAX);
        assert_eq!(wide.container_width(), i32::MAX);
    }

    proptest! {
        #[test]
        fn count_is_always_in_bounds(width in 0u32..=10_000) {
            let config = LayoutConfig::default();
            let cols = decide_cols(width as f32, &config);
            prop_assert!((config.min_cols..=config.max_cols).contains(&cols));
        }

        #[test]
        fn columns_never_overflow_the_container(width in 0u32..=10_000) {
            let config = LayoutConfig::default();
            let grid = ColumnGrid::resolve(width as f32, &config);
            if grid.width > 0 {
                prop_assert!(grid.container_width() <= width as i32);
            }
        }
    }
}
