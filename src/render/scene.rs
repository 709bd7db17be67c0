use std::sync::Arc;

use vello::kurbo::{Affine, BezPath, Rect, RoundedRect};
use vello::peniko::{Blob, Color, Fill, Image, ImageFormat};
use vello::Scene;

use super::colors::{self, AppColor};
use super::text::{TextRenderResult, TextRenderer};
use crate::gallery::card::{Card, CardId};
use crate::gallery::Gallery;
use crate::layout::{CardRect, MasonryLayout};

/// Height of the top bar holding the hamburger button (px).
pub const HEADER_HEIGHT: f32 = 56.0;
/// Padding between the window edge and the gallery (px).
pub const SIDE_PADDING: f32 = 24.0;

const CARD_RADIUS: f64 = 10.0;
const TITLE_BAR: i32 = 40;
const LINE_HEIGHT: i32 = 22;
const BODY_PADDING: i32 = 16;

/// Where the gallery sits on screen and how far it is scrolled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GalleryFrame {
    pub origin_x: f32,
    pub origin_y: f32,
    pub scroll: f32,
}

impl GalleryFrame {
    /// Width handed to the packer for a window `viewport_w` wide.
    pub fn available_width(viewport_w: f32) -> f32 {
        (viewport_w - 2.0 * SIDE_PADDING).max(0.0)
    }

    /// Center a grid `container_w` wide horizontally.
    pub fn new(viewport_w: f32, container_w: i32, scroll: f32) -> Self {
        let centered = (viewport_w - container_w as f32) / 2.0;
        Self {
            origin_x: centered.max(SIDE_PADDING),
            origin_y: HEADER_HEIGHT + SIDE_PADDING,
            scroll,
        }
    }

    pub fn to_layout(&self, x: f32, y: f32) -> (f32, f32) {
        (x - self.origin_x, y - self.origin_y + self.scroll)
    }

    pub fn to_screen(&self, x: i32, y: i32) -> (f32, f32) {
        (x as f32 + self.origin_x, y as f32 + self.origin_y - self.scroll)
    }

    /// Largest useful scroll offset for a layout `layout_height` tall.
    pub fn max_scroll(&self, layout_height: i32, viewport_h: f32) -> f32 {
        (layout_height as f32 + self.origin_y + SIDE_PADDING - viewport_h).max(0.0)
    }
}

/// Height of the 16:9 video well in an expanded card.
pub fn video_height(width: i32) -> i32 {
    (width as f64 * 9.0 / 16.0).round() as i32
}

/// Natural height of an expanded card at `width`: video well, title bar
/// and one line per summary entry.
pub fn expanded_card_height(card: &Card, width: i32) -> Option<i32> {
    if width <= 0 {
        return None;
    }
    let lines = card.summary.len() as i32;
    Some(video_height(width) + TITLE_BAR + lines * LINE_HEIGHT + 2 * BODY_PADDING)
}

/// Video well of an expanded card, in layout space.
pub fn video_bounds(rect: &CardRect) -> Option<[f32; 4]> {
    if !rect.expanded {
        return None;
    }
    let x = rect.x as f32;
    let y = rect.y as f32;
    Some([x, y, x + rect.w as f32, y + video_height(rect.w) as f32])
}

/// Build the gallery part of the scene: background and every visible card.
pub fn build_scene(
    scene: &mut Scene,
    gallery: &Gallery,
    layout: &MasonryLayout,
    frame: GalleryFrame,
    viewport: (f32, f32),
    hover: Option<CardId>,
    text_renderer: &mut TextRenderer,
) {
    scene.reset();

    let (viewport_w, viewport_h) = viewport;
    fill_rect(scene, [0.0, 0.0, viewport_w, viewport_h], colors::BACKGROUND);

    let mut drawn = 0usize;
    for rect in layout.paint_order() {
        let (sx, sy) = frame.to_screen(rect.x, rect.y);
        if sy + rect.h as f32 <= HEADER_HEIGHT || sy >= viewport_h || rect.w <= 0 || rect.h <= 0 {
            continue;
        }
        let Some(card) = gallery.card(rect.id) else {
            continue;
        };
        draw_card(scene, card, rect, (sx, sy), hover == Some(rect.id), text_renderer);
        drawn += 1;
    }

    tracing::trace!("Scene built: {} of {} cards visible", drawn, layout.rects.len());
}

fn draw_card(
    scene: &mut Scene,
    card: &Card,
    rect: &CardRect,
    (sx, sy): (f32, f32),
    hovered: bool,
    text_renderer: &mut TextRenderer,
) {
    let w = rect.w as f32;
    let h = rect.h as f32;
    let mut base = colors::card_color(card);
    if hovered {
        base = base.lighten(0.08);
    }

    let shape = RoundedRect::new(sx as f64, sy as f64, (sx + w) as f64, (sy + h) as f64, CARD_RADIUS);
    scene.fill(Fill::NonZero, Affine::IDENTITY, base.to_peniko(), None, &shape);

    // Tier stripe along the left edge
    fill_rect(scene, [sx, sy + 8.0, sx + 4.0, sy + h - 8.0], colors::tier_accent(card.tier));

    if rect.expanded {
        draw_expanded_body(scene, card, rect, (sx, sy), text_renderer);
        return;
    }

    // Title strip along the bottom of the preview
    let strip_h = (TITLE_BAR as f32).min(h);
    fill_rect(
        scene,
        [sx, sy + h - strip_h, sx + w, sy + h],
        AppColor::new(0.0, 0.0, 0.0).with_alpha(0.35),
    );
    draw_label(
        scene,
        text_renderer,
        &card.title,
        sx + 12.0,
        sy + h - strip_h + 10.0,
        (w - 24.0).max(0.0),
        16.0,
        colors::TEXT,
    );
}

fn draw_expanded_body(
    scene: &mut Scene,
    card: &Card,
    rect: &CardRect,
    (sx, sy): (f32, f32),
    text_renderer: &mut TextRenderer,
) {
    let w = rect.w as f32;
    let video_h = video_height(rect.w) as f32;

    fill_rect(scene, [sx, sy, sx + w, sy + video_h], colors::VIDEO_WELL);
    if card.video.is_some() {
        draw_play_icon(scene, sx + w / 2.0, sy + video_h / 2.0, 28.0);
    }

    let mut y = sy + video_h + BODY_PADDING as f32;
    draw_label(scene, text_renderer, &card.title, sx + 16.0, y, w - 32.0, 20.0, colors::TEXT);
    y += TITLE_BAR as f32;
    for line in &card.summary {
        draw_label(scene, text_renderer, line, sx + 16.0, y, w - 32.0, 14.0, colors::TEXT_MUTED);
        y += LINE_HEIGHT as f32;
    }
}

/// Filled rectangle in screen space.
pub(crate) fn fill_rect(scene: &mut Scene, bounds: [f32; 4], color: AppColor) {
    let shape = Rect::new(
        bounds[0] as f64,
        bounds[1] as f64,
        bounds[2] as f64,
        bounds[3] as f64,
    );
    scene.fill(Fill::NonZero, Affine::IDENTITY, color.to_peniko(), None, &shape);
}

/// Right-pointing triangle inside a translucent disc.
pub(crate) fn draw_play_icon(scene: &mut Scene, cx: f32, cy: f32, radius: f32) {
    let disc = vello::kurbo::Circle::new((cx as f64, cy as f64), radius as f64);
    scene.fill(
        Fill::NonZero,
        Affine::IDENTITY,
        Color::new([1.0, 1.0, 1.0, 0.18]),
        None,
        &disc,
    );

    let r = radius as f64 * 0.5;
    let (cx, cy) = (cx as f64, cy as f64);
    let mut tri = BezPath::new();
    tri.move_to((cx - r * 0.6, cy - r));
    tri.line_to((cx + r, cy));
    tri.line_to((cx - r * 0.6, cy + r));
    tri.close_path();
    scene.fill(Fill::NonZero, Affine::IDENTITY, Color::new([1.0, 1.0, 1.0, 0.9]), None, &tri);
}

/// Draw single-line text; silently skips when no font is loaded or the
/// space is too small.
#[allow(clippy::too_many_arguments)]
pub(crate) fn draw_label(
    scene: &mut Scene,
    text_renderer: &mut TextRenderer,
    text: &str,
    x: f32,
    y: f32,
    max_width: f32,
    font_size: f32,
    color: [u8; 3],
) {
    if max_width < font_size {
        return;
    }
    let label = truncate_label(text, max_width, font_size);
    if label.is_empty() {
        return;
    }
    if let Some(result) = text_renderer.render_text(&label, "default", font_size, None, color) {
        draw_text_to_scene(scene, result, x, y);
    }
}

/// Draw rendered glyphs to a Vello scene.
fn draw_text_to_scene(scene: &mut Scene, text_result: TextRenderResult, x: f32, y: f32) {
    for glyph in text_result.glyphs {
        if glyph.bitmap.is_empty() {
            continue;
        }
        let glyph_image = image_from_rgba(glyph.bitmap, glyph.width as u32, glyph.height as u32);
        let transform = Affine::translate((x as f64 + glyph.x as f64, y as f64 + glyph.y as f64));
        scene.draw_image(&glyph_image, transform);
    }
}

fn truncate_label(name: &str, max_width: f32, font_size: f32) -> String {
    let approx_char_w = (font_size * 0.58).max(1.0);
    let max_chars = (max_width / approx_char_w) as usize;
    if max_chars < 3 {
        return String::new();
    }
    if name.chars().count() <= max_chars {
        return name.to_string();
    }
    let truncated: String = name.chars().take(max_chars - 3).collect();
    format!("{}...", truncated)
}

/// Create a `peniko::Image` from an RGBA pixel buffer.
pub fn image_from_rgba(buf: Vec<u8>, width: u32, height: u32) -> Image {
    let data: Arc<dyn AsRef<[u8]> + Send + Sync> = Arc::new(buf);
    Image::new(Blob::new(data), ImageFormat::Rgba8, width, height)
}
