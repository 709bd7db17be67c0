use vello::kurbo::{Affine, Rect, RoundedRect};
use vello::peniko::Fill;
use vello::Scene;

use crate::render::colors::{self, AppColor};
use crate::render::scene::{draw_label, draw_play_icon, fill_rect, HEADER_HEIGHT};
use crate::render::text::TextRenderer;
use crate::ui::modal::ModalContent;
use crate::ui::navigation::NavEntry;

const MENU_WIDTH: f32 = 260.0;
const MENU_ROW: f32 = 36.0;
const MENU_PAD: f32 = 12.0;
const MODAL_CLOSE_SIZE: f32 = 32.0;

/// Interactive pieces of the window chrome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChromeHitId {
    Burger,
    MenuEntry(u32),
    ModalClose,
    /// Anywhere on the dimmed area around the modal panel
    ModalBackdrop,
    ModalPanel,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChromeHitRegion {
    pub id: ChromeHitId,
    pub bounds: [f32; 4],
}

impl ChromeHitRegion {
    pub fn contains(&self, x: f32, y: f32) -> bool {
        let [x1, y1, x2, y2] = self.bounds;
        x >= x1 && x <= x2 && y >= y1 && y <= y2
    }
}

pub fn burger_bounds() -> [f32; 4] {
    [16.0, 12.0, 48.0, 44.0]
}

pub fn menu_entry_bounds(index: usize) -> [f32; 4] {
    let y = HEADER_HEIGHT + MENU_PAD + index as f32 * MENU_ROW;
    [0.0, y, MENU_WIDTH, y + MENU_ROW]
}

/// The 16:9 modal panel, as large as fits in 80% of the window.
pub fn modal_bounds(viewport_w: f32, viewport_h: f32) -> [f32; 4] {
    let w = (viewport_w * 0.8).min(viewport_h * 0.8 * 16.0 / 9.0).max(0.0);
    let h = w * 9.0 / 16.0;
    let x = (viewport_w - w) / 2.0;
    let y = (viewport_h - h) / 2.0;
    [x, y, x + w, y + h]
}

fn modal_close_bounds(panel: [f32; 4]) -> [f32; 4] {
    let x2 = panel[2];
    let y1 = panel[1] - MODAL_CLOSE_SIZE - 8.0;
    [x2 - MODAL_CLOSE_SIZE, y1, x2, y1 + MODAL_CLOSE_SIZE]
}

/// Hit regions for the current chrome state, front-most first.
pub fn chrome_regions(
    menu_open: bool,
    entries: &[NavEntry],
    modal_open: bool,
    viewport: (f32, f32),
) -> Vec<ChromeHitRegion> {
    let (viewport_w, viewport_h) = viewport;
    if modal_open {
        let panel = modal_bounds(viewport_w, viewport_h);
        return vec![
            ChromeHitRegion {
                id: ChromeHitId::ModalClose,
                bounds: modal_close_bounds(panel),
            },
            ChromeHitRegion {
                id: ChromeHitId::ModalPanel,
                bounds: panel,
            },
            ChromeHitRegion {
                id: ChromeHitId::ModalBackdrop,
                bounds: [0.0, 0.0, viewport_w, viewport_h],
            },
        ];
    }

    let mut regions = vec![ChromeHitRegion {
        id: ChromeHitId::Burger,
        bounds: burger_bounds(),
    }];
    if menu_open {
        regions.extend(
            entries
                .iter()
                .enumerate()
                .map(|(i, e)| ChromeHitRegion {
                    id: ChromeHitId::MenuEntry(e.page),
                    bounds: menu_entry_bounds(i),
                })
                .take_while(|r| r.bounds[3] <= viewport_h),
        );
    }
    regions
}

/// Top bar with the hamburger button. Three bars, or a cross while open.
pub fn render_header(
    scene: &mut Scene,
    text_renderer: &mut TextRenderer,
    title: &str,
    menu_open: bool,
    viewport_w: f32,
) {
    fill_rect(scene, [0.0, 0.0, viewport_w, HEADER_HEIGHT], colors::HEADER);

    let [x1, y1, x2, y2] = burger_bounds();
    let bar = AppColor::new(0.92, 0.92, 0.95);
    if menu_open {
        let cx = ((x1 + x2) / 2.0) as f64;
        let cy = ((y1 + y2) / 2.0) as f64;
        let arm = Rect::new(-12.0, -1.5, 12.0, 1.5);
        for angle in [std::f64::consts::FRAC_PI_4, -std::f64::consts::FRAC_PI_4] {
            let transform = Affine::translate((cx, cy)) * Affine::rotate(angle);
            scene.fill(Fill::NonZero, transform, bar.to_peniko(), None, &arm);
        }
    } else {
        for i in 0..3 {
            let y = y1 + 8.0 + i as f32 * 7.0;
            fill_rect(scene, [x1 + 4.0, y, x2 - 4.0, y + 3.0], bar);
        }
    }

    draw_label(scene, text_renderer, title, x2 + 16.0, 18.0, viewport_w - x2 - 32.0, 18.0, colors::TEXT);
}

/// Slide-out navigation panel listing the gallery's pages.
pub fn render_menu(
    scene: &mut Scene,
    text_renderer: &mut TextRenderer,
    regions: &[ChromeHitRegion],
    entries: &[NavEntry],
    hover: Option<ChromeHitId>,
    viewport_h: f32,
) {
    fill_rect(
        scene,
        [0.0, HEADER_HEIGHT, MENU_WIDTH, viewport_h],
        colors::PANEL.with_alpha(0.96),
    );

    for region in regions {
        let ChromeHitId::MenuEntry(page) = region.id else {
            continue;
        };
        let Some(entry) = entries.iter().find(|e| e.page == page) else {
            continue;
        };
        if hover == Some(region.id) {
            fill_rect(scene, region.bounds, colors::PANEL.lighten(0.08));
        }
        let [x1, y1, x2, _] = region.bounds;
        let label = format!("{:>2}  {}", entry.page, entry.title);
        draw_label(
            scene,
            text_renderer,
            &label,
            x1 + MENU_PAD,
            y1 + 10.0,
            x2 - x1 - 2.0 * MENU_PAD,
            15.0,
            colors::TEXT,
        );
    }
}

/// Dimmed backdrop with the video panel on top.
pub fn render_modal(
    scene: &mut Scene,
    text_renderer: &mut TextRenderer,
    content: &ModalContent,
    viewport: (f32, f32),
) {
    let (viewport_w, viewport_h) = viewport;
    fill_rect(
        scene,
        [0.0, 0.0, viewport_w, viewport_h],
        AppColor::new(0.0, 0.0, 0.0).with_alpha(0.78),
    );

    let panel = modal_bounds(viewport_w, viewport_h);
    let [x1, y1, x2, y2] = panel;
    let shape = RoundedRect::new(x1 as f64, y1 as f64, x2 as f64, y2 as f64, 8.0);
    scene.fill(Fill::NonZero, Affine::IDENTITY, colors::VIDEO_WELL.to_peniko(), None, &shape);
    draw_play_icon(scene, (x1 + x2) / 2.0, (y1 + y2) / 2.0, 40.0);

    draw_label(scene, text_renderer, &content.title, x1, y2 + 12.0, x2 - x1, 20.0, colors::TEXT);
    draw_label(scene, text_renderer, &content.video, x1, y2 + 40.0, x2 - x1, 13.0, colors::TEXT_MUTED);

    let [cx1, cy1, cx2, cy2] = modal_close_bounds(panel);
    let (cx, cy) = (((cx1 + cx2) / 2.0) as f64, ((cy1 + cy2) / 2.0) as f64);
    let arm = Rect::new(-11.0, -1.5, 11.0, 1.5);
    for angle in [std::f64::consts::FRAC_PI_4, -std::f64::consts::FRAC_PI_4] {
        let transform = Affine::translate((cx, cy)) * Affine::rotate(angle);
        scene.fill(Fill::NonZero, transform, AppColor::new(0.63, 0.63, 0.67).to_peniko(), None, &arm);
    }
}
