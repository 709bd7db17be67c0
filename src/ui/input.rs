use winit::event::{ElementState, MouseButton, MouseScrollDelta};
use winit::keyboard::{Key, NamedKey};

use crate::gallery::card::CardId;
use crate::layout::{CardRect, MasonryLayout};
use crate::render::scene::{video_bounds, GalleryFrame, HEADER_HEIGHT};
use crate::ui::overlay::{ChromeHitId, ChromeHitRegion};

/// Pixels scrolled per wheel line.
const LINE_SCROLL: f32 = 48.0;
/// Pixels scrolled per arrow key press.
const ARROW_SCROLL: f32 = 64.0;
/// Fraction of the viewport scrolled by PageUp / PageDown.
const PAGE_FRACTION: f32 = 0.85;

/// Mouse state tracking.
#[derive(Debug, Default)]
pub struct MouseState {
    pub x: f32,
    pub y: f32,
    pub left_pressed: bool,
}

/// Find the card under a layout-space point. Overlapping hits resolve to
/// the card drawn on top.
pub fn hit_test(rects: &[CardRect], x: f32, y: f32) -> Option<CardId> {
    rects
        .iter()
        .filter(|r| r.contains(x, y))
        .max_by_key(|r| r.z_index)
        .map(|r| r.id)
}

/// Front-most chrome region under a screen-space point.
pub fn hit_test_chrome(regions: &[ChromeHitRegion], x: f32, y: f32) -> Option<ChromeHitId> {
    regions.iter().find(|r| r.contains(x, y)).map(|r| r.id)
}

/// Card under the cursor, or `None` over the header or empty space.
pub fn card_at(layout: &MasonryLayout, frame: GalleryFrame, x: f32, y: f32) -> Option<CardId> {
    if y < HEADER_HEIGHT {
        return None;
    }
    let (lx, ly) = frame.to_layout(x, y);
    hit_test(&layout.rects, lx, ly)
}

/// Input action produced from raw input events.
#[derive(Debug, Clone, PartialEq)]
pub enum InputAction {
    /// Mouse moved to new position
    Hover { x: f32, y: f32 },
    /// Click on a card: expand it, or collapse it if already open
    ToggleCard { card: CardId },
    /// Click on the video well of an expanded card
    OpenVideo { card: CardId },
    ToggleMenu,
    /// Menu row picked
    OpenPage { page: u32 },
    /// Escape, right click or the modal backdrop
    CloseOverlay,
    /// Positive scrolls down the page
    Scroll { delta: f32 },
    /// Scroll by a fraction of the viewport (+1 one page down)
    ScrollPages { pages: f32 },
    /// Window resized
    Resize { width: u32, height: u32 },
    /// No action
    None,
}

/// Process a mouse button event.
///
/// Chrome regions are consulted first, in front-to-back order, so an open
/// modal swallows every click and the menu sits above the gallery.
pub fn process_mouse_button(
    button: MouseButton,
    state: ElementState,
    mouse: &MouseState,
    chrome: &[ChromeHitRegion],
    gallery: Option<(&MasonryLayout, GalleryFrame)>,
) -> InputAction {
    if state != ElementState::Pressed {
        return InputAction::None;
    }

    match button {
        MouseButton::Left => {
            if let Some(hit) = hit_test_chrome(chrome, mouse.x, mouse.y) {
                return match hit {
                    ChromeHitId::Burger => InputAction::ToggleMenu,
                    ChromeHitId::MenuEntry(page) => InputAction::OpenPage { page },
                    ChromeHitId::ModalClose | ChromeHitId::ModalBackdrop => {
                        InputAction::CloseOverlay
                    }
                    ChromeHitId::ModalPanel => InputAction::None,
                };
            }

            let Some((layout, frame)) = gallery else {
                return InputAction::None;
            };
            let Some(card) = card_at(layout, frame, mouse.x, mouse.y) else {
                return InputAction::None;
            };
            let (lx, ly) = frame.to_layout(mouse.x, mouse.y);
            let on_video = layout
                .get(card)
                .and_then(video_bounds)
                .is_some_and(|[x1, y1, x2, y2]| lx >= x1 && lx < x2 && ly >= y1 && ly < y2);
            if on_video {
                InputAction::OpenVideo { card }
            } else {
                InputAction::ToggleCard { card }
            }
        }
        MouseButton::Back | MouseButton::Right => InputAction::CloseOverlay,
        _ => InputAction::None,
    }
}

/// Process a mouse wheel event.
pub fn process_wheel(delta: MouseScrollDelta) -> InputAction {
    let dy = match delta {
        MouseScrollDelta::LineDelta(_, lines) => -lines * LINE_SCROLL,
        MouseScrollDelta::PixelDelta(pos) => -pos.y as f32,
    };
    if dy == 0.0 {
        InputAction::None
    } else {
        InputAction::Scroll { delta: dy }
    }
}

/// Process a keyboard event.
pub fn process_key(key: Key, state: ElementState) -> InputAction {
    if state != ElementState::Pressed {
        return InputAction::None;
    }

    match key.as_ref() {
        Key::Named(NamedKey::Escape) | Key::Named(NamedKey::Backspace) => {
            InputAction::CloseOverlay
        }
        Key::Named(NamedKey::ArrowDown) => InputAction::Scroll { delta: ARROW_SCROLL },
        Key::Named(NamedKey::ArrowUp) => InputAction::Scroll { delta: -ARROW_SCROLL },
        Key::Named(NamedKey::PageDown) | Key::Named(NamedKey::Space) => {
            InputAction::ScrollPages { pages: PAGE_FRACTION }
        }
        Key::Named(NamedKey::PageUp) => InputAction::ScrollPages { pages: -PAGE_FRACTION },
        Key::Character(c) if c.eq_ignore_ascii_case("m") => InputAction::ToggleMenu,
        _ => InputAction::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gallery::card::Card;
    use crate::gallery::Gallery;
    use crate::layout::LayoutConfig;
    use crate::ui::overlay::chrome_regions;

    fn rect(id: u32, x: i32, y: i32, w: i32, h: i32, z: u32, expanded: bool) -> CardRect {
        CardRect {
            id: CardId(id),
            x,
            y,
            w,
            h,
            column: 0,
            span: 1,
            expanded,
            z_index: z,
        }
    }

    fn mouse(x: f32, y: f32) -> MouseState {
        MouseState { x, y, left_pressed: true }
    }

    fn laid_out_gallery() -> Gallery {
        let cards = (0..6u32)
            .map(|i| {
                let mut card = Card::new(CardId(i), &format!("Card {i}"));
                card.video = Some(format!("media/{i}.mp4").into());
                card
            })
            .collect();
        let mut gallery = Gallery::new(cards, LayoutConfig::default());
        gallery.expand(CardId(2));
        gallery.relayout(1000.0, |_: &Card, _| None);
        gallery
    }

    #[test]
    fn hit_test_prefers_higher_z_index() {
        let rects = [rect(0, 0, 0, 100, 100, 1, false), rect(1, 50, 50, 100, 100, 0, false)];
        assert_eq!(hit_test(&rects, 75.0, 75.0), Some(CardId(0)));
        assert_eq!(hit_test(&rects, 120.0, 120.0), Some(CardId(1)));
        assert_eq!(hit_test(&rects, 500.0, 500.0), None);
    }

    #[test]
    fn burger_click_toggles_menu() {
        let chrome = chrome_regions(false, &[], false, (1280.0, 800.0));
        let action = process_mouse_button(
            MouseButton::Left,
            ElementState::Pressed,
            &mouse(30.0, 30.0),
            &chrome,
            None,
        );
        assert_eq!(action, InputAction::ToggleMenu);
    }

    #[test]
    fn open_modal_swallows_gallery_clicks() {
        let gallery = laid_out_gallery();
        let layout = gallery.layout().unwrap();
        let frame = GalleryFrame::new(1280.0, layout.container_width(), 0.0);
        let chrome = chrome_regions(false, &[], true, (1280.0, 800.0));

        // Corner of the window is backdrop
        let action = process_mouse_button(
            MouseButton::Left,
            ElementState::Pressed,
            &mouse(2.0, 790.0),
            &chrome,
            Some((layout, frame)),
        );
        assert_eq!(action, InputAction::CloseOverlay);

        let action = process_mouse_button(
            MouseButton::Left,
            ElementState::Pressed,
            &mouse(640.0, 400.0),
            &chrome,
            Some((layout, frame)),
        );
        assert_eq!(action, InputAction::None);
    }

    #[test]
    fn clicks_route_to_video_or_toggle() {
        let gallery = laid_out_gallery();
        let layout = gallery.layout().unwrap();
        let frame = GalleryFrame::new(1048.0, layout.container_width(), 0.0);
        let chrome = chrome_regions(false, &[], false, (1048.0, 4000.0));

        let expanded = layout.get(CardId(2)).unwrap();
        let (vx, vy) = frame.to_screen(expanded.x + 10, expanded.y + 10);
        let action = process_mouse_button(
            MouseButton::Left,
            ElementState::Pressed,
            &mouse(vx, vy),
            &chrome,
            Some((layout, frame)),
        );
        assert_eq!(action, InputAction::OpenVideo { card: CardId(2) });

        let other = layout.rects.iter().find(|r| !r.expanded).unwrap();
        let (ox, oy) = frame.to_screen(other.x + 5, other.y + 5);
        let action = process_mouse_button(
            MouseButton::Left,
            ElementState::Pressed,
            &mouse(ox, oy),
            &chrome,
            Some((layout, frame)),
        );
        assert_eq!(action, InputAction::ToggleCard { card: other.id });
    }

    #[test]
    fn release_and_right_click() {
        let m = mouse(30.0, 30.0);
        assert_eq!(
            process_mouse_button(MouseButton::Left, ElementState::Released, &m, &[], None),
            InputAction::None
        );
        assert_eq!(
            process_mouse_button(MouseButton::Right, ElementState::Pressed, &m, &[], None),
            InputAction::CloseOverlay
        );
    }

    #[test]
    fn keys_map_to_actions() {
        let press = |k: Key| process_key(k, ElementState::Pressed);
        assert_eq!(press(Key::Named(NamedKey::Escape)), InputAction::CloseOverlay);
        assert_eq!(press(Key::Character("M".into())), InputAction::ToggleMenu);
        assert_eq!(
            press(Key::Named(NamedKey::ArrowDown)),
            InputAction::Scroll { delta: ARROW_SCROLL }
        );
        assert_eq!(
            press(Key::Named(NamedKey::PageUp)),
            InputAction::ScrollPages { pages: -PAGE_FRACTION }
        );
        assert_eq!(
            process_key(Key::Named(NamedKey::Escape), ElementState::Released),
            InputAction::None
        );
    }

    #[test]
    fn wheel_lines_scroll_down_on_negative_delta() {
        assert_eq!(
            process_wheel(MouseScrollDelta::LineDelta(0.0, -1.0)),
            InputAction::Scroll { delta: LINE_SCROLL }
        );
        assert_eq!(process_wheel(MouseScrollDelta::LineDelta(0.0, 0.0)), InputAction::None);
    }
}
