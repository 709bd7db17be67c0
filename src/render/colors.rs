use vello::peniko::Color;

use crate::gallery::card::Card;
use crate::layout::Tier;

/// Our custom color representation for easy manipulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl AppColor {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    pub fn to_peniko(self) -> Color {
        Color::new([self.r, self.g, self.b, self.a])
    }

    pub fn lighten(self, amount: f32) -> Self {
        Self {
            r: (self.r + amount).min(1.0),
            g: (self.g + amount).min(1.0),
            b: (self.b + amount).min(1.0),
            a: self.a,
        }
    }
}

pub const BACKGROUND: AppColor = AppColor::new(0.06, 0.06, 0.08);
pub const HEADER: AppColor = AppColor::new(0.10, 0.10, 0.13);
pub const PANEL: AppColor = AppColor::new(0.12, 0.12, 0.16);
pub const VIDEO_WELL: AppColor = AppColor::new(0.02, 0.02, 0.03);
pub const TEXT: [u8; 3] = [236, 236, 240];
pub const TEXT_MUTED: [u8; 3] = [160, 160, 172];

/// Preview color for a card: hue from its title, saturation and value
/// by tier so featured and main cards read as more prominent.
pub fn card_color(card: &Card) -> AppColor {
    let hue = hash01(&card.title);
    let (s, v) = match card.tier {
        Tier::Standard => (0.42, 0.62),
        Tier::Featured => (0.58, 0.74),
        Tier::Main => (0.70, 0.86),
    };
    hsv_to_rgb(hue, s, v)
}

/// Accent stripe color per tier.
pub fn tier_accent(tier: Tier) -> AppColor {
    match tier {
        Tier::Standard => AppColor::new(0.45, 0.45, 0.50),
        Tier::Featured => hsv_to_rgb(40.0 / 360.0, 0.78, 0.92),
        Tier::Main => hsv_to_rgb(330.0 / 360.0, 0.70, 0.95),
    }
}

fn hsv_to_rgb(h: f32, s: f32, v: f32) -> AppColor {
    let h6 = (h * 6.0).rem_euclid(6.0);
    let i = h6.floor() as i32;
    let f = h6 - i as f32;
    let p = v * (1.0 - s);
    let q = v * (1.0 - f * s);
    let t = v * (1.0 - (1.0 - f) * s);
    let (r, g, b) = match i {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    AppColor { r, g, b, a: 1.0 }
}

/// FNV-1a of `s`, mapped to `[0, 1]`.
fn hash01(s: &str) -> f32 {
    let mut h: u32 = 2166136261;
    for &b in s.as_bytes() {
        h ^= b as u32;
        h = h.wrapping_mul(16777619);
    }
    ((h >> 8) as f32) / ((u32::MAX >> 8) as f32)
}
