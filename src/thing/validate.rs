//! Validators for the loosely-typed fields of a Thing document.
//!
//! Failures here are never errors: callers substitute a default or drop
//! the offending card.

use std::sync::LazyLock;

use regex::Regex;
use uuid::Uuid;

#[allow(clippy::expect_used)] // literal pattern
static RGX_COLOR_HEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#([A-Fa-f0-9]{6}|[A-Fa-f0-9]{3})$")
        .expect("hex color pattern")
});

#[allow(clippy::expect_used)] // literal pattern
static RGX_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(rtmp|https?://|mailto:|data:|tel:)").expect("url pattern")
});

// UUID v1-v5 and nil, hyphenated form only.
#[allow(clippy::expect_used)] // literal pattern
static RGX_UUID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[0-5][0-9a-f]{3}-[089ab][0-9a-f]{3}-[0-9a-f]{12}$",
    )
    .expect("uuid pattern")
});

/// Parse `#RGB` or `#RRGGBB` into linear `[r, g, b]` in `0.0..=1.0`.
#[must_use]
pub fn parse_hex_color(value: &str) -> Option<[f32; 3]> {
    if !RGX_COLOR_HEX.is_match(value) {
        return None;
    }
    let digits = &value[1..];
    let expanded: String = if digits.len() == 3 {
        digits.chars().flat_map(|c| [c, c]).collect()
    } else {
        digits.to_owned()
    };
    let channel = |i: usize| {
        u8::from_str_radix(&expanded[i..i + 2], 16)
            .ok()
            .map(|v| f32::from(v) / 255.0)
    };
    Some([channel(0)?, channel(2)?, channel(4)?])
}

/// Whether `value` starts with an allow-listed scheme (http(s), rtmp, data,
/// mailto, tel).
#[must_use]
pub fn is_valid_url(value: &str) -> bool {
    RGX_URL.is_match(value)
}

/// `Some(url)` when the optional URL passes [`is_valid_url`].
#[must_use]
pub fn valid_url(value: Option<&str>) -> Option<&str> {
    value.filter(|v| is_valid_url(v))
}

/// Parse a hyphenated UUID (versions 1-5 or nil).
#[must_use]
pub fn parse_uuid(value: &str) -> Option<Uuid> {
    if !RGX_UUID.is_match(value) {
        return None;
    }
    Uuid::parse_str(value).ok()
}
