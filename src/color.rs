// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Category display colors derived from the category name.

use crate::error::{LedgerError, LedgerResult};
use once_cell::sync::Lazy;
use regex::Regex;

static HEX_COLOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").unwrap());

/// Channels are kept inside this band so colors are never near-black or near-white.
const CHANNEL_MIN: i32 = 50;
const CHANNEL_MAX: i32 = 200;

/// Deterministic color for a category name.
///
/// The name's UTF-16 code units are folded into a wrapping 32-bit hash, the
/// low three bytes become RGB and each channel is clamped to `[50, 200]`.
pub fn color_from_name(name: &str) -> String {
    let hash = name.encode_utf16().fold(0i32, |hash, unit| {
        i32::from(unit).wrapping_add(hash.wrapping_shl(5).wrapping_sub(hash))
    });
    let r = (hash & 0x00FF_0000) >> 16;
    let g = (hash & 0x0000_FF00) >> 8;
    let b = hash & 0x0000_00FF;
    let clamp = |c: i32| c.clamp(CHANNEL_MIN, CHANNEL_MAX);
    format!("#{:02x}{:02x}{:02x}", clamp(r), clamp(g), clamp(b))
}

pub fn validate_hex(color: &str) -> LedgerResult<()> {
    if HEX_COLOR.is_match(color) {
        Ok(())
    } else {
        Err(LedgerError::validation(format!(
            "Color must be a valid hex color code (e.g. '#FF5733'), got '{}'",
            color
        )))
    }
}

/// Color for a new category: the explicit one if given, else derived from the name.
pub fn initial_color(name: &str, explicit: Option<&str>) -> LedgerResult<String> {
    match explicit {
        Some(c) => {
            validate_hex(c)?;
            Ok(c.to_string())
        }
        None => Ok(color_from_name(name.trim())),
    }
}

/// Color after a rename.
///
/// A color that still equals the one derived from the old name follows the
/// new name; anything else was set by hand and is kept.
pub fn color_after_rename(old_name: &str, current: Option<&str>, new_name: &str) -> String {
    match current {
        Some(c) if !c.eq_ignore_ascii_case(&color_from_name(old_name)) => c.to_string(),
        _ => color_from_name(new_name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_name_clamps_to_floor() {
        assert_eq!(color_from_name(""), "#323232");
    }

    #[test]
    fn channels_stay_in_band() {
        for name in ["Groceries", "Rent", "Salary", "Électricité", "🚗 Car"] {
            let c = color_from_name(name);
            for i in [1, 3, 5] {
                let v = u8::from_str_radix(&c[i..i + 2], 16).unwrap();
                assert!((50..=200).contains(&v), "{} -> {}", name, c);
            }
        }
    }

    #[test]
    fn hex_validation() {
        assert!(validate_hex("#A1b2C3").is_ok());
        assert!(validate_hex("A1B2C3").is_err());
        assert!(validate_hex("#A1B2C").is_err());
    }
}
