// src/strategy/mask.rs

//! File-mask compilation and display-name extraction for strategy scripts.

use std::sync::LazyLock;

use anyhow::{Context, Result};
use globset::{GlobBuilder, GlobMatcher};
use regex::Regex;

/// `general (ALT3)` -> `ALT3`.
static TRAILING_PARENS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((?P<name>.+?)\)$").expect("static regex"));

/// Older configs spell the mask `general (*.bat)`, meaning "anything inside
/// the parentheses, then `.bat`".
pub fn normalize_mask(mask: &str) -> String {
    const LEGACY: &str = "(*.bat)";
    let lower = mask.to_ascii_lowercase();
    match lower.find(LEGACY) {
        Some(idx) => format!("{}(*).bat{}", &mask[..idx], &mask[idx + LEGACY.len()..]),
        None => mask.to_string(),
    }
}

/// Compile a (normalized) mask into a case-insensitive matcher applied to
/// bare file names.
pub fn compile_mask(mask: &str) -> Result<GlobMatcher> {
    let normalized = normalize_mask(mask);
    let glob = GlobBuilder::new(&normalized)
        .case_insensitive(true)
        .literal_separator(true)
        .build()
        .with_context(|| format!("invalid strategy mask '{mask}'"))?;
    Ok(glob.compile_matcher())
}

/// Human label for a strategy file: the text in the trailing parentheses of
/// the stem, or the whole stem.
pub fn display_name(file_name: &str) -> String {
    let stem = match file_name.rfind('.') {
        Some(idx) if idx > 0 => &file_name[..idx],
        _ => file_name,
    };
    TRAILING_PARENS
        .captures(stem)
        .and_then(|c| c.name("name"))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| stem.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_mask_is_rewritten() {
        assert_eq!(normalize_mask("general (*.bat)"), "general (*).bat");
        assert_eq!(normalize_mask("general (*.BAT)"), "general (*).bat");
        assert_eq!(normalize_mask("*.bat"), "*.bat");
    }

    #[test]
    fn legacy_mask_matches_alt_scripts_only() {
        let m = compile_mask("general (*.bat)").unwrap();
        assert!(m.is_match("general (ALT).bat"));
        assert!(m.is_match("General (ALT3).BAT"));
        assert!(!m.is_match("general.bat"));
        assert!(!m.is_match("service.bat"));
        assert!(!m.is_match("ignore.txt"));
    }

    #[test]
    fn display_name_uses_trailing_parentheses() {
        assert_eq!(display_name("general (ALT3).bat"), "ALT3");
        assert_eq!(display_name("general (FAKE TLS AUTO).bat"), "FAKE TLS AUTO");
        assert_eq!(display_name("general.bat"), "general");
        assert_eq!(display_name("(ALT) general.bat"), "(ALT) general");
    }
}
