//! This module contains the pure, stateless kernel for folding visually
//! equivalent Unicode characters (dashes, quotes, primes, ...) onto one canonical
//! representative per group.
//!
//! OCR output of historical print is full of typographic variants that a tagger
//! treats as distinct symbols. Each group below lists its canonical character
//! first; every other member of the group is replaced by it. The substitution is
//! a single character-for-character pass, so a replacement is never re-examined.

use std::str::FromStr;

use hashbrown::HashMap;

use crate::error::BolimaError;

//==================================================================================
// 1. Character Groups
//==================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharGroup {
    Hyphens,
    Minuses,
    Pluses,
    Slashes,
    Tildes,
    Apostrophes,
    SingleQuotes,
    DoubleQuotes,
    Accents,
    Primes,
}

impl CharGroup {
    /// All groups in lookup-priority order.
    pub const ALL: [CharGroup; 10] = [
        CharGroup::Hyphens,
        CharGroup::Minuses,
        CharGroup::Pluses,
        CharGroup::Slashes,
        CharGroup::Tildes,
        CharGroup::Apostrophes,
        CharGroup::SingleQuotes,
        CharGroup::DoubleQuotes,
        CharGroup::Accents,
        CharGroup::Primes,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CharGroup::Hyphens => "hyphens",
            CharGroup::Minuses => "minuses",
            CharGroup::Pluses => "pluses",
            CharGroup::Slashes => "slashes",
            CharGroup::Tildes => "tildes",
            CharGroup::Apostrophes => "apostrophes",
            CharGroup::SingleQuotes => "single_quotes",
            CharGroup::DoubleQuotes => "double_quotes",
            CharGroup::Accents => "accents",
            CharGroup::Primes => "primes",
        }
    }

    /// The group's members. The first character is the canonical one.
    pub fn members(&self) -> &'static str {
        match self {
            CharGroup::Hyphens => "-\u{2010}\u{2011}\u{2043}\u{2012}\u{2013}\u{2014}\u{2015}",
            CharGroup::Minuses => "-\u{2212}\u{ff0d}\u{207b}",
            CharGroup::Pluses => "+\u{ff0b}\u{207a}",
            CharGroup::Slashes => "/\u{2044}\u{2215}",
            CharGroup::Tildes => "~\u{02dc}\u{2053}\u{223c}\u{223d}\u{223f}\u{301c}\u{ff5e}",
            CharGroup::Apostrophes => "'\u{2019}\u{055a}\u{a78b}\u{a78c}\u{ff07}",
            CharGroup::SingleQuotes => "'\u{2018}\u{2019}\u{201a}\u{201b}",
            CharGroup::DoubleQuotes => "\"\u{201c}\u{201d}\u{201e}\u{201f}",
            CharGroup::Accents => "`\u{00b4}",
            CharGroup::Primes => "\u{2032}\u{2033}\u{2034}\u{2035}\u{2036}\u{2037}\u{2057}",
        }
    }

    pub fn canonical(&self) -> char {
        // Every member string is a non-empty literal.
        self.members().chars().next().unwrap_or_default()
    }

    /// Parses a comma-separated list of group names, e.g. `"double_quotes,tildes"`.
    pub fn parse_list(groups: &str) -> Result<Vec<CharGroup>, BolimaError> {
        groups
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(CharGroup::from_str)
            .collect()
    }
}

impl FromStr for CharGroup {
    type Err = BolimaError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        CharGroup::ALL
            .into_iter()
            .find(|group| group.name() == name)
            .ok_or_else(|| {
                BolimaError::ConfigurationError(format!("unknown character group '{}'", name))
            })
    }
}

//==================================================================================
// 2. Core Logic (The "Engine")
//==================================================================================

/// A prebuilt translation table for a fixed set of groups.
#[derive(Debug, Clone)]
pub struct CharNormalizer {
    table: HashMap<char, char>,
}

impl CharNormalizer {
    /// Builds a table for `groups`. A character listed in several groups maps to
    /// the canonical character of the first group that lists it.
    pub fn new(groups: &[CharGroup]) -> Self {
        let mut table = HashMap::new();
        for group in groups {
            let canonical = group.canonical();
            for member in group.members().chars().skip(1) {
                table.entry(member).or_insert(canonical);
            }
        }
        Self { table }
    }

    /// A normalizer covering every group.
    pub fn all() -> Self {
        Self::new(&CharGroup::ALL)
    }

    pub fn normalize(&self, text: &str) -> String {
        text.chars()
            .map(|c| self.table.get(&c).copied().unwrap_or(c))
            .collect()
    }
}

impl Default for CharNormalizer {
    fn default() -> Self {
        Self::all()
    }
}

//==================================================================================
// 3. Public API
//==================================================================================

/// Normalizes `text` using every group, or only the comma-separated `groups`.
pub fn normalize_characters(text: &str, groups: Option<&str>) -> Result<String, BolimaError> {
    let normalizer = match groups {
        None => CharNormalizer::all(),
        Some(groups) => CharNormalizer::new(&CharGroup::parse_list(groups)?),
    };
    Ok(normalizer.normalize(text))
}

//==================================================================================
// 4. Unit Tests
//==================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const NOISY: &str = "räksmörgås‐‑⁃‒–—―−－⁻＋⁺⁄∕˜⁓∼∽∿〜～’՚Ꞌꞌ＇‘’‚‛“”„‟´″‴‵‶‷⁗RÄKSMÖRGÅS";

    #[test]
    fn test_normalize_all_groups() {
        let normalized = normalize_characters(NOISY, None).unwrap();
        assert_eq!(
            normalized,
            "räksmörgås----------++//~~~~~~~'''''''''\"\"\"\"`′′′′′′RÄKSMÖRGÅS"
        );
    }

    #[test]
    fn test_normalize_selected_groups_only() {
        let normalized = normalize_characters(NOISY, Some("double_quotes,tildes")).unwrap();
        assert_eq!(
            normalized,
            "räksmörgås‐‑⁃‒–—―−－⁻＋⁺⁄∕~~~~~~~’՚Ꞌꞌ＇‘’‚‛\"\"\"\"´″‴‵‶‷⁗RÄKSMÖRGÅS"
        );
    }

    #[test]
    fn test_hyphen_variant_is_folded_unless_group_is_excluded() {
        assert_eq!(normalize_characters("a\u{2010}b", None).unwrap(), "a-b");
        assert_eq!(
            normalize_characters("a\u{2010}b", Some("tildes")).unwrap(),
            "a\u{2010}b"
        );
    }

    #[test]
    fn test_unknown_group_is_a_configuration_error() {
        let err = normalize_characters("x", Some("hyphens,dingbats")).unwrap_err();
        assert!(matches!(err, BolimaError::ConfigurationError(_)));
    }

    #[test]
    fn test_canonical_characters_map_to_themselves() {
        let normalizer = CharNormalizer::all();
        for group in CharGroup::ALL {
            let canonical = group.canonical().to_string();
            assert_eq!(normalizer.normalize(&canonical), canonical);
        }
    }
}
