//! The canonical PoS tagset used when codifying tagged frames.
//!
//! Tag ids are positions in the tagset's sorted tag list, so the mapping is fixed
//! across runs and can be reconstructed from the list alone.

use serde::Serialize;

use crate::error::BolimaError;

/// Mid-sentence, major (sentence final) and paired punctuation in SUC.
pub const PUNCTUATION_TAGS: [&str; 3] = ["MID", "MAD", "PAD"];

#[derive(Debug, Clone, Copy, Serialize)]
pub struct PosTagScheme {
    pub name: &'static str,
    /// Sorted ascending; a tag's id is its index.
    pub tags: &'static [&'static str],
}

/// The Stockholm-Umeå Corpus tagset.
pub const SUC: PosTagScheme = PosTagScheme {
    name: "SUC",
    tags: &[
        "AB", "DT", "HA", "HD", "HP", "HS", "IE", "IN", "JJ", "KN", "MAD", "MID", "NN", "PAD",
        "PC", "PL", "PM", "PN", "PP", "PS", "RG", "RO", "SN", "UO", "VB",
    ],
};

impl PosTagScheme {
    pub fn id_of(&self, tag: &str) -> Option<i8> {
        self.tags
            .binary_search(&tag)
            .ok()
            .and_then(|idx| i8::try_from(idx).ok())
    }

    /// Like `id_of`, but an unknown tag is an error.
    pub fn pos_to_id(&self, tag: &str) -> Result<i8, BolimaError> {
        self.id_of(tag).ok_or_else(|| BolimaError::UnknownPosTag {
            tag: tag.to_string(),
            scheme: self.name,
        })
    }

    pub fn id_to_pos(&self, id: i8) -> Option<&'static str> {
        usize::try_from(id).ok().and_then(|idx| self.tags.get(idx).copied())
    }
}

pub fn is_punctuation(tag: &str) -> bool {
    PUNCTUATION_TAGS.contains(&tag)
}
