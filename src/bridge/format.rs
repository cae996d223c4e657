// In: src/bridge/format.rs

//! Defines all on-disk names and column contracts for the tagging output.
//! This is the single source of truth for file names, extensions and the fixed
//! column sets of corpora, document indexes, tagged frames and vocabularies.

//==================================================================================
// I. File Names
//==================================================================================

/// Path-unsafe character allowed in issue titles.
pub const TITLE_RESERVED_CHAR: char = ':';
/// Marker that replaces `TITLE_RESERVED_CHAR` in file names.
pub const SAFE_TITLE_MARKER: &str = "_#";

pub const DOCUMENT_INDEX_NAME: &str = "document_index";
pub const VOCABULARY_NAME: &str = "token2id";
/// Suffix of a stored tagged issue's document index, e.g. `BLM-1943_#1_document_index.csv`.
pub const ISSUE_INDEX_SUFFIX: &str = "_document_index.csv";

pub const FEATHER_EXTENSION: &str = "feather";
pub const CSV_EXTENSION: &str = "csv";
pub const PARQUET_EXTENSION: &str = "parquet";

/// Table extensions that `replace_extension` swaps out instead of appending to.
const TABLE_EXTENSIONS: [&str; 3] = [FEATHER_EXTENSION, CSV_EXTENSION, PARQUET_EXTENSION];

/// Returns `filename` with a table extension replaced by (or extended with) `extension`.
pub fn replace_extension(filename: &str, extension: &str) -> String {
    let extension = extension.trim_start_matches('.');
    if filename.ends_with(&format!(".{}", extension)) {
        return filename.to_string();
    }
    let stem = TABLE_EXTENSIONS
        .iter()
        .find_map(|known| filename.strip_suffix(&format!(".{}", known)))
        .unwrap_or(filename);
    format!("{}.{}", stem, extension)
}

//==================================================================================
// II. Column Contracts
//==================================================================================

pub const COL_TITLE: &str = "title";
pub const COL_PAGE: &str = "page";
pub const COL_TEXT: &str = "text";
pub const COL_DOCUMENT_NAME: &str = "document_name";
pub const COL_ISSUE_NAME: &str = "issue_name";
pub const COL_DOCUMENT_ID: &str = "document_id";
pub const COL_YEAR: &str = "year";
pub const COL_INDEX: &str = "index";
pub const COL_N_TOKENS: &str = "n_tokens";
pub const COL_N_WORDS: &str = "n_words";
/// Legacy spelling of `n_tokens` in older document indexes.
pub const COL_NUM_TOKENS: &str = "num_tokens";

pub const COL_TOKEN: &str = "token";
pub const COL_LEMMA: &str = "lemma";
pub const COL_POS: &str = "pos";
pub const COL_XPOS: &str = "xpos";
pub const COL_TOKEN_ID: &str = "token_id";
pub const COL_LEMMA_ID: &str = "lemma_id";
pub const COL_POS_ID: &str = "pos_id";

/// Columns a corpus must provide.
pub const REQUIRED_CORPUS_COLUMNS: [&str; 3] = [COL_TITLE, COL_PAGE, COL_TEXT];

/// Document index columns narrowed to the smallest integer type on finalize.
pub const DOWNCAST_INDEX_COLUMNS: [&str; 3] = [COL_YEAR, COL_N_TOKENS, COL_DOCUMENT_ID];

/// Columns always read as text from delimited files, whatever inference suggests.
pub const STRING_COLUMNS: [&str; 8] = [
    COL_TITLE,
    COL_TEXT,
    COL_DOCUMENT_NAME,
    COL_ISSUE_NAME,
    COL_TOKEN,
    COL_LEMMA,
    COL_POS,
    COL_XPOS,
];

/// True for index columns left behind by dataframe round-trips (`""`, `Unnamed: 0`).
pub fn is_stray_index_column(name: &str) -> bool {
    name.is_empty() || name.starts_with("Unnamed:")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_extension() {
        assert_eq!(replace_extension("BLM-1943_#1.csv", "feather"), "BLM-1943_#1.feather");
        assert_eq!(replace_extension("document_index", "csv"), "document_index.csv");
        assert_eq!(replace_extension("a.feather", ".feather"), "a.feather");
        assert_eq!(replace_extension("v1.2", "csv"), "v1.2.csv");
    }

    #[test]
    fn test_stray_index_columns() {
        assert!(is_stray_index_column(""));
        assert!(is_stray_index_column("Unnamed: 0"));
        assert!(!is_stray_index_column("index"));
    }
}
