// In: src/bridge/load.rs

//! Corpus loading: reads a corpus table from disk into a single `RecordBatch`,
//! checks the required columns and derives the optional ones.
//!
//! Supported sources are Arrow IPC / Feather files, Parquet files and delimited
//! text. The delimiter of a text file is sniffed from its header line: a tab
//! anywhere in the header means tab-separated, otherwise comma-separated.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, Int64Array, RecordBatch, StringArray};
use arrow::compute::concat_batches;
use arrow::csv::reader::Format;
use arrow::csv::ReaderBuilder;
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::ipc::reader::FileReader;
use arrow::record_batch::RecordBatchReader;
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use regex::Regex;

use super::format::{
    is_stray_index_column, COL_DOCUMENT_ID, COL_DOCUMENT_NAME, COL_ISSUE_NAME, COL_PAGE,
    COL_TITLE, COL_YEAR, FEATHER_EXTENSION, PARQUET_EXTENSION, REQUIRED_CORPUS_COLUMNS,
    STRING_COLUMNS,
};
use crate::error::BolimaError;
use crate::utils::{self, column, drop_columns, string_column};

//==================================================================================
// 1. Readers
//==================================================================================

/// Reads the first line of a text file.
pub fn read_header(path: &Path) -> Result<String, BolimaError> {
    let mut header = String::new();
    BufReader::new(File::open(path)?).read_line(&mut header)?;
    Ok(header)
}

pub fn sniff_delimiter(header: &str) -> u8 {
    if header.contains('\t') {
        b'\t'
    } else {
        b','
    }
}

fn collect_batches(
    schema: SchemaRef,
    batches: impl Iterator<Item = Result<RecordBatch, arrow::error::ArrowError>>,
) -> Result<RecordBatch, BolimaError> {
    let batches = batches.collect::<Result<Vec<_>, _>>()?;
    Ok(concat_batches(&schema, &batches)?)
}

/// Reads an Arrow IPC (Feather v2) file.
pub fn read_ipc(path: &Path) -> Result<RecordBatch, BolimaError> {
    let reader = FileReader::try_new(File::open(path)?, None)?;
    let schema = reader.schema();
    collect_batches(schema, reader)
}

pub fn read_parquet(path: &Path) -> Result<RecordBatch, BolimaError> {
    let reader = ParquetRecordBatchReaderBuilder::try_new(File::open(path)?)?.build()?;
    let schema = reader.schema();
    collect_batches(schema, reader)
}

/// Reads delimited text with a header row.
///
/// Column types are inferred from the data, except that `STRING_COLUMNS` are
/// always read as UTF-8 so that e.g. an all-numeric token column stays text.
/// Empty fields read back as nulls.
pub fn read_delimited(path: &Path, delimiter: u8) -> Result<RecordBatch, BolimaError> {
    read_with_format(path, Format::default().with_header(true).with_delimiter(delimiter))
}

/// Like `read_delimited`, but an empty field reads back as an empty string.
///
/// Used for token tables, where a filled-in lemma is `""` rather than null.
pub fn read_delimited_keep_empty(path: &Path, delimiter: u8) -> Result<RecordBatch, BolimaError> {
    let never_null = Regex::new(r"\z.").map_err(|e| BolimaError::ConfigurationError(e.to_string()))?;
    let format = Format::default()
        .with_header(true)
        .with_delimiter(delimiter)
        .with_null_regex(never_null);
    read_with_format(path, format)
}

fn read_with_format(path: &Path, format: Format) -> Result<RecordBatch, BolimaError> {
    let (inferred, _) = format.infer_schema(File::open(path)?, None)?;

    let fields: Vec<Field> = inferred
        .fields()
        .iter()
        .map(|field| {
            if STRING_COLUMNS.contains(&field.name().as_str()) || field.data_type() == &DataType::Null {
                Field::new(field.name(), DataType::Utf8, true)
            } else {
                field.as_ref().clone()
            }
        })
        .collect();
    let schema = Arc::new(Schema::new(fields));

    let reader = ReaderBuilder::new(Arc::clone(&schema))
        .with_format(format)
        .build(File::open(path)?)?;
    collect_batches(schema, reader)
}

//==================================================================================
// 2. Corpus Loading
//==================================================================================

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

/// Loads a corpus file, validates it and fills in derived columns.
pub fn load_corpus(path: &Path) -> Result<RecordBatch, BolimaError> {
    if !path.is_file() {
        return Err(BolimaError::NotFoundError(path.display().to_string()));
    }

    let corpus = match extension_of(path).as_deref() {
        Some(FEATHER_EXTENSION) | Some("arrow") | Some("ipc") => read_ipc(path)?,
        Some(PARQUET_EXTENSION) => read_parquet(path)?,
        _ => read_delimited(path, sniff_delimiter(&read_header(path)?))?,
    };

    log::info!(
        "loaded corpus {} ({} rows, {} columns)",
        path.display(),
        corpus.num_rows(),
        corpus.num_columns()
    );
    prepare_corpus(corpus)
}

/// Validates an already loaded corpus and fills in derived columns.
pub fn prepare_corpus(corpus: RecordBatch) -> Result<RecordBatch, BolimaError> {
    let stray: Vec<String> = corpus
        .schema()
        .fields()
        .iter()
        .map(|field| field.name().clone())
        .filter(|name| is_stray_index_column(name))
        .collect();
    let stray: Vec<&str> = stray.iter().map(String::as_str).collect();
    let corpus = drop_columns(&corpus, &stray)?;

    check_required_columns(&corpus)?;
    derive_columns(corpus)
}

pub fn check_required_columns(corpus: &RecordBatch) -> Result<(), BolimaError> {
    let missing: Vec<String> = REQUIRED_CORPUS_COLUMNS
        .iter()
        .filter(|name| !utils::has_column(corpus, name))
        .map(|name| name.to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(BolimaError::SchemaError(missing))
    }
}

/// Parses the year encoded in an issue title, e.g. `BLM-1943:1` -> 1943.
pub fn year_from_title(title: &str) -> Option<i64> {
    let tail = title.split('-').nth(1)?;
    let digits: String = tail.chars().take(4).collect();
    if digits.len() != 4 {
        return None;
    }
    digits.parse().ok()
}

/// Adds `document_name`, `issue_name`, `document_id` and `year` where absent.
fn derive_columns(corpus: RecordBatch) -> Result<RecordBatch, BolimaError> {
    let titles = string_column(&corpus, COL_TITLE)?;
    if titles.null_count() > 0 {
        return Err(BolimaError::SchemaError(vec![format!(
            "{} (contains {} null values)",
            COL_TITLE,
            titles.null_count()
        )]));
    }
    let mut corpus = utils::replace_column(&corpus, COL_TITLE, Arc::new(titles.clone()))?;

    if !utils::has_column(&corpus, COL_DOCUMENT_NAME) {
        let pages = column(&corpus, COL_PAGE)?;
        let names = (0..corpus.num_rows())
            .map(|row| -> Result<Option<String>, BolimaError> {
                let page = array_value_to_string(pages, row)?;
                Ok(Some(format!("{}_{}", titles.value(row), page)))
            })
            .collect::<Result<StringArray, BolimaError>>()?;
        corpus = utils::replace_column(&corpus, COL_DOCUMENT_NAME, Arc::new(names))?;
    }

    if !utils::has_column(&corpus, COL_ISSUE_NAME) {
        corpus = utils::replace_column(&corpus, COL_ISSUE_NAME, Arc::new(titles.clone()))?;
    }

    if !utils::has_column(&corpus, COL_DOCUMENT_ID) {
        let ids: ArrayRef = Arc::new(Int64Array::from_iter_values(0..corpus.num_rows() as i64));
        corpus = utils::replace_column(&corpus, COL_DOCUMENT_ID, ids)?;
    }

    if !utils::has_column(&corpus, COL_YEAR) {
        let years = titles
            .iter()
            .map(|title| {
                let title = title.unwrap_or_default();
                year_from_title(title).map(Some).ok_or_else(|| {
                    BolimaError::SchemaError(vec![format!(
                        "{} (cannot derive from title '{}')",
                        COL_YEAR, title
                    )])
                })
            })
            .collect::<Result<Int64Array, BolimaError>>()?;
        corpus = utils::replace_column(&corpus, COL_YEAR, Arc::new(years))?;
    }

    Ok(corpus)
}
