// In: src/bridge/sink.rs

//! The storage sink: persists tables and text into the run's target folder in
//! the configured `StorageFormat`.
//!
//! Tables go to Arrow IPC (`.feather`) in the columnar format and are rendered to
//! tab-delimited text otherwise. Text is written plain or through a single-stream
//! compressor whose canonical extension is appended to the file name.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use arrow::array::RecordBatch;
use arrow::csv::WriterBuilder;
use arrow::ipc::writer::FileWriter;

use super::format::{replace_extension, CSV_EXTENSION, FEATHER_EXTENSION};
use crate::config::StorageFormat;
use crate::error::BolimaError;

/// Data accepted by `StorageSink::store`.
#[derive(Debug, Clone, Copy)]
pub enum Payload<'a> {
    Frame(&'a RecordBatch),
    Text(&'a str),
}

/// Renders a batch as delimited text with a header row.
pub fn render_delimited(batch: &RecordBatch, delimiter: u8) -> Result<String, BolimaError> {
    let mut buf = Vec::new();
    {
        let mut writer = WriterBuilder::new()
            .with_header(true)
            .with_delimiter(delimiter)
            .build(&mut buf);
        writer.write(batch)?;
    }
    String::from_utf8(buf).map_err(|e| BolimaError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}

/// Writes a batch as an Arrow IPC file.
pub fn write_ipc(path: &Path, batch: &RecordBatch) -> Result<(), BolimaError> {
    let file = BufWriter::new(File::create(path)?);
    let mut writer = FileWriter::try_new(file, &batch.schema())?;
    writer.write(batch)?;
    writer.finish()?;
    Ok(())
}

fn write_compressed(path: &Path, bytes: &[u8], format: StorageFormat) -> io::Result<()> {
    let file = BufWriter::new(File::create(path)?);
    match format {
        StorageFormat::Gzip => {
            let mut encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
            encoder.write_all(bytes)?;
            encoder.finish()?.flush()
        }
        StorageFormat::Bz2 => {
            let mut encoder = bzip2::write::BzEncoder::new(file, bzip2::Compression::default());
            encoder.write_all(bytes)?;
            encoder.finish()?.flush()
        }
        StorageFormat::Lzma => {
            let mut encoder = xz2::write::XzEncoder::new(file, 6);
            encoder.write_all(bytes)?;
            encoder.finish()?.flush()
        }
        StorageFormat::Csv | StorageFormat::Feather => {
            let mut file = file;
            file.write_all(bytes)?;
            file.flush()
        }
    }
}

#[derive(Debug, Clone)]
pub struct StorageSink {
    folder: PathBuf,
    format: StorageFormat,
}

impl StorageSink {
    pub fn new(folder: impl Into<PathBuf>, format: StorageFormat) -> Self {
        Self {
            folder: folder.into(),
            format,
        }
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    pub fn format(&self) -> StorageFormat {
        self.format
    }

    /// Persists `data` under `name` (relative to the sink folder). Returns the path written.
    pub fn store(&self, name: &str, data: Payload<'_>) -> Result<PathBuf, BolimaError> {
        match data {
            Payload::Frame(batch) => self.store_frame(name, batch),
            Payload::Text(text) => self.store_text(name, text),
        }
    }

    /// The path a table stored under `name` ends up at.
    pub fn frame_path(&self, name: &str) -> PathBuf {
        match self.format {
            StorageFormat::Feather => self.folder.join(replace_extension(name, FEATHER_EXTENSION)),
            _ => self.text_path(&replace_extension(name, CSV_EXTENSION)),
        }
    }

    /// The path text stored under `filename` ends up at.
    pub fn text_path(&self, filename: &str) -> PathBuf {
        match self.format.compressed_extension() {
            Some(extension) => self.folder.join(format!("{}.{}", filename, extension)),
            None => self.folder.join(filename),
        }
    }

    pub fn store_frame(&self, name: &str, batch: &RecordBatch) -> Result<PathBuf, BolimaError> {
        if self.format == StorageFormat::Feather {
            let path = self.frame_path(name);
            write_ipc(&path, batch)?;
            log::debug!("stored {} rows to {}", batch.num_rows(), path.display());
            return Ok(path);
        }
        let text = render_delimited(batch, b'\t')?;
        self.store_text(&replace_extension(name, CSV_EXTENSION), &text)
    }

    /// Writes `text` plain or compressed. The columnar format has no text form.
    pub fn store_text(&self, filename: &str, text: &str) -> Result<PathBuf, BolimaError> {
        if self.format == StorageFormat::Feather {
            return Err(BolimaError::ConfigurationError(format!(
                "cannot store text {} in {} format",
                filename, self.format
            )));
        }
        let path = self.text_path(filename);
        write_compressed(&path, text.as_bytes(), self.format)?;
        log::debug!("stored {} bytes of text to {}", text.len(), path.display());
        Ok(path)
    }
}
