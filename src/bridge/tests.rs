use super::format::*;
use super::load::{load_corpus, read_delimited, read_ipc, sniff_delimiter, year_from_title};
use super::reader::IssueReader;
use super::sink::{render_delimited, Payload, StorageSink};
use crate::config::StorageFormat;
use crate::error::BolimaError;
use crate::utils::{int64_column, string_column};
use arrow::array::{ArrayRef, Int64Array, RecordBatch, StringArray};
use std::fs;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

/// A dataframe-style export: unnamed index column, issues out of order.
const SAMPLE_CORPUS_TSV: &str = "\ttitle\tpage\ttext
7\tBLM-1944:2\t15\tFörsta sidan i andra numret.
3\tBLM-1943:1\t15\tHans lätt och som gol om glädje.
4\tBLM-1943:1\t20\tAlla förkunnad den i stormen: upprepandet
";

fn write_file(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn sample_frame() -> RecordBatch {
    RecordBatch::try_from_iter(vec![
        (
            "token",
            Arc::new(StringArray::from(vec!["Hans", "lätt", "."])) as ArrayRef,
        ),
        ("document_id", Arc::new(Int64Array::from(vec![0, 0, 1])) as ArrayRef),
    ])
    .unwrap()
}

#[cfg(test)]
mod load_tests {
    use super::*;

    #[test]
    fn test_sniff_delimiter() {
        assert_eq!(sniff_delimiter("\ttitle\tpage\ttext\n"), b'\t');
        assert_eq!(sniff_delimiter("title,page,text\n"), b',');
    }

    #[test]
    fn test_year_from_title() {
        assert_eq!(year_from_title("BLM-1943:1"), Some(1943));
        assert_eq!(year_from_title("BLM-43:1"), None);
        assert_eq!(year_from_title("BLM"), None);
    }

    #[test]
    fn test_load_tab_separated_derives_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "corpus.csv", SAMPLE_CORPUS_TSV);

        let corpus = load_corpus(&path).unwrap();
        assert_eq!(corpus.num_rows(), 3);
        assert!(corpus.schema().index_of("").is_err(), "stray index column must be dropped");

        let names = string_column(&corpus, COL_DOCUMENT_NAME).unwrap();
        assert_eq!(names.value(0), "BLM-1944:2_15");
        assert_eq!(string_column(&corpus, COL_ISSUE_NAME).unwrap().value(1), "BLM-1943:1");
        assert_eq!(int64_column(&corpus, COL_DOCUMENT_ID).unwrap().values().to_vec(), vec![0, 1, 2]);
        assert_eq!(int64_column(&corpus, COL_YEAR).unwrap().values().to_vec(), vec![1944, 1943, 1943]);
    }

    #[test]
    fn test_load_comma_separated() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "corpus.csv",
            "title,page,text\nBLM-1950:3,1,\"Ett, två\"\n",
        );
        let corpus = load_corpus(&path).unwrap();
        assert_eq!(string_column(&corpus, COL_TEXT).unwrap().value(0), "Ett, två");
    }

    #[test]
    fn test_load_reports_missing_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "corpus.csv", "title\tbody\nBLM-1943:1\tx\n");
        match load_corpus(&path) {
            Err(BolimaError::SchemaError(missing)) => {
                assert_eq!(missing, vec!["page".to_string(), "text".to_string()])
            }
            other => panic!("expected a schema error, got {:?}", other.map(|b| b.num_rows())),
        }
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_corpus(Path::new("/definitely/not/here.csv"));
        assert!(matches!(result, Err(BolimaError::NotFoundError(_))));
    }

    #[test]
    fn test_numeric_looking_text_stays_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "frame.csv", "token\tdocument_id\n1943\t0\n12\t0\n");
        let frame = read_delimited(&path, b'\t').unwrap();
        assert_eq!(string_column(&frame, COL_TOKEN).unwrap().value(0), "1943");
    }
}

#[cfg(test)]
mod reader_tests {
    use super::*;

    #[test]
    fn test_issues_in_sorted_title_order_with_page_order_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "corpus.tsv", SAMPLE_CORPUS_TSV);

        let reader = IssueReader::open(&path).unwrap();
        assert_eq!(reader.num_issues(), 2);

        let issues: Vec<_> = reader.collect::<Result<_, _>>().unwrap();
        assert_eq!(issues[0].title, "BLM-1943:1");
        assert_eq!(issues[0].num_pages(), 2);
        assert_eq!(issues[0].positions, vec![1, 2]);
        assert_eq!(
            int64_column(&issues[0].pages, COL_PAGE).unwrap().values().to_vec(),
            vec![15, 20]
        );
        assert_eq!(issues[1].title, "BLM-1944:2");
        assert_eq!(issues[1].positions, vec![0]);
    }

    #[test]
    fn test_reader_is_reconstructible() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "corpus.tsv", SAMPLE_CORPUS_TSV);

        let first: Vec<String> = IssueReader::open(&path).unwrap().map(|i| i.unwrap().title).collect();
        let second: Vec<String> = IssueReader::open(&path).unwrap().map(|i| i.unwrap().title).collect();
        assert_eq!(first, second);
    }
}

#[cfg(test)]
mod sink_tests {
    use super::*;

    fn read_all(mut reader: impl Read) -> String {
        let mut text = String::new();
        reader.read_to_string(&mut text).unwrap();
        text
    }

    #[test]
    fn test_render_delimited_has_header() {
        let text = render_delimited(&sample_frame(), b'\t').unwrap();
        assert!(text.starts_with("token\tdocument_id\n"));
        assert!(text.contains("lätt\t0\n"));
    }

    #[test]
    fn test_feather_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let sink = StorageSink::new(dir.path(), StorageFormat::Feather);

        let path = sink.store("BLM-1943_#1.csv", Payload::Frame(&sample_frame())).unwrap();
        assert_eq!(path, dir.path().join("BLM-1943_#1.feather"));

        let reloaded = read_ipc(&path).unwrap();
        assert_eq!(reloaded, sample_frame());
    }

    #[test]
    fn test_plain_csv_frame() {
        let dir = tempfile::tempdir().unwrap();
        let sink = StorageSink::new(dir.path(), StorageFormat::Csv);

        let path = sink.store_frame(DOCUMENT_INDEX_NAME, &sample_frame()).unwrap();
        assert_eq!(path, dir.path().join("document_index.csv"));
        assert!(fs::read_to_string(path).unwrap().starts_with("token\tdocument_id"));
    }

    #[test]
    fn test_compressed_text_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let text = "token\tdocument_id\nräksmörgås\t0\n";

        let gz = StorageSink::new(dir.path(), StorageFormat::Gzip)
            .store("a.csv", Payload::Text(text))
            .unwrap();
        assert_eq!(gz, dir.path().join("a.csv.gz"));
        assert_eq!(read_all(flate2::read::GzDecoder::new(fs::File::open(gz).unwrap())), text);

        let bz = StorageSink::new(dir.path(), StorageFormat::Bz2)
            .store("b.csv", Payload::Text(text))
            .unwrap();
        assert_eq!(bz, dir.path().join("b.csv.bz2"));
        assert_eq!(read_all(bzip2::read::BzDecoder::new(fs::File::open(bz).unwrap())), text);

        let xz = StorageSink::new(dir.path(), StorageFormat::Lzma)
            .store("c.csv", Payload::Text(text))
            .unwrap();
        assert_eq!(xz, dir.path().join("c.csv.xz"));
        assert_eq!(read_all(xz2::read::XzDecoder::new(fs::File::open(xz).unwrap())), text);
    }

    #[test]
    fn test_text_is_rejected_in_feather_format() {
        let dir = tempfile::tempdir().unwrap();
        let result = StorageSink::new(dir.path(), StorageFormat::Feather).store("a.csv", Payload::Text("x\n"));
        assert!(matches!(result, Err(BolimaError::ConfigurationError(_))));
        assert!(!dir.path().join("a.csv").exists());
    }

    #[test]
    fn test_frame_path_matches_written_path() {
        let dir = tempfile::tempdir().unwrap();
        for format in StorageFormat::ALL {
            let sink = StorageSink::new(dir.path(), format);
            let written = sink.store_frame("issue", &sample_frame()).unwrap();
            assert_eq!(written, sink.frame_path("issue"));
            assert!(written.is_file());
        }
    }
}
