// In: src/tagging/command.rs

//! The production tagger: an external program speaking JSON over stdin/stdout.
//!
//! The program is started once per batch as
//! `<program> --model-root <dir> [args...]`. It receives the texts as a JSON
//! array of strings on stdin and must print a JSON array with one `TaggedData`
//! object per text on stdout.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;

use super::{Preprocessor, TaggedData, Tagger};
use crate::error::BolimaError;

#[derive(Debug, Clone)]
pub struct CommandTagger {
    program: String,
    model_root: PathBuf,
    args: Vec<String>,
    preprocessors: Vec<Preprocessor>,
}

impl CommandTagger {
    pub fn new(program: impl Into<String>, model_root: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            model_root: model_root.into(),
            args: Vec::new(),
            preprocessors: Vec::new(),
        }
    }

    pub fn with_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn with_preprocessor(mut self, step: Preprocessor) -> Self {
        self.preprocessors.push(step);
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn model_root(&self) -> &Path {
        &self.model_root
    }

    fn failure(&self, message: impl std::fmt::Display) -> BolimaError {
        BolimaError::TaggerError(format!("{}: {}", self.program, message))
    }
}

impl Tagger for CommandTagger {
    fn tag_batch(&self, texts: &[String]) -> Result<Vec<TaggedData>, BolimaError> {
        let payload = serde_json::to_vec(texts)?;

        let mut child = Command::new(&self.program)
            .arg("--model-root")
            .arg(&self.model_root)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.failure(format_args!("cannot start: {}", e)))?;

        // Feed stdin from a helper thread so a chatty child cannot deadlock on a full stdout pipe.
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| self.failure("stdin not captured"))?;
        let writer = thread::spawn(move || stdin.write_all(&payload));

        let output = child.wait_with_output()?;
        let written = writer
            .join()
            .map_err(|_| self.failure("stdin writer panicked"))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(self.failure(format_args!("{} ({})", output.status, stderr.trim())));
        }
        if let Err(e) = written {
            // A child that exits successfully without reading all input is judged by its output.
            if e.kind() != std::io::ErrorKind::BrokenPipe {
                return Err(self.failure(format_args!("cannot write input: {}", e)));
            }
        }

        log::debug!(
            "{} tagged {} texts ({} bytes of output)",
            self.program,
            texts.len(),
            output.stdout.len()
        );
        serde_json::from_slice(&output.stdout)
            .map_err(|e| self.failure(format_args!("unparsable output: {}", e)))
    }

    fn preprocessors(&self) -> &[Preprocessor] {
        &self.preprocessors
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn texts() -> Vec<String> {
        vec!["Hans gick hem.".to_string()]
    }

    #[test]
    fn test_missing_program() {
        let tagger = CommandTagger::new("bolima-no-such-tagger", "/tmp");
        let err = tagger.tag(&texts()).unwrap_err();
        assert!(matches!(err, BolimaError::TaggerError(_)));
        assert!(err.to_string().contains("cannot start"));
    }

    #[test]
    fn test_non_zero_exit() {
        let tagger = CommandTagger::new("false", "/tmp");
        assert!(matches!(tagger.tag(&texts()), Err(BolimaError::TaggerError(_))));
    }

    #[test]
    fn test_unparsable_output() {
        // echo prints its arguments, which is not JSON
        let tagger = CommandTagger::new("echo", "/tmp");
        let err = tagger.tag(&texts()).unwrap_err();
        assert!(err.to_string().contains("unparsable output"));
    }

    #[test]
    fn test_builder_keeps_settings() {
        let tagger = CommandTagger::new("stanza-tagger", "/models")
            .with_args(["--lang", "sv"])
            .with_preprocessor(crate::kernels::pretokenize);
        assert_eq!(tagger.program(), "stanza-tagger");
        assert_eq!(tagger.model_root(), Path::new("/models"));
        assert_eq!(tagger.preprocessors().len(), 1);
    }
}
