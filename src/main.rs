//! Command-line entry point: `bolima run <source> <target> [options]`.

use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Args, Parser, Subcommand};
use colored::*;
use log::LevelFilter;

use bolima::config::{DispatchOptions, FrameMode, StorageFormat, WorkflowConfig, DEFAULT_MODEL_ROOT, DEFAULT_TAGGER_PROGRAM};
use bolima::observability::init_logging;
use bolima::{build_tagger, run_workflow, BolimaError};

#[derive(Parser, Debug)]
#[command(name = "bolima", version = bolima::VERSION, about = "Tag a journal corpus and dispatch per-issue token tables")]
struct Cli {
    /// Log level (error, warn, info, debug, trace). RUST_LOG overrides it per module.
    #[arg(long = "log-level", global = true, default_value = "info")]
    log_level: LevelFilter,

    /// Append log records to this file instead of stderr.
    #[arg(long = "log-file", global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tag every issue of SOURCE and write the results into TARGET.
    Run(RunArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Corpus file (feather, parquet, or tab/comma separated text).
    source_filename: PathBuf,

    /// Output folder; must not exist unless --force is given.
    target_folder: PathBuf,

    /// Store vocabulary ids instead of token text.
    #[arg(long, num_args = 0..=1, require_equals = true, default_value_t = true, default_missing_value = "true", action = ArgAction::Set)]
    codify: bool,

    /// Replace an existing target folder.
    #[arg(long, num_args = 0..=1, require_equals = true, default_value_t = false, default_missing_value = "true", action = ArgAction::Set)]
    force: bool,

    /// feather, csv, gzip, bz2 or lzma.
    #[arg(long = "compress-type", default_value = "feather")]
    compress_type: String,

    #[arg(long = "to-lower", num_args = 0..=1, require_equals = true, default_value_t = true, default_missing_value = "true", action = ArgAction::Set)]
    to_lower: bool,

    /// Drop the token text column.
    #[arg(long = "skip-text", num_args = 0..=1, require_equals = true, default_value_t = true, default_missing_value = "true", action = ArgAction::Set)]
    skip_text: bool,

    #[arg(long = "skip-stopwords", num_args = 0..=1, require_equals = true, default_value_t = false, default_missing_value = "true", action = ArgAction::Set)]
    skip_stopwords: bool,

    #[arg(long = "skip-puncts", num_args = 0..=1, require_equals = true, default_value_t = true, default_missing_value = "true", action = ArgAction::Set)]
    skip_puncts: bool,

    /// Drop the lemma column.
    #[arg(long = "skip-lemma", num_args = 0..=1, require_equals = true, default_value_t = false, default_missing_value = "true", action = ArgAction::Set)]
    skip_lemma: bool,

    #[arg(long = "model-root", default_value = DEFAULT_MODEL_ROOT)]
    model_root: PathBuf,

    /// External tagger executable.
    #[arg(long = "tagger-program", default_value = DEFAULT_TAGGER_PROGRAM)]
    tagger_program: String,

    /// Extra argument for the tagger program (repeatable).
    #[arg(long = "tagger-arg", allow_hyphen_values = true)]
    tagger_arg: Vec<String>,

    /// Do not fold confusable characters before tagging.
    #[arg(long = "no-normalize", action = ArgAction::SetTrue)]
    no_normalize: bool,
}

impl RunArgs {
    fn into_config(self) -> Result<WorkflowConfig, BolimaError> {
        let storage_format: StorageFormat = self.compress_type.parse()?;
        let mut config = WorkflowConfig::new(self.source_filename, self.target_folder);
        config.frame_mode = FrameMode::from_codify(self.codify);
        config.force = self.force;
        config.normalize_chars = !self.no_normalize;
        config.dispatch = DispatchOptions {
            storage_format,
            lowercase: self.to_lower,
            drop_token_text: self.skip_text,
            drop_stopword_rows: self.skip_stopwords,
            drop_punctuation_rows: self.skip_puncts,
            drop_lemma_column: self.skip_lemma,
        };
        config.model_root = self.model_root;
        config.tagger_program = self.tagger_program;
        config.tagger_args = self.tagger_arg;
        Ok(config)
    }
}

fn execute(cli: Cli) -> Result<(), BolimaError> {
    init_logging(cli.log_level, cli.log_file.as_deref())?;

    match cli.command {
        Commands::Run(args) => {
            let config = args.into_config()?;
            let tagger = build_tagger(&config);
            let summary = run_workflow(&config, &tagger)?;
            for (title, message) in &summary.failures {
                eprintln!("{} {}: {}", "skipped".yellow(), title, message);
            }
            Ok(())
        }
    }
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = execute(cli) {
        eprintln!("{} {}", "error:".red().bold(), e);
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> RunArgs {
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Commands::Run(args) => args,
        }
    }

    #[test]
    fn test_defaults_match_dispatch_defaults() {
        let config = parse(&["bolima", "run", "corpus.csv", "out"]).into_config().unwrap();
        assert_eq!(config.dispatch, DispatchOptions::default());
        assert_eq!(config.frame_mode, FrameMode::Codified);
        assert!(!config.force);
        assert!(config.normalize_chars);
    }

    #[test]
    fn test_bare_and_explicit_boolean_flags() {
        let config = parse(&[
            "bolima", "run", "--force", "corpus.csv", "out", "--codify=false", "--skip-stopwords", "--skip-text=false",
        ])
        .into_config()
        .unwrap();
        assert!(config.force);
        assert_eq!(config.frame_mode, FrameMode::Text);
        assert!(config.dispatch.drop_stopword_rows);
        assert!(!config.dispatch.drop_token_text);
    }

    #[test]
    fn test_unknown_compress_type_is_a_configuration_error() {
        let result = parse(&["bolima", "run", "a.csv", "out", "--compress-type", "zip"]).into_config();
        assert!(matches!(result, Err(BolimaError::ConfigurationError(_))));
    }

    #[test]
    fn test_tagger_options() {
        let config = parse(&[
            "bolima", "run", "a.csv", "out", "--tagger-program", "my-tagger", "--tagger-arg=--gpu",
        ])
        .into_config()
        .unwrap();
        assert_eq!(config.tagger_program, "my-tagger");
        assert_eq!(config.tagger_args, vec!["--gpu".to_string()]);
        assert_eq!(config.model_root, PathBuf::from(DEFAULT_MODEL_ROOT));
    }
}
