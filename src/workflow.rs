// In: src/workflow.rs

//! The end-to-end orchestrator: corpus in, tagged frames and document index out.
//!
//! Issues are read, tagged and dispatched one at a time in sorted title order.
//! A failing issue is logged and skipped; a structural problem (bad schema,
//! unusable target) aborts the run. Either way the dispatcher is finalized
//! exactly once.

use std::fs;

use serde::Serialize;

use crate::bridge::{IssuePages, IssueReader};
use crate::config::WorkflowConfig;
use crate::error::BolimaError;
use crate::frame_pipeline::Dispatcher;
use crate::kernels::pretokenize;
use crate::tagging::{tag_issue, CommandTagger, Normalization, Tagger};

/// What a run did.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub issues_dispatched: usize,
    /// Pages dispatched; equals the size of the global document id space.
    pub documents: usize,
    /// `(title, message)` for each skipped issue.
    pub failures: Vec<(String, String)>,
}

/// Creates the external tagger described by `config`.
pub fn build_tagger(config: &WorkflowConfig) -> CommandTagger {
    CommandTagger::new(config.tagger_program.clone(), config.model_root.clone())
        .with_args(config.tagger_args.iter().cloned())
        .with_preprocessor(pretokenize)
}

/// Tags and dispatches every issue of `issues`, skipping issues that fail.
///
/// Structural errors stop the loop and are returned. The dispatcher is not
/// finalized here; that is the caller's job.
pub fn tag_issues<I>(
    tagger: &dyn Tagger,
    issues: I,
    dispatcher: &mut Dispatcher,
    normalization: &Normalization,
) -> Result<RunSummary, BolimaError>
where
    I: IntoIterator<Item = Result<IssuePages, BolimaError>>,
{
    let mut summary = RunSummary::default();

    for item in issues {
        let pages = item?;
        let outcome = tag_issue(tagger, &pages, normalization)
            .and_then(|tagged| dispatcher.dispatch(&tagged));

        match outcome {
            Ok(_) => summary.issues_dispatched += 1,
            Err(e) if e.is_structural() => return Err(e),
            Err(e) => {
                log::warn!("skipping {}: {}", pages.title, e);
                summary.failures.push((pages.title.clone(), e.to_string()));
            }
        }
    }

    summary.documents = usize::try_from(dispatcher.next_document_id()).unwrap_or_default();
    Ok(summary)
}

/// Runs the whole workflow with the given tagger.
pub fn run_workflow(config: &WorkflowConfig, tagger: &dyn Tagger) -> Result<RunSummary, BolimaError> {
    if !config.source.is_file() {
        return Err(BolimaError::NotFoundError(config.source.display().to_string()));
    }
    // The corpus is validated before anything in the target is touched.
    let reader = IssueReader::open(&config.source)?;
    log::info!("{} issues in {}", reader.num_issues(), config.source.display());

    if config.target.exists() {
        if !config.force {
            return Err(BolimaError::WorkflowError(format!(
                "target folder {} exists (use --force to replace it)",
                config.target.display()
            )));
        }
        log::warn!("removing existing target {}", config.target.display());
        fs::remove_dir_all(&config.target)?;
    }

    match serde_json::to_string(config) {
        Ok(json) => log::info!("workflow config: {}", json),
        Err(e) => log::warn!("cannot render workflow config: {}", e),
    }

    let mut dispatcher = Dispatcher::open(&config.target, config.dispatch.clone(), config.frame_mode)?;
    let normalization = Normalization::from_flag(config.normalize_chars);

    // On error the dispatcher is dropped here, which finalizes what was dispatched.
    let summary = tag_issues(tagger, reader, &mut dispatcher, &normalization)?;
    dispatcher.close()?;

    log::info!(
        "done: {} issues, {} documents, {} skipped",
        summary.issues_dispatched,
        summary.documents,
        summary.failures.len()
    );
    Ok(summary)
}
