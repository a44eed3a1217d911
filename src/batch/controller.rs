use super::events::{BatchEvent, BatchSummary, EventSink, RunOutcome};
use crate::config::OutputPolicy;
use crate::errors::Result;
use crate::lyrics::{generate, LyricsDocument, ProviderResult};
use crate::providers::{Resolution, TrackResolver};
use crate::tags::TrackIdentity;
use crate::utils::{FileUtils, Logger};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Parameters of one batch run
#[derive(Debug, Clone)]
pub struct BatchRun {
    pub root_folder: PathBuf,
    pub output_policy: OutputPolicy,
}

/// What happened to a single file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TrackOutcome {
    Resolved,
    Skipped,
    Failed,
}

/// Walks a folder and resolves lyrics for each eligible file, strictly in order
pub struct BatchController {
    resolver: Arc<dyn TrackResolver>,
    track_delay: Duration,
}

impl BatchController {
    pub fn new(resolver: Arc<dyn TrackResolver>, track_delay: Duration) -> Self {
        Self {
            resolver,
            track_delay,
        }
    }

    /// Process every file under the run's root folder.
    ///
    /// The cancellation token is checked before each file only; a track that
    /// has started is always finished. The last event emitted is `Finished`.
    pub async fn run(&self, run: &BatchRun, cancel: &CancellationToken, events: &dyn EventSink) -> RunOutcome {
        let outcome = self.process_folder(run, cancel, events).await;

        match &outcome {
            RunOutcome::Completed(summary) => events.status(&format!("Done. {}", summary)),
            RunOutcome::Stopped(summary) => events.status(&format!("Stopped by user. {}", summary)),
        }
        events.emit(BatchEvent::Finished(outcome));
        outcome
    }

    async fn process_folder(&self, run: &BatchRun, cancel: &CancellationToken, events: &dyn EventSink) -> RunOutcome {
        let policy = run.output_policy;
        let mut summary = BatchSummary::default();

        if !policy.write_lrc && !policy.embed_in_file {
            events.status("No output selected: enable LRC files or embedding");
            return RunOutcome::Completed(summary);
        }

        let files = match FileUtils::discover_audio_files(&run.root_folder) {
            Ok(files) => files,
            Err(e) => {
                events.status(&e.to_string());
                return RunOutcome::Completed(summary);
            }
        };

        summary.total = files.len();
        if files.is_empty() {
            events.status(&format!("No supported audio files in {}", run.root_folder.display()));
            return RunOutcome::Completed(summary);
        }

        Logger::log_batch_start(&run.root_folder.display().to_string(), files.len());
        events.status(&format!("Found {} audio files", files.len()));

        for (index, path) in files.iter().enumerate() {
            if cancel.is_cancelled() {
                return RunOutcome::Stopped(summary);
            }

            let prefix = format!("[{}/{}]", index + 1, files.len());
            let outcome = self.process_file(path, &policy, &prefix, events).await;
            match outcome {
                TrackOutcome::Resolved => summary.resolved += 1,
                TrackOutcome::Skipped => summary.skipped += 1,
                TrackOutcome::Failed => summary.failed += 1,
            }

            let is_last = index + 1 == files.len();
            if outcome != TrackOutcome::Skipped && !is_last && !self.track_delay.is_zero() {
                tokio::select! {
                    _ = cancel.cancelled() => {}
                    _ = tokio::time::sleep(self.track_delay) => {}
                }
            }
        }

        RunOutcome::Completed(summary)
    }

    async fn process_file(
        &self,
        path: &Path,
        policy: &OutputPolicy,
        prefix: &str,
        events: &dyn EventSink,
    ) -> TrackOutcome {
        let Some(identity) = TrackIdentity::from_path(path) else {
            events.status(&format!("{} Skipped {}: unsupported file", prefix, path.display()));
            return TrackOutcome::Skipped;
        };
        let file_name = identity.file_name();

        if let Some(reason) = skip_reason(&identity, policy) {
            events.status(&format!("{} Skipped {}: {}", prefix, file_name, reason));
            return TrackOutcome::Skipped;
        }

        let query = identity.query();
        Logger::log_track_start(query.artist(), query.title(), &path.display().to_string());
        events.status(&format!("{} Processing: {}", prefix, query));

        let result = match self.resolver.resolve(&query, events).await {
            Resolution::Found(result) => result,
            Resolution::Exhausted => {
                Logger::log_track_exhausted(query.artist(), query.title());
                events.status(&format!("{} No lyrics found for {}", prefix, query));
                return TrackOutcome::Failed;
            }
        };
        Logger::log_track_resolved(query.artist(), query.title(), &result.source.to_string());
        events.status(&format!(
            "{} Found lyrics via {} ({})",
            prefix, result.host_label, result.source
        ));

        match write_outputs(&identity, &result, policy, prefix, events) {
            Ok(()) => TrackOutcome::Resolved,
            Err(e) => {
                Logger::log_file_operation_error("write lyrics", &path.display().to_string(), &e.to_string());
                events.status(&format!("{} Failed to save lyrics for {}: {}", prefix, file_name, e));
                TrackOutcome::Failed
            }
        }
    }
}

/// Why a file is not worth resolving, if it isn't
fn skip_reason(identity: &TrackIdentity, policy: &OutputPolicy) -> Option<&'static str> {
    let path = &identity.source_path;

    if policy.embed_in_file && policy.skip_if_embedded && identity.format.has_embedded_lyrics(path) {
        return Some("already has embedded lyrics");
    }
    if !policy.embed_in_file
        && policy.write_lrc
        && policy.skip_if_lrc_exists
        && FileUtils::lrc_path_for(path).exists()
    {
        return Some("LRC file already exists");
    }
    if !identity.is_searchable() {
        return Some("no usable title in tags or file name");
    }
    None
}

fn write_outputs(
    identity: &TrackIdentity,
    result: &ProviderResult,
    policy: &OutputPolicy,
    prefix: &str,
    events: &dyn EventSink,
) -> Result<()> {
    let document = LyricsDocument::from_raw(&result.raw_lyrics);
    let path = &identity.source_path;

    if policy.write_lrc {
        let lrc_path = FileUtils::lrc_path_for(path);
        FileUtils::write_string_to_file(&lrc_path, &generate(&document).render())?;
        events.status(&format!("{} Saved {}", prefix, lrc_path.display()));
    }

    if policy.embed_in_file {
        if identity.format.supports_embedding() {
            identity.format.write_lyrics(path, document.plain_text())?;
            events.status(&format!("{} Embedded lyrics into {}", prefix, identity.file_name()));
        } else {
            events.status(&format!(
                "{} Embedding not supported for {} files",
                prefix, identity.format
            ));
        }
    }

    Ok(())
}
