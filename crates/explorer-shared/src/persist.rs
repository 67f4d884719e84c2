//! Persistence boundary: transcript sinks and publishers.
//!
//! The target is append-only: every run writes new files. A failed publish
//! still reports where the transcript was written.

use crate::error::PersistenceError;
use crate::explorer::RunRecord;
use crate::synthesis::{synthesize, Synthesis, SynthesisRules};
use crate::transcript::{render_transcript, transcript_file_name};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Writes bytes somewhere durable and says where.
pub trait TranscriptSink {
    fn persist(&self, path_hint: &str, content: &[u8]) -> Result<PathBuf, PersistenceError>;
}

/// Signals the downstream synthesis consumer (e.g. a git commit).
pub trait Publisher {
    fn publish(&self, title: &str, body: &str, written: &Path) -> Result<(), PersistenceError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct PersistReport {
    pub transcript: PathBuf,
    pub json: Option<PathBuf>,
    /// Present when a publisher ran successfully
    pub synthesis: Option<Synthesis>,
}

/// What to do with a finished run.
pub struct PersistPlan<'a> {
    pub preview_chars: usize,
    pub write_json: bool,
    pub publisher: Option<(&'a dyn Publisher, &'a SynthesisRules)>,
}

pub fn persist_run<S: TranscriptSink + ?Sized>(
    record: &RunRecord,
    sink: &S,
    plan: &PersistPlan<'_>,
) -> Result<PersistReport, PersistenceError> {
    let transcript = render_transcript(record, plan.preview_chars);
    let name = transcript_file_name(record);
    let written = sink.persist(&name, transcript.as_bytes())?;
    info!(path = %written.display(), "transcript saved");

    let json = if plan.write_json {
        let json_name = json_file_name(&written, &name);
        let dumped = serde_json::to_vec_pretty(record)
            .map_err(|e| e.to_string())
            .and_then(|payload| sink.persist(&json_name, &payload).map_err(write_reason));
        match dumped {
            Ok(path) => Some(path),
            Err(reason) => {
                warn!(error = %reason, "record dump failed");
                return Err(PersistenceError::Incomplete {
                    written,
                    path: PathBuf::from(json_name),
                    reason,
                });
            }
        }
    } else {
        None
    };

    let synthesis = match plan.publisher {
        Some((publisher, rules)) => {
            let synthesis = synthesize(&transcript, record.cycle, rules);
            if let Err(e) = publisher.publish(&synthesis.title, &synthesis.body, &written) {
                warn!(error = %e, "publish failed");
                return Err(PersistenceError::Publish {
                    written,
                    reason: publish_reason(e),
                });
            }
            Some(synthesis)
        }
        None => None,
    };

    Ok(PersistReport {
        transcript: written,
        json,
        synthesis,
    })
}

/// The dump sits next to the transcript and follows whatever name the sink
/// actually gave it.
fn json_file_name(written: &Path, hint: &str) -> String {
    let name = written
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(hint);
    match name.strip_suffix(".txt") {
        Some(stem) => format!("{}.json", stem),
        None => format!("{}.json", name),
    }
}

fn write_reason(e: PersistenceError) -> String {
    match e {
        PersistenceError::Write { reason, .. } => reason,
        other => other.to_string(),
    }
}

fn publish_reason(e: PersistenceError) -> String {
    match e {
        PersistenceError::Publish { reason, .. } => reason,
        other => other.to_string(),
    }
}
