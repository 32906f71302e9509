//! Match completion: replay frames handed to a hook on teardown.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::Context;
use tracing::{debug, info};

use crate::game::{MatchSummary, Snapshot};

/// Called exactly once per match teardown.
pub trait CompletionHook {
    fn on_complete(&mut self, summary: &MatchSummary) -> anyhow::Result<()>;
}

/// Discards summaries.
pub struct NoReplay;

impl CompletionHook for NoReplay {
    fn on_complete(&mut self, summary: &MatchSummary) -> anyhow::Result<()> {
        debug!(session_id = %summary.session, "No replay directory, skipping summary");
        Ok(())
    }
}

/// Writes each finished match that had at least one move as a JSON array of frames.
pub struct ReplayWriter {
    num: usize,
    directory: PathBuf,
    written: Vec<PathBuf>,
}

impl ReplayWriter {
    pub fn new(directory: PathBuf) -> anyhow::Result<Self> {
        if !directory.is_dir() {
            anyhow::bail!("Directory '{}' does not exist", directory.display());
        }
        Ok(Self {
            num: 1,
            directory,
            written: Vec::new(),
        })
    }

    /// Files written so far, oldest first.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl CompletionHook for ReplayWriter {
    fn on_complete(&mut self, summary: &MatchSummary) -> anyhow::Result<()> {
        if !summary.has_moved {
            debug!(session_id = %summary.session, "Nothing to summarize");
            return Ok(());
        }
        let filepath = self.directory.join(format!(
            "{}-{}-{:0>4}.json",
            summary.primary, summary.tertiary, self.num
        ));
        write_frames(File::create(&filepath)?, &summary.frames)
            .with_context(|| format!("Could not write replay '{}'", filepath.display()))?;
        info!(session_id = %summary.session, path = %filepath.display(), frames = summary.frames.len(), "Wrote replay");
        self.num += 1;
        self.written.push(filepath);
        Ok(())
    }
}

fn write_frames<W: Write>(out: W, frames: &[Snapshot]) -> anyhow::Result<()> {
    let mut writer = BufWriter::new(out);
    serde_json::to_writer_pretty(&mut writer, frames)?;
    writer.flush()?;
    Ok(())
}
