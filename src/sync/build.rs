//! Build phase: one build request per tool whose content changed
//!
//! Each call is independent; a failure is a warning and the remaining
//! builds are still attempted. Job completion is not tracked.

use crate::sync::SyncRun;

impl SyncRun {
    pub(super) async fn build_phase(&mut self) {
        if self.to_build.is_empty() {
            return;
        }

        self.progress.send("Triggering builds...");
        for tool in &self.to_build {
            self.progress
                .send(format!("Building {}/{}...", tool.category, tool.name));

            match self.client.trigger_build(&tool.category, &tool.name).await {
                Ok(Some(job_id)) => self.progress.send(format!("Build started (job {job_id})")),
                Ok(None) => self.progress.send("Build started"),
                Err(e) => {
                    log::warn!("Build skipped for {}/{}: {e}", tool.category, tool.name);
                }
            }
        }
    }
}
