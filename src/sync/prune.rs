//! Prune phase: delete remote tools with no local counterpart
//!
//! Runs strictly after the upload phase so freshly uploaded files are
//! never mistaken for absent ones. Never mutates local state.

use crate::error::{Result, SyncError};
use crate::sync::SyncRun;

impl SyncRun {
    pub(super) async fn prune_phase(&mut self) -> Result<()> {
        self.progress.send("Pruning remote tools...");

        let inventory = match self.client.list_tools().await {
            Ok(inventory) => inventory,
            // Without a readable inventory nothing downstream can proceed
            Err(e @ SyncError::Decode(_)) => return Err(e),
            Err(e) => {
                log::error!("Failed to fetch remote tools for pruning: {e}");
                return Ok(());
            }
        };

        for (category, tools) in &inventory {
            let category_dir = self.root.join(category);

            for tool in tools {
                let short_id = tool.short_id();
                let exists_locally = category_dir.join(format!("{short_id}.py")).exists()
                    || category_dir.join(format!("{short_id}.yaml")).exists();
                if exists_locally {
                    continue;
                }

                self.progress.send(format!("Deleting {category}/{short_id}..."));
                match self.client.delete_tool(category, short_id).await {
                    Ok(()) => self.summary.deleted += 1,
                    Err(e) => {
                        log::error!("Failed to delete {category}/{short_id}: {e}");
                        self.summary.failed += 1;
                    }
                }
            }
        }
        Ok(())
    }
}
