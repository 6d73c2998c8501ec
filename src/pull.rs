//! Mirror the remote catalog into the local tree
//!
//! The inverse direction of sync: recreates `<category>/<tool>.py` plus
//! the metadata sidecar and icon where the server has them. Per-tool
//! failures are logged and skipped; only a failed inventory fetch is
//! fatal to the pull.

use std::fs;
use std::path::Path;

use crate::client::HttpClient;
use crate::error::Result;

/// Pull every remote tool under `root`; returns the number of tools
/// written
pub async fn pull_scripts(client: &HttpClient, root: &Path) -> Result<usize> {
    let inventory = client.list_tools().await?;
    let mut pulled = 0usize;

    for (category, tools) in &inventory {
        let category_dir = root.join(category);
        if let Err(e) = fs::create_dir_all(&category_dir) {
            log::error!("Failed to create directory {}: {e}", category_dir.display());
            continue;
        }

        log::info!("Workspace: {category}");

        for tool in tools {
            let short_id = tool.short_id();
            log::info!("Pulling {}...", tool.id);

            let detail = match client.tool_detail(category, short_id).await {
                Ok(detail) => detail,
                Err(e) => {
                    log::error!("Failed to fetch {category}/{short_id}: {e}");
                    continue;
                }
            };

            let script_path = category_dir.join(format!("{short_id}.py"));
            if let Err(e) = fs::write(&script_path, &detail.script_code) {
                log::error!("Failed to write {}: {e}", script_path.display());
                continue;
            }

            // Sidecar and icon are best-effort extras
            match client.metadata_content(category, short_id).await {
                Ok(metadata) => {
                    let yaml_path = category_dir.join(format!("{short_id}.yaml"));
                    if let Err(e) = fs::write(&yaml_path, &metadata.content) {
                        log::warn!("Failed to write {}: {e}", yaml_path.display());
                    }
                }
                Err(e) => log::debug!("No metadata for {category}/{short_id}: {e}"),
            }

            if tool.has_logo {
                match client.fetch_logo(category, &tool.id).await {
                    Ok(svg) => {
                        let logo_path = category_dir.join(format!("{short_id}.logo.svg"));
                        if let Err(e) = fs::write(&logo_path, svg) {
                            log::warn!("Failed to write {}: {e}", logo_path.display());
                        }
                    }
                    Err(e) => log::debug!("No logo for {category}/{short_id}: {e}"),
                }
            }

            pulled += 1;
        }
    }

    Ok(pulled)
}
