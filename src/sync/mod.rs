//! Reconciliation engine
//!
//! Walks the local tree, validates each candidate file, resolves its
//! category against the remote workspace list, upserts its content, and
//! records which logical tools changed. The optional prune and build
//! phases run after the walk on the same run context.
//!
//! One file's failure never blocks its siblings: a catalog sync over
//! hundreds of files must make partial progress under per-file faults.

mod build;
mod progress;
mod prune;

pub use progress::{Progress, SyncEvent};

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::client::HttpClient;
use crate::error::{Result, SyncError};
use crate::validate;

/// Tooling-artifact directories that are never descended into
const SKIPPED_DIRS: &[&str] = &["__pycache__", "node_modules", "venv"];

/// Identity of a logical tool: first path segment + filename stem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolId {
    pub category: String,
    pub name: String,
}

/// Counters accumulated across a run, reported once at the end
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub processed: usize,
    pub updated: usize,
    pub failed: usize,
    pub deleted: usize,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Processed: {}, Synced: {}, Failed: {}, Deleted: {}",
            self.processed, self.updated, self.failed, self.deleted
        )
    }
}

/// Switches for the optional phases
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOptions {
    /// Delete remote tools that have no local counterpart
    pub prune: bool,
    /// Trigger a build for every tool whose content changed
    pub build: bool,
}

/// What a candidate path was classified as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileKind {
    Script,
    Metadata,
}

/// A local file recognized as part of a tool
#[derive(Debug, Clone)]
struct LocalToolFile {
    kind: FileKind,
    category: String,
    short_name: String,
    /// Root-relative path, slash-normalized, as sent to the server
    rel_path: String,
    path: PathBuf,
}

impl LocalToolFile {
    /// Classify a path under `root`. Returns None for anything that is not
    /// a tool candidate: unrecognized extensions, `__init__.py`, and files
    /// directly at the root (no category segment).
    fn classify(root: &Path, path: &Path) -> Option<Self> {
        let file_name = path.file_name()?.to_str()?;
        let (kind, ext) = match path.extension()?.to_str()? {
            "py" if file_name != "__init__.py" => (FileKind::Script, ".py"),
            "yaml" => (FileKind::Metadata, ".yaml"),
            _ => return None,
        };

        let rel = path.strip_prefix(root).ok()?;
        let segments: Vec<&str> = rel.iter().filter_map(|s| s.to_str()).collect();
        if segments.len() < 2 {
            return None;
        }

        Some(Self {
            kind,
            category: segments[0].to_string(),
            short_name: file_name.strip_suffix(ext).unwrap_or(file_name).to_string(),
            rel_path: segments.join("/"),
            path: path.to_path_buf(),
        })
    }
}

fn keep_entry(entry: &DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return true;
    }
    let name = entry.file_name().to_string_lossy();
    !name.starts_with('.') && !SKIPPED_DIRS.contains(&name.as_ref())
}

/// Run-scoped state: category cache, changed-tool set, and counters all
/// live here and are passed through each phase
pub struct SyncRun {
    client: HttpClient,
    root: PathBuf,
    known_categories: HashMap<String, bool>,
    to_build: Vec<ToolId>,
    summary: RunSummary,
    progress: Progress,
}

impl SyncRun {
    pub fn new(client: HttpClient, root: impl Into<PathBuf>, progress: Progress) -> Self {
        Self {
            client,
            root: root.into(),
            known_categories: HashMap::new(),
            to_build: Vec::new(),
            summary: RunSummary::default(),
            progress,
        }
    }

    /// Execute the full run: prefetch, walk, then the optional phases.
    /// Each phase completes before the next begins.
    pub async fn run(mut self, options: SyncOptions) -> Result<RunSummary> {
        if !self.root.is_dir() {
            return Err(SyncError::Traversal(format!(
                "directory '{}' does not exist",
                self.root.display()
            )));
        }

        self.prefetch_categories().await;
        self.upload_phase().await?;

        if options.prune {
            self.prune_phase().await?;
        }
        if options.build {
            self.build_phase().await;
        }

        let summary = self.summary;
        self.progress.done(summary);
        Ok(summary)
    }

    /// Seed the category cache from the remote workspace list. Best-effort:
    /// an empty cache only means every category goes through creation.
    async fn prefetch_categories(&mut self) {
        match self.client.list_workspaces().await {
            Ok(workspaces) => {
                for workspace in workspaces {
                    self.known_categories.insert(workspace.name, true);
                }
            }
            Err(e) => {
                log::warn!("Could not fetch existing workspaces, auto-creation may fail: {e}");
            }
        }
    }

    /// Lazily create a remote category. Never propagates an error: a
    /// failed creation is logged and the next file in the same category
    /// retries, because the cache entry stays absent.
    async fn ensure_category(&mut self, name: &str) {
        if self.known_categories.get(name).copied().unwrap_or(false) {
            return;
        }

        self.progress.send(format!("Creating workspace '{name}'..."));
        match self.client.create_workspace(name).await {
            // 400 means the workspace already exists server-side
            Ok(status) if matches!(status.as_u16(), 200 | 201 | 400) => {
                self.known_categories.insert(name.to_string(), true);
            }
            Ok(status) => {
                log::warn!("Failed to create workspace '{name}': status {status}");
            }
            Err(e) => {
                log::warn!("Failed to create workspace '{name}': {e}");
            }
        }
    }

    /// Depth-first walk of the root, strictly sequential
    async fn upload_phase(&mut self) -> Result<()> {
        let walker = WalkDir::new(&self.root).into_iter().filter_entry(keep_entry);

        for entry in walker {
            let entry = entry.map_err(|e| SyncError::Traversal(e.to_string()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(file) = LocalToolFile::classify(&self.root, entry.path()) else {
                continue;
            };
            self.process_file(&file).await;
        }
        Ok(())
    }

    async fn process_file(&mut self, file: &LocalToolFile) {
        self.summary.processed += 1;
        self.ensure_category(&file.category).await;
        self.progress.send(format!("Syncing {}...", file.rel_path));

        let content = match fs::read_to_string(&file.path) {
            Ok(content) => content,
            Err(e) => {
                log::error!("Failed to read {}: {e}", file.path.display());
                self.summary.failed += 1;
                return;
            }
        };

        let checked = match file.kind {
            FileKind::Metadata => validate::validate_metadata(&content),
            FileKind::Script => validate::validate_script(&content),
        };
        if let Err(e) = checked {
            log::error!("Validation failed for {}: {e}", file.rel_path);
            self.summary.failed += 1;
            return;
        }

        match self.client.upsert_content(&file.rel_path, &content).await {
            Ok(status) => {
                self.summary.updated += 1;
                if status.changed() {
                    self.mark_changed(file);
                }
            }
            Err(e) => {
                log::error!("Upload failed for {}: {e}", file.rel_path);
                self.summary.failed += 1;
            }
        }
    }

    /// Record a changed tool for the build phase. Deduplicated: the second
    /// of a script/metadata pair does not add a second entry.
    fn mark_changed(&mut self, file: &LocalToolFile) {
        let id = ToolId {
            category: file.category.clone(),
            name: file.short_name.clone(),
        };
        if !self.to_build.contains(&id) {
            self.to_build.push(id);
        }
    }
}
