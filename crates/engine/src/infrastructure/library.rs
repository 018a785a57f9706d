//! Vignette library loading.
//!
//! Stages are read once at startup from `*.json` files and shared read-only.
//! Any unreadable or invalid stage fails startup: a broken library is a content
//! defect that must not surface as odd scenes in front of a child.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use promptplay_domain::{DomainError, Stage};
use thiserror::Error;

use super::ports::VignetteLibraryPort;

/// The stage compiled into the binary, used when no directory is configured.
const BUILTIN_BIRTHDAY_PARTY: &str = include_str!("../../content/stages/birthday_party.json");

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse stage {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid stage {path}: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: DomainError,
    },

    #[error("Stage '{task_id}' is defined more than once")]
    DuplicateTask { task_id: String },

    #[error("No stage files found in {0}")]
    Empty(PathBuf),
}

/// Loaded stages keyed by task id.
#[derive(Debug, Default)]
pub struct VignetteLibrary {
    stages: HashMap<String, Arc<Stage>>,
}

impl VignetteLibrary {
    /// Validate and index already-parsed stages.
    pub fn from_stages(stages: Vec<(PathBuf, Stage)>) -> Result<Self, LibraryError> {
        let mut library = Self::default();
        for (path, stage) in stages {
            stage
                .validate()
                .map_err(|source| LibraryError::Invalid {
                    path: path.clone(),
                    source,
                })?;
            if library.stages.contains_key(&stage.task_id) {
                return Err(LibraryError::DuplicateTask {
                    task_id: stage.task_id,
                });
            }
            library.stages.insert(stage.task_id.clone(), Arc::new(stage));
        }
        Ok(library)
    }

    /// The stages shipped with the engine.
    pub fn builtin() -> Result<Self, LibraryError> {
        let path = PathBuf::from("<builtin>/birthday_party.json");
        let stage = parse_stage(&path, BUILTIN_BIRTHDAY_PARTY)?;
        Self::from_stages(vec![(path, stage)])
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl VignetteLibraryPort for VignetteLibrary {
    fn stage(&self, task_id: &str) -> Option<Arc<Stage>> {
        self.stages.get(task_id).cloned()
    }

    fn task_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.stages.keys().cloned().collect();
        ids.sort();
        ids
    }
}

fn parse_stage(path: &Path, raw: &str) -> Result<Stage, LibraryError> {
    serde_json::from_str(raw).map_err(|source| LibraryError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Read every `*.json` file in `dir` (non-recursive) as a stage.
pub fn load_library(dir: &Path) -> Result<VignetteLibrary, LibraryError> {
    let io_err = |source| LibraryError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
        .map_err(io_err)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(io_err)?
        .into_iter()
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();

    if paths.is_empty() {
        return Err(LibraryError::Empty(dir.to_path_buf()));
    }

    let mut stages = Vec::with_capacity(paths.len());
    for path in paths {
        let raw = std::fs::read_to_string(&path).map_err(|source| LibraryError::Io {
            path: path.clone(),
            source,
        })?;
        let stage = parse_stage(&path, &raw)?;
        tracing::debug!(
            path = %path.display(),
            task_id = %stage.task_id,
            vignettes = stage.vignettes.len(),
            "Loaded stage"
        );
        stages.push((path, stage));
    }

    let library = VignetteLibrary::from_stages(stages)?;
    tracing::info!(dir = %dir.display(), stages = library.len(), "Vignette library loaded");
    Ok(library)
}
