use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

use crate::types::NewAttachment;

#[derive(Debug, Default)]
struct Previews {
    next_id: u64,
    live: HashMap<u64, PathBuf>,
    releases: HashMap<u64, u32>,
}

/// Tracks the preview references handed out for staged files.
#[derive(Debug, Clone, Default)]
pub struct PreviewRegistry {
    inner: Arc<Mutex<Previews>>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Previews> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn acquire(&self, path: &Path) -> PreviewHandle {
        let mut previews = self.lock();
        previews.next_id += 1;
        let id = previews.next_id;
        previews.live.insert(id, path.to_path_buf());

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        PreviewHandle {
            id,
            url: format!("preview://{}/{}", id, name),
            registry: self.clone(),
        }
    }

    fn release(&self, id: u64) {
        let mut previews = self.lock();
        if previews.live.remove(&id).is_none() {
            tracing::error!(preview = id, "preview released more than once");
        }
        *previews.releases.entry(id).or_default() += 1;
    }

    /// Number of preview references not yet released.
    pub fn live_count(&self) -> usize {
        self.lock().live.len()
    }

    pub fn release_count(&self, id: u64) -> u32 {
        self.lock().releases.get(&id).copied().unwrap_or(0)
    }

    pub fn path_of(&self, id: u64) -> Option<PathBuf> {
        self.lock().live.get(&id).cloned()
    }
}

/// A live preview reference. Released when dropped.
#[derive(Debug)]
pub struct PreviewHandle {
    id: u64,
    url: String,
    registry: PreviewRegistry,
}

impl PreviewHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.registry.release(self.id);
    }
}

#[derive(Debug, Error)]
pub enum StageError {
    #[error("No file at {0}")]
    NotFound(PathBuf),
    #[error("{0} is not a regular file")]
    NotAFile(PathBuf),
    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// A file picked in the form, waiting for the project to be saved.
#[derive(Debug)]
pub struct StagedAttachment {
    pub file: NewAttachment,
    preview: PreviewHandle,
}

impl StagedAttachment {
    pub fn stage(path: &Path, registry: &PreviewRegistry) -> Result<Self, StageError> {
        let metadata = std::fs::metadata(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => StageError::NotFound(path.to_path_buf()),
            _ => StageError::Io {
                path: path.to_path_buf(),
                source: e,
            },
        })?;
        if !metadata.is_file() {
            return Err(StageError::NotAFile(path.to_path_buf()));
        }

        let file = NewAttachment {
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            content_type: content_type_for(path).to_string(),
            size: metadata.len(),
            path: path.to_path_buf(),
        };
        tracing::debug!(name = %file.name, size = file.size, "attachment staged");

        Ok(Self {
            file,
            preview: registry.acquire(path),
        })
    }

    pub fn preview(&self) -> &PreviewHandle {
        &self.preview
    }
}

pub fn content_type_for(path: &Path) -> mime::Mime {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => mime::IMAGE_PNG,
        "jpg" | "jpeg" => mime::IMAGE_JPEG,
        "gif" => mime::IMAGE_GIF,
        "svg" => mime::IMAGE_SVG,
        "bmp" => mime::IMAGE_BMP,
        "pdf" => mime::APPLICATION_PDF,
        "json" => mime::APPLICATION_JSON,
        "js" => mime::APPLICATION_JAVASCRIPT,
        "txt" | "md" => mime::TEXT_PLAIN,
        "csv" => mime::TEXT_CSV,
        "html" | "htm" => mime::TEXT_HTML,
        "css" => mime::TEXT_CSS,
        "xml" => mime::TEXT_XML,
        _ => mime::APPLICATION_OCTET_STREAM,
    }
}

pub fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", size, UNITS[unit])
    }
}
