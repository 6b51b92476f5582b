use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use uuid::Uuid;

const SCRATCH_PREFIX: &str = "translate-";
const FALLBACK_FILE_NAME: &str = "audio";

/// Root directory under which every transient audio resource gets its own directory
#[derive(Debug, Clone)]
pub struct ScratchSpace {
    root: PathBuf,
}

impl ScratchSpace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Write `bytes` to a new file inside a freshly created, uniquely named directory.
    ///
    /// The returned resource owns the directory; dropping it removes both.
    pub async fn materialize(
        &self,
        file_name: &str,
        bytes: &[u8],
    ) -> io::Result<TransientAudioResource> {
        tokio::fs::create_dir_all(&self.root).await?;

        let dir = tempfile::Builder::new()
            .prefix(SCRATCH_PREFIX)
            .tempdir_in(&self.root)?;
        let file_name = sanitize_file_name(file_name);
        let path = dir.path().join(&file_name);

        // `dir` is dropped (and removed) if the write fails
        tokio::fs::write(&path, bytes).await?;

        tracing::debug!(
            path = %path.display(),
            size_bytes = bytes.len(),
            "Transient audio resource created"
        );

        Ok(TransientAudioResource {
            _dir: dir,
            path,
            file_name,
        })
    }

    /// Materialize synthesized speech under a name never used before
    pub async fn materialize_mp3(&self, bytes: &[u8]) -> io::Result<TransientAudioResource> {
        self.materialize(&format!("{}.mp3", Uuid::new_v4()), bytes)
            .await
    }
}

/// An audio file scoped to a single request.
///
/// Not `Clone`: exactly one owner exists, and the file and its directory are deleted when that
/// owner drops it, on success, error and unwind paths alike.
#[derive(Debug)]
pub struct TransientAudioResource {
    _dir: TempDir,
    path: PathBuf,
    file_name: String,
}

impl TransientAudioResource {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub async fn read(&self) -> io::Result<Vec<u8>> {
        tokio::fs::read(&self.path).await
    }
}

impl Drop for TransientAudioResource {
    fn drop(&mut self) {
        tracing::debug!(path = %self.path.display(), "Releasing transient audio resource");
    }
}

/// Reduce a client-supplied file name to a safe single path component
fn sanitize_file_name(raw: &str) -> String {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect();
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() {
        FALLBACK_FILE_NAME.to_string()
    } else {
        cleaned.to_string()
    }
}
