//! Download target for binary responses.
//!
//! The response body is first written to a hidden `.part` file next to the
//! destination and only linked into place once complete, so a reader never
//! sees a truncated archive. [`TempArtifact`] always removes its `.part`
//! file on drop.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Where downloaded artifacts end up.
pub trait ArtifactSink: Send + Sync {
    /// Stores `bytes` under a name derived from `suggested_name` and returns
    /// the final path.
    fn save(&self, suggested_name: &str, bytes: &[u8]) -> io::Result<PathBuf>;
}

/// Saves into a fixed directory, like a browser's download folder.
#[derive(Debug, Clone)]
pub struct DownloadDir {
    dir: PathBuf,
}

impl DownloadDir {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ArtifactSink for DownloadDir {
    fn save(&self, suggested_name: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;

        let mut temp = TempArtifact::create(&self.dir, suggested_name)?;
        temp.write_all(bytes)?;
        temp.persist(&self.dir, suggested_name)
    }
}

/// Scoped handle on a partially written download.
#[derive(Debug)]
pub struct TempArtifact {
    path: PathBuf,
    file: Option<File>,
}

impl TempArtifact {
    pub fn create(dir: &Path, suggested_name: &str) -> io::Result<Self> {
        let n = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        let path = dir.join(format!(
            ".{}.{}-{}.part",
            suggested_name,
            std::process::id(),
            n
        ));
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)?;

        Ok(Self {
            path,
            file: Some(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        match self.file.as_mut() {
            Some(file) => file.write_all(bytes),
            None => Err(io::Error::new(
                io::ErrorKind::Other,
                "temporary artifact already closed",
            )),
        }
    }

    /// Links the finished file into `dir` under the first free variant of
    /// `name` and returns that path. Existing files are never replaced.
    pub fn persist(mut self, dir: &Path, name: &str) -> io::Result<PathBuf> {
        if let Some(mut file) = self.file.take() {
            file.flush()?;
            file.sync_all()?;
        }

        let mut n = 0;
        loop {
            let target = numbered_path(dir, name, n);
            match fs::hard_link(&self.path, &target) {
                Ok(()) => return Ok(target),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => n += 1,
                Err(e) => {
                    tracing::debug!("hard link into {} failed: {}", dir.display(), e);
                    return self.copy_into_new(dir, name, n);
                }
            }
        }
    }

    /// Fallback for filesystems without hard links: claim the target with
    /// `create_new` and copy the finished bytes into it.
    fn copy_into_new(&self, dir: &Path, name: &str, mut n: u32) -> io::Result<PathBuf> {
        loop {
            let target = numbered_path(dir, name, n);
            let mut out = match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&target)
            {
                Ok(out) => out,
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    n += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };

            let copied = File::open(&self.path)
                .and_then(|mut src| io::copy(&mut src, &mut out))
                .and_then(|_| out.sync_all());
            if let Err(e) = copied {
                drop(out);
                let _ = fs::remove_file(&target);
                return Err(e);
            }
            return Ok(target);
        }
    }
}

impl Drop for TempArtifact {
    fn drop(&mut self) {
        self.file.take();
        if let Err(e) = fs::remove_file(&self.path) {
            if e.kind() != io::ErrorKind::NotFound {
                tracing::warn!(
                    "could not remove temporary download {}: {}",
                    self.path.display(),
                    e
                );
            }
        }
    }
}

/// `name` for `n == 0`, otherwise `stem (n).ext`.
fn numbered_path(dir: &Path, name: &str, n: u32) -> PathBuf {
    if n == 0 {
        return dir.join(name);
    }

    let as_path = Path::new(name);
    let stem = as_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| name.to_string());
    let ext = as_path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    dir.join(format!("{} ({}){}", stem, n, ext))
}
