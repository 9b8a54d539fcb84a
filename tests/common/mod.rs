#![allow(dead_code)]

use campaign_uploader::upload::{DownloadDir, SelectedFile, StatusUpdate, UploadController};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use url::Url;

pub struct TestCtx {
    pub controller: UploadController,
    pub sender: Sender<StatusUpdate>,
    pub receiver: Receiver<StatusUpdate>,
    pub uploads: TempDir,
    pub downloads: TempDir,
}

impl TestCtx {
    pub fn new(server_uri: &str) -> Self {
        Self::with_timeout(server_uri, None)
    }

    pub fn with_timeout(server_uri: &str, timeout: Option<Duration>) -> Self {
        Self::build(server_uri, timeout, None)
    }

    /// Saves archives into `subdir` of the download dir instead of its root.
    pub fn with_download_subdir(server_uri: &str, subdir: &Path) -> Self {
        Self::build(server_uri, None, Some(subdir))
    }

    fn build(server_uri: &str, timeout: Option<Duration>, subdir: Option<&Path>) -> Self {
        let uploads = tempfile::tempdir().unwrap();
        let downloads = tempfile::tempdir().unwrap();
        let sink_dir = match subdir {
            Some(subdir) => downloads.path().join(subdir),
            None => downloads.path().to_path_buf(),
        };
        let sink = Arc::new(DownloadDir::new(sink_dir));
        let controller =
            UploadController::new(Url::parse(server_uri).unwrap(), timeout, sink).unwrap();
        let (sender, receiver) = mpsc::channel();

        Self {
            controller,
            sender,
            receiver,
            uploads,
            downloads,
        }
    }

    /// Writes a local file the operator could pick.
    pub fn local_file(&self, name: &str, contents: &[u8]) -> SelectedFile {
        let path = self.uploads.path().join(name);
        fs::write(&path, contents).unwrap();
        SelectedFile::from_path(path)
    }

    pub fn sent_updates(&self) -> Vec<StatusUpdate> {
        self.receiver.try_iter().collect()
    }

    pub fn downloaded_files(&self) -> Vec<PathBuf> {
        list_dir(self.downloads.path())
    }
}

pub fn list_dir(dir: &Path) -> Vec<PathBuf> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    entries.sort();
    entries
}
