mod state;
mod ui;

use crate::config::UploaderConfig;
use crate::upload::{
    ensure_selected, DownloadDir, SelectedFile, StatusUpdate, SubmissionPhase, UploadController,
    UploadKind,
};
use anyhow::Result;
use eframe::{egui, App};
pub use state::{PanelState, UploadState};
use std::path::Path;
use std::sync::mpsc as std_mpsc;
use std::sync::Arc;
use std::time::Duration;

pub struct CampaignUploader {
    config: UploaderConfig,
    controller: Arc<UploadController>,
    runtime: tokio::runtime::Runtime,
    state: UploadState,
    status_sender: std_mpsc::Sender<StatusUpdate>,
    status_receiver: std_mpsc::Receiver<StatusUpdate>,
}

impl CampaignUploader {
    pub fn new(config: UploaderConfig) -> Result<Self> {
        tracing::info!("Initializing campaign uploader against {}", config.server_url);

        let sink = Arc::new(DownloadDir::new(&config.download_dir));
        let controller =
            UploadController::new(config.server_url()?, config.request_timeout(), sink)?;
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        let (status_sender, status_receiver) = std_mpsc::channel();

        Ok(Self {
            config,
            controller: Arc::new(controller),
            runtime,
            state: UploadState::default(),
            status_sender,
            status_receiver,
        })
    }

    pub fn select_file(&mut self, kind: UploadKind, path: &Path) {
        if let Some(panel) = self.state.panel_mut(kind) {
            let file = SelectedFile::from_path(path);
            tracing::debug!("{} selected for {}", file.name, panel.profile.title);
            panel.selected = Some(file);
        }
    }

    /// Validates the selection on the UI thread, then hands the upload to the
    /// runtime. Each call is an independent submission.
    pub fn start_submission(&mut self, kind: UploadKind) {
        let Some(panel) = self.state.panel(kind) else {
            return;
        };

        let file = match ensure_selected(&panel.profile, panel.selected.as_ref()) {
            Ok(file) => file.clone(),
            Err(e) => {
                tracing::warn!("{} upload refused: {}", panel.profile.title, e);
                self.state.alert = Some(e.prompt);
                return;
            }
        };

        let profile = panel.profile.clone();
        let controller = Arc::clone(&self.controller);
        let sender = self.status_sender.clone();

        self.runtime.spawn(async move {
            if let Err(e) = controller.submit(&profile, Some(&file), &sender).await {
                tracing::warn!("{} upload refused after validation: {}", profile.title, e);
            }
        });
    }

    pub fn update_state(&mut self, ctx: &egui::Context) {
        let mut had_updates = false;

        while let Ok(update) = self.status_receiver.try_recv() {
            had_updates = true;
            let reveal = update.phase == SubmissionPhase::Success
                && update.artifact.is_some()
                && self.config.open_download_folder;
            if reveal {
                self.reveal_download_folder();
            }
            self.state.apply(update);
        }

        if had_updates {
            ctx.request_repaint();
        }
        if self.state.any_pending() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }

    fn reveal_download_folder(&self) {
        if let Err(e) = open::that(&self.config.download_dir) {
            tracing::warn!(
                "could not open {}: {}",
                self.config.download_dir.display(),
                e
            );
        }
    }
}

impl App for CampaignUploader {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_state(ctx);
        self.render(ctx);
    }
}
