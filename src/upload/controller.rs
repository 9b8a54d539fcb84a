use crate::upload::artifact::ArtifactSink;
use crate::upload::error::{NoFileSelected, RemoteError};
use crate::upload::types::{
    ResponseMode, SelectedFile, StatusUpdate, UploadProfile, FILE_FIELD,
};
use reqwest::multipart::{Form, Part};
use std::io;
use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Refuses a submission when nothing was picked.
pub fn ensure_selected<'a>(
    profile: &UploadProfile,
    file: Option<&'a SelectedFile>,
) -> Result<&'a SelectedFile, NoFileSelected> {
    file.ok_or_else(|| NoFileSelected {
        prompt: profile.missing_file_prompt.clone(),
    })
}

/// Posts a selected file to one of the backend's upload endpoints and
/// turns the answer into a [`StatusUpdate`].
#[derive(Clone)]
pub struct UploadController {
    client: reqwest::Client,
    base_url: Url,
    sink: Arc<dyn ArtifactSink>,
}

impl UploadController {
    /// `request_timeout` of `None` leaves the transport default in place.
    pub fn new(
        base_url: Url,
        request_timeout: Option<Duration>,
        sink: Arc<dyn ArtifactSink>,
    ) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url,
            sink,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Runs one submission: `Idle -> Pending -> {Success, Failure}`.
    ///
    /// The pending and final updates are pushed through `status_sender` as
    /// they happen; the final one is also returned. Only a missing file is
    /// reported as an error, and in that case nothing is sent.
    pub async fn submit(
        &self,
        profile: &UploadProfile,
        file: Option<&SelectedFile>,
        status_sender: &Sender<StatusUpdate>,
    ) -> Result<StatusUpdate, NoFileSelected> {
        let file = match ensure_selected(profile, file) {
            Ok(file) => file,
            Err(e) => {
                tracing::warn!("{} upload refused: {}", profile.title, e);
                return Err(e);
            }
        };

        status_sender
            .send(StatusUpdate::pending(profile))
            .unwrap_or_default();
        tracing::info!(
            "uploading {} to {} ({})",
            file.name,
            profile.endpoint,
            profile.title
        );

        let update = match self.run(profile, file).await {
            Ok(artifact) => {
                match &artifact {
                    Some(path) => tracing::info!(
                        "{} upload succeeded, saved {}",
                        profile.title,
                        path.display()
                    ),
                    None => tracing::info!("{} upload succeeded", profile.title),
                }
                StatusUpdate::success(profile, artifact)
            }
            Err(e) => {
                tracing::error!(
                    "{} upload of {} failed: {}",
                    profile.title,
                    file.name,
                    e
                );
                StatusUpdate::failure(profile)
            }
        };

        status_sender.send(update.clone()).unwrap_or_default();
        Ok(update)
    }

    async fn run(
        &self,
        profile: &UploadProfile,
        file: &SelectedFile,
    ) -> Result<Option<PathBuf>, RemoteError> {
        let url = self.base_url.join(&profile.endpoint)?;

        let contents = tokio::fs::read(&file.path)
            .await
            .map_err(|source| RemoteError::ReadFile {
                path: file.path.clone(),
                source,
            })?;
        let mime = mime_guess::from_path(&file.path).first_or_octet_stream();
        let part = Part::bytes(contents)
            .file_name(file.name.clone())
            .mime_str(mime.as_ref())?;
        let form = Form::new().part(FILE_FIELD, part);

        let response = self.client.post(url).multipart(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status(status));
        }

        let body = response.bytes().await.map_err(RemoteError::Body)?;

        match &profile.mode {
            ResponseMode::Download { file_name } => {
                tracing::debug!("received {} byte archive", body.len());
                let sink = Arc::clone(&self.sink);
                let file_name = file_name.clone();
                let saved = tokio::task::spawn_blocking(move || sink.save(&file_name, &body))
                    .await
                    .map_err(|e| RemoteError::Save(io::Error::new(io::ErrorKind::Other, e)))?
                    .map_err(RemoteError::Save)?;
                Ok(Some(saved))
            }
            ResponseMode::Confirm => {
                let confirmation: serde_json::Value = serde_json::from_slice(&body)?;
                if let Some(message) = confirmation.get("message").and_then(|m| m.as_str()) {
                    tracing::debug!("server confirmation: {}", message);
                }
                Ok(None)
            }
        }
    }
}
