mod artifact;
mod controller;
mod error;
mod types;

pub use artifact::{ArtifactSink, DownloadDir, TempArtifact};
pub use controller::{ensure_selected, UploadController};
pub use error::{NoFileSelected, RemoteError};
pub use types::{
    ResponseMode, SelectedFile, StatusUpdate, SubmissionPhase, UploadKind, UploadProfile,
    DOCTOR_EMAIL_ARCHIVE, FILE_FIELD,
};
