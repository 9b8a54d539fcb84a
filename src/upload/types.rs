use std::fs;
use std::path::{Path, PathBuf};

/// Multipart field the backend reads the upload from.
pub const FILE_FIELD: &str = "file";

/// Suggested name of the archive returned by the daily Excel upload.
pub const DOCTOR_EMAIL_ARCHIVE: &str = "doctor_email_files.zip";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UploadKind {
    DailyExcel,
    NoReview,
}

impl UploadKind {
    pub const ALL: [UploadKind; 2] = [UploadKind::DailyExcel, UploadKind::NoReview];

    pub fn profile(self) -> UploadProfile {
        match self {
            UploadKind::DailyExcel => UploadProfile {
                kind: self,
                title: "Daily Patient Excel".to_string(),
                endpoint: "/upload".to_string(),
                mode: ResponseMode::Download {
                    file_name: DOCTOR_EMAIL_ARCHIVE.to_string(),
                },
                filter_name: "Excel",
                extensions: &["xlsx", "xls"],
                missing_file_prompt: "Please select the Excel file".to_string(),
                pending_text: "⏳ Processing Excel...".to_string(),
                success_text: "✅ Emails generated & ZIP downloaded".to_string(),
                failure_text: "❌ Excel upload failed".to_string(),
            },
            UploadKind::NoReview => UploadProfile {
                kind: self,
                title: "No-Review CSV".to_string(),
                endpoint: "/upload-no-review".to_string(),
                mode: ResponseMode::Confirm,
                filter_name: "CSV",
                extensions: &["csv"],
                missing_file_prompt: "Please select the No-Review CSV file".to_string(),
                pending_text: "⏳ Processing No-Review file...".to_string(),
                success_text: "✅ Master sheet updated from No-Review file".to_string(),
                failure_text: "❌ No-review upload failed".to_string(),
            },
        }
    }
}

/// How a successful response body is handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseMode {
    /// Body is an opaque archive saved under `file_name`.
    Download { file_name: String },
    /// Body is JSON confirmation data; nothing is saved.
    Confirm,
}

/// Everything one upload routine needs: where to post, what to do with the
/// answer and what to tell the operator along the way.
#[derive(Debug, Clone)]
pub struct UploadProfile {
    pub kind: UploadKind,
    pub title: String,
    pub endpoint: String,
    pub mode: ResponseMode,
    pub filter_name: &'static str,
    pub extensions: &'static [&'static str],
    pub missing_file_prompt: String,
    pub pending_text: String,
    pub success_text: String,
    pub failure_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub path: PathBuf,
    pub size: Option<u64>,
}

impl SelectedFile {
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        let size = fs::metadata(path).ok().map(|meta| meta.len());

        Self {
            name,
            path: path.to_path_buf(),
            size,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionPhase {
    #[default]
    Idle,
    Pending,
    Success,
    Failure,
}

impl SubmissionPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, SubmissionPhase::Success | SubmissionPhase::Failure)
    }
}

/// Result of one phase transition, bound to the status display by the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdate {
    pub kind: UploadKind,
    pub phase: SubmissionPhase,
    pub text: String,
    pub artifact: Option<PathBuf>,
}

impl StatusUpdate {
    pub fn pending(profile: &UploadProfile) -> Self {
        Self {
            kind: profile.kind,
            phase: SubmissionPhase::Pending,
            text: profile.pending_text.clone(),
            artifact: None,
        }
    }

    pub fn success(profile: &UploadProfile, artifact: Option<PathBuf>) -> Self {
        Self {
            kind: profile.kind,
            phase: SubmissionPhase::Success,
            text: profile.success_text.clone(),
            artifact,
        }
    }

    pub fn failure(profile: &UploadProfile) -> Self {
        Self {
            kind: profile.kind,
            phase: SubmissionPhase::Failure,
            text: profile.failure_text.clone(),
            artifact: None,
        }
    }
}
