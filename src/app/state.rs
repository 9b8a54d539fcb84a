use crate::upload::{SelectedFile, StatusUpdate, SubmissionPhase, UploadKind, UploadProfile};
use std::path::PathBuf;

/// Display state of one upload routine.
#[derive(Debug, Clone)]
pub struct PanelState {
    pub profile: UploadProfile,
    pub selected: Option<SelectedFile>,
    pub phase: SubmissionPhase,
    pub status_text: String,
    pub last_artifact: Option<PathBuf>,
}

impl PanelState {
    pub fn new(profile: UploadProfile) -> Self {
        Self {
            profile,
            selected: None,
            phase: SubmissionPhase::Idle,
            status_text: String::new(),
            last_artifact: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct UploadState {
    pub panels: Vec<PanelState>,
    /// Blocking message shown until dismissed.
    pub alert: Option<String>,
}

impl Default for UploadState {
    fn default() -> Self {
        Self {
            panels: UploadKind::ALL
                .iter()
                .map(|kind| PanelState::new(kind.profile()))
                .collect(),
            alert: None,
        }
    }
}

impl UploadState {
    pub fn panel(&self, kind: UploadKind) -> Option<&PanelState> {
        self.panels.iter().find(|p| p.profile.kind == kind)
    }

    pub fn panel_mut(&mut self, kind: UploadKind) -> Option<&mut PanelState> {
        self.panels.iter_mut().find(|p| p.profile.kind == kind)
    }

    /// Binds an update to its panel. Overlapping submissions race here and
    /// the last update received wins.
    pub fn apply(&mut self, update: StatusUpdate) {
        let Some(panel) = self.panel_mut(update.kind) else {
            return;
        };

        panel.phase = update.phase;
        panel.status_text = update.text;
        match update.phase {
            SubmissionPhase::Pending => panel.last_artifact = None,
            SubmissionPhase::Success => panel.last_artifact = update.artifact,
            SubmissionPhase::Idle | SubmissionPhase::Failure => {}
        }
    }

    pub fn any_pending(&self) -> bool {
        self.panels
            .iter()
            .any(|p| p.phase == SubmissionPhase::Pending)
    }
}
