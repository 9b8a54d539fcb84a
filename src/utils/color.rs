use crate::upload::SubmissionPhase;
use eframe::egui::Color32;

pub trait ColorExt {
    fn parse_hex(hex: &str) -> Option<Self>
    where
        Self: Sized;
}

impl ColorExt for Color32 {
    fn parse_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }

        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

        Some(Color32::from_rgb(r, g, b))
    }
}

pub const ACCENT: &str = "#1f7a8c";
const PENDING: &str = "#969696";
const SUCCESS: &str = "#00b400";
const FAILURE: &str = "#dc3232";

/// Status label color for a submission phase.
pub fn phase_color(phase: SubmissionPhase, fallback: Color32) -> Color32 {
    let hex = match phase {
        SubmissionPhase::Idle => return fallback,
        SubmissionPhase::Pending => PENDING,
        SubmissionPhase::Success => SUCCESS,
        SubmissionPhase::Failure => FAILURE,
    };
    Color32::parse_hex(hex).unwrap_or(fallback)
}
