use super::{CampaignUploader, PanelState};
use crate::upload::{ResponseMode, SubmissionPhase, UploadKind};
use crate::utils::color::{phase_color, ColorExt, ACCENT};
use crate::utils::file_size::format_size;
use eframe::egui::{self, Align, Color32, RichText};
use rfd::FileDialog;
use std::path::PathBuf;

enum PanelAction {
    Pick(UploadKind, PathBuf),
    Submit(UploadKind),
}

impl CampaignUploader {
    pub fn render(&mut self, ctx: &egui::Context) {
        let accent = Color32::parse_hex(ACCENT).unwrap_or(Color32::LIGHT_BLUE);
        let mut actions = Vec::new();

        egui::CentralPanel::default().show(ctx, |ui| {
            let footer_height = 40.0;
            let content_height = ui.available_height() - footer_height;

            ui.add_enabled_ui(self.state.alert.is_none(), |ui| {
                egui::ScrollArea::vertical()
                    .max_height(content_height)
                    .show(ui, |ui| {
                        ui.add_space(20.0);
                        ui.vertical_centered(|ui| {
                            ui.heading("Patient Campaign Uploader");
                            ui.add_space(5.0);
                            ui.label(
                                RichText::new(
                                    "Generate doctor email files and keep the master sheet current",
                                )
                                .color(ui.visuals().text_color().gamma_multiply(0.7)),
                            );
                        });

                        for panel in &self.state.panels {
                            ui.add_space(20.0);
                            Self::render_panel(ui, panel, accent, &mut actions);
                        }

                        ui.add_space(20.0);
                    });
            });

            ui.with_layout(egui::Layout::bottom_up(Align::Center), |ui| {
                ui.add_space(10.0);
                self.render_footer(ui);
            });
        });

        self.render_alert(ctx);

        for action in actions {
            match action {
                PanelAction::Pick(kind, path) => self.select_file(kind, &path),
                PanelAction::Submit(kind) => self.start_submission(kind),
            }
        }
    }

    fn render_panel(
        ui: &mut egui::Ui,
        panel: &PanelState,
        accent: Color32,
        actions: &mut Vec<PanelAction>,
    ) {
        let profile = &panel.profile;

        ui.group(|ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.label(RichText::new(&profile.title).strong().color(accent));
                ui.add_space(4.0);
                let hint = match &profile.mode {
                    ResponseMode::Download { file_name } => {
                        format!("Posts to {} and saves {}", profile.endpoint, file_name)
                    }
                    ResponseMode::Confirm => format!("Posts to {}", profile.endpoint),
                };
                ui.label("ℹ").on_hover_text_at_pointer(hint);
            });

            ui.add_space(8.0);

            ui.horizontal(|ui| {
                if ui.button("📄 Select File").clicked() {
                    if let Some(path) = FileDialog::new()
                        .add_filter(profile.filter_name, profile.extensions)
                        .pick_file()
                    {
                        actions.push(PanelAction::Pick(profile.kind, path));
                    }
                }
                match &panel.selected {
                    Some(file) => {
                        let size = file.size.map(format_size).unwrap_or_default();
                        ui.label(format!("Selected: {} {}", file.name, size));
                    }
                    None => {
                        ui.label(
                            RichText::new("No file selected")
                                .color(ui.visuals().text_color().gamma_multiply(0.6)),
                        );
                    }
                }
            });

            ui.add_space(8.0);

            ui.horizontal(|ui| {
                let button = egui::Button::new("📤 Upload").min_size(egui::vec2(120.0, 32.0));
                if ui.add(button).clicked() {
                    actions.push(PanelAction::Submit(profile.kind));
                }

                if panel.phase == SubmissionPhase::Pending {
                    ui.spinner();
                }
                if !panel.status_text.is_empty() {
                    let color = phase_color(panel.phase, ui.visuals().text_color());
                    ui.colored_label(color, &panel.status_text);
                }
            });

            if let Some(artifact) = &panel.last_artifact {
                ui.add_space(4.0);
                ui.horizontal(|ui| {
                    ui.label(format!("Saved to {}", artifact.display()));
                    if ui.small_button("📂 Show in folder").clicked() {
                        if let Some(dir) = artifact.parent() {
                            if let Err(e) = open::that(dir) {
                                tracing::warn!("could not open {}: {}", dir.display(), e);
                            }
                        }
                    }
                });
            }
        });
    }

    fn render_alert(&mut self, ctx: &egui::Context) {
        let Some(message) = self.state.alert.clone() else {
            return;
        };

        let mut dismissed = false;
        egui::Window::new("Missing file")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(message);
                ui.add_space(8.0);
                ui.vertical_centered(|ui| {
                    if ui.button("OK").clicked() {
                        dismissed = true;
                    }
                });
            });

        if dismissed {
            self.state.alert = None;
        }
    }

    fn render_footer(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(
                RichText::new(format!("Server: {}", self.controller.base_url()))
                    .small()
                    .color(ui.visuals().text_color().gamma_multiply(0.6)),
            );
            ui.label(
                RichText::new(format!(
                    "Downloads: {}",
                    self.config.download_dir.display()
                ))
                .small()
                .color(ui.visuals().text_color().gamma_multiply(0.6)),
            );
        });
    }
}
