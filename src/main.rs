use anyhow::Result;
use campaign_uploader::app::CampaignUploader;
use campaign_uploader::{config, logging};
use eframe::CreationContext;

fn main() -> Result<()> {
    let config_path = config::config_path();
    let config = config::load_or_init(&config_path)?;

    if let Err(e) = logging::init_logging(&config.log_dir) {
        logging::init_logging_stderr();
        tracing::warn!(
            "file logging unavailable in {}: {}",
            config.log_dir.display(),
            e
        );
    }

    let app = CampaignUploader::new(config)?;

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([600.0, 560.0])
            .with_min_inner_size([420.0, 460.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Patient Campaign Uploader",
        options,
        Box::new(move |_cc: &CreationContext| Box::new(app)),
    )
    .map_err(|e| anyhow::anyhow!("failed to start the UI: {e}"))
}
