use std::sync::Arc;

use eframe::egui;

use graph_desk::api::{Gateway, HttpGateway};
use graph_desk::gui::frontend::DeskApp;
use graph_desk::persistence::settings::AppSettings;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let settings = match AppSettings::load() {
        Ok(s) => s,
        Err(e) => {
            log::warn!("could not read settings, using defaults: {:#}", e);
            AppSettings::default()
        }
    }
    .with_env_overrides();

    let gateway: Arc<dyn Gateway> = Arc::new(HttpGateway::from_settings(&settings)?);
    log::info!("using API at {}", settings.api_base_url);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 760.0])
            .with_min_inner_size([700.0, 420.0])
            .with_resizable(true),
        ..Default::default()
    };
    eframe::run_native(
        "Graph-Desk",
        options,
        Box::new(move |_cc| Ok(Box::new(DeskApp::new(settings, gateway)) as Box<dyn eframe::App>)),
    )
    .map_err(|e| anyhow::anyhow!("GUI failed: {}", e))
}
