use eframe::egui;
use log::{error, info};

use serialscope::app::TelemetryApp;
use serialscope::config::{ConfigManager, DEFAULT_CONFIG_FILE};
use serialscope::logger;

fn main() {
    let config = match ConfigManager::load_or_default(DEFAULT_CONFIG_FILE) {
        Ok(config) => config,
        Err(e) => {
            logger::init_logger("info");
            error!("Invalid configuration in {}: {}", DEFAULT_CONFIG_FILE, e);
            std::process::exit(1);
        }
    };

    logger::init_logger(&config.get_config().logging.level);
    info!("Application starting");

    let window = config.get_config().window.clone();
    let options = eframe::NativeOptions {
        vsync: window.vsync,
        hardware_acceleration: if window.hardware_acceleration {
            eframe::HardwareAcceleration::Preferred
        } else {
            eframe::HardwareAcceleration::Off
        },
        renderer: eframe::Renderer::Glow,
        viewport: egui::ViewportBuilder::default()
            .with_title(window.title.clone())
            .with_inner_size([window.width, window.height])
            .with_resizable(window.resizable),
        ..Default::default()
    };

    if let Err(e) = eframe::run_native(
        &window.title,
        options,
        Box::new(|_cc| Ok(Box::new(TelemetryApp::new(config)))),
    ) {
        error!("GUI failed: {}", e);
        std::process::exit(1);
    }

    info!("GUI closed");
}
