#![windows_subsystem = "windows"]

use pheco::domain::config::AppConfig;
use pheco::kernel::config::load_config;
use pheco_desktop::DesktopApp;
use pheco_logger::{Logger, parse_level};

fn main() -> anyhow::Result<()> {
    let config: AppConfig = load_config(std::env::var_os("PHECO_CONFIG"))?;
    let _logger = Logger::builder().name(env!("CARGO_BIN_NAME")).console(true).level(parse_level(&config.logging.level)?).init()?;

    DesktopApp::new(config).launch();
    Ok(())
}
