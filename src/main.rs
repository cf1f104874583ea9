use anyhow::Result;

use logdeck::app::App;
use logdeck::config::{self, Config};
use logdeck::logging;

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure config directory exists (creates logs dir too)
    config::ensure_directories()?;

    let config = Config::load()?;

    // The message log must exist before logging starts so it sees every event
    let mut app = App::new(config);

    let (log_file_info, _guard) =
        logging::init_logging(app.config(), &config::logs_dir(), app.sink())?;

    if let Some(info) = &log_file_info {
        tracing::info!("Logging to: {}", info.path.display());
    }

    app.run().await
}
