//! Demo entry point: resolve the configuration and print greetings.

use std::io::{self, Write as _};

use hello_stratum::config::{HelloConfig, options};
use hello_stratum::greeting;
use stratum_config::configure;
use tracing::{Level, debug};

fn main() -> io::Result<()> {
    let config = configure::<HelloConfig>(&options());
    tracing_subscriber::fmt()
        .with_max_level(config.log_level.unwrap_or(Level::WARN))
        .with_writer(io::stderr)
        .init();
    debug!(config = ?*config, "resolved configuration");

    let mut stdout = io::stdout().lock();
    let lines = greeting::lines(&config);
    for (i, line) in lines.iter().enumerate() {
        if i > 0 && !config.delivery.pause.is_zero() {
            std::thread::sleep(config.delivery.pause);
        }
        writeln!(stdout, "{line}")?;
    }
    for extra in config.positional_args() {
        debug!(argument = %extra, "ignoring positional argument");
    }
    Ok(())
}
