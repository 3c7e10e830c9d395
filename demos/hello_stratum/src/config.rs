//! Configuration schema for the demo.

use std::time::Duration;

use stratum_config::{ConfigFile, Options, Schema};
use tracing::Level;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "HELLO_";

/// How the greeting is written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Style {
    /// As given.
    #[default]
    Plain,
    /// Upper case.
    Shout,
}

/// Top-level configuration.
#[derive(Debug, Default, Schema)]
pub struct HelloConfig {
    /// Configuration file
    #[stratum(short = 'c')]
    pub config: ConfigFile,
    /// Who to greet
    #[stratum(default = "World", short = 'n', validate = "not_blank")]
    pub name: String,
    /// Greeting style
    #[stratum(default = "plain")]
    pub style: Style,
    /// How many times to greet
    #[stratum(default = 1, short = 'r', validate = "gte=1,lte=10")]
    pub repeat: u8,
    /// Extra salutations, tried in order
    #[stratum(validate = "dive,alpha")]
    pub salutations: Vec<String>,
    /// Log level
    #[stratum(default = "warn")]
    pub log_level: Option<Level>,
    /// Delivery settings
    #[stratum(nested)]
    pub delivery: Delivery,
}

/// Settings for how greetings are delivered.
#[derive(Debug, Default, Schema)]
pub struct Delivery {
    /// Punctuation appended to each greeting
    #[stratum(default = "!")]
    pub punctuation: String,
    /// Pause between repeated greetings
    #[stratum(default = "0s", validate = "lte=5s")]
    pub pause: Duration,
}

/// Options used by the binary, with the demo's own types registered.
#[must_use]
pub fn options() -> Options {
    Options::new()
        .env_prefix(ENV_PREFIX)
        .program_name("hello_stratum")
        .register_types(|types| {
            types.add_map_value_type("style", [("plain", Style::Plain), ("shout", Style::Shout)]);
        })
}
