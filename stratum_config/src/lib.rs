//! Layered configuration for command-line programs.
//!
//! A configuration is a plain struct implementing [`Schema`], usually via
//! `#[derive(Schema)]`. Each leaf field becomes a command-line flag named
//! after its snake-cased path, an environment variable with a caller-chosen
//! prefix and a key in an optional JSON or YAML file. Values are taken from
//! the declared default, then the file, then the environment, then the
//! command line, with later sources overriding earlier ones. The populated
//! struct is validated before it is returned.
//!
//! ```rust,no_run
//! use stratum_config::{ConfigFile, Options, Schema, configure};
//!
//! #[derive(Debug, Default, Schema)]
//! struct Database {
//!     /// Configuration file
//!     #[stratum(short = 'c')]
//!     config: ConfigFile,
//!     /// Server host
//!     #[stratum(validate = "required")]
//!     host: String,
//!     /// Server port
//!     #[stratum(default = 5432)]
//!     port: u16,
//! }
//!
//! let db = configure::<Database>(&Options::new().env_prefix("DB_"));
//! println!("{}:{}", db.host, db.port);
//! ```

pub use stratum_config_macros::Schema;

mod error;
pub mod naming;
mod params;
mod resolve;
mod schema;
mod sources;
mod tags;
mod template;
pub mod types;
mod validate;

pub use error::{ConfigError, ConfigResult, FieldViolation, ValidationErrors};
pub use params::{HELP, PRINT_ENV_TEMPLATE, PRINT_YAML_TEMPLATE, Param, ParamSet, ValueSource};
pub use resolve::{Configuration, Options, Outcome, configure, try_configure};
pub use schema::{
    FieldDescriptor, Flow, Member, MemberKind, Schema, Slot, descriptors, find_field, walk,
};
pub use tags::{TagError, Tags, quote};
pub use types::{
    ConfigFile, ConfigValue, FieldValue, IpMask, IpNetwork, Shape, TypeKey, TypeRegistry,
    ValueError,
};
pub use validate::{RuleContext, RuleOutcome, Validator};
