//! Command-line surface built on a `clap` command assembled at runtime.

use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use tracing::debug;

use super::{HELP, Param, ParamSet, ValueSource};
use crate::error::ConfigResult;
use crate::types::Shape;

/// Id of the hidden argument collecting positional arguments.
const POSITIONAL: &str = "__positional";

/// Raw values captured from one parse of the command line.
#[derive(Debug, Default)]
pub(crate) struct ParsedArgs {
    pub(crate) help: bool,
    values: Vec<(String, Vec<String>)>,
    pub(crate) positional: Vec<String>,
}

impl ParsedArgs {
    /// Last occurrence of `name`, if it was given.
    pub(crate) fn last_value(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(param, _)| param == name)
            .and_then(|(_, raws)| raws.last())
            .map(String::as_str)
    }

    fn from_matches(params: &ParamSet, matches: &ArgMatches) -> Self {
        let values = params
            .iter()
            .filter_map(|param| {
                let raws: Vec<String> = matches
                    .try_get_many::<String>(param.name())
                    .ok()
                    .flatten()?
                    .cloned()
                    .collect();
                Some((param.name().to_owned(), raws))
            })
            .collect();
        let positional = matches
            .try_get_many::<String>(POSITIONAL)
            .ok()
            .flatten()
            .map(|vals| vals.cloned().collect())
            .unwrap_or_default();
        Self {
            help: matches
                .try_get_one::<bool>(HELP)
                .ok()
                .flatten()
                .copied()
                .unwrap_or(false),
            values,
            positional,
        }
    }
}

impl Param {
    fn to_arg(&self) -> Arg {
        let mut help = self.usage.clone();
        if let Some(default) = &self.default_text {
            help.push_str(&format!(" (default {default})"));
        }
        let arg = Arg::new(self.name.clone())
            .long(self.name.clone())
            .help(help)
            .hide(self.hidden)
            .value_parser(value_parser!(String))
            .action(ArgAction::Append);
        let arg = match self.short {
            Some(short) => arg.short(short),
            None => arg,
        };
        match self.shape() {
            Shape::Flag => arg
                .num_args(0..=1)
                .require_equals(true)
                .default_missing_value("true"),
            Shape::Scalar | Shape::List | Shape::Map => arg
                .num_args(1)
                .allow_hyphen_values(true)
                .value_name(self.type_label().to_owned()),
        }
    }
}

impl ParamSet {
    /// `clap` command exposing every registered parameter as a long flag.
    ///
    /// Boolean parameters accept `--name` or `--name=false`; every other
    /// parameter takes one value per occurrence. Remaining arguments are
    /// collected as positional arguments.
    #[must_use]
    pub fn command(&self) -> Command {
        let mut help = Arg::new(HELP)
            .long(HELP)
            .action(ArgAction::SetTrue)
            .help("Show this help and exit");
        if self.short_help {
            help = help.short('h');
        }
        let command = Command::new(self.program.clone())
            .disable_help_flag(true)
            .disable_version_flag(true)
            .arg(help);
        self.params
            .iter()
            .fold(command, |command, param| command.arg(param.to_arg()))
            .arg(
                Arg::new(POSITIONAL)
                    .num_args(1..)
                    .action(ArgAction::Append)
                    .value_parser(value_parser!(String))
                    .hide(true),
            )
    }

    /// Help text for every visible parameter.
    #[must_use]
    pub fn render_help(&self) -> String {
        self.command().render_help().to_string()
    }

    /// Parse `args` (program name excluded) without applying any value.
    pub(crate) fn parse_args(&self, args: &[String]) -> ConfigResult<ParsedArgs> {
        let argv = std::iter::once(self.program.clone()).chain(args.iter().cloned());
        let matches = self.command().try_get_matches_from(argv)?;
        let parsed = ParsedArgs::from_matches(self, &matches);
        debug!(
            given = parsed.values.len(),
            positional = parsed.positional.len(),
            "parsed command-line arguments"
        );
        Ok(parsed)
    }

    /// Apply every value captured in `parsed`, in registration order.
    pub(crate) fn apply_args(&mut self, parsed: &ParsedArgs) -> ConfigResult<usize> {
        for (name, raws) in &parsed.values {
            self.set_all(name, raws, ValueSource::Args)?;
        }
        Ok(parsed.values.len())
    }
}
