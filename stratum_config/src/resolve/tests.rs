//! Driver tests over hand-written schemas.

use anyhow::{Result, anyhow};
use figment::Jail;
use rstest::rstest;
use serial_test::serial;
use test_helpers::figment::with_jail;

use super::{Options, Outcome, try_configure};
use crate::error::ConfigError;
use crate::schema::{Member, Schema, Slot};
use crate::types::ConfigFile;

#[derive(Debug, Default)]
struct Sub {
    name: String,
}

impl Schema for Sub {
    fn members(&mut self) -> Vec<Member<'_>> {
        vec![Member::leaf("Name", r#"default:"x""#, Slot::new(&mut self.name))]
    }
}

#[derive(Debug, Default)]
struct Server {
    config: ConfigFile,
    host: String,
    port: i64,
    label: Option<String>,
    sub: Sub,
}

impl Schema for Server {
    fn members(&mut self) -> Vec<Member<'_>> {
        vec![
            Member::leaf("config", r#"desc:"Configuration file""#, Slot::new(&mut self.config)),
            Member::leaf("host", r#"validate:"required""#, Slot::new(&mut self.host)),
            Member::leaf("port", r#"default:"5432""#, Slot::new(&mut self.port)),
            Member::leaf("label", "", Slot::optional(&mut self.label)),
            Member::nested("Sub", "", &mut self.sub),
        ]
    }

    fn substructures(&self) -> Vec<&dyn Schema> {
        vec![&self.sub as &dyn Schema]
    }
}

fn resolve(options: &Options) -> Result<Server, ConfigError> {
    match try_configure::<Server>(options)? {
        Outcome::Resolved(config) => Ok(config.into_inner()),
        other => panic!("expected a resolved configuration, got {other:?}"),
    }
}

/// Run `f` with a scratch working directory and environment.
fn jailed(f: impl FnOnce(&mut Jail) -> Result<()>) {
    if let Err(err) = with_jail(f) {
        panic!("{err:#}");
    }
}

fn template(outcome: Outcome<Server>) -> Result<String> {
    match outcome {
        Outcome::Template(text) => Ok(text),
        other => Err(anyhow!("expected a template, got {other:?}")),
    }
}

fn options(args: &[&str]) -> Options {
    Options::new()
        .program_name("server")
        .env_prefix("SRV_")
        .args(args.iter().copied())
}

#[test]
#[serial]
fn arguments_beat_environment_which_beats_defaults() {
    jailed(|jail| {
        jail.set_env("SRV_PORT", "9000");
        let server = resolve(&options(&["--host=db1"]))?;
        assert_eq!(server.host, "db1");
        assert_eq!(server.port, 9000);
        Ok(())
    });
}

#[test]
#[serial]
fn nested_fields_take_prefixed_flags() {
    jailed(|_| {
        let server = resolve(&options(&["--host", "h", "--sub_name=y"]))?;
        assert_eq!(server.sub.name, "y");
        Ok(())
    });
}

#[test]
#[serial]
fn file_sits_between_defaults_and_environment() {
    jailed(|jail| {
        jail.create_file("server.yaml", "host: from-file\nport: 7000\nsub:\n  name: z\n")?;
        let server = resolve(&options(&["--config", "server.yaml"]))?;
        assert_eq!((server.host.as_str(), server.port), ("from-file", 7000));
        assert_eq!(server.sub.name, "z");

        jail.set_env("SRV_PORT", "7100");
        let server = resolve(&options(&["--config", "server.yaml"]))?;
        assert_eq!(server.port, 7100);

        let server = resolve(&options(&["--config", "server.yaml", "--port", "7200"]))?;
        assert_eq!(server.port, 7200);
        Ok(())
    });
}

#[test]
#[serial]
fn config_file_can_come_from_the_environment() {
    jailed(|jail| {
        jail.create_file("env.json", r#"{"host": "json-host"}"#)?;
        jail.set_env("SRV_CONFIG", "env.json");
        let server = resolve(&options(&[]))?;
        assert_eq!(server.host, "json-host");
        assert_eq!(server.config.path(), std::path::Path::new("env.json"));
        Ok(())
    });
}

#[test]
#[serial]
fn unknown_file_fields_fail() {
    jailed(|jail| {
        jail.create_file("bad.yaml", "foo_bar: 1\n")?;
        let Err(err) = resolve(&options(&["--config", "bad.yaml"])) else {
            return Err(anyhow!("unknown field should fail"));
        };
        assert_eq!(err.to_string(), "unknown configuration file field: foo_bar");
        Ok(())
    });
}

#[rstest]
#[case(false, Some(String::new()))]
#[case(true, None)]
#[serial]
fn optional_fields_follow_nil_policy(#[case] nil: bool, #[case] expected: Option<String>) {
    jailed(|_| {
        let server = resolve(&options(&["--host", "h"]).nil_optionals(nil))?;
        assert_eq!(server.label, expected);
        Ok(())
    });
}

#[test]
#[serial]
fn validation_runs_after_all_sources() {
    jailed(|_| {
        let Err(err) = resolve(&options(&[])) else {
            return Err(anyhow!("host is required"));
        };
        assert_eq!(err.to_string(), "validation failed; host is required");
        Ok(())
    });
}

#[test]
#[serial]
fn help_short_circuits_before_validation() {
    jailed(|_| {
        let Outcome::Help(text) = try_configure::<Server>(&options(&["--help"]))? else {
            return Err(anyhow!("expected help"));
        };
        assert!(text.contains("--sub_name"), "{text}");
        assert!(!text.contains("print_env_template"), "{text}");
        Ok(())
    });
}

#[test]
#[serial]
fn custom_usage_replaces_help() {
    jailed(|_| {
        let opts = options(&["-h"]).usage(|params| format!("{} flags", params.len()));
        let outcome = try_configure::<Server>(&opts)?;
        assert!(matches!(outcome, Outcome::Help(text) if text == "7 flags"));
        Ok(())
    });
}

#[test]
#[serial]
fn env_template_lists_resolved_values() {
    jailed(|_| {
        let text = template(try_configure::<Server>(&options(&[
            "--print_env_template",
            "--port",
            "88",
        ]))?)?;
        assert!(text.starts_with("# Generated with\n# --print_env_template --port 88\n\n"));
        assert!(text.contains("# port\nSRV_PORT=\"88\"\n\n"), "{text}");
        assert!(text.contains("# sub name\nSRV_SUB_NAME=\"x\"\n\n"), "{text}");
        Ok(())
    });
}

#[test]
#[serial]
fn yaml_template_round_trips() {
    jailed(|jail| {
        let text = template(try_configure::<Server>(&options(&[
            "--print_yaml_template",
            "--host",
            "round",
            "--label",
            "trip",
        ]))?)?;
        assert!(!text.contains("config"), "{text}");
        assert!(text.contains("sub:\n\n  # sub name\n  name: \"x\"\n\n"), "{text}");
        jail.create_file("round.yaml", &text)?;
        let server = resolve(&options(&["--config", "round.yaml"]))?;
        assert_eq!(server.host, "round");
        assert_eq!(server.port, 5432);
        assert_eq!(server.label.as_deref(), Some("trip"));
        Ok(())
    });
}

#[test]
#[serial]
fn substructures_are_found_by_type() {
    jailed(|_| {
        let Outcome::Resolved(config) = try_configure::<Server>(&options(&["--host", "h"]))? else {
            return Err(anyhow!("expected a configuration"));
        };
        assert_eq!(config.get::<Sub>().map(|sub| sub.name.as_str()), Some("x"));
        assert!(config.get::<Server>().is_some());
        assert!(config.get::<String>().is_none());
        Ok(())
    });
}

#[test]
#[serial]
fn positional_arguments_are_kept() {
    jailed(|_| {
        let opts = options(&["--host", "h", "one", "two"]);
        let Outcome::Resolved(config) = try_configure::<Server>(&opts)? else {
            return Err(anyhow!("expected a configuration"));
        };
        assert_eq!(config.positional_args(), ["one", "two"]);
        Ok(())
    });
}

#[derive(Default)]
struct TwoFiles {
    first: ConfigFile,
    second: ConfigFile,
}

impl Schema for TwoFiles {
    fn members(&mut self) -> Vec<Member<'_>> {
        vec![
            Member::leaf("first", "", Slot::new(&mut self.first)),
            Member::leaf("second", "", Slot::new(&mut self.second)),
        ]
    }
}

#[test]
fn second_config_file_marker_is_an_authoring_error() {
    let Err(err) = try_configure::<TwoFiles>(&Options::new().args(Vec::<String>::new())) else {
        panic!("two config-file markers should be rejected");
    };
    assert!(matches!(err, ConfigError::DuplicateConfigFile { .. }));
    assert!(err.is_authoring_error());
}

#[test]
fn unicode_arguments_pass_through() {
    let args = super::options::unicode_arguments(["--port".into(), "80".into()])
        .expect("utf-8 arguments convert");
    assert_eq!(args, ["--port", "80"]);
}

#[cfg(unix)]
#[test]
fn non_unicode_arguments_are_input_errors() {
    use std::ffi::OsString;
    use std::os::unix::ffi::OsStringExt;

    let raw = vec![OsString::from("--host"), OsString::from_vec(vec![b'a', 0xff])];
    let Err(err) = super::options::unicode_arguments(raw) else {
        panic!("invalid UTF-8 should be rejected");
    };
    assert!(matches!(err, ConfigError::NonUnicodeArgument { ref argument } if argument == "a\u{fffd}"));
    assert!(!err.is_authoring_error());
    assert_eq!(
        err.to_string(),
        "command-line argument \"a\u{fffd}\" is not valid UTF-8"
    );
}
