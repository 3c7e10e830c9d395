//! Tests for the environment snapshot and configuration file walker.

use std::path::Path;

use rstest::{fixture, rstest};
use serial_test::serial;
use test_helpers::env;
use test_helpers::files::TempConfig;

use super::env::{EnvSnapshot, apply as apply_env};
use super::file::{ConfigFileField, Location, apply_document, load, locate, parse_document};
use crate::error::ConfigError;
use crate::params::{Param, ParamSet, ValueSource};
use crate::schema::FieldDescriptor;
use crate::types::{ConfigFile, TypeKey, TypeRegistry};
use std::collections::BTreeMap;
use std::time::Duration;

fn register(set: &mut ParamSet, name: &str, key: TypeKey) {
    let field = FieldDescriptor {
        name: name.to_owned(),
        member: name.to_owned(),
        ancestors: Vec::new(),
        type_key: key,
        description: String::new(),
        short: None,
        default: None,
        choices: Vec::new(),
        constraints: None,
        hidden: false,
        optional: false,
    };
    let handler = TypeRegistry::new()
        .handler_for(key)
        .expect("builtin handler should exist");
    set.insert(Param::for_field(&field, handler).expect("param builds"))
        .expect("param registers");
}

#[fixture]
fn params() -> ParamSet {
    let mut set = ParamSet::new("app", true);
    register(&mut set, "conf", TypeKey::of::<ConfigFile>());
    register(&mut set, "port", TypeKey::of::<u16>());
    register(&mut set, "names", TypeKey::of::<Vec<String>>());
    register(&mut set, "sub_timeout", TypeKey::of::<Duration>());
    register(&mut set, "sub_lower_ages", TypeKey::of::<BTreeMap<String, i64>>());
    set
}

fn text(params: &ParamSet, name: &str) -> String {
    params.lookup(name).expect("param exists").value_text()
}

#[rstest]
#[serial]
fn applies_prefixed_variables(mut params: ParamSet) {
    let _scope = env::EnvScope::new_with(|lock| {
        vec![
            lock.set_var("SRCTEST_PORT", "8081"),
            lock.set_var("SRCTEST_SUB_TIMEOUT", "2m"),
            lock.set_var("SRCTEST_NAMES", ""),
        ]
    });
    let snapshot = EnvSnapshot::capture("SRCTEST_");
    let applied = apply_env(&snapshot, &mut params).expect("env applies");
    assert_eq!(applied, 2);
    assert_eq!(text(&params, "port"), "8081");
    assert_eq!(text(&params, "sub_timeout"), "2m0s");
    assert!(!params.is_changed("names"), "empty variables count as unset");
    assert_eq!(
        params.lookup("port").expect("port").source(),
        &ValueSource::Env("SRCTEST_PORT".into())
    );
}

#[rstest]
#[serial]
fn variable_names_match_case_sensitively(mut params: ParamSet) {
    let _scope = env::EnvScope::new_with(|lock| {
        vec![
            lock.set_var("casetest_port", "9000"),
            lock.set_var("CASETEST_port", "9001"),
            lock.set_var("CaseTest_SUB_TIMEOUT", "1m"),
        ]
    });
    let snapshot = EnvSnapshot::capture("CASETEST_");
    assert_eq!(snapshot.lookup("port"), None);
    let applied = apply_env(&snapshot, &mut params).expect("env applies");
    assert_eq!(applied, 0);
    assert!(!params.is_changed("port"));
    assert!(!params.is_changed("sub_timeout"));

    let _upper = env::set_var("CASETEST_PORT", "9002");
    let snapshot = EnvSnapshot::capture("CASETEST_");
    assert_eq!(
        snapshot.lookup("port"),
        Some(("CASETEST_PORT".to_owned(), "9002"))
    );
}

#[rstest]
#[serial]
fn empty_prefix_reads_nothing(mut params: ParamSet) {
    let _guard = env::set_var("PORT", "1");
    let snapshot = EnvSnapshot::capture("");
    assert_eq!(apply_env(&snapshot, &mut params).expect("env applies"), 0);
    assert!(!params.is_changed("port"));
}

#[rstest]
fn walks_nested_mappings_lists_and_maps(mut params: ParamSet) {
    let document = parse_document(
        Path::new("app.yaml"),
        "port: 9000\nnames: [a, \"b,c\"]\nsub:\n  timeout: 90s\n  lower:\n    ages:\n      bob: 30\n      al: 4\n",
    )
    .expect("yaml parses");
    apply_document(&document, Path::new("app.yaml"), &mut params).expect("document applies");
    assert_eq!(text(&params, "port"), "9000");
    assert_eq!(text(&params, "names"), "a,\"b,c\"");
    assert_eq!(text(&params, "sub_timeout"), "1m30s");
    assert_eq!(text(&params, "sub_lower_ages"), "al=4,bob=30");
    assert_eq!(
        params.lookup("port").expect("port").source(),
        &ValueSource::File("app.yaml".into())
    );
}

#[rstest]
fn json_documents_use_the_same_walk(mut params: ParamSet) {
    let document = parse_document(Path::new("app.JSON"), r#"{"port": 7, "sub": {"timeout": null}}"#)
        .expect("json parses");
    apply_document(&document, Path::new("app.json"), &mut params).expect("document applies");
    assert_eq!(text(&params, "port"), "7");
    assert!(!params.is_changed("sub_timeout"));
}

#[rstest]
#[case("colour: red\n", "colour")]
#[case("sub:\n  missing: 1\n", "sub_missing")]
fn unknown_keys_are_rejected(mut params: ParamSet, #[case] yaml: &str, #[case] name: &str) {
    let document = parse_document(Path::new("app.yml"), yaml).expect("yaml parses");
    let err = apply_document(&document, Path::new("app.yml"), &mut params)
        .expect_err("unknown key should fail");
    assert_eq!(err.to_string(), format!("unknown configuration file field: {name}"));
}

#[rstest]
fn mappings_for_scalar_fields_are_rejected(mut params: ParamSet) {
    let document = parse_document(Path::new("app.yml"), "port:\n  a: 1\n").expect("yaml parses");
    let err = apply_document(&document, Path::new("app.yml"), &mut params)
        .expect_err("mapping for a scalar should fail");
    assert!(matches!(err, ConfigError::InvalidValue { .. }));
}

#[test]
fn unsupported_extensions_are_rejected() {
    let err = parse_document(Path::new("app.toml"), "port = 1").expect_err("toml is unsupported");
    assert!(matches!(err, ConfigError::UnsupportedFileType { .. }));
}

#[rstest]
fn missing_default_file_is_skipped(mut params: ParamSet) {
    let location = Location {
        path: "/definitely/not/here.yaml".into(),
        explicit: false,
    };
    assert!(!load(&location, &mut params).expect("missing default is fine"));
    let explicit = Location {
        explicit: true,
        ..location
    };
    let err = load(&explicit, &mut params).expect_err("missing explicit file fails");
    assert!(matches!(err, ConfigError::File { .. }));
}

#[rstest]
fn loads_files_from_disk(mut params: ParamSet) {
    let config = TempConfig::new("app.yaml", "port: 1234\n");
    let location = Location {
        path: config.path().to_path_buf(),
        explicit: true,
    };
    assert!(load(&location, &mut params).expect("file loads"));
    assert_eq!(text(&params, "port"), "1234");
}

#[rstest]
#[serial]
fn locates_by_argument_then_environment_then_default(params: ParamSet) {
    let field = ConfigFileField {
        name: "conf".to_owned(),
        default: Some("default.yaml".to_owned()),
    };
    let no_args = params.parse_args(&[]).expect("empty args parse");
    let empty_env = EnvSnapshot::capture("");
    assert_eq!(
        locate(&field, &no_args, &empty_env),
        Some(Location {
            path: "default.yaml".into(),
            explicit: false,
        })
    );

    let _guard = env::set_var("LOCTEST_CONF", "env.yaml");
    let env_snapshot = EnvSnapshot::capture("LOCTEST_");
    assert_eq!(
        locate(&field, &no_args, &env_snapshot).map(|l| l.path),
        Some("env.yaml".into())
    );

    let with_arg = params
        .parse_args(&["--conf".to_owned(), "arg.yaml".to_owned()])
        .expect("args parse");
    assert_eq!(
        locate(&field, &with_arg, &env_snapshot),
        Some(Location {
            path: "arg.yaml".into(),
            explicit: true,
        })
    );
}
