//! End-to-end tests running the demo binary.

use std::path::Path;

use anyhow::Result;
use assert_cmd::Command;
use rstest::rstest;

fn hello() -> Result<Command> {
    let mut cmd = Command::cargo_bin("hello_stratum")?;
    for var in ["HELLO_NAME", "HELLO_REPEAT", "HELLO_CONFIG", "HELLO_STYLE"] {
        cmd.env_remove(var);
    }
    Ok(cmd)
}

fn stdout_of(cmd: &mut Command) -> Result<String> {
    let output = cmd.output()?;
    anyhow::ensure!(output.status.success(), "command failed: {output:?}");
    Ok(String::from_utf8(output.stdout)?)
}

#[test]
fn greets_the_world_by_default() -> Result<()> {
    hello()?.assert().success().stdout("Hello, World!\n");
    Ok(())
}

#[rstest]
#[case(&["--help"])]
#[case(&["-h"])]
fn help_exits_cleanly(#[case] args: &[&str]) -> Result<()> {
    let text = stdout_of(hello()?.args(args))?;
    assert!(text.contains("--name"), "{text}");
    assert!(text.contains("Who to greet"), "{text}");
    assert!(!text.contains("print_yaml_template"), "{text}");
    Ok(())
}

#[test]
fn env_template_reflects_overrides() -> Result<()> {
    let text = stdout_of(
        hello()?
            .env("HELLO_NAME", "Env")
            .args(["--print_env_template", "--repeat", "3"]),
    )?;
    assert!(text.starts_with("# Generated with\n# --print_env_template --repeat 3\n\n"), "{text}");
    assert!(text.contains("# Who to greet\nHELLO_NAME=\"Env\"\n\n"), "{text}");
    assert!(text.contains("HELLO_REPEAT=\"3\""), "{text}");
    assert!(text.contains("# Greeting style (plain|shout)\nHELLO_STYLE=\"plain\""), "{text}");
    Ok(())
}

#[test]
fn arguments_override_environment_and_file() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let file = dir.path().join("hello.yaml");
    std::fs::write(&file, "name: File\nrepeat: 2\ndelivery:\n  punctuation: \"?\"\n")?;
    let config = file.to_string_lossy().into_owned();

    let from_file = stdout_of(hello()?.args(["-c", &config]))?;
    assert_eq!(from_file, "Hello, File?\nHello, File?\n");

    let from_env = stdout_of(hello()?.env("HELLO_NAME", "Env").args(["-c", &config]))?;
    assert_eq!(from_env, "Hello, Env?\nHello, Env?\n");

    let from_args = stdout_of(
        hello()?
            .env("HELLO_NAME", "Env")
            .args(["-c", &config, "--name=Arg", "--repeat", "1"]),
    )?;
    assert_eq!(from_args, "Hello, Arg?\n");
    Ok(())
}

#[test]
fn yaml_template_feeds_back_as_a_file() -> Result<()> {
    let template = stdout_of(hello()?.args([
        "--print_yaml_template",
        "--name",
        "Tmpl",
        "--style",
        "shout",
        "--salutations",
        "Hi,Hey",
    ]))?;
    assert!(template.contains("delivery:\n\n  # Punctuation appended to each greeting\n"), "{template}");
    let dir = tempfile::tempdir()?;
    let file = dir.path().join("round.yaml");
    std::fs::write(&file, &template)?;
    let text = stdout_of(hello()?.arg("--config").arg(Path::new(&file)).args(["--repeat", "2"]))?;
    assert_eq!(text, "HI, TMPL!\nHEY, TMPL!\n");
    Ok(())
}

#[rstest]
#[case(&["--repeat", "11"], "error parsing configuration: validation failed; repeat must be 10 or less")]
#[case(&["--name", " "], "name must contain at least 1 non-whitespace character")]
#[case(&["--salutations", "Hi,G'day"], "salutations[1] can only contain alphabetic characters")]
#[case(&["--style", "loud"], "for style from command line")]
#[case(&["--delivery_pause", "1m"], "delivery_pause must be 5s or less")]
#[case(&["--nope"], "error parsing configuration:")]
fn failures_exit_with_status_one(#[case] args: &[&str], #[case] message: &str) -> Result<()> {
    let output = hello()?.args(args).output()?;
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains(message), "{stderr}");
    Ok(())
}

#[cfg(unix)]
#[test]
fn non_unicode_arguments_exit_with_status_one() -> Result<()> {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let output = hello()?
        .arg("--name")
        .arg(OsStr::from_bytes(b"\xff"))
        .output()?;
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("error parsing configuration: command-line argument"),
        "{stderr}"
    );
    assert!(!stderr.contains("panicked"), "{stderr}");
    Ok(())
}
