use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// A `shline` invocation isolated from the caller's config and log settings.
fn shline(workdir: &TempDir) -> Result<Command> {
    let mut cmd = Command::cargo_bin("shline")?;
    cmd.current_dir(workdir.path())
        .env_remove("SHLINE_CONFIG")
        .env_remove("RUST_LOG")
        .env("XDG_CONFIG_HOME", workdir.path())
        .env("NO_COLOR", "1");
    Ok(cmd)
}

#[test]
fn help_command_succeeds() -> Result<()> {
    let temp_dir = TempDir::new()?;
    shline(&temp_dir)?
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("prepare"));
    Ok(())
}

#[test]
fn prepare_quotes_for_bash() -> Result<()> {
    let temp_dir = TempDir::new()?;
    shline(&temp_dir)?
        .args(["prepare", "--shell", "/bin/bash", "--cwd", "/tmp/work dir"])
        .args(["-e", "A=1", "-u", "B"])
        .args(["--", "node", "-e", "console.log('hi')"])
        .assert()
        .success()
        .stdout(
            "cd '/tmp/work dir' && env 'A=1' -u 'B' 'node' '-e' \
             'console.log('\"'\"'hi'\"'\"')'\n",
        )
        .stderr("");
    Ok(())
}

#[test]
fn prepare_for_powershell_and_cmd() -> Result<()> {
    let temp_dir = TempDir::new()?;
    shline(&temp_dir)?
        .args(["prepare", "--shell", "pwsh.exe", "--cwd", r"C:\work"])
        .args(["--", "node", "a b"])
        .assert()
        .success()
        .stdout("cd 'C:\\work'; & 'node' 'a b'\n");

    shline(&temp_dir)?
        .args(["prepare", "--shell", r"C:\Windows\System32\cmd.exe", "-e", "A=1&2"])
        .args(["--", "echo", "100%"])
        .assert()
        .success()
        .stdout("cmd /C \"set \"A=1^&2\" && echo 100^%\"\n");
    Ok(())
}

#[test]
fn unknown_shell_warns_and_joins_raw() -> Result<()> {
    let temp_dir = TempDir::new()?;
    shline(&temp_dir)?
        .args(["prepare", "--shell", "fish", "--", "echo", "a b"])
        .assert()
        .success()
        .stdout("echo a b\n")
        .stderr(predicate::str::contains(
            "warning: Unknown shell, could not escape arguments: fish",
        ));
    Ok(())
}

#[test]
fn strict_mode_refuses_unquoted_output() -> Result<()> {
    let temp_dir = TempDir::new()?;
    shline(&temp_dir)?
        .args(["prepare", "--strict", "--shell", "fish", "--", "echo", "a b"])
        .assert()
        .failure()
        .stdout("")
        .stderr(predicate::str::contains("refusing to emit command line"));

    shline(&temp_dir)?
        .args(["prepare", "--strict", "--shell", "bash", "-e", "BAD NAME=1", "--", "true"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a portable identifier"));
    Ok(())
}

#[test]
fn cmd_line_breaks_are_flattened_with_a_warning() -> Result<()> {
    let temp_dir = TempDir::new()?;
    shline(&temp_dir)?
        .args(["prepare", "--shell", "cmd.exe", "--", "echo", "a\n&calc"])
        .assert()
        .success()
        .stdout("echo a^ ^&calc\n")
        .stderr(predicate::str::contains("warning: cmd cannot pass line breaks"));

    shline(&temp_dir)?
        .args(["prepare", "--strict", "--shell", "cmd.exe", "--", "echo", "a\r\nb"])
        .assert()
        .failure()
        .stdout("");
    Ok(())
}

#[test]
fn json_output_carries_dialect_and_diagnostics() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output = shline(&temp_dir)?
        .args(["prepare", "--format", "json", "--shell", "/bin/zsh"])
        .args(["-e", "1X=bad", "--", "ls", "-la"])
        .output()?;
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(value["command"], "env 'ls' '-la'");
    assert_eq!(value["dialect"], "posix");
    assert_eq!(value["diagnostics"][0]["kind"], "invalid_env_name");
    assert_eq!(value["diagnostics"][0]["name"], "1X");
    Ok(())
}

#[test]
fn quote_renders_each_mode() -> Result<()> {
    let temp_dir = TempDir::new()?;
    shline(&temp_dir)?
        .args(["quote", "--dialect", "powershell", "--mode", "escape", "--", "a b", "$x"])
        .assert()
        .success()
        .stdout("a` b `$x\n");

    shline(&temp_dir)?
        .args(["quote", "--dialect", "bash", "--", "it's", "-n"])
        .assert()
        .success()
        .stdout("'it'\"'\"'s' '-n'\n");
    Ok(())
}

#[test]
fn quote_rejects_strong_mode_for_cmd() -> Result<()> {
    let temp_dir = TempDir::new()?;
    shline(&temp_dir)?
        .args(["quote", "--dialect", "cmd", "--mode", "strong", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cmd does not support strong quoting"));
    Ok(())
}

#[test]
fn config_file_supplies_shell_and_environment() -> Result<()> {
    let temp_dir = TempDir::new()?;
    fs::write(
        temp_dir.path().join("shline.toml"),
        "shell = \"pwsh\"\nunset = [\"OLD\"]\n\n[env]\nX = \"1\"\n",
    )?;

    shline(&temp_dir)?
        .args(["prepare", "--", "ls"])
        .assert()
        .success()
        .stdout("${env:X}='1'; Remove-Item Env:OLD -ErrorAction SilentlyContinue; & 'ls'\n");
    Ok(())
}

#[test]
fn config_environment_keeps_file_order() -> Result<()> {
    let temp_dir = TempDir::new()?;
    fs::write(
        temp_dir.path().join("shline.toml"),
        "shell = \"/bin/bash\"\n\n[env]\nZED = \"1\"\nALPHA = \"2\"\nMIDDLE = \"3\"\n",
    )?;

    shline(&temp_dir)?
        .args(["prepare", "--", "ls"])
        .assert()
        .success()
        .stdout("env 'ZED=1' 'ALPHA=2' 'MIDDLE=3' 'ls'\n");
    Ok(())
}

#[test]
fn explicit_missing_config_is_an_error() -> Result<()> {
    let temp_dir = TempDir::new()?;
    shline(&temp_dir)?
        .args(["--config", "absent.toml", "prepare", "--shell", "bash", "--", "ls"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
    Ok(())
}

#[cfg(unix)]
#[test]
fn run_delivers_arguments_env_and_directory_intact() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let workdir = temp_dir.path().join("dir with 'quotes' and $dollar");
    fs::create_dir(&workdir)?;
    let canonical = workdir.canonicalize()?;

    shline(&temp_dir)?
        .args(["run", "--shell", "/bin/sh"])
        .arg("--cwd")
        .arg(&workdir)
        .args(["-e", "GREETING=it's $HOME `id`"])
        .args(["--", "sh", "-c", "printf '%s|' \"$GREETING\" \"$1\"; pwd -P", "argv0"])
        .arg("a \"b\" ; c")
        .assert()
        .success()
        .stdout(format!(
            "it's $HOME `id`|a \"b\" ; c|{}\n",
            canonical.display()
        ));
    Ok(())
}

#[cfg(unix)]
#[test]
fn run_propagates_exit_status() -> Result<()> {
    let temp_dir = TempDir::new()?;
    shline(&temp_dir)?
        .args(["run", "--shell", "/bin/sh", "--", "sh", "-c", "exit 7"])
        .assert()
        .code(7);
    Ok(())
}
