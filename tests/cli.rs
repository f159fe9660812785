use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

fn prnews() -> Command {
    Command::cargo_bin("prnews").unwrap()
}

#[test]
fn help_lists_flags_and_init() {
    prnews()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--days"))
        .stdout(predicate::str::contains("--branch"))
        .stdout(predicate::str::contains("--filter"))
        .stdout(predicate::str::contains("init"));
}

#[test]
fn version_prints_package_version() {
    prnews()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn init_writes_default_config_once() {
    let home = tempfile::tempdir().unwrap();
    let config_home = home.path().join("config");
    let config_file = config_home.join("prnews").join("config.toml");

    prnews()
        .arg("init")
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", &config_home)
        .assert()
        .success()
        .stdout(predicate::str::contains("Writing config.toml"));
    let written = fs::read_to_string(&config_file).unwrap();
    assert!(written.contains("[summary]"));

    fs::write(&config_file, "# mine\n").unwrap();
    prnews()
        .arg("init")
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", &config_home)
        .assert()
        .success()
        .stdout(predicate::str::contains("Skipping config.toml"));
    assert_eq!(fs::read_to_string(&config_file).unwrap(), "# mine\n");

    prnews()
        .args(["init", "--force"])
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", &config_home)
        .assert()
        .success();
    assert!(fs::read_to_string(&config_file).unwrap().contains("[github]"));
}

#[test]
fn rejects_non_numeric_days_flag() {
    prnews()
        .args(["--days", "abc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}
