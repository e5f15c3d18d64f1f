use assert_cmd::Command;

fn libris() -> Command {
    let mut cmd = Command::cargo_bin("libris").unwrap();
    cmd.env_remove("LIBRIS_ENV")
        .env_remove("LIBRIS__SERVER__PORT")
        .env("LIBRIS_CONFIG_DIR", concat!(env!("CARGO_MANIFEST_DIR"), "/../../config"));
    cmd
}

#[test]
fn help_lists_subcommands() {
    let output = libris().arg("--help").output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("serve"));
    assert!(stdout.contains("config"));
}

#[test]
fn config_prints_resolved_settings() {
    let output = libris().arg("config").output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let settings: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(settings["server"]["port"], 3001);
    assert_eq!(settings["environment"], "local");
}

#[test]
fn production_config_disables_demo_data() {
    let output = libris()
        .env("LIBRIS_ENV", "production")
        .arg("config")
        .output()
        .unwrap();
    assert!(output.status.success());

    let settings: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(settings["library"]["seed_demo_data"], false);
    assert_eq!(settings["telemetry"]["log_format"], "json");
}

#[test]
fn unknown_environment_fails() {
    libris().env("LIBRIS_ENV", "qa").arg("config").assert().failure();
}
