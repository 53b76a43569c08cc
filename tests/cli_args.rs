//! Integration tests for CLI argument handling
//!
//! Runs the binary for argument errors and for the offline path, where the
//! configured API is unreachable and brands fall back to the static list.

use std::fs;
use std::process::Command;

use tempfile::TempDir;

/// Helper to run the CLI with given args and capture output
fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_fipequote"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute fipequote")
}

/// Writes a config pointing at a closed local port with a single attempt
fn unreachable_config(dir: &TempDir) -> String {
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
[api]
base_url = "http://127.0.0.1:9"
timeout_secs = 1

[retry]
max_attempts = 1
"#,
    )
    .expect("Failed to write config");
    path.to_string_lossy().into_owned()
}

#[test]
fn test_help_flag_exits_successfully() {
    let output = run_cli(&["--help"]);
    assert!(
        output.status.success(),
        "Expected --help to exit successfully"
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("fipequote"), "Help should mention fipequote");
    for subcommand in ["brands", "models", "years", "price"] {
        assert!(stdout.contains(subcommand), "Help should mention {}", subcommand);
    }
}

#[test]
fn test_invalid_vehicle_prints_error_and_exits() {
    let output = run_cli(&["brands", "--vehicle", "boats"]);
    assert!(!output.status.success(), "Expected invalid vehicle to fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("invalid") || stderr.contains("boats"),
        "Should print error message about invalid vehicle: {}",
        stderr
    );
}

#[test]
fn test_price_requires_all_codes() {
    let output = run_cli(&["price", "21", "4828"]);
    assert!(!output.status.success());
}

#[test]
fn test_invalid_spent_amount_is_rejected() {
    let output = run_cli(&["price", "21", "4828", "2015-1", "--spent", "lots"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid amount"), "stderr: {}", stderr);
}

#[test]
fn test_invalid_config_file_is_reported() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let path = dir.path().join("config.toml");
    fs::write(&path, "[retry]\nmax_attempts = 0\n").expect("Failed to write config");

    let output = run_cli(&["--config", &path.to_string_lossy(), "brands"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error: Invalid configuration"), "stderr: {}", stderr);
}

#[test]
fn test_brands_fall_back_when_api_is_unreachable() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let config = unreachable_config(&dir);

    let output = run_cli(&["--config", &config, "-q", "brands"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stdout.contains("Fiat"), "stdout: {}", stdout);
    assert!(stdout.contains("Toyota"), "stdout: {}", stdout);
    assert!(stderr.contains("offline brand list"), "stderr: {}", stderr);
}

#[test]
fn test_brands_json_reports_fallback_source() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let config = unreachable_config(&dir);

    let output = run_cli(&["--config", &config, "-q", "--json", "brands"]);

    assert!(output.status.success());
    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(json["source"], "fallback");
    assert!(json["entries"].as_array().map_or(false, |e| !e.is_empty()));
}

#[test]
fn test_models_fail_when_api_is_unreachable() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let config = unreachable_config(&dir);

    let output = run_cli(&["--config", &config, "-q", "models", "21"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error: lookup failed"), "stderr: {}", stderr);
}

#[cfg(test)]
mod unit_tests {
    //! Unit tests for CLI parsing that don't require running the binary

    use clap::Parser;
    use fipequote::catalog::VehicleKind;
    use fipequote::cli::{parse_amount_arg, Cli, Command};
    use fipequote::config::Config;

    #[test]
    fn test_cli_years_subcommand() {
        let cli = Cli::parse_from(["fipequote", "years", "21", "4828"]);
        assert_eq!(
            cli.command,
            Command::Years {
                brand: "21".to_string(),
                model: "4828".to_string(),
            }
        );
    }

    #[test]
    fn test_cli_verbose_and_quiet_flags() {
        let cli = Cli::parse_from(["fipequote", "-v", "brands"]);
        assert!(cli.verbose);
        assert!(!cli.quiet);
        let cli = Cli::parse_from(["fipequote", "brands", "--quiet"]);
        assert!(cli.quiet);
    }

    #[test]
    fn test_parse_amount_arg_brl_notation() {
        assert_eq!(parse_amount_arg("R$ 35.000,00").unwrap(), 35_000.0);
        assert!(parse_amount_arg("").is_err());
    }

    #[test]
    fn test_vehicle_override_changes_endpoint() {
        let cli = Cli::parse_from(["fipequote", "brands", "--vehicle", "motorcycles"]);
        let mut config = Config::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.api.vehicle_kind, VehicleKind::Motorcycles);
        assert!(config.api.endpoint().ends_with("/motos"));
    }
}
