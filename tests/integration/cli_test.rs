use std::path::Path;
use std::process::{Command, Output};

const BINARY: &str = env!("CARGO_BIN_EXE_cstools");

/// Run the binary from `cwd` with no CS Tools settings leaking in from the environment.
fn run_cstools_in(cwd: &Path, args: &[&str], env_vars: &[(&str, &str)]) -> Output {
    let mut cmd = Command::new(BINARY);
    cmd.args(args)
        .current_dir(cwd)
        .env("HOME", cwd)
        .env("XDG_CONFIG_HOME", cwd)
        .env_remove("CSTOOLS_URL")
        .env_remove("CSTOOLS_USERNAME")
        .env_remove("CSTOOLS_PASSWORD")
        .env_remove("CSTOOLS_LOG_LEVEL")
        .env_remove("RUST_LOG");
    for (key, value) in env_vars {
        cmd.env(key, value);
    }
    cmd.output().expect("Failed to execute cstools command")
}

fn run_cstools(args: &[&str]) -> Output {
    let dir = tempfile::tempdir().unwrap();
    run_cstools_in(dir.path(), args, &[])
}

fn output_to_string(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr_to_string(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

mod version_command_tests {
    use super::*;

    #[test]
    fn test_version_command_basic() {
        let output = run_cstools(&["version"]);
        let stdout = output_to_string(&output);

        assert!(output.status.success(), "version command should succeed");
        assert!(stdout.contains("cstools"), "output should contain 'cstools'");
        assert!(
            stdout.contains(env!("CARGO_PKG_VERSION")),
            "output should contain version number"
        );
    }

    #[test]
    fn test_version_command_detailed() {
        let output = run_cstools(&["version", "--detailed"]);
        let stdout = output_to_string(&output);

        assert!(output.status.success(), "version --detailed should succeed");
        assert!(stdout.contains("License"));
        assert!(stdout.contains("searchable"));
        assert!(
            !stdout.contains("dependency-checker"),
            "private tools are only listed with --private"
        );
    }
}

mod help_command_tests {
    use super::*;

    #[test]
    fn test_help_command() {
        let output = run_cstools(&["--help"]);
        let stdout = output_to_string(&output);

        assert!(output.status.success(), "--help should succeed");
        assert!(stdout.contains("tools"));
        assert!(stdout.contains("config"));
        assert!(stdout.contains("version"));
    }

    #[test]
    fn test_tools_help_hides_private_tools() {
        let output = run_cstools(&["tools", "--help"]);
        let stdout = output_to_string(&output);

        assert!(output.status.success());
        assert!(stdout.contains("created-objects"));
        assert!(stdout.contains("searchable"));
        assert!(!stdout.contains("dependency-checker"));
        assert!(!stdout.contains("user-search"));
    }

    #[test]
    fn test_tools_help_with_private_flag() {
        let output = run_cstools(&["--private", "tools", "--help"]);
        let stdout = output_to_string(&output);

        assert!(output.status.success());
        assert!(stdout.contains("dependency-checker"));
        assert!(stdout.contains("user-search"));
    }

    #[test]
    fn test_tool_help_shows_version() {
        let output = run_cstools(&["tools", "searchable", "--help"]);
        let stdout = output_to_string(&output);

        assert!(output.status.success());
        assert!(stdout.contains("v1.3.0"));
    }

    #[test]
    fn test_invalid_command() {
        let output = run_cstools(&["not-a-command"]);
        assert!(!output.status.success());
        assert!(!stderr_to_string(&output).is_empty());
    }
}

mod tools_list_tests {
    use super::*;

    #[test]
    fn test_tools_list_public() {
        let output = run_cstools(&["tools", "list"]);
        let stdout = output_to_string(&output);

        assert!(output.status.success(), "tools list needs no cluster");
        assert!(stdout.contains("created-objects"));
        assert!(stdout.contains("Total: 2 tools"));
    }

    #[test]
    fn test_tools_list_private() {
        let output = run_cstools(&["tools", "list", "--private"]);
        let stdout = output_to_string(&output);

        assert!(output.status.success());
        assert!(stdout.contains("user-search"));
        assert!(stdout.contains("Total: 4 tools"));
    }
}

mod config_command_tests {
    use super::*;

    #[test]
    fn test_config_show_masks_password() {
        let dir = tempfile::tempdir().unwrap();
        let output = run_cstools_in(
            dir.path(),
            &["config", "show"],
            &[
                ("CSTOOLS_URL", "https://ts.example.com"),
                ("CSTOOLS_USERNAME", "tsadmin"),
                ("CSTOOLS_PASSWORD", "hunter2"),
            ],
        );
        let stdout = output_to_string(&output);

        assert!(output.status.success());
        assert!(stdout.contains("https://ts.example.com"));
        assert!(stdout.contains("tsadmin"));
        assert!(stdout.contains("****"));
        assert!(!stdout.contains("hunter2"));
    }

    #[test]
    fn test_config_file_in_working_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("cstools.toml"),
            "[thoughtspot]\nurl = \"https://file.example.com\"\n",
        )
        .unwrap();

        let output = run_cstools_in(dir.path(), &["config"], &[]);
        assert!(output.status.success());
        assert!(output_to_string(&output).contains("https://file.example.com"));
    }

    #[test]
    fn test_missing_config_file_argument() {
        let output = run_cstools(&["--config", "/nonexistent/cstools.toml", "config"]);

        assert!(!output.status.success());
        assert!(stderr_to_string(&output).contains("E3003"));
    }

    #[test]
    fn test_invalid_url_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let output = run_cstools_in(
            dir.path(),
            &["config"],
            &[("CSTOOLS_URL", "ts.example.com")],
        );

        assert!(!output.status.success());
        assert!(stderr_to_string(&output).contains("thoughtspot.url"));
    }

    #[test]
    fn test_tool_without_url_fails() {
        let output = run_cstools(&["tools", "created-objects", "list"]);
        let stderr = stderr_to_string(&output);

        assert!(!output.status.success());
        assert!(stderr.contains("thoughtspot.url"));
        assert!(stderr.contains("Suggestion"));
    }
}
