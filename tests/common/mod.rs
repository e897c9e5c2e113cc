#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

use tempfile::TempDir;

pub const DEMO_EMAIL: &str = "demo@helpdesk.local";
pub const DEMO_PASSWORD: &str = "demo";

/// Runs the helpdesk binary against the local backend in an isolated home
pub struct HelpdeskTest {
    pub temp_dir: TempDir,
    binary_path: &'static str,
}

impl HelpdeskTest {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        HelpdeskTest {
            temp_dir,
            binary_path: env!("CARGO_BIN_EXE_helpdesk"),
        }
    }

    /// A test home with the demo user already signed in
    pub fn signed_in() -> Self {
        let test = Self::new();
        test.run_success(&["auth", "login", DEMO_EMAIL, "--password", DEMO_PASSWORD]);
        test
    }

    pub fn home(&self) -> PathBuf {
        self.temp_dir.path().to_path_buf()
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(self.binary_path);
        cmd.args(args)
            .current_dir(self.temp_dir.path())
            .env("HELPDESK_HOME", self.temp_dir.path())
            .env("HELPDESK_BACKEND", "local")
            .env_remove("HELPDESK_BACKEND_URL")
            .env_remove("HELPDESK_ANON_KEY")
            .env_remove("HELPDESK_PASSWORD")
            .env_remove("HELPDESK_LOG");
        cmd
    }

    pub fn run(&self, args: &[&str]) -> Output {
        self.command(args)
            .output()
            .expect("Failed to execute helpdesk command")
    }

    pub fn run_with_env(&self, args: &[&str], key: &str, value: &str) -> Output {
        self.command(args)
            .env(key, value)
            .output()
            .expect("Failed to execute helpdesk command")
    }

    pub fn run_success(&self, args: &[&str]) -> String {
        let output = self.run(args);
        if !output.status.success() {
            panic!(
                "Command {:?} failed with status {:?}\nstdout: {}\nstderr: {}",
                args,
                output.status,
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
        }
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    pub fn run_failure(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            !output.status.success(),
            "Expected command {:?} to fail, but it succeeded",
            args
        );
        String::from_utf8_lossy(&output.stderr).to_string()
    }

    /// Run a command with `--json` appended and parse stdout
    pub fn run_json(&self, args: &[&str]) -> serde_json::Value {
        let mut args = args.to_vec();
        args.push("--json");
        let stdout = self.run_success(&args);
        serde_json::from_str(&stdout)
            .unwrap_or_else(|e| panic!("invalid JSON from {:?}: {}\n{}", args, e, stdout))
    }

    pub fn storage_file(&self, key: &str) -> PathBuf {
        self.temp_dir.path().join("storage").join(format!("{key}.json"))
    }

    pub fn read_config(&self) -> String {
        fs::read_to_string(self.temp_dir.path().join("config.yaml"))
            .expect("Failed to read config file")
    }
}
