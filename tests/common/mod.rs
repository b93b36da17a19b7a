use std::fs;
use std::path::Path;
use std::process::Command;

use anyhow::Result;
use tempfile::TempDir;

/// A throwaway Homebrew cellar the dump binary is pointed at via
/// `HOMEBREW_CELLAR`.
pub struct TestCellar {
    temp_dir: TempDir,
}

pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl TestCellar {
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp_dir: tempfile::tempdir()?,
        })
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create a keg with an install receipt.
    pub fn add_formula(
        &self,
        name: &str,
        deps: &[&str],
        options: &[&str],
        poured_from_bottle: bool,
    ) -> Result<()> {
        let keg = self.path().join(name).join("1.0.0");
        fs::create_dir_all(&keg)?;

        let receipt = serde_json::json!({
            "used_options": options,
            "poured_from_bottle": poured_from_bottle,
            "runtime_dependencies": deps
                .iter()
                .map(|dep| serde_json::json!({"full_name": dep, "version": "1.0.0"}))
                .collect::<Vec<_>>(),
        });
        fs::write(
            keg.join("INSTALL_RECEIPT.json"),
            serde_json::to_string_pretty(&receipt)?,
        )?;
        Ok(())
    }

    /// Create a rack with a keg but no receipt, so metadata loading fails.
    pub fn add_broken_formula(&self, name: &str) -> Result<()> {
        fs::create_dir_all(self.path().join(name).join("1.0.0"))?;
        Ok(())
    }
}

pub fn run_dump(cellar: &TestCellar, args: &[&str]) -> Result<CommandOutput> {
    let output = Command::new(env!("CARGO_BIN_EXE_brew-dump"))
        .args(args)
        .env("HOMEBREW_CELLAR", cellar.path())
        .output()?;

    Ok(CommandOutput {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        exit_code: output.status.code().unwrap_or(-1),
    })
}

/// Run a generated script with /bin/sh and the given arguments.
pub fn run_script(script: &str, args: &[&str]) -> Result<CommandOutput> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("brew-reinstall");
    fs::write(&path, script)?;

    let output = Command::new("sh").arg(&path).args(args).output()?;
    Ok(CommandOutput {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        exit_code: output.status.code().unwrap_or(-1),
    })
}

/// Run a generated script with a stub `brew` on PATH that exits with
/// `brew_exit`, so force-mode runs never touch a real Homebrew.
pub fn run_script_with_brew(script: &str, args: &[&str], brew_exit: i32) -> Result<CommandOutput> {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir()?;
    let brew = dir.path().join("brew");
    fs::write(
        &brew,
        format!("#!/bin/sh\necho \"stub-brew $@\"\nexit {brew_exit}\n"),
    )?;
    fs::set_permissions(&brew, fs::Permissions::from_mode(0o755))?;

    let path = dir.path().join("brew-reinstall");
    fs::write(&path, script)?;

    let search_path = format!(
        "{}:{}",
        dir.path().display(),
        std::env::var("PATH").unwrap_or_default()
    );
    let output = Command::new("sh")
        .arg(&path)
        .args(args)
        .env("PATH", search_path)
        .output()?;
    Ok(CommandOutput {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        exit_code: output.status.code().unwrap_or(-1),
    })
}
