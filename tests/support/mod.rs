#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

use tickit::storage::DEFAULT_STORAGE_KEY;

/// Scratch store directory plus an isolated config location
pub struct TestStore {
    dir: TempDir,
}

impl TestStore {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn store_dir(&self) -> PathBuf {
        self.dir.path().join("store")
    }

    pub fn data_file(&self) -> PathBuf {
        self.store_dir().join(format!("{DEFAULT_STORAGE_KEY}.json"))
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("tickit.toml")
    }

    pub fn write_config(&self, contents: &str) -> std::io::Result<PathBuf> {
        let path = self.config_path();
        fs::write(&path, contents)?;
        Ok(path)
    }

    pub fn write_data(&self, contents: &str) -> std::io::Result<PathBuf> {
        fs::create_dir_all(self.store_dir())?;
        let path = self.data_file();
        fs::write(&path, contents)?;
        Ok(path)
    }

    pub fn read_data(&self) -> Result<Value, Box<dyn std::error::Error>> {
        let raw = fs::read_to_string(self.data_file())?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Platform config dir as seen by `tickit` run through [`TestStore::cmd`]
    pub fn xdg_config_home(&self) -> PathBuf {
        self.dir.path().join("xdg-config")
    }

    /// `tickit` pointed at this store, with env overrides cleared and the
    /// home/config dirs moved into the tempdir so a user's own config is never read
    pub fn cmd(&self) -> Command {
        let mut cmd = tickit_cmd();
        cmd.current_dir(self.path())
            .env_remove("TICKIT_CONFIG")
            .env_remove("RUST_LOG")
            .env("HOME", self.path())
            .env("XDG_CONFIG_HOME", self.xdg_config_home())
            .env("TICKIT_STORE", self.store_dir());
        cmd
    }

    /// Run with `--json` and parse the envelope from stdout
    pub fn json(&self, args: &[&str]) -> Result<Value, Box<dyn std::error::Error>> {
        let output = self.cmd().arg("--json").args(args).output()?;
        Ok(serde_json::from_slice(&output.stdout)?)
    }

    /// Add a task and return its id
    pub fn add(&self, args: &[&str]) -> Result<String, Box<dyn std::error::Error>> {
        let mut full = vec!["add"];
        full.extend_from_slice(args);
        let value = self.json(&full)?;
        value["data"]["task"]["id"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| format!("missing task id in {value}").into())
    }
}

pub fn tickit_cmd() -> Command {
    Command::cargo_bin("tickit").expect("binary")
}
