//! Filesystem metadata source backed by the Homebrew cellar.
//!
//! Every keg carries an `INSTALL_RECEIPT.json` written at install time. It
//! records the options the formula was installed with, whether a bottle was
//! poured and the runtime dependencies, so one read per keg answers the
//! whole metadata query without re-evaluating any formula definition.

use std::cmp::Ordering;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use duct::cmd;
use serde::Deserialize;

use super::metadata::{FormulaMetadata, MetadataError, MetadataSource};

/// The slice of a keg's INSTALL_RECEIPT.json the dump cares about.
///
/// `built_as_bottle` is what older receipts carry; newer ones record
/// `poured_from_bottle`. Either one means no source build happened.
#[derive(Debug, Deserialize)]
struct InstallReceipt {
    #[serde(default)]
    used_options: Vec<String>,
    #[serde(default)]
    built_as_bottle: bool,
    #[serde(default)]
    poured_from_bottle: bool,
    #[serde(default)]
    runtime_dependencies: Option<Vec<RuntimeDependency>>,
}

#[derive(Debug, Deserialize)]
struct RuntimeDependency {
    full_name: String,
}

pub struct CellarMetadata {
    cellar: PathBuf,
}

impl CellarMetadata {
    pub fn new(cellar: PathBuf) -> Self {
        Self { cellar }
    }

    /// Locate the cellar: `HOMEBREW_CELLAR` wins, otherwise ask brew itself.
    pub fn discover() -> Result<Self> {
        if let Ok(path) = env::var("HOMEBREW_CELLAR") {
            return Ok(Self::new(PathBuf::from(path)));
        }

        which::which("brew").context("brew is not in PATH and HOMEBREW_CELLAR is not set")?;
        let cellar = cmd!("brew", "--cellar")
            .read()
            .context("Failed to query 'brew --cellar'")?;
        Ok(Self::new(PathBuf::from(cellar.trim())))
    }

    /// Newest keg directory of a formula's rack, by version name.
    fn newest_keg(&self, name: &str) -> Result<PathBuf, MetadataError> {
        let rack = self.cellar.join(name);
        let mut kegs: Vec<PathBuf> = fs::read_dir(&rack)
            .map_err(|_| MetadataError::NoKeg(name.to_string()))?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_dir())
            .collect();
        kegs.sort_by(|a, b| version_order(&keg_name(a), &keg_name(b)));
        kegs.pop()
            .ok_or_else(|| MetadataError::NoKeg(name.to_string()))
    }
}

fn keg_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Orders keg version names so that `1.9` comes before `1.10`: components
/// split on `.`, `_` and `-` compare numerically when both sides are
/// numbers, lexically otherwise. A version with extra trailing components
/// (a revision like `2.4.1_1`) sorts after its base.
fn version_order(a: &str, b: &str) -> Ordering {
    let mut left = a.split(['.', '_', '-']);
    let mut right = b.split(['.', '_', '-']);
    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) => {
                let ord = match (l.parse::<u64>(), r.parse::<u64>()) {
                    (Ok(l), Ok(r)) => l.cmp(&r),
                    _ => l.cmp(r),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}

impl MetadataSource for CellarMetadata {
    fn installed(&self) -> Result<Vec<String>> {
        if !self.cellar.is_dir() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        let entries = fs::read_dir(&self.cellar)
            .with_context(|| format!("Failed to read cellar {}", self.cellar.display()))?;
        for entry in entries {
            let entry = entry?;
            if !entry.path().is_dir() {
                continue;
            }
            // A rack whose name is not valid UTF-8 cannot name a formula;
            // report it instead of carrying a mangled name into the dump.
            match entry.file_name().to_str() {
                Some(name) if !name.starts_with('.') => names.push(name.to_string()),
                Some(_) => {}
                None => super::error(&format!(
                    "Skipping rack with non-UTF-8 name {:?}",
                    entry.file_name()
                )),
            }
        }
        names.sort();
        Ok(names)
    }

    fn load(&self, name: &str) -> Result<FormulaMetadata, MetadataError> {
        let receipt_path = self.newest_keg(name)?.join("INSTALL_RECEIPT.json");
        if !receipt_path.is_file() {
            return Err(MetadataError::MissingReceipt(name.to_string()));
        }

        let raw =
            fs::read_to_string(&receipt_path).map_err(|source| MetadataError::UnreadableReceipt {
                name: name.to_string(),
                source,
            })?;
        let receipt: InstallReceipt =
            serde_json::from_str(&raw).map_err(|source| MetadataError::MalformedReceipt {
                name: name.to_string(),
                source,
            })?;

        Ok(FormulaMetadata {
            deps: receipt
                .runtime_dependencies
                .unwrap_or_default()
                .into_iter()
                .map(|dep| dep.full_name)
                .collect(),
            used_options: receipt.used_options,
            from_bottle: receipt.poured_from_bottle || receipt.built_as_bottle,
        })
    }
}
