//! The single-formula install command a dump script is made of.

use std::fmt;

/// Immutable "install formula X with options O" value.
///
/// Rendering is the name followed by the space-joined options, or the bare
/// name when there are none. Options are emitted verbatim; callers hand over
/// tokens that are already shell-safe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallCommand {
    name: String,
    options: Vec<String>,
}

impl InstallCommand {
    pub fn new(name: impl Into<String>, options: Vec<String>) -> Self {
        Self {
            name: name.into(),
            options,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }
}

impl fmt::Display for InstallCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        for option in &self.options {
            write!(f, " {option}")?;
        }
        Ok(())
    }
}
