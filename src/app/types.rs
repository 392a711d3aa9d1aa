//! Application types for CLI commands.
//!
//! Parameters are resolved from the command line and the loaded
//! configuration before any command runs, so the runners in
//! [`super::run`] never look at either.

use std::path::PathBuf;

use crate::{
    config::ColorMode,
    explain::SeverityPolicy,
    templates::{Category, TemplateOptions}
};

/// Parameters for `explain format`.
///
/// # Example
///
/// ```
/// use pgpow::{app::FormatParams, config::ColorMode, explain::SeverityPolicy};
///
/// let params = FormatParams {
///     input:  None,
///     color:  ColorMode::Never,
///     policy: SeverityPolicy::default()
/// };
/// assert!(params.reads_stdin());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FormatParams {
    /// Plan file; `None` or `-` means stdin.
    pub input:  Option<PathBuf>,
    pub color:  ColorMode,
    pub policy: SeverityPolicy
}

impl FormatParams {
    pub fn reads_stdin(&self) -> bool {
        self.input
            .as_deref()
            .is_none_or(|path| path.as_os_str() == "-")
    }
}

/// Parameters for `explain query`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrapParams {
    /// SQL given on the command line; stdin is read when absent.
    pub query: Option<String>,
    /// Request `FORMAT JSON` output from the server.
    pub json:  bool
}

/// A catalog template selected by the `query` subcommands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateRequest {
    pub category: Category,
    pub name:     &'static str,
    pub options:  TemplateOptions
}
