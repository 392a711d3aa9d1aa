//! Application logic for the pgpow CLI.
//!
//! This module contains the command runners separated from the main entry
//! point to enable testing. Parsed arguments are converted into the
//! parameter types of [`types`], merged with the loaded configuration, and
//! handed to the runners of [`run`].

mod convert;
mod helpers;
mod run;
mod types;

pub use convert::{
    FormatArgs, color_mode, duration_order, format_params, granted_filter, template_request,
    utilization_order
};
pub use helpers::{emphasis_enabled, read_input, read_query, wrap_explain};
pub use run::{execute, run_format, run_listing, run_template, run_wrap};
pub use types::{FormatParams, TemplateRequest, WrapParams};
