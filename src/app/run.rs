//! Command runners.
//!
//! Each runner takes fully resolved parameters and writes its result to the
//! given writer, which is stdout in the binary and a buffer in tests.

use std::{
    env,
    io::{self, IsTerminal, Write}
};

use tracing::debug;

use super::{
    convert::{FormatArgs, format_params, template_request},
    helpers::{emphasis_enabled, read_input, read_query, wrap_explain},
    types::{FormatParams, TemplateRequest, WrapParams}
};
use crate::{
    cli::{Commands, ExplainCommand},
    config::Config,
    error::{AppResult, output_write_error, usage_error},
    explain::{RenderOptions, Renderer, parse_plan},
    templates::{listing, lookup}
};

/// Highlight a text plan. `emphasis` is already resolved against the
/// destination.
pub fn run_format<W: Write>(params: &FormatParams, emphasis: bool, out: &mut W) -> AppResult<()> {
    let input = read_input(params.input.as_deref())?;
    let analysis = parse_plan(&input, &params.policy);
    debug!(
        event = "format",
        nodes = analysis.plan.forest.len(),
        roots = analysis.plan.forest.roots().len(),
        emphasis
    );

    if emphasis {
        colored::control::set_override(true);
    }
    Renderer::new(RenderOptions {
        emphasis
    })
    .write_to(analysis.document(), out)
    .map_err(output_write_error)
}

pub fn run_wrap<W: Write>(params: WrapParams, out: &mut W) -> AppResult<()> {
    let sql = read_query(params.query)?;
    debug!(event = "wrap", json = params.json, bytes = sql.len());
    out.write_all(wrap_explain(&sql, params.json).as_bytes())
        .map_err(output_write_error)
}

pub fn run_template<W: Write>(request: &TemplateRequest, out: &mut W) -> AppResult<()> {
    let template = lookup(request.category, request.name).ok_or_else(|| {
        usage_error(format!(
            "Unknown query '{} {}'",
            request.category, request.name
        ))
    })?;
    debug!(
        event = "template",
        category = %request.category,
        name = request.name,
        limit = ?template.effective_limit(request.options.limit)
    );
    writeln!(out, "{}", template.render(&request.options)).map_err(output_write_error)
}

pub fn run_listing<W: Write>(out: &mut W) -> AppResult<()> {
    out.write_all(listing().as_bytes())
        .map_err(output_write_error)
}

/// Dispatch a parsed command against stdout. Returns the exit code.
///
/// `load_config` runs only for commands that use the configuration.
pub fn execute<F>(command: Commands, load_config: F) -> AppResult<i32>
where
    F: FnOnce() -> AppResult<Config>
{
    let stdout = io::stdout();
    let is_terminal = stdout.is_terminal();
    let mut out = stdout.lock();

    match command {
        Commands::Explain {
            command:
                ExplainCommand::Format {
                    input,
                    color,
                    no_color,
                    critical,
                    elevated,
                    scale_by_loops
                }
        } => {
            let config = load_config()?;
            let params = format_params(
                FormatArgs {
                    input,
                    color,
                    no_color,
                    critical,
                    elevated,
                    scale_by_loops
                },
                &config
            )?;
            let emphasis = emphasis_enabled(
                params.color,
                is_terminal,
                env::var_os("NO_COLOR").is_some()
            );
            run_format(&params, emphasis, &mut out)?;
        }
        Commands::Explain {
            command:
                ExplainCommand::Query {
                    query,
                    json
                }
        } => run_wrap(
            WrapParams {
                query,
                json
            },
            &mut out
        )?,
        Commands::Query {
            command
        } => match template_request(command) {
            Some(request) => run_template(&request, &mut out)?,
            None => run_listing(&mut out)?
        }
    }

    Ok(0)
}
