//! Conversions from parsed CLI arguments to runner parameters.
//!
//! Command-line values win over the loaded [`Config`]; the merged severity
//! thresholds are validated here so a bad `--critical`/`--elevated` pair is
//! reported the same way as a bad configuration file.

use std::path::PathBuf;

use super::types::{FormatParams, TemplateRequest};
use crate::{
    cli::{
        ActivityCommand, DurationOrder, MaintenanceCommand, PerformanceCommand, QueryCommand,
        UtilizationOrder
    },
    config::{ColorMode, Config},
    error::AppResult,
    templates::{Category, SortKey, TemplateOptions}
};

/// Maps a `query` subcommand to its catalog entry. `None` for `query list`.
pub fn template_request(command: QueryCommand) -> Option<TemplateRequest> {
    let request = match command {
        QueryCommand::Statements {
            hide_query,
            limit
        } => request(
            Category::Statements,
            "top",
            TemplateOptions {
                limit: limit.unwrap_or_default(),
                hide_query,
                ..TemplateOptions::default()
            }
        ),
        QueryCommand::Activity {
            command
        } => activity_request(command),
        QueryCommand::Maintenance {
            command
        } => maintenance_request(command),
        QueryCommand::Performance {
            command
        } => performance_request(command),
        QueryCommand::List => return None
    };
    Some(request)
}

fn activity_request(command: ActivityCommand) -> TemplateRequest {
    match command {
        ActivityCommand::LongRunning {
            compact,
            order_by
        } => request(
            Category::Activity,
            "long-running",
            TemplateOptions {
                compact,
                order: Some(duration_order(order_by)),
                ..TemplateOptions::default()
            }
        ),
        ActivityCommand::Blocked {
            compact
        } => request(
            Category::Activity,
            "blocked",
            TemplateOptions {
                compact,
                ..TemplateOptions::default()
            }
        ),
        ActivityCommand::Locks {
            granted,
            not_granted
        } => request(
            Category::Activity,
            "locks",
            TemplateOptions {
                granted: granted_filter(granted, not_granted),
                ..TemplateOptions::default()
            }
        )
    }
}

fn maintenance_request(command: MaintenanceCommand) -> TemplateRequest {
    let (name, limit) = match command {
        MaintenanceCommand::DeadTuples {
            limit
        } => ("dead-tuples", limit),
        MaintenanceCommand::TableSize {
            limit
        } => ("table-size", limit)
    };
    request(
        Category::Maintenance,
        name,
        TemplateOptions {
            limit: limit.unwrap_or_default(),
            ..TemplateOptions::default()
        }
    )
}

fn performance_request(command: PerformanceCommand) -> TemplateRequest {
    match command {
        PerformanceCommand::IndexesUsed {
            no_pkey,
            limit
        } => request(
            Category::Performance,
            "indexes-used",
            TemplateOptions {
                limit: limit.unwrap_or_default(),
                exclude_primary_keys: no_pkey,
                ..TemplateOptions::default()
            }
        ),
        PerformanceCommand::IndexesUnused {
            limit
        } => request(
            Category::Performance,
            "indexes-unused",
            TemplateOptions {
                limit: limit.unwrap_or_default(),
                ..TemplateOptions::default()
            }
        ),
        PerformanceCommand::IndexUtilization {
            order_by,
            limit
        } => request(
            Category::Performance,
            "index-utilization",
            TemplateOptions {
                limit: limit.unwrap_or_default(),
                order: Some(utilization_order(order_by)),
                ..TemplateOptions::default()
            }
        ),
        PerformanceCommand::CacheHitRatio => request(
            Category::Performance,
            "cache-hit-ratio",
            TemplateOptions::default()
        )
    }
}

fn request(category: Category, name: &'static str, options: TemplateOptions) -> TemplateRequest {
    TemplateRequest {
        category,
        name,
        options
    }
}

pub fn duration_order(order: DurationOrder) -> SortKey {
    match order {
        DurationOrder::Transaction => SortKey::Transaction,
        DurationOrder::Query => SortKey::Query
    }
}

pub fn utilization_order(order: UtilizationOrder) -> SortKey {
    match order {
        UtilizationOrder::Rows => SortKey::Rows,
        UtilizationOrder::Index => SortKey::Index
    }
}

/// `--granted` and `--not-granted` are mutually exclusive at the CLI level.
pub fn granted_filter(granted: bool, not_granted: bool) -> Option<bool> {
    match (granted, not_granted) {
        (true, _) => Some(true),
        (false, true) => Some(false),
        (false, false) => None
    }
}

/// Colour mode after applying `--no-color` and `--color` over the config.
pub fn color_mode(color: Option<ColorMode>, no_color: bool, config: &Config) -> ColorMode {
    if no_color {
        return ColorMode::Never;
    }
    color.unwrap_or(config.output.color)
}

/// Arguments of `explain format` that are merged into [`FormatParams`].
#[derive(Debug, Clone, Default)]
pub struct FormatArgs {
    pub input:          Option<PathBuf>,
    pub color:          Option<ColorMode>,
    pub no_color:       bool,
    pub critical:       Option<f64>,
    pub elevated:       Option<f64>,
    pub scale_by_loops: bool
}

pub fn format_params(args: FormatArgs, config: &Config) -> AppResult<FormatParams> {
    let mut merged = config.clone();
    if let Some(critical) = args.critical {
        merged.severity.critical = critical;
    }
    if let Some(elevated) = args.elevated {
        merged.severity.elevated = elevated;
    }
    if args.scale_by_loops {
        merged.severity.scale_by_loops = true;
    }
    merged.validate()?;

    Ok(FormatParams {
        input:  args.input,
        color:  color_mode(args.color, args.no_color, config),
        policy: merged.severity
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::Limit;

    #[test]
    fn test_list_has_no_template() {
        assert!(template_request(QueryCommand::List).is_none());
    }

    #[test]
    fn test_statements_request() {
        let req = template_request(QueryCommand::Statements {
            hide_query: true,
            limit:      Some(Limit::Rows(3))
        })
        .unwrap();
        assert_eq!(req.category, Category::Statements);
        assert_eq!(req.name, "top");
        assert!(req.options.hide_query);
        assert_eq!(req.options.limit, Limit::Rows(3));
    }

    #[test]
    fn test_missing_limit_means_default() {
        let req = template_request(QueryCommand::Maintenance {
            command: MaintenanceCommand::TableSize {
                limit: None
            }
        })
        .unwrap();
        assert_eq!(req.name, "table-size");
        assert_eq!(req.options.limit, Limit::Default);
    }

    #[test]
    fn test_locks_filter() {
        assert_eq!(granted_filter(true, false), Some(true));
        assert_eq!(granted_filter(false, true), Some(false));
        assert_eq!(granted_filter(false, false), None);
    }

    #[test]
    fn test_orders() {
        assert_eq!(duration_order(DurationOrder::Query), SortKey::Query);
        assert_eq!(utilization_order(UtilizationOrder::Index), SortKey::Index);
    }

    #[test]
    fn test_no_color_wins() {
        let config = Config::default();
        assert_eq!(
            color_mode(Some(ColorMode::Always), true, &config),
            ColorMode::Never
        );
        assert_eq!(color_mode(None, false, &config), ColorMode::Auto);
        assert_eq!(
            color_mode(Some(ColorMode::Always), false, &config),
            ColorMode::Always
        );
    }

    #[test]
    fn test_format_params_override_thresholds() {
        let params = format_params(
            FormatArgs {
                critical: Some(0.8),
                elevated: Some(0.2),
                scale_by_loops: true,
                ..FormatArgs::default()
            },
            &Config::default()
        )
        .unwrap();
        assert_eq!(params.policy.critical, 0.8);
        assert_eq!(params.policy.elevated, 0.2);
        assert!(params.policy.scale_by_loops);
    }

    #[test]
    fn test_format_params_rejects_inverted_thresholds() {
        let result = format_params(
            FormatArgs {
                critical: Some(0.05),
                ..FormatArgs::default()
            },
            &Config::default()
        );
        assert!(result.is_err());
    }
}
