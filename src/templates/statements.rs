//! `pg_stat_statements` report.
//!
//! Requires the extension: `CREATE EXTENSION pg_stat_statements;`

use super::{Category, Template, TemplateOptions};

pub(super) fn templates() -> Vec<Template> {
    vec![Template::new(
        Category::Statements,
        "top",
        "Statements with the highest total execution time",
        Some(10),
        top
    )]
}

fn top(options: &TemplateOptions) -> String {
    let query_column = if options.hide_query { "" } else { "\n    query," };
    format!(
        "SELECT
    queryid,{query_column}
    calls,
    rows,
    total_exec_time,
    mean_exec_time,
    stddev_exec_time,
    min_exec_time,
    max_exec_time
FROM pg_stat_statements
ORDER BY total_exec_time DESC"
    )
}
