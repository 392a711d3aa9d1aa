use super::{Category, Template, TemplateOptions};

pub(super) fn templates() -> Vec<Template> {
    vec![
        Template::new(
            Category::Maintenance,
            "dead-tuples",
            "Tables with the highest share of dead tuples",
            Some(30),
            dead_tuples
        ),
        Template::new(
            Category::Maintenance,
            "table-size",
            "Largest tables by total relation size",
            Some(10),
            table_size
        )
    ]
}

fn dead_tuples(_: &TemplateOptions) -> String {
    "SELECT
    schemaname,
    relname,
    n_dead_tup,
    n_live_tup,
    round(100.0 * n_dead_tup / nullif(n_live_tup + n_dead_tup, 0), 2) AS dead_tuple_pct
FROM pg_stat_user_tables
WHERE schemaname = 'public'
ORDER BY dead_tuple_pct DESC NULLS LAST"
        .to_string()
}

fn table_size(_: &TemplateOptions) -> String {
    "SELECT
    table_schema || '.' || table_name AS table_full_name,
    pg_size_pretty(pg_total_relation_size(quote_ident(table_schema) || '.' || quote_ident(table_name))) AS total_size
FROM information_schema.tables
WHERE table_type = 'BASE TABLE'
    AND table_schema NOT IN ('pg_catalog', 'information_schema')
ORDER BY pg_total_relation_size(quote_ident(table_schema) || '.' || quote_ident(table_name)) DESC"
        .to_string()
}
