//! Index usage and buffer cache efficiency.

use super::{Category, SortKey, Template, TemplateOptions};

pub(super) fn templates() -> Vec<Template> {
    vec![
        Template::new(
            Category::Performance,
            "indexes-used",
            "Most scanned indexes",
            Some(10),
            indexes_used
        ),
        Template::new(
            Category::Performance,
            "indexes-unused",
            "Never scanned indexes, largest first",
            Some(10),
            indexes_unused
        ),
        Template::new(
            Category::Performance,
            "index-utilization",
            "Share of index scans per table",
            Some(10),
            index_utilization
        ),
        Template::new(
            Category::Performance,
            "cache-hit-ratio",
            "Heap buffer cache hit ratio",
            None,
            cache_hit_ratio
        )
    ]
}

fn indexes_used(options: &TemplateOptions) -> String {
    let pkey_filter = if options.exclude_primary_keys {
        " AND indexrelname NOT ILIKE '%_pkey'"
    } else {
        ""
    };
    format!(
        "SELECT
    relname AS table,
    indexrelname AS index,
    idx_scan AS index_scans
FROM pg_stat_all_indexes
WHERE schemaname = 'public' AND idx_scan > 0{pkey_filter}
ORDER BY idx_scan DESC"
    )
}

fn indexes_unused(_: &TemplateOptions) -> String {
    "SELECT
    schemaname AS schema,
    relname AS table,
    indexrelname AS index,
    idx_scan AS index_scans,
    pg_size_pretty(pg_relation_size(indexrelid)) AS index_size
FROM pg_stat_all_indexes
WHERE schemaname = 'public' AND idx_scan = 0
ORDER BY pg_relation_size(indexrelid) DESC"
        .to_string()
}

fn index_utilization(options: &TemplateOptions) -> String {
    let order = match options.order {
        Some(SortKey::Index) => "idx_percent ASC",
        _ => "n_live_tup DESC"
    };
    format!(
        "SELECT
    relname AS table,
    n_live_tup AS rows,
    round(100 * idx_scan / nullif(idx_scan + seq_scan, 0), 2) AS idx_percent
FROM pg_stat_user_tables
ORDER BY {order}"
    )
}

fn cache_hit_ratio(_: &TemplateOptions) -> String {
    "SELECT
    round(100 * sum(heap_blks_hit)::numeric / nullif(sum(heap_blks_hit + heap_blks_read), 0), 2) AS hit_ratio
FROM pg_statio_user_tables"
        .to_string()
}
