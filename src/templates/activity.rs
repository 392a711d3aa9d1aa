//! Session activity: long transactions, blocking chains, locks.

use super::{Category, SortKey, Template, TemplateOptions};

pub(super) fn templates() -> Vec<Template> {
    vec![
        Template::new(
            Category::Activity,
            "long-running",
            "Open transactions and queries, oldest first",
            None,
            long_running
        ),
        Template::new(
            Category::Activity,
            "blocked",
            "Sessions waiting on another session's locks",
            None,
            blocked
        ),
        Template::new(Category::Activity, "locks", "Lock table entries", None, locks)
    ]
}

fn long_running(options: &TemplateOptions) -> String {
    let extra = if options.compact {
        ""
    } else {
        ",
    query_start,
    wait_event_type,
    wait_event,
    query"
    };
    let order = match options.order {
        Some(SortKey::Query) => "query_duration",
        _ => "txn_duration"
    };
    format!(
        "SELECT
    pid,
    now() - xact_start AS txn_duration,
    now() - query_start AS query_duration,
    usename,
    application_name,
    client_addr,
    state{extra}
FROM pg_stat_activity
WHERE xact_start IS NOT NULL
    AND state <> 'idle'
    AND pid <> pg_backend_pid()
ORDER BY {order} DESC"
    )
}

fn blocked(options: &TemplateOptions) -> String {
    let (blocked_query, blocking_query) = if options.compact {
        ("", "")
    } else {
        (",\n    blocked.query", ",\n    blocking.query AS blocking_query")
    };
    format!(
        "SELECT
    blocked.pid,
    blocked.usename,
    blocked.application_name,
    now() - blocked.query_start AS query_duration{blocked_query},
    blocking.pid AS blocking_pid,
    blocking.application_name AS blocking_app_name,
    now() - blocking.query_start AS blocking_duration{blocking_query}
FROM pg_stat_activity blocked
JOIN pg_stat_activity blocking ON blocking.pid = ANY(pg_blocking_pids(blocked.pid))
ORDER BY query_duration DESC"
    )
}

fn locks(options: &TemplateOptions) -> String {
    let filter = match options.granted {
        Some(true) => "\nWHERE granted",
        Some(false) => "\nWHERE NOT granted",
        None => ""
    };
    format!("SELECT pg_locks.*\nFROM pg_locks{filter}")
}
