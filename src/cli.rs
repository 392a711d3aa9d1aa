use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::{config::ColorMode, templates::Limit};

/// PostgreSQL tools that go POW!
#[derive(Parser, Debug)]
#[command(name = "pgpow")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Useful queries for PostgreSQL administration
    Query {
        #[command(subcommand)]
        command: QueryCommand
    },
    /// Commands related to EXPLAIN and query plans
    Explain {
        #[command(subcommand)]
        command: ExplainCommand
    }
}

#[derive(Subcommand, Debug)]
pub enum QueryCommand {
    /// Show queries from pg_stat_statements (needs the extension enabled)
    Statements {
        /// Hide the query text in the output
        #[arg(long)]
        hide_query: bool,

        /// Number of rows to show; pass no value (--limit=) to disable
        #[arg(long, value_parser = parse_limit)]
        limit: Option<Limit>
    },
    /// Queries related to database activity
    Activity {
        #[command(subcommand)]
        command: ActivityCommand
    },
    /// Database maintenance queries
    Maintenance {
        #[command(subcommand)]
        command: MaintenanceCommand
    },
    /// Database performance queries
    Performance {
        #[command(subcommand)]
        command: PerformanceCommand
    },
    /// List every available query
    List
}

#[derive(Subcommand, Debug)]
pub enum ActivityCommand {
    /// Show long-running transactions and queries
    LongRunning {
        /// Show compact view without query text
        #[arg(long)]
        compact: bool,

        /// Order by transaction or query duration
        #[arg(long, value_enum, default_value = "transaction")]
        order_by: DurationOrder
    },
    /// Show queries that are currently blocked
    Blocked {
        /// Show compact view without query text
        #[arg(long)]
        compact: bool
    },
    /// Show lock information for sessions
    Locks {
        /// Only granted locks
        #[arg(long, conflicts_with = "not_granted")]
        granted: bool,

        /// Only locks still waited for
        #[arg(long)]
        not_granted: bool
    }
}

#[derive(Subcommand, Debug)]
pub enum MaintenanceCommand {
    /// Show the tables with the highest proportion of dead tuples
    DeadTuples {
        /// Number of rows to show; pass no value (--limit=) to disable
        #[arg(long, value_parser = parse_limit)]
        limit: Option<Limit>
    },
    /// Show the largest tables by size
    TableSize {
        /// Number of rows to show; pass no value (--limit=) to disable
        #[arg(long, value_parser = parse_limit)]
        limit: Option<Limit>
    }
}

#[derive(Subcommand, Debug)]
pub enum PerformanceCommand {
    /// Most used indexes
    IndexesUsed {
        /// Exclude primary key indexes
        #[arg(long)]
        no_pkey: bool,

        /// Number of rows to show; pass no value (--limit=) to disable
        #[arg(long, value_parser = parse_limit)]
        limit: Option<Limit>
    },
    /// Unused indexes that may be candidates for removal
    IndexesUnused {
        /// Number of rows to show; pass no value (--limit=) to disable
        #[arg(long, value_parser = parse_limit)]
        limit: Option<Limit>
    },
    /// Check whether tables are scanned through indexes
    IndexUtilization {
        /// Order by live rows or index usage
        #[arg(long, value_enum, default_value = "rows")]
        order_by: UtilizationOrder,

        /// Number of rows to show; pass no value (--limit=) to disable
        #[arg(long, value_parser = parse_limit)]
        limit: Option<Limit>
    },
    /// Show ratio of cache hits to total accesses
    CacheHitRatio
}

#[derive(Subcommand, Debug)]
pub enum ExplainCommand {
    /// Wrap a query (argument or stdin) in EXPLAIN (ANALYZE, BUFFERS)
    Query {
        /// SQL to wrap; read from stdin when omitted
        query: Option<String>,

        /// Ask for JSON plan output instead of text
        #[arg(long)]
        json: bool
    },
    /// Highlight expensive nodes of text EXPLAIN output
    Format {
        /// File holding the plan (use - or omit for stdin)
        input: Option<PathBuf>,

        /// When to colour the output
        #[arg(long, value_enum, env = "PGPOW_COLOR")]
        color: Option<ColorMode>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,

        /// Share of the plan at which a node is critical
        #[arg(long)]
        critical: Option<f64>,

        /// Share of the plan at which a node is elevated
        #[arg(long)]
        elevated: Option<f64>,

        /// Weigh actual time by loop count
        #[arg(long)]
        scale_by_loops: bool
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DurationOrder {
    Transaction,
    Query
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum UtilizationOrder {
    Rows,
    Index
}

fn parse_limit(value: &str) -> Result<Limit, String> {
    value.parse()
}
