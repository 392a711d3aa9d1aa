//! # pgpow
//!
//! PostgreSQL tools that go POW!
//!
//! The library behind the `pgpow` binary. Two independent halves:
//!
//! - [`explain`] reads the text form of `EXPLAIN` / `EXPLAIN ANALYZE`
//!   output, rebuilds the plan tree from indentation and ranks every node by
//!   its share of the plan's time or cost. The renderer reproduces the input
//!   byte for byte and only adds terminal colour around expensive nodes.
//! - [`templates`] is a catalog of administration queries (activity, locks,
//!   bloat, index usage) printed for the user to run with `psql`.
//!
//! [`app`] wires both to the command line defined in [`cli`].

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod explain;
pub mod logging;
pub mod templates;
