//! `EXPLAIN` text parsing and severity highlighting.
//!
//! The pipeline is:
//!
//! ```text
//! text ─▶ classify (per line) ─▶ builder (stack) ─▶ PlanForest
//!                                   │ costs::extract per header
//!                                   ▼
//!                        severity::classify (whole forest)
//!                                   ▼
//!                  AnnotatedDocument ─▶ Renderer ─▶ text
//! ```
//!
//! Nothing here fails: text that is not understood is carried through
//! unchanged, and with emphasis disabled the output equals the input.
//!
//! # Example
//!
//! ```
//! use pgpow::explain::{FormatOptions, Severity, format_plan, parse_plan};
//!
//! let text = "Seq Scan on t  (cost=0.00..10.00 rows=100 width=8)\n";
//! assert_eq!(format_plan(text, &FormatOptions::default()), text);
//!
//! let analysis = parse_plan(text, &FormatOptions::default().policy);
//! let root = analysis.plan.forest.roots()[0];
//! assert_eq!(analysis.severities.tier(root), Severity::Critical);
//! ```

pub mod builder;
pub mod classify;
pub mod costs;
pub mod render;
pub mod severity;
pub mod types;

pub use builder::{ParsedPlan, parse};
pub use render::{AnnotatedDocument, RenderOptions, Renderer};
pub use severity::{Basis, SeverityMap, SeverityPolicy, classify as classify_severity};
pub use types::{
    Actuals, CostEstimate, NodeFamily, NodeId, NodeMetrics, PlanForest, PlanNode, Severity
};

/// Options for the full parse-and-render pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FormatOptions {
    pub policy: SeverityPolicy,
    pub render: RenderOptions
}

/// A parsed plan with its severity pass applied.
#[derive(Debug, Clone)]
pub struct PlanAnalysis<'a> {
    pub plan:       ParsedPlan<'a>,
    pub severities: SeverityMap
}

impl<'a> PlanAnalysis<'a> {
    pub fn document(&self) -> AnnotatedDocument<'a> {
        AnnotatedDocument::new(&self.plan, &self.severities)
    }
}

/// Parses `input` and ranks its nodes.
pub fn parse_plan<'a>(input: &'a str, policy: &SeverityPolicy) -> PlanAnalysis<'a> {
    let plan = parse(input);
    let severities = classify_severity(&plan.forest, policy);
    PlanAnalysis {
        plan,
        severities
    }
}

/// Parses, ranks and renders `input` in one call.
pub fn format_plan(input: &str, options: &FormatOptions) -> String {
    let analysis = parse_plan(input, &options.policy);
    Renderer::new(options.render).render(analysis.document())
}
