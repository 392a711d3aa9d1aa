//! Whole-forest severity pass.
//!
//! Each tree is measured against its own basis. When the root reports an
//! actual time (`EXPLAIN ANALYZE`) nodes are ranked by time relative to the
//! root; otherwise by estimated total cost relative to the most expensive
//! node of the tree. Parent and child costs are not assumed to be ordered.

use serde::Deserialize;
use tracing::debug;

use super::types::{NodeId, NodeMetrics, PlanForest, Severity};

/// Share thresholds and metric options.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SeverityPolicy {
    /// Lowest share classified as critical.
    pub critical:       f64,
    /// Lowest share classified as elevated.
    pub elevated:       f64,
    /// Multiply actual time by loop count before comparing.
    pub scale_by_loops: bool
}

impl Default for SeverityPolicy {
    fn default() -> Self {
        Self {
            critical:       0.50,
            elevated:       0.10,
            scale_by_loops: false
        }
    }
}

impl SeverityPolicy {
    /// Tier for a share. Lower bounds are inclusive.
    pub fn tier(&self, share: f64) -> Severity {
        if share >= self.critical {
            Severity::Critical
        } else if share >= self.elevated {
            Severity::Elevated
        } else {
            Severity::Normal
        }
    }

    fn time_of(&self, metrics: &NodeMetrics) -> Option<f64> {
        let time = metrics.actual_time_ms()?;
        if self.scale_by_loops {
            let loops = metrics.actuals.and_then(|a| a.loops).unwrap_or(1);
            Some(time * loops as f64)
        } else {
            Some(time)
        }
    }
}

/// Metric a tree was ranked by, with the value shares are relative to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Basis {
    Time(f64),
    Cost(f64)
}

impl Basis {
    pub fn value(&self) -> f64 {
        match self {
            Self::Time(v) | Self::Cost(v) => *v
        }
    }
}

/// Share and tier of every node in a forest, indexed by [`NodeId`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeverityMap {
    shares: Vec<f64>,
    tiers:  Vec<Severity>,
    bases:  Vec<(NodeId, Basis)>
}

impl SeverityMap {
    pub fn tier(&self, id: NodeId) -> Severity {
        self.tiers.get(id.0).copied().unwrap_or_default()
    }

    pub fn share(&self, id: NodeId) -> f64 {
        self.shares.get(id.0).copied().unwrap_or(0.0)
    }

    /// Basis chosen for each root, in root order.
    pub fn bases(&self) -> &[(NodeId, Basis)] {
        &self.bases
    }
}

/// Ranks every node of a completed forest.
///
/// The placeholder and any node outside a tree stay [`Severity::Normal`].
pub fn classify(forest: &PlanForest, policy: &SeverityPolicy) -> SeverityMap {
    let mut map = SeverityMap {
        shares: vec![0.0; forest.len()],
        tiers:  vec![Severity::Normal; forest.len()],
        bases:  Vec::with_capacity(forest.roots().len())
    };

    for &root in forest.roots() {
        let members = forest.descendants(root);
        let basis = match policy.time_of(&forest.node(root).metrics) {
            Some(time) => Basis::Time(time),
            None => Basis::Cost(
                members
                    .iter()
                    .filter_map(|&id| forest.node(id).metrics.total_cost())
                    .fold(0.0, f64::max)
            )
        };
        debug!(event = "severity_basis", root = root.0, basis = ?basis);

        for id in members {
            let metrics = &forest.node(id).metrics;
            let metric = match basis {
                Basis::Time(_) => policy.time_of(metrics),
                Basis::Cost(_) => metrics.total_cost()
            }
            .unwrap_or(0.0);
            let share = if basis.value() > 0.0 {
                metric / basis.value()
            } else {
                0.0
            };
            map.shares[id.0] = share;
            map.tiers[id.0] = policy.tier(share);
        }
        map.bases.push((root, basis));
    }

    map
}
