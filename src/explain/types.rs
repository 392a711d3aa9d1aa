//! Plan data model.
//!
//! Nodes live in a flat arena ([`PlanForest`]) and refer to each other by
//! [`NodeId`]. A forest usually holds a single tree, but text such as the
//! output of several `EXPLAIN` statements pasted together yields one root per
//! plan.

use compact_str::CompactString;
use smallvec::SmallVec;

/// Index of a node inside a [`PlanForest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub usize);

/// Planner estimate `(cost=startup..total ...)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostEstimate {
    pub startup: f64,
    pub total:   f64
}

/// Measured statistics `(actual time=a..b rows=r loops=l)`.
///
/// `time` is missing when the plan was captured with `TIMING OFF`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Actuals {
    pub startup_time_ms: Option<f64>,
    pub total_time_ms:   Option<f64>,
    pub rows:            Option<f64>,
    pub loops:           Option<u64>
}

/// Numeric fields found in a node header. Every field is optional.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NodeMetrics {
    pub cost:           Option<CostEstimate>,
    pub plan_rows:      Option<u64>,
    pub plan_width:     Option<u32>,
    pub actuals:        Option<Actuals>,
    pub never_executed: bool
}

impl NodeMetrics {
    pub fn total_cost(&self) -> Option<f64> {
        self.cost.map(|c| c.total)
    }

    pub fn actual_time_ms(&self) -> Option<f64> {
        self.actuals.and_then(|a| a.total_time_ms)
    }
}

/// One operation of a plan.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanNode {
    /// Header text with the numeric groups cut out, e.g. `Seq Scan on t`.
    pub operation:   CompactString,
    pub metrics:     NodeMetrics,
    /// Raw lines attached to this node, in input order.
    pub annotations: Vec<String>,
    pub children:    SmallVec<[NodeId; 4]>,
    pub parent:      Option<NodeId>,
    /// Indentation level after clamping. Only meaningful while building.
    pub depth:       usize,
    /// Index of the header line in the source; `None` for the placeholder.
    pub line:        Option<usize>
}

impl PlanNode {
    pub fn new(operation: impl Into<CompactString>, metrics: NodeMetrics) -> Self {
        Self {
            operation: operation.into(),
            metrics,
            annotations: Vec::new(),
            children: SmallVec::new(),
            parent: None,
            depth: 0,
            line: None
        }
    }

    /// The synthetic holder for lines seen before any node header.
    pub fn placeholder() -> Self {
        Self::new(CompactString::default(), NodeMetrics::default())
    }

    /// Operation name without its `using ...` / `on ...` clause.
    pub fn node_type(&self) -> &str {
        let op = self.operation.as_str();
        let cut = [" using ", " on "]
            .iter()
            .filter_map(|sep| op.find(sep))
            .min()
            .unwrap_or(op.len());
        op[..cut].trim()
    }

    /// The clause following [`node_type`](Self::node_type), if any.
    pub fn target(&self) -> Option<&str> {
        let rest = self.operation.as_str()[self.node_type().len()..].trim();
        (!rest.is_empty()).then_some(rest)
    }

    pub fn family(&self) -> NodeFamily {
        NodeFamily::of(self.node_type())
    }
}

/// Arena holding every node of one parsed input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanForest {
    nodes:       Vec<PlanNode>,
    roots:       Vec<NodeId>,
    placeholder: Option<NodeId>
}

impl PlanForest {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, node: PlanNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    pub(crate) fn push_root(&mut self, node: PlanNode) -> NodeId {
        let id = self.push(node);
        self.roots.push(id);
        id
    }

    pub(crate) fn push_child(&mut self, parent: NodeId, mut node: PlanNode) -> NodeId {
        node.parent = Some(parent);
        let id = self.push(node);
        self.nodes[parent.0].children.push(id);
        id
    }

    pub(crate) fn placeholder_mut(&mut self) -> &mut PlanNode {
        let id = match self.placeholder {
            Some(id) => id,
            None => {
                let id = self.push(PlanNode::placeholder());
                self.placeholder = Some(id);
                id
            }
        };
        &mut self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut PlanNode {
        &mut self.nodes[id.0]
    }

    /// Panics if `id` was not produced by this forest.
    pub fn node(&self, id: NodeId) -> &PlanNode {
        &self.nodes[id.0]
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// First root, the usual case of a single plan.
    pub fn root(&self) -> Option<&PlanNode> {
        self.roots.first().map(|&id| self.node(id))
    }

    pub fn placeholder(&self) -> Option<&PlanNode> {
        self.placeholder.map(|id| self.node(id))
    }

    pub fn is_placeholder(&self, id: NodeId) -> bool {
        self.placeholder == Some(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Ids of `root` and all its descendants, depth first in input order.
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.node(id).children.iter().rev().copied());
        }
        out
    }

    /// Real plan nodes, skipping the placeholder.
    pub fn plan_nodes(&self) -> impl Iterator<Item = (NodeId, &PlanNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId(i), n))
            .filter(|(id, _)| !self.is_placeholder(*id))
    }
}

/// Severity tier of a node, ordered from least to most expensive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Severity {
    #[default]
    Normal,
    Elevated,
    Critical
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "normal"),
            Self::Elevated => write!(f, "elevated"),
            Self::Critical => write!(f, "critical")
        }
    }
}

/// Coarse operation family, used only to pick a colour for normal nodes.
///
/// Detection is substring based so labels added by newer server versions
/// fall through to [`NodeFamily::Utility`] instead of being rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeFamily {
    Retrieval,
    Join,
    Aggregation,
    Modification,
    Utility
}

impl NodeFamily {
    pub fn of(node_type: &str) -> Self {
        if node_type.contains("Scan") {
            Self::Retrieval
        } else if node_type.contains("Join") || node_type.contains("Nested Loop") {
            Self::Join
        } else if ["Aggregate", "Group", "SetOp", "WindowAgg", "Unique"]
            .iter()
            .any(|s| node_type.contains(s))
        {
            Self::Aggregation
        } else if ["Insert", "Update", "Delete"]
            .iter()
            .any(|s| node_type.contains(s))
            || node_type == "Merge"
        {
            Self::Modification
        } else {
            Self::Utility
        }
    }
}
