//! Incremental construction of the plan forest.

use std::ops::Range;

use tracing::{debug, trace};

use super::{
    classify::{Frame, LineClassifier, LineKind},
    costs::extract,
    types::{NodeId, PlanForest, PlanNode}
};

/// Where the styled parts of a header line sit, as byte ranges of the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderSpan {
    pub node:    NodeId,
    pub label:   Range<usize>,
    pub details: Option<Range<usize>>
}

/// One input line split from its terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine<'a> {
    pub text:   &'a str,
    /// `"\n"`, `"\r\n"` or empty for a final line without newline.
    pub ending: &'a str,
    pub header: Option<HeaderSpan>
}

/// Input lines together with the forest parsed from them.
#[derive(Debug, Clone)]
pub struct ParsedPlan<'a> {
    pub lines:  Vec<SourceLine<'a>>,
    pub forest: PlanForest
}

/// Stack-based builder fed one classified line at a time.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    forest: PlanForest,
    stack:  Vec<(usize, NodeId)>
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a node at `depth` and returns its id.
    ///
    /// A depth more than one level below the current node is clamped to one
    /// level below it. Popping past every open node starts a new tree.
    pub fn open(&mut self, depth: usize, mut node: PlanNode) -> NodeId {
        let depth = match self.stack.last() {
            Some(&(top, _)) if depth > top + 1 => top + 1,
            _ => depth
        };
        while self.stack.last().is_some_and(|&(d, _)| d >= depth) {
            self.stack.pop();
        }
        node.depth = depth;
        let id = match self.stack.last() {
            Some(&(_, parent)) => self.forest.push_child(parent, node),
            None => self.forest.push_root(node)
        };
        self.stack.push((depth, id));
        id
    }

    /// Attaches a raw line to the innermost open node, or to the placeholder
    /// when no node has been opened yet.
    pub fn attach(&mut self, line: &str) {
        let target = match self.stack.last() {
            Some(&(_, id)) => self.forest.node_mut(id),
            None => self.forest.placeholder_mut()
        };
        target.annotations.push(line.to_owned());
    }

    pub fn finish(self) -> PlanForest {
        self.forest
    }
}

/// Splits `input` into lines, keeping each line's terminator.
pub fn split_lines(input: &str) -> Vec<(&str, &str)> {
    input
        .split_inclusive('\n')
        .map(|raw| {
            let text = raw.strip_suffix('\n').unwrap_or(raw);
            let text = text.strip_suffix('\r').unwrap_or(text);
            (text, &raw[text.len()..])
        })
        .collect()
}

/// Parses `EXPLAIN` text. Never fails; whatever is not understood is kept as
/// annotation text.
pub fn parse(input: &str) -> ParsedPlan<'_> {
    let raw = split_lines(input);
    let texts: Vec<&str> = raw.iter().map(|(t, _)| *t).collect();
    let frame = Frame::detect(&texts);
    debug!(
        event = "frame_detected",
        margin = frame.margin,
        body_start = frame.body_start
    );

    let classifier = LineClassifier::new(frame.margin);
    let mut builder = TreeBuilder::new();
    let mut lines = Vec::with_capacity(raw.len());

    for (index, (text, ending)) in raw.into_iter().enumerate() {
        let kind = if index < frame.body_start {
            LineKind::Unrecognized(text)
        } else {
            classifier.classify(text)
        };
        trace!(line = index, kind = ?kind);

        let header = match kind {
            LineKind::NodeHeader {
                depth,
                label_start,
                text: label_text
            } => {
                let fields = extract(label_text);
                let mut node = PlanNode::new(fields.operation, fields.metrics);
                node.line = Some(index);
                let id = builder.open(depth, node);
                let label_len = fields.details_start.unwrap_or(label_text.len());
                let label_end = label_start + label_text[..label_len].trim_end().len();
                let details = fields
                    .details_start
                    .map(|s| label_start + s..label_start + label_text.trim_end().len());
                Some(HeaderSpan {
                    node:  id,
                    label: label_start..label_end,
                    details
                })
            }
            LineKind::Annotation(line) | LineKind::Unrecognized(line) => {
                builder.attach(line);
                None
            }
            LineKind::Blank => None
        };
        lines.push(SourceLine {
            text,
            ending,
            header
        });
    }

    let forest = builder.finish();
    debug!(
        event = "plan_parsed",
        lines = lines.len(),
        nodes = forest.plan_nodes().count(),
        roots = forest.roots().len()
    );
    ParsedPlan {
        lines,
        forest
    }
}
