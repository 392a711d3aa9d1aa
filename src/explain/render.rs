//! Emphasised re-rendering of the source text.
//!
//! The renderer never rebuilds lines from the tree: it replays the input line
//! by line and, when emphasis is on, wraps the label and numeric details of
//! header lines in ANSI colour codes. With emphasis off the output is the
//! input byte for byte.
//!
//! Colour codes come from [`colored`], which consults its own global switch.
//! Callers that enable emphasis for a non-terminal destination must also call
//! [`colored::control::set_override`].

use std::{io, ops::Range};

use colored::{ColoredString, Colorize};

use super::{
    builder::ParsedPlan,
    severity::SeverityMap,
    types::{NodeFamily, Severity}
};

/// One output line.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment<'a> {
    Verbatim {
        text:   &'a str,
        ending: &'a str
    },
    Header {
        text:     &'a str,
        ending:   &'a str,
        label:    Range<usize>,
        details:  Option<Range<usize>>,
        severity: Severity,
        family:   NodeFamily
    }
}

/// The input lines with every node header tagged with its tier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotatedDocument<'a> {
    segments: Vec<Segment<'a>>
}

impl<'a> AnnotatedDocument<'a> {
    pub fn new(plan: &ParsedPlan<'a>, severities: &SeverityMap) -> Self {
        let segments = plan
            .lines
            .iter()
            .map(|line| match &line.header {
                Some(span) => Segment::Header {
                    text:     line.text,
                    ending:   line.ending,
                    label:    span.label.clone(),
                    details:  span.details.clone(),
                    severity: severities.tier(span.node),
                    family:   plan.forest.node(span.node).family()
                },
                None => Segment::Verbatim {
                    text:   line.text,
                    ending: line.ending
                }
            })
            .collect();
        Self {
            segments
        }
    }

    pub fn segments(&self) -> &[Segment<'a>] {
        &self.segments
    }
}

/// Rendering switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Add colour codes to header lines.
    pub emphasis: bool
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Renderer {
    options: RenderOptions
}

impl Renderer {
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options
        }
    }

    /// Renders the whole document into a string.
    pub fn render(&self, doc: AnnotatedDocument<'_>) -> String {
        let mut out = String::new();
        for segment in &doc.segments {
            self.push_segment(segment, &mut out);
        }
        out
    }

    /// Streams the document to `out`, one line at a time.
    pub fn write_to<W: io::Write>(&self, doc: AnnotatedDocument<'_>, out: &mut W) -> io::Result<()> {
        let mut buf = String::new();
        for segment in &doc.segments {
            buf.clear();
            self.push_segment(segment, &mut buf);
            out.write_all(buf.as_bytes())?;
        }
        out.flush()
    }

    fn push_segment(&self, segment: &Segment<'_>, out: &mut String) {
        match segment {
            Segment::Verbatim {
                text,
                ending
            } => {
                out.push_str(text);
                out.push_str(ending);
            }
            Segment::Header {
                text,
                ending,
                ..
            } if !self.options.emphasis => {
                out.push_str(text);
                out.push_str(ending);
            }
            Segment::Header {
                text,
                ending,
                label,
                details,
                severity,
                family
            } => {
                out.push_str(&text[..label.start]);
                out.push_str(&style_label(&text[label.clone()], *severity, *family).to_string());
                let tail_start = match details {
                    Some(d) => {
                        out.push_str(&text[label.end..d.start]);
                        match style_details(&text[d.clone()], *severity) {
                            Some(styled) => out.push_str(&styled.to_string()),
                            None => out.push_str(&text[d.clone()])
                        }
                        d.end
                    }
                    None => label.end
                };
                out.push_str(&text[tail_start..]);
                out.push_str(ending);
            }
        }
    }
}

fn style_label(label: &str, severity: Severity, family: NodeFamily) -> ColoredString {
    match severity {
        Severity::Critical => label.red().bold(),
        Severity::Elevated => label.yellow().bold(),
        Severity::Normal => match family {
            NodeFamily::Retrieval => label.blue(),
            NodeFamily::Join => label.magenta(),
            NodeFamily::Aggregation => label.green(),
            NodeFamily::Modification => label.cyan(),
            NodeFamily::Utility => label.bright_black()
        }
    }
}

fn style_details(details: &str, severity: Severity) -> Option<ColoredString> {
    match severity {
        Severity::Critical => Some(details.red()),
        Severity::Elevated => Some(details.yellow()),
        Severity::Normal => None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::explain::{
        builder::parse,
        severity::{SeverityPolicy, classify}
    };

    const PLAN: &str = "\
Hash Join  (cost=0.00..100.00 rows=10 width=8)
  Hash Cond: (a.id = b.id)
  ->  Seq Scan on a  (cost=0.00..60.00 rows=10 width=4)
  ->  Hash  (cost=0.00..5.00 rows=10 width=4)
        ->  Seq Scan on b  (cost=0.00..12.00 rows=10 width=4)
";

    fn document(text: &str) -> AnnotatedDocument<'_> {
        let plan = parse(text);
        let map = classify(&plan.forest, &SeverityPolicy::default());
        AnnotatedDocument::new(&plan, &map)
    }

    #[test]
    fn test_plain_render_is_identity() {
        let renderer = Renderer::new(RenderOptions {
            emphasis: false
        });
        for text in [PLAN, "", "no plan here", "a\r\nb\r\n", "  ->  x\n\n\n"] {
            assert_eq!(renderer.render(document(text)), text);
        }
    }

    #[test]
    fn test_segments_carry_tiers() {
        let doc = document(PLAN);
        let tiers: Vec<Severity> = doc
            .segments()
            .iter()
            .filter_map(|s| match s {
                Segment::Header {
                    severity, ..
                } => Some(*severity),
                Segment::Verbatim {
                    ..
                } => None
            })
            .collect();
        assert_eq!(tiers, vec![
            Severity::Critical,
            Severity::Critical,
            Severity::Normal,
            Severity::Elevated
        ]);
    }

    #[test]
    fn test_emphasis_keeps_text() {
        colored::control::set_override(true);
        let renderer = Renderer::new(RenderOptions {
            emphasis: true
        });
        let out = renderer.render(document(PLAN));
        assert!(out.contains("\x1b["));
        assert!(out.contains("Hash Cond: (a.id = b.id)\n"));
        assert!(out.contains("  ->  "));
        assert_eq!(out.lines().count(), PLAN.lines().count());
        assert!(out.contains(&"Hash Join".red().bold().to_string()));
    }

    #[test]
    fn test_write_to_matches_render() {
        let renderer = Renderer::default();
        let mut buf = Vec::new();
        renderer.write_to(document(PLAN), &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), PLAN);
    }
}
