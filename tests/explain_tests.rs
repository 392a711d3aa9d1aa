use std::sync::LazyLock;

use pgpow::explain::{
    FormatOptions, RenderOptions, Severity, SeverityPolicy, format_plan, parse, parse_plan
};
use regex::Regex;

static ESCAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1b\[[0-9;]*m").expect("valid regex"));

const ANALYZE_PLAN: &str = "\
Sort  (cost=158.51..161.01 rows=1000 width=40) (actual time=2.921..3.120 rows=1000 loops=1)
  Sort Key: o.created_at DESC
  Sort Method: quicksort  Memory: 103kB
  Buffers: shared hit=12
  ->  Hash Join  (cost=29.50..108.68 rows=1000 width=40) (actual time=0.410..2.311 rows=1000 loops=1)
        Hash Cond: (o.customer_id = c.id)
        ->  Seq Scan on orders o  (cost=0.00..66.00 rows=1000 width=36) (actual time=0.008..0.612 rows=1000 loops=1)
        ->  Hash  (cost=17.00..17.00 rows=1000 width=8) (actual time=0.381..0.382 rows=1000 loops=1)
              Buckets: 1024  Batches: 1  Memory Usage: 48kB
              ->  Seq Scan on customers c  (cost=0.00..17.00 rows=1000 width=8) (actual time=0.004..0.151 rows=1000 loops=1)
Planning Time: 0.210 ms
Execution Time: 3.301 ms
";

const PSQL_PLAN: &str = "\
                                  QUERY PLAN
--------------------------------------------------------------------------------
 Limit  (cost=0.29..8.31 rows=1 width=244)
   ->  Index Scan using users_pkey on users  (cost=0.29..8.31 rows=1 width=244)
         Index Cond: (id = 42)
(3 rows)

";

fn plain() -> FormatOptions {
    FormatOptions::default()
}

fn emphasised() -> FormatOptions {
    colored::control::set_override(true);
    FormatOptions {
        render: RenderOptions {
            emphasis: true
        },
        ..FormatOptions::default()
    }
}

fn strip(text: &str) -> String {
    ESCAPE.replace_all(text, "").into_owned()
}

#[test]
fn test_round_trip_plans() {
    for input in [ANALYZE_PLAN, PSQL_PLAN] {
        assert_eq!(format_plan(input, &plain()), input);
    }
}

#[test]
fn test_round_trip_arbitrary_text() {
    let inputs = [
        "",
        "\n\n",
        "hello world",
        "no trailing newline\r\nbut CRLF before",
        "   ->   \n\t(cost=\n->->->\n",
        "ERROR:  relation \"missing\" does not exist\nLINE 1: SELECT * FROM missing\n",
        "Ünïcödé  (cost=1..2 rows=3 width=4)\n"
    ];
    for input in inputs {
        assert_eq!(format_plan(input, &plain()), input, "input: {input:?}");
    }
}

#[test]
fn test_emphasis_only_adds_escape_codes() {
    for input in [ANALYZE_PLAN, PSQL_PLAN] {
        let rendered = format_plan(input, &emphasised());
        assert!(rendered.contains("\x1b["));
        assert_eq!(strip(&rendered), input);
    }
}

#[test]
fn test_passthrough_is_idempotent() {
    let once = strip(&format_plan(ANALYZE_PLAN, &emphasised()));
    let twice = format_plan(&once, &plain());
    assert_eq!(twice, once);
}

#[test]
fn test_tree_shape_for_depths_0_1_1_2_1() {
    let input = "\
Append  (cost=0.00..40.00 rows=4 width=4)
  ->  Seq Scan on a  (cost=0.00..10.00 rows=1 width=4)
  ->  Subquery Scan on b  (cost=0.00..10.00 rows=1 width=4)
        ->  Seq Scan on c  (cost=0.00..10.00 rows=1 width=4)
  ->  Seq Scan on d  (cost=0.00..10.00 rows=1 width=4)
";
    let plan = parse(input);
    let forest = &plan.forest;
    assert_eq!(forest.roots().len(), 1);

    let root = forest.node(forest.roots()[0]);
    assert_eq!(root.children.len(), 3);

    let second = forest.node(root.children[1]);
    assert_eq!(second.operation, "Subquery Scan on b");
    assert_eq!(second.children.len(), 1);
    assert_eq!(forest.node(second.children[0]).operation, "Seq Scan on c");

    assert_eq!(forest.node(root.children[2]).operation, "Seq Scan on d");
}

#[test]
fn test_annotations_attach_to_nearest_node() {
    let plan = parse(ANALYZE_PLAN);
    let forest = &plan.forest;
    let root = forest.node(forest.roots()[0]);
    assert_eq!(root.node_type(), "Sort");
    assert!(
        root.annotations
            .iter()
            .any(|a| a.contains("Sort Key: o.created_at DESC"))
    );

    let hash = forest
        .plan_nodes()
        .find(|(_, n)| n.operation == "Hash")
        .map(|(_, n)| n)
        .unwrap();
    assert!(hash.annotations.iter().any(|a| a.contains("Buckets: 1024")));
}

#[test]
fn test_psql_wrapper_is_recognised() {
    let plan = parse(PSQL_PLAN);
    let forest = &plan.forest;
    assert_eq!(forest.roots().len(), 1);
    let root = forest.node(forest.roots()[0]);
    assert_eq!(root.node_type(), "Limit");
    assert_eq!(root.children.len(), 1);
    let scan = forest.node(root.children[0]);
    assert_eq!(scan.node_type(), "Index Scan");
    assert_eq!(scan.target(), Some("using users_pkey on users"));
}

#[test]
fn test_threshold_boundaries() {
    let policy = SeverityPolicy::default();
    assert_eq!(policy.tier(0.50), Severity::Critical);
    assert_eq!(policy.tier(0.10), Severity::Elevated);
    assert_eq!(policy.tier(0.099999), Severity::Normal);
}

#[test]
fn test_plan_only_scenario() {
    let input = "\
Seq Scan on t  (cost=0.00..10.00 rows=100 width=8)
  ->  Index Scan on t_idx  (cost=0.00..5.00 rows=50 width=8)
";
    let analysis = parse_plan(input, &SeverityPolicy::default());
    let forest = &analysis.plan.forest;
    let root = forest.roots()[0];
    let child = forest.node(root).children[0];
    assert_eq!(analysis.severities.tier(root), Severity::Critical);
    assert_eq!(analysis.severities.tier(child), Severity::Critical);
}

#[test]
fn test_malformed_line_does_not_stop_parsing() {
    let input = "\
Nested Loop  (cost=0.00..50.00 rows=10 width=8)
      )) garbage (cost=
  ->  Seq Scan on a  (cost=0.00..30.00 rows=10 width=4)
  ->  Seq Scan on b  (cost=0.00..2.00 rows=1 width=4)
";
    assert_eq!(format_plan(input, &plain()), input);

    let analysis = parse_plan(input, &SeverityPolicy::default());
    let forest = &analysis.plan.forest;
    let root = forest.roots()[0];
    let children = &forest.node(root).children;
    assert_eq!(children.len(), 2);
    assert_eq!(analysis.severities.tier(children[0]), Severity::Critical);
    assert_eq!(analysis.severities.tier(children[1]), Severity::Normal);
}

#[test]
fn test_actual_time_takes_precedence_over_cost() {
    let input = "\
Aggregate  (cost=0.00..100.00 rows=1 width=8) (actual time=0.000..50.000 rows=1 loops=1)
  ->  Seq Scan on t  (cost=0.00..90.00 rows=10 width=8) (actual time=0.000..5.000 rows=10 loops=1)
";
    let analysis = parse_plan(input, &SeverityPolicy::default());
    let forest = &analysis.plan.forest;
    let child = forest.node(forest.roots()[0]).children[0];
    assert_eq!(analysis.severities.tier(child), Severity::Elevated);
}

#[test]
fn test_severity_is_monotone_in_share() {
    let analysis = parse_plan(ANALYZE_PLAN, &SeverityPolicy::default());
    let forest = &analysis.plan.forest;
    let ids: Vec<_> = forest.descendants(forest.roots()[0]);
    for &a in &ids {
        for &b in &ids {
            if analysis.severities.share(a) > analysis.severities.share(b) {
                assert!(analysis.severities.tier(a) >= analysis.severities.tier(b));
            }
        }
    }
}

#[test]
fn test_separate_plans_form_a_forest() {
    let input = "\
Seq Scan on a  (cost=0.00..10.00 rows=1 width=4)

Seq Scan on b  (cost=0.00..1000.00 rows=1 width=4)
";
    let analysis = parse_plan(input, &SeverityPolicy::default());
    let roots = analysis.plan.forest.roots();
    assert_eq!(roots.len(), 2);
    assert_eq!(analysis.severities.tier(roots[0]), Severity::Critical);
    assert_eq!(analysis.severities.tier(roots[1]), Severity::Critical);
}

#[test]
fn test_auto_explain_log_keeps_its_root() {
    let input = "\
2026-10-19 09:14:02.117 UTC [4242] LOG:  duration: 12.3 ms  plan:
\tQuery Text: SELECT * FROM t LIMIT 1
\tLimit  (cost=0.00..100.00 rows=1 width=4) (actual time=0.1..12.0 rows=1 loops=1)
\t  ->  Seq Scan on t  (cost=0.00..100.00 rows=1 width=4) (actual time=0.1..1.0 rows=1 loops=1)
";
    assert_eq!(format_plan(input, &plain()), input);

    let analysis = parse_plan(input, &SeverityPolicy::default());
    let forest = &analysis.plan.forest;
    assert_eq!(forest.roots().len(), 1);
    let root = forest.roots()[0];
    assert_eq!(forest.node(root).node_type(), "Limit");

    let scan = forest.node(root).children[0];
    assert_eq!(forest.node(scan).parent, Some(root));
    assert_eq!(analysis.severities.tier(scan), Severity::Normal);
}

#[test]
fn test_indented_preface_does_not_shift_the_margin() {
    let input = "\
  note
Seq Scan on t  (cost=0.00..10.00 rows=100 width=8)
  ->  Index Scan on t_idx  (cost=0.00..0.50 rows=5 width=8)
";
    let analysis = parse_plan(input, &SeverityPolicy::default());
    let forest = &analysis.plan.forest;
    assert_eq!(forest.plan_nodes().count(), 2);
    assert_eq!(forest.roots().len(), 1);

    let root = forest.roots()[0];
    assert_eq!(forest.node(root).operation, "Seq Scan on t");
    let index = forest.node(root).children[0];
    assert_eq!(analysis.severities.tier(index), Severity::Normal);
    assert_eq!(forest.placeholder().unwrap().annotations, vec!["  note"]);
}

#[test]
fn test_title_and_trigger_lines_stay_plain() {
    let input = "\
QUERY PLAN
Seq Scan on t  (cost=0.00..10.00 rows=100 width=8) (actual time=0.010..2.000 rows=100 loops=1)
Trigger audit-log: time=8.000 calls=1
Execution Time: 10.100 ms
";
    let analysis = parse_plan(input, &SeverityPolicy::default());
    assert_eq!(analysis.plan.forest.roots().len(), 1);
    assert!(analysis.plan.lines[0].header.is_none());
    assert!(analysis.plan.lines[2].header.is_none());

    let rendered = format_plan(input, &emphasised());
    assert!(rendered.starts_with("QUERY PLAN\n"));
    assert!(rendered.contains("\nTrigger audit-log: time=8.000 calls=1\n"));
}
