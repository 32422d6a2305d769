//! Must-eventually queries on small hand-built shapes.

use keyflow_schema::{InputCond, OutputSchema};
use keyflow_verifier::{Truth, Verifier, VerifierConfig};
use keyflow_workflow::WorkflowGraph;

/// Unconditional edges between pass-through nodes, starting at `start`.
fn shape(nodes: &[&str], edges: &[(&str, &str)], start: &str) -> WorkflowGraph {
  let mut graph = WorkflowGraph::new();
  for name in nodes {
    graph
      .add_node(*name, Vec::<String>::new(), OutputSchema::carry_all())
      .unwrap();
  }
  for (src, dst) in edges {
    graph.add_edge(src, dst, vec![]).unwrap();
  }
  graph.set_start_node(start).unwrap();
  graph
}

fn eventually(graph: &WorkflowGraph, targets: &[&str]) -> bool {
  Verifier::new(graph, VerifierConfig::default()).is_eventually_reached(targets)
}

#[test]
fn dead_end_before_target_breaks_liveness() {
  let graph = shape(
    &["start", "a", "b", "target"],
    &[("start", "a"), ("start", "b"), ("a", "target")],
    "start",
  );

  assert!(Verifier::new(&graph, VerifierConfig::default()).is_reachable("target"));
  assert!(!eventually(&graph, &["target"]));
  assert!(eventually(&graph, &["target", "b"]));
}

#[test]
fn dead_end_after_target_is_fine() {
  let graph = shape(
    &["start", "target", "tail"],
    &[("start", "target"), ("target", "tail")],
    "start",
  );

  assert!(eventually(&graph, &["target"]));
}

#[test]
fn start_in_targets_holds_trivially() {
  let graph = shape(&["start"], &[], "start");

  assert!(eventually(&graph, &["start"]));
  assert!(!eventually(&graph, &[] as &[&str]));
}

#[test]
fn retry_loop_with_exit_reaches_target() {
  let graph = shape(
    &["start", "retry", "target"],
    &[("start", "retry"), ("retry", "retry"), ("retry", "target")],
    "start",
  );

  assert!(eventually(&graph, &["target"]));
}

#[test]
fn pure_self_loop_never_reaches_target() {
  let graph = shape(
    &["start", "spin", "target"],
    &[("start", "spin"), ("spin", "spin")],
    "start",
  );

  assert!(!eventually(&graph, &["target"]));
}

#[test]
fn longer_cycle_needs_an_exit() {
  let closed = shape(
    &["start", "a", "b", "target"],
    &[("start", "a"), ("a", "b"), ("b", "a")],
    "start",
  );
  assert!(!eventually(&closed, &["target"]));

  let open = shape(
    &["start", "a", "b", "target"],
    &[("start", "a"), ("a", "b"), ("b", "a"), ("b", "target")],
    "start",
  );
  assert!(eventually(&open, &["target"]));
}

#[test]
fn cycle_with_exit_into_trap_fails() {
  let graph = shape(
    &["start", "a", "b", "target", "trap"],
    &[
      ("start", "a"),
      ("a", "b"),
      ("b", "a"),
      ("b", "target"),
      ("a", "trap"),
    ],
    "start",
  );

  assert!(!eventually(&graph, &["target"]));
  assert!(eventually(&graph, &["target", "trap"]));
}

#[test]
fn false_edges_do_not_count() {
  let mut graph = shape(&["start", "target", "trap"], &[("start", "target")], "start");
  graph
    .add_edge(
      "start",
      "trap",
      vec![InputCond::MatchesKey("never_produced".to_string())],
    )
    .unwrap();

  let verifier = Verifier::new(&graph, VerifierConfig::default());
  assert!(!verifier.is_reachable("trap"));
  assert!(verifier.is_eventually_reached(&["target"]));
}

#[test]
fn unknown_target_names_are_ignored() {
  let graph = shape(&["start", "target"], &[("start", "target")], "start");

  assert!(eventually(&graph, &["target", "nowhere"]));
  assert!(!eventually(&graph, &["nowhere"]));
}

#[test]
fn no_start_node_is_never_live() {
  let mut graph = WorkflowGraph::new();
  graph
    .add_node("a", Vec::<String>::new(), OutputSchema::carry_all())
    .unwrap();

  let verifier = Verifier::new(&graph, VerifierConfig::default());
  assert!(!verifier.is_eventually_reached(&["a"]));
  assert!(!verifier.is_reachable("a"));
}

#[test]
fn single_undecided_edge_may_stall() {
  // `a` may or may not run before `gate`, so `flag` is only possible there.
  let mut graph = WorkflowGraph::new();
  graph
    .add_node("start", Vec::<String>::new(), OutputSchema::carry_all())
    .unwrap();
  graph
    .add_node(
      "a",
      Vec::<String>::new(),
      OutputSchema::builder().add_fixed("flag").build(),
    )
    .unwrap();
  graph
    .add_node("gate", Vec::<String>::new(), OutputSchema::carry_all())
    .unwrap();
  graph
    .add_node("target", Vec::<String>::new(), OutputSchema::carry_all())
    .unwrap();
  graph.add_edge("start", "a", vec![]).unwrap();
  graph.add_edge("start", "gate", vec![]).unwrap();
  graph.add_edge("a", "gate", vec![]).unwrap();
  graph
    .add_edge("gate", "target", vec![InputCond::MatchesKey("flag".to_string())])
    .unwrap();
  graph.set_start_node("start").unwrap();

  let relaxed = Verifier::new(&graph, VerifierConfig::default());
  assert_eq!(relaxed.edge_truth("gate", "target"), Some(Truth::Unknown));
  assert!(relaxed.is_reachable("target"));
  assert!(!relaxed.is_eventually_reached(&["target"]));
  assert!(relaxed.is_eventually_reached(&["gate"]));

  let strict = Verifier::new(&graph, VerifierConfig::strict());
  assert!(!strict.is_eventually_reached(&["target"]));
  assert!(strict.is_eventually_reached(&["gate"]));
}

/// `start` produces `rec` (and `side`) with unknown values; `gate` branches
/// on them.
fn value_gate(branches: &[(&str, &str, &str)]) -> WorkflowGraph {
  let mut graph = WorkflowGraph::new();
  graph
    .add_node(
      "start",
      Vec::<String>::new(),
      OutputSchema::builder().add_fixed("rec").add_fixed("side").build(),
    )
    .unwrap();
  graph
    .add_node("gate", ["rec"], OutputSchema::carry_all())
    .unwrap();
  graph
    .add_node("done", Vec::<String>::new(), OutputSchema::default())
    .unwrap();
  graph.add_edge("start", "gate", vec![]).unwrap();
  for (name, key, value) in branches {
    graph
      .add_node(*name, Vec::<String>::new(), OutputSchema::default())
      .unwrap();
    graph
      .add_edge("gate", name, InputCond::matches_key_value(*key, *value))
      .unwrap();
    graph.add_edge(name, "done", vec![]).unwrap();
  }
  graph.set_start_node("start").unwrap();
  graph
}

#[test]
fn lone_value_test_may_stall() {
  let graph = value_gate(&[("buy", "rec", "buy")]);
  let verifier = Verifier::new(&graph, VerifierConfig::default());

  assert_eq!(verifier.edge_truth("gate", "buy"), Some(Truth::Unknown));
  assert!(verifier.is_reachable("done"));
  assert!(!verifier.is_eventually_reached(&["done"]));
  assert!(!verifier.is_eventually_reached(&["buy"]));
}

#[test]
fn value_branch_on_one_key_covers_outcomes() {
  let graph = value_gate(&[("buy", "rec", "buy"), ("sell", "rec", "sell")]);

  let relaxed = Verifier::new(&graph, VerifierConfig::default());
  assert!(relaxed.is_eventually_reached(&["done"]));
  assert!(relaxed.is_eventually_reached(&["buy", "sell"]));
  assert!(!relaxed.is_eventually_reached(&["buy"]));

  let strict = Verifier::new(&graph, VerifierConfig::strict());
  assert!(!strict.is_eventually_reached(&["done"]));
}

#[test]
fn branches_on_different_keys_do_not_cover() {
  let graph = value_gate(&[("buy", "rec", "buy"), ("left", "side", "left")]);
  let verifier = Verifier::new(&graph, VerifierConfig::default());

  assert!(verifier.is_reachable("buy"));
  assert!(verifier.is_reachable("left"));
  assert!(!verifier.is_eventually_reached(&["done"]));
}
