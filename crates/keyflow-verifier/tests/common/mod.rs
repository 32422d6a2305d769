//! Shared workflow builders for verifier integration tests.

#![allow(dead_code)]

use keyflow_schema::{InputCond, KeyRule, OutputSchema};
use keyflow_workflow::WorkflowGraph;

/// Output schema copying every input key under `previous_input.`.
pub fn nested_previous() -> OutputSchema {
  OutputSchema::builder()
    .add_rule_for_every_input(
      KeyRule::IdWithPrefix("previous_input.".to_string()),
      InputCond::Always,
    )
    .build()
}

/// The buy/sell stock workflow.
///
/// `check_stock_price` takes `stock_name` from outside, a recommender adds
/// `rec`, and a branch picks `buy` or `sell` on its runtime value. Both
/// meet again at `report_result`. With `stock_name_external` unset the
/// start node declares no inputs, so `stock_name` never enters the graph.
pub fn stock_graph(stock_name_external: bool, report_extra: &[&str]) -> WorkflowGraph {
  stock_graph_with_rec(stock_name_external, report_extra, None)
}

/// Like [`stock_graph`], with `rec` pinned to a constant when given.
pub fn stock_graph_with_rec(
  stock_name_external: bool,
  report_extra: &[&str],
  rec: Option<&str>,
) -> WorkflowGraph {
  let mut graph = WorkflowGraph::new();
  let start_inputs: &[&str] = if stock_name_external { &["stock_name"] } else { &[] };

  graph
    .add_node(
      "check_stock_price",
      start_inputs.iter().copied(),
      OutputSchema::builder()
        .add_fixed("stock_price")
        .carry_all()
        .build(),
    )
    .unwrap();

  let recommender = match rec {
    Some(value) => OutputSchema::builder().add_fixed_value("rec", value),
    None => OutputSchema::builder().add_fixed("rec"),
  };
  graph
    .add_node(
      "buy_sell_rec",
      ["stock_price"],
      recommender.carry_all().build(),
    )
    .unwrap();
  graph
    .add_node("buy_or_sell", ["rec"], OutputSchema::carry_all())
    .unwrap();

  let trade = || {
    OutputSchema::builder()
      .add_fixed("quantity")
      .add_rule_for_every_input(
        KeyRule::IdWithPrefix("previous_input.".to_string()),
        InputCond::Always,
      )
      .build()
  };
  graph
    .add_node("buy", ["stock_name", "stock_price"], trade())
    .unwrap();
  graph.add_node("sell", ["stock_name"], trade()).unwrap();

  let mut report_inputs = vec!["previous_input.stock_name", "previous_input.rec", "quantity"];
  report_inputs.extend_from_slice(report_extra);
  graph
    .add_node("report_result", report_inputs, OutputSchema::default())
    .unwrap();

  graph
    .add_edge("check_stock_price", "buy_sell_rec", vec![])
    .unwrap();
  graph
    .add_edge("buy_sell_rec", "buy_or_sell", vec![])
    .unwrap();
  graph
    .add_edge(
      "buy_or_sell",
      "buy",
      InputCond::matches_key_value("rec", "buy"),
    )
    .unwrap();
  graph
    .add_edge(
      "buy_or_sell",
      "sell",
      InputCond::matches_key_value("rec", "sell"),
    )
    .unwrap();
  graph.add_edge("buy", "report_result", vec![]).unwrap();
  graph.add_edge("sell", "report_result", vec![]).unwrap();

  graph.set_start_node("check_stock_price").unwrap();
  graph
}

/// `n0 -> n1 -> ... -> n{len-1}`, unconditional, every node built by `schema`.
pub fn chain(len: usize, schema: impl Fn(usize) -> OutputSchema) -> WorkflowGraph {
  let mut graph = WorkflowGraph::new();
  for i in 0..len {
    graph
      .add_node(format!("n{i}"), Vec::<String>::new(), schema(i))
      .unwrap();
  }
  for i in 1..len {
    graph
      .add_edge(&format!("n{}", i - 1), &format!("n{i}"), vec![])
      .unwrap();
  }
  if len > 0 {
    graph.set_start_node("n0").unwrap();
  }
  graph
}
