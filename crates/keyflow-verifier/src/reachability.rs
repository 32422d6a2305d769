use std::collections::VecDeque;

use keyflow_workflow::WorkflowGraph;

use crate::dataflow::Analysis;

/// Nodes some execution can reach: BFS from the start node over edges whose
/// conditions are not provably `False`.
pub(crate) fn reachable(graph: &WorkflowGraph, analysis: &Analysis) -> Vec<bool> {
  let mut seen = vec![false; graph.len()];
  let Some(start) = graph.start() else {
    return seen;
  };

  let mut queue = VecDeque::from([start]);
  seen[start] = true;

  while let Some(current) = queue.pop_front() {
    let truths = &analysis.edges[current];
    for (edge, truth) in graph.downstream(current).iter().zip(truths) {
      let takeable = matches!(truth, Some(t) if t.may_hold());
      if takeable && !seen[edge.to] {
        seen[edge.to] = true;
        queue.push_back(edge.to);
      }
    }
  }

  seen
}
