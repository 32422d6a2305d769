//! Must-eventually analysis.
//!
//! Every execution from a node is forced into the target set unless it can
//! escape: walk (through non-target nodes, over edges that are not provably
//! `False`) to a node from which no target is reachable any more, such as a
//! dead end or a cycle with no exit, or to a node that may stall. Cycles
//! that do have an exit are left eventually, so a retry loop around a
//! target still counts as forced. On acyclic graphs this is exactly "a
//! target, or at least one live edge and every live edge leads to a forced
//! node".
//!
//! A node may stall when none of its live edges is provably taken. Under
//! [`BranchPolicy::Exhaustive`] the one exception is a value branch: two or
//! more undecided edges testing values of the same key are assumed to cover
//! every outcome between them.
//!
//! Both "can reach a target" and "can escape" are least fixed points over a
//! status vector. Statuses only ever flip from `false` to `true`, so at most
//! `|V|` passes change anything.

use std::collections::BTreeMap;

use keyflow_config::BranchPolicy;
use keyflow_schema::{InputCond, Truth, subject_of};
use keyflow_workflow::{Edge, NodeId, WorkflowGraph};
use tracing::trace;

use crate::dataflow::Analysis;

/// Per node: is every execution starting there forced into `targets`.
pub(crate) fn forced(
  graph: &WorkflowGraph,
  analysis: &Analysis,
  targets: &[bool],
  policy: BranchPolicy,
) -> Vec<bool> {
  let mut reaches = targets.to_vec();
  settle(&mut reaches, |id, reaches| {
    live_edges(graph, analysis, id).any(|(edge, _)| reaches[edge.to])
  });

  let stalls: Vec<bool> = (0..graph.len())
    .map(|id| may_stall(graph, analysis, id, policy))
    .collect();

  let mut escapes = vec![false; graph.len()];
  settle(&mut escapes, |id, escapes| {
    !targets[id]
      && (!reaches[id]
        || stalls[id]
        || live_edges(graph, analysis, id).any(|(edge, _)| escapes[edge.to]))
  });

  escapes.into_iter().map(|escaped| !escaped).collect()
}

/// Flip statuses to `true` wherever `rule` holds until nothing changes.
fn settle<F>(statuses: &mut [bool], rule: F)
where
  F: Fn(NodeId, &[bool]) -> bool,
{
  for round in 0..=statuses.len() {
    let mut changed = false;
    for id in 0..statuses.len() {
      if !statuses[id] && rule(id, statuses) {
        statuses[id] = true;
        changed = true;
      }
    }
    trace!(round, changed, "liveness round");
    if !changed {
      break;
    }
  }
}

/// Outgoing edges that are not provably `False`.
fn live_edges<'a>(
  graph: &'a WorkflowGraph,
  analysis: &'a Analysis,
  id: NodeId,
) -> impl Iterator<Item = (&'a Edge, Truth)> + 'a {
  graph
    .downstream(id)
    .iter()
    .zip(&analysis.edges[id])
    .filter_map(|(edge, truth)| match truth {
      Some(truth) if truth.may_hold() => Some((edge, *truth)),
      _ => None,
    })
}

/// Whether execution may stop at `id` because no live edge is provably
/// taken.
fn may_stall(graph: &WorkflowGraph, analysis: &Analysis, id: NodeId, policy: BranchPolicy) -> bool {
  let mut branches: BTreeMap<&str, usize> = BTreeMap::new();
  for (edge, truth) in live_edges(graph, analysis, id) {
    if truth.is_true() {
      return false;
    }
    if let Some(subject) = value_subject(&edge.conditions) {
      *branches.entry(subject).or_default() += 1;
    }
  }

  match policy {
    BranchPolicy::Exhaustive => !branches.values().any(|count| *count >= 2),
    BranchPolicy::Strict => true,
  }
}

/// The key an edge compares a value of, if it does.
fn value_subject(conditions: &[InputCond]) -> Option<&str> {
  let tests_value = conditions
    .iter()
    .any(|cond| matches!(cond, InputCond::MatchesValue(_)));
  if tests_value { subject_of(conditions) } else { None }
}
