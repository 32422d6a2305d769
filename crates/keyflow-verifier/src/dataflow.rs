//! Graph-wide propagation of key availability.
//!
//! Every node's input is the merge of the outputs of its predecessors over
//! edges that are not provably `False`; the start node is additionally
//! seeded with its own required inputs (the workflow's external inputs).
//! Starting from "nothing reached", rounds are repeated until no input
//! changes. Each round can only lose information (guaranteed keys shrink,
//! possible keys grow, edges move towards `Unknown`), so the loop settles;
//! it is still capped at [`max_rounds`].

use keyflow_schema::{Availability, Truth, evaluate_all_in};
use keyflow_workflow::WorkflowGraph;
use tracing::{debug, trace, warn};

/// Solution of the availability dataflow.
#[derive(Debug, Clone)]
pub(crate) struct Analysis {
  /// Keys available when each node runs. `None` when nothing reaches it.
  pub inputs: Vec<Option<Availability>>,
  /// Keys each node produces.
  pub outputs: Vec<Option<Availability>>,
  /// Evaluated conditions, aligned with `WorkflowGraph::downstream`.
  /// `None` when the source is never reached.
  pub edges: Vec<Vec<Option<Truth>>>,
  /// Rounds the fixed point took.
  pub rounds: usize,
}

impl Analysis {
  fn unreached(graph: &WorkflowGraph) -> Self {
    Self {
      inputs: vec![None; graph.len()],
      outputs: vec![None; graph.len()],
      edges: graph
        .nodes()
        .map(|(id, _)| vec![None; graph.downstream(id).len()])
        .collect(),
      rounds: 0,
    }
  }
}

pub(crate) fn analyze(graph: &WorkflowGraph) -> Analysis {
  let Some(start) = graph.start() else {
    debug!("no start node, nothing is reachable");
    return Analysis::unreached(graph);
  };

  let seed = Availability::guaranteed(graph[start].required_inputs.iter().cloned());
  let widen_after = widen_after(graph);
  let max_rounds = max_rounds(graph);
  let mut widened = vec![false; graph.len()];
  let mut inputs: Vec<Option<Availability>> = vec![None; graph.len()];
  let mut round = 0;

  let outputs = loop {
    round += 1;
    let outputs = produce(graph, &inputs);

    let mut next: Vec<Option<Availability>> = vec![None; graph.len()];
    next[start] = Some(seed.clone());
    for (src, output) in outputs.iter().enumerate() {
      let Some(output) = output else { continue };
      for edge in graph.downstream(src) {
        if evaluate_all_in(&edge.conditions, output).is_false() {
          continue;
        }
        next[edge.to] = Some(match next[edge.to].take() {
          Some(acc) => acc.merge(output),
          None => output.clone(),
        });
      }
    }

    for (id, current) in next.iter_mut().enumerate() {
      let Some(current) = current else { continue };
      if !widened[id] && round > widen_after && gained_names(inputs[id].as_ref(), current) {
        debug!(node = %graph[id].name, round, "possible keys keep growing, widening");
        widened[id] = true;
      }
      if widened[id] {
        current.widen();
      }
    }

    let changed = next != inputs;
    trace!(round, changed, "availability round");
    if !changed {
      break outputs;
    }
    debug_assert!(round < max_rounds, "availability analysis did not settle");
    if round >= max_rounds {
      warn!(round, "availability analysis did not settle, stopping");
      break outputs;
    }
    inputs = next;
  };

  let edges = graph
    .nodes()
    .map(|(id, _)| {
      graph
        .downstream(id)
        .iter()
        .map(|edge| {
          outputs[id]
            .as_ref()
            .map(|output| evaluate_all_in(&edge.conditions, output))
        })
        .collect()
    })
    .collect();

  debug!(
    rounds = round,
    reached = inputs.iter().filter(|i| i.is_some()).count(),
    "availability analysis settled"
  );

  Analysis {
    inputs,
    outputs,
    edges,
    rounds: round,
  }
}

/// Renaming rules inside a cycle can mint new key names forever. Past this
/// many rounds a node whose possible tier still gains names stops
/// enumerating it.
fn widen_after(graph: &WorkflowGraph) -> usize {
  2 * graph.len() + 2
}

/// Hard cap on rounds. After widening every round moves some node down a
/// finite lattice of key sets, which takes far fewer rounds than this.
fn max_rounds(graph: &WorkflowGraph) -> usize {
  widen_after(graph) + 8 * (graph.len() + 1) * (graph.len() + 1)
}

fn produce(graph: &WorkflowGraph, inputs: &[Option<Availability>]) -> Vec<Option<Availability>> {
  inputs
    .iter()
    .enumerate()
    .map(|(id, input)| {
      input
        .as_ref()
        .map(|input| graph[id].output_schema.propagate(input))
    })
    .collect()
}

/// Whether `current` can hold a key name that `previous` never mentioned.
fn gained_names(previous: Option<&Availability>, current: &Availability) -> bool {
  match previous {
    None => false,
    Some(previous) => current
      .possible
      .iter()
      .any(|k| !previous.possible.contains(k) && !previous.guaranteed.contains(k)),
  }
}
