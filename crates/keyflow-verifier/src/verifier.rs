use keyflow_config::VerifierConfig;
use keyflow_schema::{Availability, Truth};
use keyflow_workflow::WorkflowGraph;
use tracing::{debug, instrument};

use crate::dataflow::{self, Analysis};
use crate::error::SchemaViolation;
use crate::{liveness, reachability, validate};

/// Answers static questions about one fully built workflow graph.
///
/// The availability analysis runs once in [`Verifier::new`]; every query
/// afterwards is a pure function of the graph and that analysis, so queries
/// may be repeated in any order.
pub struct Verifier<'g> {
  graph: &'g WorkflowGraph,
  config: VerifierConfig,
  analysis: Analysis,
  reachable: Vec<bool>,
}

impl<'g> Verifier<'g> {
  #[instrument(
    name = "verifier_new",
    skip_all,
    fields(nodes = graph.len(), edges = graph.edge_count())
  )]
  pub fn new(graph: &'g WorkflowGraph, config: VerifierConfig) -> Self {
    let analysis = dataflow::analyze(graph);
    let reachable = reachability::reachable(graph, &analysis);
    debug!(
      reachable = reachable.iter().filter(|r| **r).count(),
      "verifier ready"
    );

    Self {
      graph,
      config,
      analysis,
      reachable,
    }
  }

  pub fn config(&self) -> VerifierConfig {
    self.config
  }

  /// Whether some execution can run `name`. Unknown names are unreachable.
  pub fn is_reachable(&self, name: &str) -> bool {
    self
      .graph
      .id_of(name)
      .is_some_and(|id| self.reachable[id])
  }

  /// Whether every execution from the start node is forced to enter at
  /// least one of `targets`. Unknown target names are ignored.
  #[instrument(
    skip_all,
    fields(targets = targets.len(), policy = ?self.config.branch_policy)
  )]
  pub fn is_eventually_reached<S: AsRef<str>>(&self, targets: &[S]) -> bool {
    let Some(start) = self.graph.start() else {
      return false;
    };

    let mut wanted = vec![false; self.graph.len()];
    for target in targets {
      if let Some(id) = self.graph.id_of(target.as_ref()) {
        wanted[id] = true;
      }
    }

    let holds = liveness::forced(
      self.graph,
      &self.analysis,
      &wanted,
      self.config.branch_policy,
    );
    holds[start]
  }

  /// Every reachable node whose required inputs are not guaranteed.
  #[instrument(skip_all)]
  pub fn validate(&self) -> Vec<SchemaViolation> {
    validate::violations(self.graph, &self.analysis, &self.reachable)
  }

  /// Declared nodes that no execution can reach, in insertion order.
  pub fn unreachable_nodes(&self) -> Vec<&'g str> {
    self
      .graph
      .nodes()
      .filter(|(id, _)| !self.reachable[*id])
      .map(|(_, node)| node.name.as_str())
      .collect()
  }

  /// Keys available when `name` runs, or `None` if it never runs.
  pub fn availability(&self, name: &str) -> Option<&Availability> {
    let id = self.graph.id_of(name)?;
    self.analysis.inputs[id].as_ref()
  }

  /// Keys `name` produces, or `None` if it never runs.
  pub fn output(&self, name: &str) -> Option<&Availability> {
    let id = self.graph.id_of(name)?;
    self.analysis.outputs[id].as_ref()
  }

  /// Evaluated condition of the edge `src -> dst`.
  ///
  /// `None` when the edge does not exist or its source never runs.
  pub fn edge_truth(&self, src: &str, dst: &str) -> Option<Truth> {
    let from = self.graph.id_of(src)?;
    let to = self.graph.id_of(dst)?;
    let position = self
      .graph
      .downstream(from)
      .iter()
      .position(|edge| edge.to == to)?;
    self.analysis.edges[from][position]
  }
}
