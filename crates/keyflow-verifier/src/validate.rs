use keyflow_workflow::WorkflowGraph;
use tracing::warn;

use crate::dataflow::Analysis;
use crate::error::SchemaViolation;

/// Check that every reachable node's required inputs are guaranteed.
pub(crate) fn violations(
  graph: &WorkflowGraph,
  analysis: &Analysis,
  reachable: &[bool],
) -> Vec<SchemaViolation> {
  if graph.start().is_none() {
    warn!("workflow has no start node");
    return vec![SchemaViolation::MissingStartNode];
  }

  graph
    .nodes()
    .filter(|(id, _)| reachable[*id])
    .filter_map(|(id, node)| {
      let available = analysis.inputs[id].as_ref()?;
      let missing: Vec<String> = node
        .required_inputs
        .iter()
        .filter(|key| !available.key_truth(key).is_true())
        .cloned()
        .collect();
      if missing.is_empty() {
        return None;
      }

      warn!(node = %node.name, missing = ?missing, "required inputs not guaranteed");
      Some(SchemaViolation::MissingInputs {
        node: node.name.clone(),
        missing,
      })
    })
    .collect()
}
