use std::collections::HashMap;
use std::fmt;
use std::ops::Index;

use keyflow_config::WorkflowDef;
use keyflow_schema::{InputCond, OutputSchema};

use crate::error::WorkflowError;
use crate::node::Node;

/// Position of a node in insertion order.
pub type NodeId = usize;

/// An outgoing edge and the conjunctive conditions gating it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
  pub to: NodeId,
  pub conditions: Vec<InputCond>,
}

/// Nodes, conditional edges, and the start node of one workflow.
#[derive(Debug, Clone, Default)]
pub struct WorkflowGraph {
  nodes: Vec<Node>,
  /// Node name -> id.
  index: HashMap<String, NodeId>,
  /// Adjacency list: src -> outgoing edges, at most one per destination.
  adjacency: Vec<Vec<Edge>>,
  /// Reverse adjacency: dst -> sources.
  reverse_adjacency: Vec<Vec<NodeId>>,
  start: Option<NodeId>,
}

impl WorkflowGraph {
  pub fn new() -> Self {
    Self::default()
  }

  /// Build a graph from a workflow definition.
  ///
  /// Nodes are registered before edges, so edges may reference nodes
  /// declared anywhere in the definition.
  pub fn from_def(def: &WorkflowDef) -> Result<Self, WorkflowError> {
    let mut graph = Self::new();

    for node in &def.nodes {
      graph.add_node(
        node.name.clone(),
        node.required_inputs.iter().cloned(),
        node.output.clone(),
      )?;
    }
    for edge in &def.edges {
      graph.add_edge(&edge.from, &edge.to, edge.conditions.clone())?;
    }
    if let Some(start) = &def.start {
      graph.set_start_node(start)?;
    }

    Ok(graph)
  }

  pub fn add_node<I, S>(
    &mut self,
    name: impl Into<String>,
    required_inputs: I,
    output_schema: OutputSchema,
  ) -> Result<NodeId, WorkflowError>
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    let node = Node::new(name, required_inputs, output_schema);
    if self.index.contains_key(&node.name) {
      return Err(WorkflowError::DuplicateNode { name: node.name });
    }

    let id = self.nodes.len();
    self.index.insert(node.name.clone(), id);
    self.nodes.push(node);
    self.adjacency.push(Vec::new());
    self.reverse_adjacency.push(Vec::new());
    Ok(id)
  }

  /// Add an edge from `src` to `dst`, replacing the conditions of an
  /// existing edge between the same pair.
  pub fn add_edge(
    &mut self,
    src: &str,
    dst: &str,
    conditions: Vec<InputCond>,
  ) -> Result<(), WorkflowError> {
    let from = self.require(src)?;
    let to = self.require(dst)?;

    let outgoing = &mut self.adjacency[from];
    match outgoing.iter_mut().find(|edge| edge.to == to) {
      Some(edge) => edge.conditions = conditions,
      None => {
        outgoing.push(Edge { to, conditions });
        self.reverse_adjacency[to].push(from);
      }
    }
    Ok(())
  }

  pub fn set_start_node(&mut self, name: &str) -> Result<(), WorkflowError> {
    self.start = Some(self.require(name)?);
    Ok(())
  }

  pub fn start(&self) -> Option<NodeId> {
    self.start
  }

  pub fn start_node(&self) -> Option<&Node> {
    self.start.map(|id| &self.nodes[id])
  }

  pub fn id_of(&self, name: &str) -> Option<NodeId> {
    self.index.get(name).copied()
  }

  pub fn get_node(&self, name: &str) -> Option<&Node> {
    self.id_of(name).map(|id| &self.nodes[id])
  }

  /// All nodes in insertion order.
  pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
    self.nodes.iter().enumerate()
  }

  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }

  pub fn edge_count(&self) -> usize {
    self.adjacency.iter().map(Vec::len).sum()
  }

  /// Outgoing edges of a node, in insertion order.
  pub fn downstream(&self, id: NodeId) -> &[Edge] {
    self.adjacency.get(id).map(|v| v.as_slice()).unwrap_or(&[])
  }

  /// Sources of the edges entering a node.
  pub fn upstream(&self, id: NodeId) -> &[NodeId] {
    self
      .reverse_adjacency
      .get(id)
      .map(|v| v.as_slice())
      .unwrap_or(&[])
  }

  pub fn edge(&self, src: NodeId, dst: NodeId) -> Option<&Edge> {
    self.downstream(src).iter().find(|edge| edge.to == dst)
  }

  fn require(&self, name: &str) -> Result<NodeId, WorkflowError> {
    self.id_of(name).ok_or_else(|| WorkflowError::UnknownNode {
      name: name.to_string(),
    })
  }
}

impl Index<NodeId> for WorkflowGraph {
  type Output = Node;

  fn index(&self, id: NodeId) -> &Self::Output {
    &self.nodes[id]
  }
}

/// Debug listing of nodes and edges.
impl fmt::Display for WorkflowGraph {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "Nodes:")?;
    for (id, node) in self.nodes() {
      let marker = if self.start == Some(id) { " (start)" } else { "" };
      writeln!(f, "  {}{}", node.name, marker)?;
      writeln!(f, "    requires: {:?}", node.required_inputs)?;
      let fixed: Vec<&str> = node.output_schema.fixed_keys().collect();
      writeln!(f, "    fixed: {:?}", fixed)?;
      for (rule, cond) in node.output_schema.dynamic_keys() {
        writeln!(f, "    rule: {:?} when {:?}", rule, cond)?;
      }
    }
    writeln!(f, "Edges:")?;
    for (id, node) in self.nodes() {
      for edge in self.downstream(id) {
        writeln!(
          f,
          "  {} -> {} with {:?}",
          node.name, self.nodes[edge.to].name, edge.conditions
        )?;
      }
    }
    match self.start_node() {
      Some(node) => writeln!(f, "Start: {}", node.name),
      None => writeln!(f, "Start: <unset>"),
    }
  }
}
