use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use keyflow_config::{BranchPolicy, WorkflowDef};
use keyflow_schema::Availability;
use keyflow_verifier::{SchemaViolation, Verifier};
use keyflow_workflow::WorkflowGraph;

/// Keyflow - static verification of data flow through workflows
#[derive(Parser)]
#[command(name = "keyflow")]
#[command(version, about, long_about = None)]
struct Cli {
  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Verify a workflow and print a JSON report
  Check {
    /// Path to the workflow file (JSON)
    workflow_file: PathBuf,

    /// Ask whether some execution can run this node
    #[arg(long, value_name = "NODE")]
    reachable: Vec<String>,

    /// Ask whether every execution is forced into one of these nodes
    #[arg(long, value_name = "NODE,NODE")]
    eventually: Vec<String>,

    /// Include the keys available to and produced by this node
    #[arg(long, value_name = "NODE")]
    keys: Vec<String>,

    /// Treat a branch with no provably taken edge as a possible stall
    #[arg(long)]
    strict_branches: bool,
  },

  /// Print the workflow graph
  Graph {
    /// Path to the workflow file (JSON)
    workflow_file: PathBuf,
  },
}

#[derive(Serialize)]
struct Report<'a> {
  workflow: &'a str,
  branch_policy: BranchPolicy,
  violations: Vec<SchemaViolation>,
  unreachable: Vec<&'a str>,
  reachable: BTreeMap<String, bool>,
  eventually: Vec<EventuallyReport>,
  #[serde(skip_serializing_if = "BTreeMap::is_empty")]
  keys: BTreeMap<String, KeysReport<'a>>,
}

/// `None` when the node never runs or does not exist.
#[derive(Serialize)]
struct KeysReport<'a> {
  input: Option<&'a Availability>,
  output: Option<&'a Availability>,
}

#[derive(Serialize)]
struct EventuallyReport {
  targets: Vec<String>,
  holds: bool,
}

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();

  match cli.command {
    Some(Commands::Check {
      workflow_file,
      reachable,
      eventually,
      keys,
      strict_branches,
    }) => {
      let queries = Queries {
        reachable,
        eventually,
        keys,
      };
      check(&workflow_file, &queries, strict_branches)?;
    }
    Some(Commands::Graph { workflow_file }) => {
      let (_, graph) = load(&workflow_file)?;
      print!("{graph}");
    }
    None => {
      println!("keyflow - use --help to see available commands");
    }
  }

  Ok(())
}

fn load(workflow_file: &Path) -> Result<(WorkflowDef, WorkflowGraph)> {
  let content = std::fs::read_to_string(workflow_file)
    .with_context(|| format!("failed to read workflow file: {}", workflow_file.display()))?;

  let def = WorkflowDef::from_json(&content)
    .with_context(|| format!("failed to parse workflow file: {}", workflow_file.display()))?;

  let graph = WorkflowGraph::from_def(&def)
    .with_context(|| format!("invalid workflow '{}'", def.name))?;

  info!(workflow = %def.name, nodes = graph.len(), edges = graph.edge_count(), "loaded workflow");
  Ok((def, graph))
}

struct Queries {
  reachable: Vec<String>,
  /// Each `--eventually` occurrence is one comma-separated target set.
  eventually: Vec<String>,
  keys: Vec<String>,
}

fn check(workflow_file: &Path, queries: &Queries, strict_branches: bool) -> Result<()> {
  let (def, graph) = load(workflow_file)?;

  let mut config = def.verifier;
  if strict_branches {
    config.branch_policy = BranchPolicy::Strict;
  }
  let verifier = Verifier::new(&graph, config);

  let report = Report {
    workflow: &def.name,
    branch_policy: verifier.config().branch_policy,
    violations: verifier.validate(),
    unreachable: verifier.unreachable_nodes(),
    reachable: queries
      .reachable
      .iter()
      .map(|name| (name.clone(), verifier.is_reachable(name)))
      .collect(),
    eventually: queries
      .eventually
      .iter()
      .map(|targets| {
        let targets: Vec<String> = targets
          .split(',')
          .map(str::trim)
          .filter(|t| !t.is_empty())
          .map(str::to_string)
          .collect();
        let holds = verifier.is_eventually_reached(&targets);
        EventuallyReport { targets, holds }
      })
      .collect(),
    keys: queries
      .keys
      .iter()
      .map(|name| {
        let keys = KeysReport {
          input: verifier.availability(name),
          output: verifier.output(name),
        };
        (name.clone(), keys)
      })
      .collect(),
  };

  println!("{}", serde_json::to_string_pretty(&report)?);

  if !report.violations.is_empty() {
    bail!(
      "workflow '{}' has {} schema violation(s)",
      def.name,
      report.violations.len()
    );
  }
  Ok(())
}
