//! Rule graph CLI.
//!
//! Provides the `rulegraph` binary for working with rules kept in a
//! [`JsonDirStore`] directory:
//!
//! - `list`: print the rules in the store
//! - `inspect`: print a rule's nodes (with their resolved ports) and edges
//! - `check`: audit a rule's graph against the operator catalog
//!
//! Reads the store directory from `RULEGRAPH_STORE` when `--store` is absent.
//!
//! Results are printed as JSON on stdout; logs go to stderr.

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use serde::Serialize;

use rulegraph_check::{shape_of, Finding};
use rulegraph_core::{Edge, NodeCategory, NodeId, PortType};
use rulegraph_session::{MutationSession, SessionConfig, SessionError};
use rulegraph_storage::{decode, JsonDirStore, RuleId, RuleStore, StorageError};

/// Transformation rule graph tools.
#[derive(Parser)]
#[command(name = "rulegraph", about = "Transformation rule graph tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// List the rules in a store.
    List {
        /// Store directory.
        #[arg(short, long, env = "RULEGRAPH_STORE")]
        store: PathBuf,
    },

    /// Show a rule's nodes and edges.
    Inspect {
        /// Store directory.
        #[arg(short, long, env = "RULEGRAPH_STORE")]
        store: PathBuf,

        /// Rule ID to inspect.
        #[arg(short, long)]
        rule: String,
    },

    /// Report stale edges and unresolved operators in a rule.
    Check {
        /// Store directory.
        #[arg(short, long, env = "RULEGRAPH_STORE")]
        store: PathBuf,

        /// Rule ID to check.
        #[arg(short, long)]
        rule: String,
    },
}

fn main() {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::List { store } => run_list(&store),
        Commands::Inspect { store, rule } => run_inspect(&store, &rule),
        Commands::Check { store, rule } => run_check(&store, &rule),
    };
    process::exit(exit_code);
}

/// A node as printed by `inspect`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NodeView<'a> {
    id: &'a NodeId,
    category: NodeCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<&'a str>,
    inputs: Vec<PortType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    output: Option<PortType>,
    /// Set when the node's operator is missing from the catalog.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    unresolved: bool,
}

#[derive(Serialize)]
struct InspectView<'a> {
    rule: &'a RuleId,
    nodes: Vec<NodeView<'a>>,
    edges: Vec<&'a Edge>,
}

#[derive(Serialize)]
struct CheckView<'a> {
    rule: &'a RuleId,
    findings: &'a [Finding],
}

/// Execute the list subcommand.
///
/// Returns exit code: 0 = success, 2 = unreadable metadata, 3 = I/O error.
fn run_list(store_path: &Path) -> i32 {
    let store = match open_store(store_path) {
        Ok(s) => s,
        Err(code) => return code,
    };
    match store.list_rules() {
        Ok(rules) => {
            print_json(&rules);
            0
        }
        Err(e) => {
            eprintln!("Error: failed to list rules: {}", e);
            storage_exit_code(&e)
        }
    }
}

/// Execute the inspect subcommand.
///
/// Returns exit code: 0 = success, 2 = load/decode failure, 3 = I/O error.
fn run_inspect(store_path: &Path, rule: &str) -> i32 {
    let store = match open_store(store_path) {
        Ok(s) => s,
        Err(code) => return code,
    };
    let rule_id = RuleId::from(rule);

    let (dto, catalog) = match store
        .load_rule(&rule_id)
        .and_then(|dto| Ok((dto, store.operator_catalog()?)))
    {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: failed to load rule {}: {}", rule_id, e);
            return storage_exit_code(&e);
        }
    };
    let graph = match decode(&dto) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("Error: rule {} cannot be decoded: {}", rule_id, e);
            return 2;
        }
    };

    let nodes = graph
        .nodes()
        .map(|node| {
            let shape = shape_of(node, &catalog).ok();
            NodeView {
                id: &node.id,
                category: node.category(),
                label: node.label(),
                inputs: shape
                    .as_ref()
                    .map(|s| s.inputs.to_vec())
                    .unwrap_or_default(),
                output: shape.as_ref().and_then(|s| s.output),
                unresolved: shape.is_none(),
            }
        })
        .collect();
    print_json(&InspectView {
        rule: &rule_id,
        nodes,
        edges: graph.edges().collect(),
    });
    0
}

/// Execute the check subcommand.
///
/// Returns exit code: 0 = no findings, 1 = findings reported,
/// 2 = load/decode failure, 3 = I/O error. Node footprints play no part in
/// an audit, so the session runs on the built-in config.
fn run_check(store_path: &Path, rule: &str) -> i32 {
    let store = match open_store(store_path) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let rule_id = RuleId::from(rule);
    let session = match MutationSession::open(store, rule_id.clone(), SessionConfig::default()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: failed to open rule {}: {}", rule_id, e);
            return session_exit_code(&e);
        }
    };

    let findings = session.audit();
    tracing::debug!(rule = %rule_id, findings = findings.len(), "audit complete");
    print_json(&CheckView {
        rule: &rule_id,
        findings: &findings,
    });
    if findings.is_empty() {
        0
    } else {
        eprintln!("Rule {} has {} problem(s):", rule_id, findings.len());
        for finding in &findings {
            eprintln!("  - {}", finding);
        }
        1
    }
}

fn open_store(path: &Path) -> Result<JsonDirStore, i32> {
    JsonDirStore::open(path).map_err(|e| {
        eprintln!("Error: failed to open store '{}': {}", path.display(), e);
        storage_exit_code(&e)
    })
}

fn storage_exit_code(e: &StorageError) -> i32 {
    match e {
        StorageError::Io { .. } | StorageError::InvalidStore { .. } => 3,
        StorageError::Serialization(_)
        | StorageError::RuleNotFound(_)
        | StorageError::InvalidRuleId(_) => 2,
    }
}

fn session_exit_code(e: &SessionError) -> i32 {
    match e {
        SessionError::Storage(e) => storage_exit_code(e),
        _ => 2,
    }
}

fn print_json<T: Serialize>(value: &T) {
    let json = serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize result: {}\"}}", e));
    println!("{}", json);
}
