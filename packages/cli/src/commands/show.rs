use std::collections::{HashMap, HashSet};

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use conceptmap_editor::{graph_bounds, DocumentStore, Node};
use conceptmap_workspace::fetch_document;

use super::Context;

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Document id
    pub id: String,

    /// Include nodes hidden by a collapsed ancestor
    #[arg(short, long)]
    pub all: bool,
}

/// One row of a document outline
#[derive(Debug, Clone, PartialEq)]
pub struct OutlineLine {
    pub depth: usize,
    pub id: String,
    pub label: String,
    pub collapsed: bool,
    pub hidden: bool,
    pub has_children: bool,
}

pub async fn show(args: ShowArgs, ctx: &Context) -> Result<()> {
    let document = fetch_document(&ctx.storage(), &args.id).await?;

    let mut store = DocumentStore::new();
    store.load_document(&document);
    let projection = store.project();
    let bounds = graph_bounds(projection.visible_nodes());
    let hidden = projection.hidden_node_ids().len();

    println!("{} {}", document.metadata.name.bold(), document.id.dimmed());
    println!("  updated {}", document.metadata.updated_at);
    println!(
        "  {} nodes ({} hidden), {} edges",
        projection.nodes.len(),
        hidden,
        projection.edges.len()
    );
    println!(
        "  bounds {:.0} × {:.0} at ({:.0}, {:.0})",
        bounds.width, bounds.height, bounds.min_x, bounds.min_y
    );
    println!();

    for line in outline(&projection.nodes) {
        if line.hidden && !args.all {
            continue;
        }

        let marker = match (line.has_children, line.collapsed) {
            (true, true) => "▸",
            (true, false) => "▾",
            (false, _) => "•",
        };
        let text = format!("{}{} {}", "  ".repeat(line.depth + 1), marker, line.label);
        if line.hidden {
            println!("{}", text.dimmed());
        } else {
            println!("{}", text);
        }
    }

    Ok(())
}

/// Depth-first outline over the logical parent tree.
///
/// Nodes whose parent is missing are roots. Nodes only reachable through a
/// parent cycle are emitted as roots once everything else is placed.
pub fn outline(nodes: &[Node]) -> Vec<OutlineLine> {
    let ids: HashSet<&str> = nodes.iter().map(|node| node.id.as_str()).collect();
    let mut children: HashMap<&str, Vec<&Node>> = HashMap::new();
    let mut roots = Vec::new();

    for node in nodes {
        match node.parent_id() {
            Some(parent) if parent != node.id && ids.contains(parent) => {
                children.entry(parent).or_default().push(node);
            }
            _ => roots.push(node),
        }
    }

    let mut lines = Vec::with_capacity(nodes.len());
    let mut visited: HashSet<&str> = HashSet::new();

    let leftovers = nodes.iter();
    for start in roots.into_iter().chain(leftovers) {
        if visited.contains(start.id.as_str()) {
            continue;
        }

        let mut stack = vec![(start, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            if !visited.insert(node.id.as_str()) {
                continue;
            }

            let kids = children.get(node.id.as_str());
            lines.push(OutlineLine {
                depth,
                id: node.id.clone(),
                label: node.data.label.clone(),
                collapsed: node.data.collapsed,
                hidden: node.hidden,
                has_children: kids.is_some_and(|kids| !kids.is_empty()),
            });

            if let Some(kids) = kids {
                stack.extend(kids.iter().rev().map(|kid| (*kid, depth + 1)));
            }
        }
    }

    lines
}
