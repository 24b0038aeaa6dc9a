use agt_common::formatter::format_record;
use agt_common::protocol::PageSnapshot;
use agt_common::{Document, NodeId, SearchScope};
use agt_engine::config::{ConfigLoader, InspectorConfig};
use agt_engine::{collect_element_data, is_own_element, relocate, relocate_in, relocate_through, synthesize};
use anyhow::{bail, Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "agt", version, about = "Synthesize and resolve element selectors on page snapshots")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Config file (default: ./agt.yaml, then ~/.agt/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(ClapArgs)]
struct SnapshotArg {
    /// Page snapshot (JSON) to operate on
    #[arg(long)]
    snapshot: PathBuf,
}

#[derive(Subcommand)]
enum Command {
    /// Print a selector for one element, or for every element
    Synthesize {
        #[command(flatten)]
        snapshot: SnapshotArg,
        /// Selector picking the element to describe
        #[arg(long, conflicts_with = "all", required_unless_present = "all")]
        target: Option<String>,
        /// Describe every selectable element
        #[arg(long)]
        all: bool,
        /// Emit JSON lines instead of tab-separated text
        #[arg(long)]
        json: bool,
    },
    /// Re-locate a stored selector
    Resolve {
        #[command(flatten)]
        snapshot: SnapshotArg,
        #[arg(long)]
        selector: String,
        /// Shadow host selector to descend into, outermost first (repeatable)
        #[arg(long = "host")]
        hosts: Vec<String>,
    },
    /// Build the selection record for an element
    Collect {
        #[command(flatten)]
        snapshot: SnapshotArg,
        #[arg(long)]
        target: String,
        /// Print a text summary instead of JSON
        #[arg(long)]
        text: bool,
    },
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    match args.command {
        Command::Synthesize {
            snapshot,
            target,
            json,
            ..
        } => {
            let (_, doc) = load_snapshot(&snapshot.snapshot)?;
            let nodes = match target {
                Some(selector) => vec![find_target(&doc, &selector)?],
                None => doc
                    .elements()
                    .filter(|&node| !is_own_element(&doc, node, &config.own_ui))
                    .collect(),
            };
            info!(count = nodes.len(), "synthesizing");
            for node in nodes {
                let candidate = synthesize(&doc, node);
                if json {
                    println!("{}", serde_json::to_string(&candidate)?);
                } else {
                    println!("{}\t{}", candidate.selector, candidate.strategy);
                }
            }
        }
        Command::Resolve {
            snapshot,
            selector,
            hosts,
        } => {
            let (_, doc) = load_snapshot(&snapshot.snapshot)?;
            let Some(node) = relocate_through(&doc, hosts.as_slice(), &selector) else {
                bail!("No element matches '{}'", selector);
            };
            let element = doc.element(node).context("Match is not an element")?;
            println!("{}\t{}", element.tag_name(), doc.text_content(node).trim());
        }
        Command::Collect {
            snapshot,
            target,
            text,
        } => {
            let (url, doc) = load_snapshot(&snapshot.snapshot)?;
            let node = find_target(&doc, &target)?;
            if is_own_element(&doc, node, &config.own_ui) {
                bail!("'{}' is part of the inspector's own UI", target);
            }
            let record = collect_element_data(&doc, node, &url, &config.collect, now_ms())
                .context("Target is not an element")?;
            if text {
                print!("{}", format_record(&record));
            } else {
                println!("{}", serde_json::to_string_pretty(&record)?);
            }
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<InspectorConfig> {
    let config = match path {
        Some(path) => ConfigLoader::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => ConfigLoader::load_default().context("Failed to load config")?,
    };
    Ok(config)
}

/// The page URL and its document.
fn load_snapshot(path: &Path) -> Result<(String, Document)> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
    let page = PageSnapshot::from_json(&content)
        .with_context(|| format!("Invalid snapshot {}", path.display()))?;
    let url = page.url.clone();
    let doc = page.into_document()?;
    debug!(nodes = doc.len(), url = %url, "snapshot loaded");
    Ok((url, doc))
}

/// First match in the document, then in each shadow root in tree order.
fn find_target(doc: &Document, selector: &str) -> Result<NodeId> {
    agt_query::parse(selector).with_context(|| format!("Invalid target selector '{}'", selector))?;

    if let Some(node) = relocate(doc, selector) {
        return Ok(node);
    }
    doc.elements()
        .filter_map(|host| doc.shadow_root_of(host))
        .find_map(|root| relocate_in(doc, SearchScope::Shadow(root), selector))
        .with_context(|| format!("No element matches '{}'", selector))
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
