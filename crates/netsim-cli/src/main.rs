//! A thin binary exercising the whole pipeline end to end: parse a model file, run one
//! simulation tick, print a textual summary of routed/unrouted LSPs and demands and interface
//! utilization. Stands in for "the interactive pretty-printer" named out of scope for the core
//! (§6) — no REPL, no interactive failure injection, just one shot through `simulate()`.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use netsim_core::{DemandPath, LspPath};

#[derive(Debug, clap::Parser)]
#[command(about = "Simulate an IP/MPLS network from a declarative model file")]
struct Args {
    /// Path to a tab-separated model file (INTERFACES_TABLE / NODES_TABLE / DEMANDS_TABLE /
    /// RSVP_LSP_TABLE), or a JSON network document when `--json` is given.
    model: PathBuf,

    /// Treat `model` as a JSON network document instead of a tab-separated model file.
    #[arg(long)]
    json: bool,

    /// Seeds the LSP placement tie-break RNG.
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut network = if args.json {
        netsim_loader::load_network_json(&args.model, args.seed)
            .with_context(|| format!("loading JSON network document {}", args.model.display()))?
    } else {
        netsim_loader::load_model_file(&args.model, args.seed)
            .with_context(|| format!("loading model file {}", args.model.display()))?
    };

    network
        .simulate()
        .context("simulation tick failed validation")?;

    print_summary(&network);
    Ok(())
}

fn print_summary(network: &netsim_core::Network) {
    println!("== LSPs ==");
    for lsp in network.lsps() {
        match &lsp.path {
            LspPath::Routed { interfaces, baseline_path_cost } => {
                println!(
                    "  {} routed: {} hop(s), cost {}, setup_bandwidth {}",
                    lsp.name,
                    interfaces.len(),
                    baseline_path_cost,
                    lsp.setup_bandwidth.value().map(|b| b.to_string()).unwrap_or_default(),
                );
            }
            LspPath::Unrouted => println!("  {} UNROUTED", lsp.name),
        }
    }

    println!("== Demands ==");
    for demand in network.demands() {
        match &demand.path {
            DemandPath::ViaLsps(ids) => {
                println!("  {} via {} lsp(s)", demand.name, ids.len());
            }
            DemandPath::ViaEcmp(paths) => {
                println!("  {} via {} ecmp path(s)", demand.name, paths.len());
            }
            DemandPath::Unrouted => println!("  {} UNROUTED", demand.name),
        }
    }

    println!("== Interfaces ==");
    for iface in network.interfaces() {
        let node = network
            .nodes()
            .get(iface.node.inner())
            .map(|n| n.name.as_str())
            .unwrap_or("?");
        println!(
            "  {}/{}: traffic={} reserved={} capacity={} utilization={:.2}%",
            node,
            iface.name,
            iface.traffic,
            iface.reserved_bandwidth,
            iface.capacity,
            iface.utilization() * 100.0,
        );
    }
}
