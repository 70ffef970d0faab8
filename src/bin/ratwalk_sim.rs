//! `ratwalk-sim`: loads a graph and rat file, partitions into zones, and
//! runs the distributed batched-move simulation.

use std::process::ExitCode;
use std::sync::Arc;
use std::thread;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::error;

use ratwalk::cli::{Cli, RunConfig};
use ratwalk::graph::{assign_graph_zones, parse_graph, Graph};
use ratwalk::rats::parse_rats;
use ratwalk::sim::transport::make_transports;
use ratwalk::sim::worker::{run_worker, WorkerConfig};

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.instrument {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::new("debug"))
            .with_writer(std::io::stderr)
            .try_init();
    }

    let config = RunConfig::from(&cli);

    let result = if config.drives_full_simulation() {
        run_full_simulation(&config)
    } else {
        run_inspection_only(&config)
    };

    // The last line on stdout is always DONE, success or failure.
    println!("DONE");

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ratwalk-sim: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn load_graph(config: &RunConfig) -> Result<Graph> {
    let mut graph = parse_graph(&config.graph_file)
        .with_context(|| format!("loading graph file {}", config.graph_file.display()))?;
    assign_graph_zones(&mut graph, config.zone_count as usize)
        .context("assigning regions to zones")?;
    Ok(graph)
}

fn run_inspection_only(config: &RunConfig) -> Result<()> {
    let graph = load_graph(config)?;

    println!(
        "partition inspection: {} x {} grid, {} zones",
        graph.width, graph.height, config.zone_count
    );
    for (idx, region) in graph.regions.iter().enumerate() {
        println!(
            "region {idx}: ({}, {}, {}, {}) node_count={} edge_count={} zone={}",
            region.x, region.y, region.w, region.h, region.node_count, region.edge_count, region.zone_id
        );
    }
    Ok(())
}

fn run_full_simulation(config: &RunConfig) -> Result<()> {
    let graph = load_graph(config)?;
    let rat_file_path = config.rat_file.as_ref().expect("checked by drives_full_simulation");
    let step_count = config.step_count.expect("checked by drives_full_simulation");

    let rats = parse_rats(rat_file_path, graph.node_count())
        .with_context(|| format!("loading rat file {}", rat_file_path.display()))?;

    let graph = Arc::new(graph);
    let positions = Arc::new(rats.positions);
    let total_rats = positions.len();
    let width = graph.width;
    let height = graph.height;
    let quiet = config.quiet;

    let transports = make_transports(config.zone_count);
    let mut handles = Vec::with_capacity(config.zone_count as usize);

    for (zone, transport) in transports.into_iter().enumerate() {
        let graph = Arc::clone(&graph);
        let positions = Arc::clone(&positions);
        let worker_config = WorkerConfig {
            this_zone: zone as u32,
            global_seed: config.global_seed,
            step_count,
            display_interval: config.display_interval,
            quiet,
        };

        handles.push(thread::spawn(move || -> Result<(), ratwalk::error::RatwalkError> {
            let is_root = zone == 0;
            run_worker(&graph, &positions, &worker_config, &transport, move |snapshot| {
                if !is_root {
                    return;
                }
                println!("STEP {} {} {}", width, height, total_rats);
                let mut counts = vec![0u32; (width * height) as usize];
                for &(node, count) in snapshot {
                    counts[node as usize] = count;
                }
                for count in counts {
                    println!("{}", count);
                }
                println!("END");
            })
        }));
    }

    let mut first_error = None;
    for (zone, handle) in handles.into_iter().enumerate() {
        match handle.join() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                error!(zone, "worker failed: {e}");
                eprintln!("zone {zone}: {e}");
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
            Err(_) => {
                eprintln!("zone {zone}: worker thread panicked");
                if first_error.is_none() {
                    first_error = Some(ratwalk::error::RatwalkError::transport_failure(
                        "worker thread panicked",
                    ));
                }
            }
        }
    }

    match first_error {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}
