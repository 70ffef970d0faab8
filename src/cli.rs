/*!
# CLI surface

`clap`-derived arguments for the `ratwalk-sim` binary. `-z` alone (without
a step count and rat file) runs partition-inspection-only.
*/

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "ratwalk-sim",
    about = "Distributed biased-random-walk simulation over a partitioned grid graph"
)]
pub struct Cli {
    /// Graph file: header, node declarations, sorted edges, regions.
    #[arg(short = 'g', long = "graph", value_name = "FILE")]
    pub graph_file: PathBuf,

    /// Rat file: header `N R` followed by `R` initial node ids.
    /// Omit to run in partition-inspection-only mode.
    #[arg(short = 'r', long = "rats", value_name = "FILE")]
    pub rat_file: Option<PathBuf>,

    /// Number of simulation steps. Omit to run in partition-inspection-only
    /// mode.
    #[arg(short = 'n', long = "steps")]
    pub step_count: Option<u32>,

    /// Global PRNG seed shared by every rat's initial state.
    #[arg(short = 's', long = "seed", default_value_t = 0)]
    pub global_seed: u32,

    /// Emit a display tick every this many steps.
    #[arg(short = 'i', long = "display-interval", default_value_t = 1)]
    pub display_interval: u32,

    /// Suppress the step output stream.
    #[arg(short = 'q', long = "quiet", default_value_t = false)]
    pub quiet: bool,

    /// Enable instrumentation logging (zone-tagged step/batch spans).
    #[arg(short = 'I', long = "instrument", default_value_t = false)]
    pub instrument: bool,

    /// Number of zones to partition the graph into.
    #[arg(short = 'z', long = "zones")]
    pub zone_count: u32,
}

impl Cli {
    /// Whether this invocation has everything needed to run the simulation,
    /// as opposed to partition-inspection-only.
    pub fn drives_full_simulation(&self) -> bool {
        self.rat_file.is_some() && self.step_count.is_some()
    }
}

/// The configuration surface for one run, assembled once in `main()` from
/// parsed CLI arguments and threaded explicitly into graph/rat loading and
/// per-worker setup, rather than read back out of `Cli` (or any ambient
/// global) at each call site.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub graph_file: PathBuf,
    pub rat_file: Option<PathBuf>,
    pub step_count: Option<u32>,
    pub global_seed: u32,
    pub display_interval: u32,
    pub quiet: bool,
    pub zone_count: u32,
}

impl RunConfig {
    /// Whether this run has everything needed to drive the simulation, as
    /// opposed to partition-inspection-only.
    pub fn drives_full_simulation(&self) -> bool {
        self.rat_file.is_some() && self.step_count.is_some()
    }
}

impl From<&Cli> for RunConfig {
    fn from(cli: &Cli) -> Self {
        RunConfig {
            graph_file: cli.graph_file.clone(),
            rat_file: cli.rat_file.clone(),
            step_count: cli.step_count,
            global_seed: cli.global_seed,
            display_interval: cli.display_interval,
            quiet: cli.quiet,
            zone_count: cli.zone_count,
        }
    }
}
