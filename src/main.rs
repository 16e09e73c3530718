//! Command-line route finder over a synthetic city grid.

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use routefinder::graph::grid::GridCity;
use routefinder::{
    AStar, Algorithm, BreadthFirst, ClassicDfs, Constraint, DepthFirst, DistanceConstraint,
    LocationIndex, NodeLimitConstraint, PathfindingService, RoadGraph, SameLocationConstraint,
    SearchResult,
};


#[derive(Clone, Copy, Debug, ValueEnum)]
enum AlgorithmArg {
    /// Breadth-first, every path tied for fewest hops
    Bfs,
    /// Exhaustive depth-first over simple paths
    Dfs,
    /// Stack-based depth-first with alternative routes
    ClassicDfs,
    /// A* with straight-line heuristic and weighted alternatives
    Astar,
}

impl From<AlgorithmArg> for Algorithm {
    fn from(arg: AlgorithmArg) -> Self {
        match arg {
            AlgorithmArg::Bfs => Algorithm::BreadthFirst(BreadthFirst),
            AlgorithmArg::Dfs => Algorithm::DepthFirst(DepthFirst),
            AlgorithmArg::ClassicDfs => Algorithm::ClassicDfs(ClassicDfs::default()),
            AlgorithmArg::Astar => Algorithm::AStar(AStar::default()),
        }
    }
}


/// Find routes between named places
#[derive(Debug, Parser)]
#[command(name = "routefinder", version, about)]
struct Cli {
    /// Start place name
    #[arg(long)]
    from: Option<String>,

    /// Destination place name
    #[arg(long)]
    to: Option<String>,

    #[arg(short, long, value_enum, default_value_t = AlgorithmArg::Bfs)]
    algorithm: AlgorithmArg,

    /// Maximum number of paths to return
    #[arg(long)]
    max_paths: Option<usize>,

    /// Reject paths with more nodes than this
    #[arg(long)]
    max_nodes: Option<usize>,

    /// Reject paths longer than this many metres
    #[arg(long)]
    max_distance: Option<f64>,

    /// Treat identical start and destination as a failure
    #[arg(long)]
    reject_same_location: bool,

    /// Run every algorithm and compare
    #[arg(long)]
    compare: bool,

    /// Print each path as soon as it is found
    #[arg(long, conflicts_with = "compare")]
    stream: bool,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// List known places and exit
    #[arg(long)]
    list: bool,

    #[arg(long, default_value_t = 12)]
    rows: usize,

    #[arg(long, default_value_t = 12)]
    cols: usize,

    /// Seed for the generated street grid
    #[arg(long, default_value_t = 7)]
    seed: u64,
}

impl Cli {
    fn constraints(&self) -> Vec<Box<dyn Constraint>> {
        let mut constraints: Vec<Box<dyn Constraint>> = Vec::new();
        if let Some(max_nodes) = self.max_nodes {
            constraints.push(Box::new(NodeLimitConstraint::new(max_nodes)));
        }
        if let Some(max_distance) = self.max_distance {
            constraints.push(Box::new(DistanceConstraint::new(max_distance)));
        }
        if self.reject_same_location {
            constraints.push(Box::new(SameLocationConstraint));
        }
        constraints
    }
}


fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let city = GridCity { rows: cli.rows, cols: cli.cols, seed: cli.seed, ..GridCity::default() };
    let graph = city.build();
    info!(nodes = graph.node_count(), edges = graph.edge_count(), "city loaded");

    let mut locations = LocationIndex::with_nodes(&graph, graph.nodes())?;
    for (name, point) in city.landmarks() {
        locations.register_at(name, point)?;
    }

    if cli.list {
        for (i, name) in locations.names().enumerate() {
            println!("{}. {name}", i + 1);
        }
        return Ok(());
    }

    let (Some(from), Some(to)) = (&cli.from, &cli.to) else {
        bail!("both --from and --to are required, use --list to see known places");
    };
    let start = locations.resolve(from).context("resolving start")?;
    let goal = locations.resolve(to).context("resolving destination")?;

    let constraints = cli.constraints();
    let service = PathfindingService::new(graph, cli.algorithm.into());

    if cli.stream {
        for (i, report) in service.stream_paths(start, goal, &constraints, cli.max_paths)?.enumerate() {
            if cli.json {
                println!("{}", serde_json::to_string(&report)?);
            } else {
                println!("Path {} ({}): {} steps, cost {:.2}", i + 1, report.algorithm, report.steps, report.cost);
            }
        }
        return Ok(());
    }

    let results = if cli.compare {
        service.compare_algorithms(start, goal, &constraints, cli.max_paths)
    } else {
        vec![service.find_paths(start, goal, &constraints, cli.max_paths)]
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        for result in &results {
            print_result(&service, result);
        }
    }

    Ok(())
}

fn print_result(service: &PathfindingService<RoadGraph>, result: &SearchResult) {
    println!("{}", result.summary());
    for line in result.path_details(service.graph()) {
        println!("  {line}");
    }
    println!("  Explored nodes: {}", result.visited_nodes.len());
    println!();
}
