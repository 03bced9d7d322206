//! 电梯派梯策略仿真
//!
//! 读取场景 JSON，运行一次（或成对/批量运行），每次运行打印一行汇总。

use clap::Parser;
use elevsim_rs::dispatch::{BankSelection, DispatchPolicy};
use elevsim_rs::metrics::TripSummary;
use elevsim_rs::run::{RunReport, run_batch, run_scenario};
use elevsim_rs::sim::ScenarioSpec;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "elevator-sim",
    about = "Compare elevator dispatch policies on identical seeded traffic"
)]
struct Args {
    /// Path to scenario.json
    #[arg(long)]
    scenario: PathBuf,

    /// Override dispatch policy: nearest, random or suitability
    #[arg(long)]
    policy: Option<DispatchPolicy>,

    /// Override which banks a passenger calls: narrowest, all or random
    #[arg(long)]
    bank_selection: Option<BankSelection>,

    /// Override the traffic seed
    #[arg(long)]
    seed: Option<u64>,

    /// Run nearest and random on the same traffic
    #[arg(long)]
    compare: bool,

    /// Number of consecutive seeds to run, starting at the scenario seed
    #[arg(long, default_value_t = 1)]
    seeds: u64,

    /// Write every run report (including trip records) as JSON
    #[arg(long)]
    report_json: Option<PathBuf>,
}

fn print_summary(report: &RunReport) {
    let s = TripSummary::from_records(&report.records);
    println!(
        "run policy={} seed={} calls={} trips={} mean_wait_s={:.3} p95_wait_s={:.3} max_wait_s={:.3} mean_transit_s={:.3} max_transit_s={:.3} events={} final={}",
        report.policy,
        report.seed,
        report.calls,
        s.trips,
        s.mean_wait,
        s.p95_wait,
        s.max_wait,
        s.mean_transit,
        s.max_transit,
        report.events,
        report.final_time,
    );
}

fn main() -> ExitCode {
    // 初始化 tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .init();

    let args = Args::parse();
    let raw = fs::read_to_string(&args.scenario).expect("read scenario.json");
    let mut spec: ScenarioSpec = match serde_json::from_str(&raw) {
        Ok(spec) => spec,
        Err(e) => {
            eprintln!("error: invalid scenario.json: {e}");
            return ExitCode::from(2);
        }
    };
    if let Some(policy) = args.policy {
        spec.dispatch_policy = policy;
    }
    if let Some(selection) = args.bank_selection {
        spec.bank_selection = selection;
    }
    if let Some(seed) = args.seed {
        spec.arrival.seed = seed;
    }

    let policies = if args.compare {
        vec![DispatchPolicy::nearest(), DispatchPolicy::Random]
    } else {
        vec![spec.dispatch_policy]
    };
    let first = spec.arrival.seed;
    let seeds: Vec<u64> = (0..args.seeds.max(1))
        .map(|i| first.wrapping_add(i))
        .collect();

    let result = if seeds.len() == 1 && policies.len() == 1 {
        run_scenario(&spec).map(|r| vec![r])
    } else {
        run_batch(&spec, &seeds, &policies)
    };
    let reports = match result {
        Ok(reports) => reports,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(2);
        }
    };

    for report in &reports {
        print_summary(report);
    }

    if let Some(path) = args.report_json {
        let json = serde_json::to_string_pretty(&reports).expect("serialize reports");
        fs::write(&path, json).expect("write report json");
    }
    ExitCode::SUCCESS
}
