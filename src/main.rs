use anyhow::{Context, Result, bail};
use clap::Parser;
use cpu_sched_sim::{
    Algorithm, ProcessSpec, Report, Ticks,
    core::Priority,
    scheduler::DEFAULT_QUANTUM,
    sim::{WorkloadConfig, bernoulli_workload, parse_numbers},
    simulate,
};
use tracing_subscriber::EnvFilter;

/// CPU scheduling simulator.
#[derive(Parser, Debug)]
#[command(name = "cpu-sched", version, about)]
struct Cli {
    /// Algorithm: fcfs, sjf, srtf, rr, pnp or pp
    #[arg(short, long, default_value = "fcfs")]
    algo: Algorithm,

    /// Arrival times, separated by spaces or commas
    #[arg(long)]
    arrival: Option<String>,

    /// Burst times, one per arrival
    #[arg(long)]
    burst: Option<String>,

    /// Priorities, one per arrival (lower runs first)
    #[arg(long)]
    priority: Option<String>,

    /// Round-Robin time quantum; 0 lets every slice run to completion
    #[arg(short, long, default_value_t = DEFAULT_QUANTUM)]
    quantum: Ticks,

    /// Generate a random workload spanning this many ticks
    #[arg(long, conflicts_with_all = ["arrival", "burst", "priority"])]
    random: Option<Ticks>,

    /// Seed for --random
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Run every algorithm on the workload and print a comparison
    #[arg(long)]
    compare: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let specs = workload(&cli)?;

    if cli.compare {
        print_comparison(&specs, cli.quantum)?;
        return Ok(());
    }

    let algorithm = cli.algo.with_quantum(cli.quantum);
    let report = simulate(algorithm, specs).context("simulation rejected the workload")?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report, algorithm.uses_priority());
    }
    Ok(())
}

fn workload(cli: &Cli) -> Result<Vec<ProcessSpec>> {
    if let Some(ticks) = cli.random {
        let config = WorkloadConfig {
            seed: cli.seed,
            ticks,
            ..WorkloadConfig::default()
        };
        let specs = bernoulli_workload(&config);
        if specs.is_empty() {
            bail!("random workload over {ticks} ticks produced no processes, try another --seed");
        }
        return Ok(specs);
    }

    let (Some(arrival), Some(burst)) = (&cli.arrival, &cli.burst) else {
        bail!("either --arrival and --burst, or --random, is required");
    };
    let arrivals: Vec<Ticks> = parse_numbers(arrival).context("invalid --arrival")?;
    let bursts: Vec<Ticks> = parse_numbers(burst).context("invalid --burst")?;
    let priorities: Option<Vec<Priority>> = cli
        .priority
        .as_deref()
        .map(parse_numbers::<Priority>)
        .transpose()
        .context("invalid --priority")?;

    Ok(ProcessSpec::from_columns(
        &arrivals,
        &bursts,
        priorities.as_deref(),
    )?)
}

fn print_report(report: &Report, with_priority: bool) {
    println!("{}", report.algorithm);
    if let Some(quantum) = report.quantum {
        println!("Time Quantum: {quantum}");
    }
    println!();

    let mut header = vec!["Process"];
    if with_priority {
        header.push("Priority");
    }
    header.extend(["Arrival", "Burst", "End", "Turnaround", "Waiting"]);
    println!(
        "{}",
        header
            .iter()
            .map(|h| format!("{h:>10}"))
            .collect::<String>()
    );

    for row in &report.processes {
        let mut cells = vec![row.name.clone()];
        if with_priority {
            cells.push(row.priority.to_string());
        }
        cells.extend(
            [
                row.arrival,
                row.burst,
                row.completion,
                row.turnaround,
                row.waiting,
            ]
            .map(|v| v.to_string()),
        );
        println!(
            "{}",
            cells.iter().map(|c| format!("{c:>10}")).collect::<String>()
        );
    }

    println!();
    println!("CPU Utilization: {:.2}%", report.cpu_utilization * 100.0);
    println!("Average Turnaround Time: {:.2}", report.average_turnaround);
    println!("Average Waiting Time: {:.2}", report.average_waiting);
    println!();
    print!("{}", report.gantt());
}

fn print_comparison(specs: &[ProcessSpec], quantum: Ticks) -> Result<()> {
    println!(
        "{:<32}{:>12}{:>12}{:>12}",
        "Algorithm", "Turnaround", "Waiting", "CPU %"
    );
    for algorithm in Algorithm::all(quantum) {
        let report = simulate(algorithm, specs.to_vec())
            .with_context(|| format!("{algorithm} rejected the workload"))?;
        println!(
            "{:<32}{:>12.2}{:>12.2}{:>12.2}",
            report.algorithm,
            report.average_turnaround,
            report.average_waiting,
            report.cpu_utilization * 100.0
        );
    }
    Ok(())
}
