//! 场景帧循环
//!
//! 加载 scenario.json，按固定帧数推进世界，输出角色位置与寻路统计。

use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use worldsim_rs::path::SearchStats;
use worldsim_rs::scenario::ScenarioSpec;
use worldsim_rs::sim::Frame;
use worldsim_rs::world::{ActorId, ActorKind, Position};

#[derive(Debug, Parser)]
#[command(name = "tick-sim", about = "Run a scenario.json through the frame-driven world simulation")]
struct Args {
    /// Path to scenario.json
    #[arg(long)]
    scenario: PathBuf,

    /// Number of frames to run
    #[arg(long, default_value_t = 200)]
    frames: u64,

    /// Print the final report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct ActorReport {
    id: ActorId,
    name: String,
    kind: ActorKind,
    position: Option<Position>,
    steps: u64,
    walking: bool,
    idle: bool,
}

#[derive(Debug, Serialize)]
struct RunReport {
    frame: Frame,
    executed_events: u64,
    pending_events: usize,
    chunks: usize,
    active_chunks: usize,
    chunk_crossings: usize,
    pathfinding: SearchStats,
    actors: Vec<ActorReport>,
}

fn main() -> ExitCode {
    // 初始化 tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let built = ScenarioSpec::load(&args.scenario).and_then(|spec| spec.build());
    let (mut sim, mut world) = match built {
        Ok(pair) => pair,
        Err(err) => {
            eprintln!("tick-sim: {err}");
            return ExitCode::FAILURE;
        }
    };

    sim.run_until(Frame(args.frames), &mut world);

    let chunk_crossings = world.drain_transitions().len();
    let report = RunReport {
        frame: sim.now(),
        executed_events: sim.executed(),
        pending_events: sim.pending(),
        chunks: world.chunks.chunk_count(),
        active_chunks: world.active_chunks().len(),
        chunk_crossings,
        pathfinding: world.pathfinder.usage_stats(),
        actors: world
            .actors()
            .map(|a| ActorReport {
                id: a.id(),
                name: a.name().to_string(),
                kind: a.kind(),
                position: world.chunks.actor_position(a.id()),
                steps: a.steps(),
                walking: a.is_walking(),
                idle: a.destination().is_none(),
            })
            .collect(),
    };

    if args.json {
        match serde_json::to_string_pretty(&report) {
            Ok(out) => println!("{out}"),
            Err(err) => {
                eprintln!("tick-sim: encode report: {err}");
                return ExitCode::FAILURE;
            }
        }
        return ExitCode::SUCCESS;
    }

    println!(
        "done @ {:?}, events={}, searches={}, expanded={}, crossings={}",
        report.frame,
        report.executed_events,
        report.pathfinding.searches,
        report.pathfinding.expanded,
        report.chunk_crossings
    );
    for actor in &report.actors {
        match actor.position {
            Some(p) => println!(
                "actor {} {:?} {} at {} steps={} idle={}",
                actor.id.0, actor.kind, actor.name, p, actor.steps, actor.idle
            ),
            None => println!("actor {} {} not placed", actor.id.0, actor.name),
        }
    }
    ExitCode::SUCCESS
}
