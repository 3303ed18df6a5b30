//! Operator Console
//!
//! Headless driver for the match supervisor: reads an arena configuration,
//! then processes line-oriented input on stdin. Plain lines are operator
//! commands (`run`, `pause`, `reset`, `relocate,N`, ...); lines starting
//! with `#` are simulation directives that stand in for the physics side
//! (robot poses, velocities, controller packets, tick advance). Outbound
//! status is printed to stdout, one message per line.

use std::fs;
use std::io::{self, BufRead};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use sr_core::engine::{encode_packet, TICK_SECONDS};
use sr_core::{
    ArenaConfig, ControllerHost, MatchSupervisor, ReportWriter, RobotId, StatusSink, StatusUpdate,
    TelemetryProvider, Vec3, ROBOT_COUNT,
};

#[derive(Parser)]
#[command(name = "sr_console")]
#[command(about = "Run a rescue-arena match from the terminal", long_about = None)]
struct Cli {
    /// Arena configuration JSON file
    #[arg(long)]
    config: PathBuf,

    /// Directory for end-of-match report files
    #[arg(long, default_value = ".")]
    report_dir: PathBuf,

    /// Directory where loaded controller programs are written
    #[arg(long, default_value = "controllers")]
    controller_dir: PathBuf,
}

/// In-memory stand-in for the physics simulation's per-robot fields,
/// mutated by `#` directives between ticks.
#[derive(Debug)]
struct ConsoleTelemetry {
    positions: [Vec3; ROBOT_COUNT],
    velocities: [Vec3; ROBOT_COUNT],
}

impl ConsoleTelemetry {
    fn new() -> Self {
        Self {
            positions: [Vec3::default(); ROBOT_COUNT],
            velocities: [Vec3::default(); ROBOT_COUNT],
        }
    }
}

impl TelemetryProvider for ConsoleTelemetry {
    fn position(&self, robot: RobotId) -> Vec3 {
        self.positions[robot]
    }

    fn set_position(&mut self, robot: RobotId, pos: Vec3) {
        self.positions[robot] = pos;
    }

    fn set_rotation_yaw(&mut self, robot: RobotId, yaw: f64) {
        log::debug!("robot {} heading set to {:.3} rad", robot, yaw);
    }

    fn velocity(&self, robot: RobotId) -> Vec3 {
        self.velocities[robot]
    }

    fn set_speed_cap(&mut self, robot: RobotId, cap: f64) {
        log::debug!("robot {} speed cap set to {:.2}", robot, cap);
    }

    fn remove(&mut self, robot: RobotId) {
        self.velocities[robot] = Vec3::default();
    }
}

/// Persists controller programs as files so an external runner can pick
/// them up; unload deletes the file.
struct FileControllerHost {
    dir: PathBuf,
}

impl FileControllerHost {
    fn new(dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&dir)
            .with_context(|| format!("creating controller directory {}", dir.display()))?;
        Ok(Self { dir })
    }

    fn path_for(&self, robot: RobotId) -> PathBuf {
        self.dir.join(format!("robot{}.py", robot))
    }
}

impl ControllerHost for FileControllerHost {
    fn load(&mut self, robot: RobotId, source: &str) {
        let path = self.path_for(robot);
        if let Err(err) = fs::write(&path, source) {
            log::warn!("failed to write controller {}: {}", path.display(), err);
        }
    }

    fn unload(&mut self, robot: RobotId) {
        let path = self.path_for(robot);
        if path.exists() {
            if let Err(err) = fs::remove_file(&path) {
                log::warn!("failed to remove controller {}: {}", path.display(), err);
            }
        }
    }
}

/// One status message per stdout line, in wire text.
struct StdoutSink;

impl StatusSink for StdoutSink {
    fn send(&mut self, update: StatusUpdate) {
        println!("{}", update);
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let raw = fs::read_to_string(&cli.config)
        .with_context(|| format!("reading arena config {}", cli.config.display()))?;
    let config = ArenaConfig::from_json(&raw)
        .with_context(|| format!("parsing arena config {}", cli.config.display()))?;

    let mut supervisor = MatchSupervisor::new(config)?;
    let mut telemetry = ConsoleTelemetry::new();
    let mut host = FileControllerHost::new(cli.controller_dir)?;
    let mut sink = StdoutSink;
    let reports = ReportWriter::new(cli.report_dir);

    supervisor.startup(&mut sink);
    log::info!("arena loaded, awaiting operator input");

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("reading operator input")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(directive) = line.strip_prefix('#') {
            apply_directive(directive, &mut supervisor, &mut telemetry, &mut host, &mut sink);
        } else {
            supervisor.step(TICK_SECONDS, &mut telemetry, &mut host, &mut sink, Some(line));
        }

        flush_report(&mut supervisor, &reports);
    }

    // Stdin closed: flush a final report for whatever state the match is in.
    if !supervisor.is_finished() {
        supervisor.terminate();
        supervisor.step(TICK_SECONDS, &mut telemetry, &mut host, &mut sink, None);
        flush_report(&mut supervisor, &reports);
    }

    Ok(())
}

/// Simulation directives:
///   `#add N`            insert robot N at its start position
///   `#pose N x y z`     set robot N's position
///   `#vel N x y z`      set robot N's velocity
///   `#packet N x z C`   post a controller packet (centimetres, type char)
///   `#tick [n]`         advance n evaluation passes (default 1)
fn apply_directive(
    directive: &str,
    supervisor: &mut MatchSupervisor,
    telemetry: &mut ConsoleTelemetry,
    host: &mut FileControllerHost,
    sink: &mut StdoutSink,
) {
    let mut parts = directive.split_whitespace();
    let verb = match parts.next() {
        Some(verb) => verb,
        None => return,
    };
    let args: Vec<&str> = parts.collect();

    match verb {
        "add" => {
            if let Some(robot) = parse_robot(&args, 0) {
                supervisor.add_robot(robot, telemetry, sink);
            }
        }
        "pose" => {
            if let (Some(robot), Some(v)) = (parse_robot(&args, 0), parse_vec3(&args, 1)) {
                telemetry.positions[robot] = v;
            }
        }
        "vel" => {
            if let (Some(robot), Some(v)) = (parse_robot(&args, 0), parse_vec3(&args, 1)) {
                telemetry.velocities[robot] = v;
            }
        }
        "packet" => {
            let robot = parse_robot(&args, 0);
            let x_cm = args.get(1).and_then(|s| s.parse::<i32>().ok());
            let z_cm = args.get(2).and_then(|s| s.parse::<i32>().ok());
            let code = args.get(3).and_then(|s| s.chars().next());
            if let (Some(robot), Some(x), Some(z), Some(code)) = (robot, x_cm, z_cm, code) {
                supervisor.post_packet(&encode_packet(robot, x, z, code));
            } else {
                log::warn!("malformed packet directive: {:?}", directive);
            }
        }
        "tick" => {
            let count = args
                .first()
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            for _ in 0..count {
                supervisor.step(TICK_SECONDS, telemetry, host, sink, None);
            }
        }
        _ => log::warn!("unknown directive: {:?}", directive),
    }
}

fn parse_robot(args: &[&str], index: usize) -> Option<RobotId> {
    let id: usize = args.get(index)?.parse().ok()?;
    (id < ROBOT_COUNT).then_some(id)
}

fn parse_vec3(args: &[&str], index: usize) -> Option<Vec3> {
    let x: f64 = args.get(index)?.parse().ok()?;
    let y: f64 = args.get(index + 1)?.parse().ok()?;
    let z: f64 = args.get(index + 2)?.parse().ok()?;
    Some(Vec3::new(x, y, z))
}

/// A pending report exists after a reset or match end. A failed write is
/// logged and dropped; it never aborts the console.
fn flush_report(supervisor: &mut MatchSupervisor, reports: &ReportWriter) {
    if let Some(contents) = supervisor.take_report() {
        match reports.write(&contents) {
            Ok(path) => log::info!("match report written to {}", path.display()),
            Err(err) => log::warn!("failed to write match report: {}", err),
        }
    }
}
