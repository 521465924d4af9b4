// Headless driver for petridish.
//
// The frontend-less version of the dish: it seeds one bacterium per team, then
// ticks at a fixed frame rate and logs a population report every now and then.
// Any window/ui frontend would do the same thing, plus drawing the snapshot
// returned by tick() and feeding pointer events back in.

use clap::Parser;
use petridish::config::{Settings, Surface};
use petridish::genome::Mutation;
use petridish::report::Report;
use petridish::spawner::{self, Spawner};
use petridish::Simulation;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

/// Runs a petridish colony without a window
#[derive(Parser, Debug)]
#[command(name = "petridish")]
struct Args {
    /// Settings file (toml), flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many ticks, runs forever otherwise
    #[arg(long)]
    ticks: Option<u64>,

    /// Ticks per second, 0 runs as fast as possible
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Maximum bacteria per team before division stops
    #[arg(long)]
    max_population: Option<u32>,

    /// Seconds between random spawns
    #[arg(long)]
    spawn_interval: Option<u32>,

    /// Drop a random bacterium into the dish every spawn interval
    #[arg(long)]
    random_spawn: bool,

    /// Generation of the initial bacteria
    #[arg(long)]
    generation: Option<u32>,

    /// Mutation of the initial bacteria (explosive-death, fast-reproduction, fertile-death)
    #[arg(long)]
    mutation: Option<Mutation>,

    /// Surface width
    #[arg(long)]
    width: Option<f64>,

    /// Surface height
    #[arg(long)]
    height: Option<f64>,

    /// Append per-team statistics as csv to this file
    #[arg(long)]
    report: Option<PathBuf>,

    /// Ticks between reports
    #[arg(long, default_value_t = 600)]
    report_every: u64,
}

impl Args {
    fn settings(&self) -> petridish::error::Result<Settings> {
        let mut s = match &self.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        if let Some(seed) = self.seed {
            s.seed = seed;
        }
        if let Some(m) = self.max_population {
            s.max_population_per_team = m;
        }
        if let Some(i) = self.spawn_interval {
            s.spawn_interval_seconds = i;
        }
        if let Some(g) = self.generation {
            s.generation = g;
        }
        if self.mutation.is_some() {
            s.mutation = self.mutation;
        }
        s.random_spawn |= self.random_spawn;
        s.surface = Surface::new(
            self.width.unwrap_or(s.surface.width()),
            self.height.unwrap_or(s.surface.height()),
        )?;
        Ok(s)
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    let settings = match args.settings() {
        Ok(s) => s,
        Err(e) => {
            error!("{}", e);
            std::process::exit(2);
        }
    };
    info!(?settings, "starting petridish");

    let mut report_file = match args.report.as_deref().map(open_report).transpose() {
        Ok(f) => f,
        Err(e) => {
            error!("could not open report file: {}", e);
            std::process::exit(2);
        }
    };

    let sim = spawner::shared(Simulation::new(settings.seed, settings.surface));
    if let Ok(mut sim) = sim.lock() {
        let seeded = match sim.spawn_all_selected(&settings) {
            Ok(hs) => hs.len(),
            Err(e) => {
                error!("{}", e);
                std::process::exit(2);
            }
        };
        info!(seeded, "seeded the dish");
    }

    let mut spawner = Spawner::default();
    if settings.random_spawn {
        if let Err(e) = spawner.toggle(&sim, &settings) {
            warn!("random spawn not started: {}", e);
        }
    }

    let frame = (args.fps > 0).then(|| Duration::from_secs_f64(1. / args.fps as f64));
    let start = Instant::now();
    let mut tick = 0;
    loop {
        if args.ticks.is_some_and(|t| tick >= t) {
            break;
        }
        let frame_start = Instant::now();
        // fixed step clock when running unpaced, wall clock otherwise
        let now = match frame {
            Some(_) => start.elapsed(),
            None => fixed_step(tick),
        };
        {
            let Ok(mut sim) = sim.lock() else {
                error!("simulation lock poisoned");
                break;
            };
            if let Err(e) = sim.tick(now, &settings) {
                // a broken value stops this tick, not the run
                warn!("tick skipped: {}", e);
            }
            tick += 1;
            if tick % args.report_every.max(1) == 0 {
                sim.report();
                if let Some(f) = report_file.as_mut() {
                    if let Err(e) = write_report(f, &sim.gen_report()) {
                        warn!("could not write report: {}", e);
                    }
                }
            }
        }
        if let Some(frame) = frame {
            if let Some(rest) = frame.checked_sub(frame_start.elapsed()) {
                std::thread::sleep(rest);
            }
        }
    }

    spawner.stop();
    if let Ok(sim) = sim.lock() {
        sim.report();
    }
    info!("goodbye!");
}

/// simulation time after `tick` unpaced frames
fn fixed_step(tick: u64) -> Duration {
    Duration::from_millis(16 * tick)
}

fn open_report(path: &Path) -> std::io::Result<std::fs::File> {
    let exists = path.exists();
    let mut f = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    if !exists {
        writeln!(f, "{}", Report::CSV_HEADER)?;
    }
    Ok(f)
}

fn write_report(f: &mut std::fs::File, r: &Report) -> std::io::Result<()> {
    for line in r.csv_lines() {
        f.write_all(line.as_bytes())?;
    }
    Ok(())
}

#[test]
fn fixed_step_does_not_wrap() {
    assert_eq!(fixed_step(0), Duration::ZERO);
    assert_eq!(fixed_step(60), Duration::from_millis(960));
    let past_u32 = u32::MAX as u64 + 10;
    assert_eq!(fixed_step(past_u32), Duration::from_millis(16 * past_u32));
    assert!(fixed_step(past_u32) > fixed_step(u32::MAX as u64));
}
