/// Entry point and run loop.

mod config;
mod domain;
mod error;
mod sim;
mod ui;
mod zines;

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::terminal;
use log::{error, info, log, warn};
use rand::{Rng, SeedableRng};

use config::{LogConfig, ZineConfig};
use error::{Result, ZineError};
use sim::clock::FixedStep;
use sim::step::{Engine, SimRng};
use ui::canvas::Canvas;
use ui::input::{Command, InputChannel};
use ui::renderer::{compose_frame, compose_splash, print_summary, Renderer};
use ui::theme::{Role, Theme};
use zines::rack::{Rack, RackOutcome};
use zines::{catalog_listing, Zine, ZineId};

/// Closing lines of one run, with the theme they are printed in.
type Summary = (Vec<(Role, String)>, Theme);

#[derive(Parser, Debug)]
#[command(name = "zinerack", version, about = "Animated zines for the terminal")]
struct Cli {
    /// Zine to open, by name or catalog number. Opens the rack when omitted.
    zine: Option<String>,

    /// Seed for every random choice in the run.
    #[arg(long)]
    seed: Option<u64>,

    /// Config file to use instead of the config.toml search.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write logs to this file.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Print the catalog and exit.
    #[arg(long)]
    list: bool,
}

fn main() {
    let cli = Cli::parse();

    if cli.list {
        for line in catalog_listing() {
            println!("{line}");
        }
        return;
    }

    let config = match ZineConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("zinerack: {e}");
            std::process::exit(2);
        }
    };
    init_logging(&config.log, cli.log_file.as_deref());
    for warning in &config.warnings {
        warn!("{warning}");
    }

    let mut renderer = Renderer::new();
    let result = session(&cli, &config, &mut renderer);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    match result {
        Ok(summaries) => {
            for (lines, theme) in &summaries {
                if let Err(e) = print_summary(lines, theme) {
                    eprintln!("zinerack: {e}");
                }
            }
        }
        Err(e) => {
            error!("run aborted: {e}");
            eprintln!("zinerack: {e}");
            std::process::exit(1);
        }
    }
}

/// Logs go to a file, never to the alternate screen. Without a file the
/// logger only runs when `RUST_LOG` asks for it.
fn init_logging(log: &LogConfig, cli_file: Option<&Path>) {
    let env_set = std::env::var_os("RUST_LOG").is_some();
    let mut builder = env_logger::Builder::new();
    builder.parse_filters(&log.level);
    if env_set {
        builder.parse_env("RUST_LOG");
    }

    match cli_file.map(Path::to_path_buf).or_else(|| log.file.clone()) {
        Some(path) => match File::create(&path) {
            Ok(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            Err(e) => {
                eprintln!("zinerack: cannot open log file {}: {e}", path.display());
                return;
            }
        },
        None if env_set => {
            builder.target(env_logger::Target::Stderr);
        }
        None => return,
    }
    builder.init();
}

fn session(cli: &Cli, config: &ZineConfig, renderer: &mut Renderer) -> Result<Vec<Summary>> {
    // Resolve the name before touching the terminal.
    let target = cli.zine.as_deref().map(ZineId::from_name).transpose()?;
    let (w, h) = terminal::size().map_err(ZineError::Terminal)?;
    let size = (w as usize, h as usize);

    let seed = cli.seed.or(config.engine.seed).unwrap_or_else(rand::random);
    info!("session seed {seed}, terminal {w}x{h}");
    let mut seeds = SimRng::seed_from_u64(seed);

    renderer.init()?;
    let mut summaries = Vec::new();

    if let Some(id) = target {
        let mut zine = id.open(config);
        summaries.push(run_zine(zine.as_mut(), size, config, seeds.gen(), renderer)?);
        return Ok(summaries);
    }

    let mut rack = Rack::new();
    loop {
        let rack_summary = run_zine(&mut rack, size, config, seeds.gen(), renderer)?;
        match rack.take_outcome() {
            Some(RackOutcome::Launch(id)) => {
                info!("rack launching {}", id.slug());
                let mut zine = id.open(config);
                summaries.push(run_zine(zine.as_mut(), size, config, seeds.gen(), renderer)?);
            }
            Some(RackOutcome::Notice(notice)) => rack.show_notice(notice),
            None => {
                summaries.push(rack_summary);
                break;
            }
        }
    }
    Ok(summaries)
}

/// Drive one zine until it quits or stops itself.
fn run_zine(
    zine: &mut dyn Zine,
    (width, height): (usize, usize),
    config: &ZineConfig,
    seed: u64,
    renderer: &mut Renderer,
) -> Result<Summary> {
    let theme = match &config.engine.theme {
        Some(name) => Theme::resolve(name),
        None => zine.theme(),
    };
    let mut canvas = Canvas::new(width, height);
    if let Some(subtitle) = zine.subtitle().filter(|_| config.engine.splash_ms > 0) {
        renderer.present(&compose_splash(zine.title(), subtitle, &theme, &mut canvas))?;
        thread::sleep(Duration::from_millis(config.engine.splash_ms));
    }

    let input = InputChannel::spawn(io::stdin(), zine.keymap())?;
    let mut clock = FixedStep::new(
        Duration::from_millis(config.engine.tick_rate_ms),
        config.engine.max_catch_up_ticks,
    );
    let mut engine = Engine::new(zine, width, height, config.engine.tick_secs(), theme, SimRng::seed_from_u64(seed));
    // Commands wait here until a tick is due to consume them.
    let mut pending: Vec<Command> = Vec::new();
    let mut last = Instant::now();

    while engine.running() {
        let now = Instant::now();
        let due = clock.advance(now.duration_since(last));
        last = now;

        pending.extend(input.drain());
        for _ in 0..due {
            for event in engine.step(&pending) {
                log!(event.log_level(), "{event}");
            }
            pending.clear();
            if !engine.running() { break; }
        }

        let frame = compose_frame(&engine.world, &*engine.zine, &engine.theme, &mut canvas);
        renderer.present(&frame)?;
        thread::sleep(clock.until_next());
    }

    let lines = engine.zine.summary(&engine.world);
    Ok((lines, engine.theme))
}
