use clap::{Parser, Subcommand};
use ringdial::config;
use ringdial::controller::{
    InteractionController, PointerDevice, PointerEvent, PointerId, PressOutcome,
};
use ringdial::quantize::StepTable;
use ringdial::render::LogRenderer;
use ringdial::ring::SliderConfig;
use ringdial::stage::{ContainerId, Stage};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ringdial", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Print the angle-to-value step table for a range
    Table {
        #[arg(long)]
        min: f64,
        #[arg(long)]
        max: f64,
        #[arg(long)]
        step: f64,
        /// Stop printing after this many entries
        #[arg(long, default_value_t = 200)]
        rows: usize,
    },
    /// Print every container's rings, outermost first
    Layout {
        /// Config file to read instead of the default location
        #[arg(short = 'c', long)]
        config: Option<PathBuf>,
    },
    /// Simulate a press at container-local coordinates
    Press {
        container: String,
        x: f64,
        y: f64,
        #[arg(short = 'c', long)]
        config: Option<PathBuf>,
        #[arg(long, default_value = "mouse")]
        device: PointerDevice,
    },
    /// Write the default config file and print its path
    Init,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Table {
            min,
            max,
            step,
            rows,
        } => print_table(min, max, step, rows),
        Commands::Layout { config } => print_layout(build_stage(config)?),
        Commands::Press {
            container,
            x,
            y,
            config,
            device,
        } => press(build_stage(config)?, ContainerId::new(container), x, y, device),
        Commands::Init => {
            let path = config::write_default_config()?;
            println!("{}", path.display());
            Ok(())
        }
    }
}

fn build_stage(path: Option<PathBuf>) -> anyhow::Result<Stage> {
    let config = config::load_or_default(path.as_deref());
    let (stage, skipped) = Stage::from_config(&config, &mut LogRenderer::default())?;
    if !skipped.is_empty() {
        eprintln!("{} slider(s) skipped, run with RUST_LOG=warn for details", skipped.len());
    }
    Ok(stage)
}

fn print_table(min: f64, max: f64, step: f64, rows: usize) -> anyhow::Result<()> {
    // validate the same way a configured ring would be
    SliderConfig::new(ContainerId::new("cli"), min, max, step, 1.0, 1.0)?;
    let table = StepTable::new(min, max, step);

    println!(
        "steps: {}  remainder: {}  angle unit: {:.6}",
        table.steps(),
        table.remainder_fraction(),
        table.angle_unit()
    );
    println!("{:>5} {:>12} {:>12} {:>12}", "#", "angle", "boundary", "value");
    for (i, entry) in table.entries().enumerate().take(rows) {
        println!(
            "{:>5} {:>12.6} {:>12.6} {:>12}",
            i, entry.angle, entry.boundary, entry.value
        );
    }
    if table.len() > rows {
        println!("... {} more", table.len() - rows);
    }
    Ok(())
}

fn print_layout(stage: Stage) -> anyhow::Result<()> {
    for container in stage.containers() {
        println!(
            "{} ({}x{}, sidebar {})",
            container.id(),
            container.size(),
            container.size(),
            container.sidebar_width()
        );
        for ring in stage.rings_in(container.id()) {
            let (dash, space) = ring.dash_pattern();
            let cfg = ring.config();
            println!(
                "  r={:<6} {:<20} [{} .. {} step {}] dash {} / {:.4}  {}",
                cfg.radius,
                ring.settings().label,
                cfg.min_value,
                cfg.max_value,
                cfg.step,
                dash,
                space,
                ring.value_text()
            );
        }
    }
    Ok(())
}

fn press(
    mut stage: Stage,
    container: ContainerId,
    x: f64,
    y: f64,
    device: PointerDevice,
) -> anyhow::Result<()> {
    let mut renderer = LogRenderer::default();
    let mut controller = InteractionController::new();
    let pointer = PointerId { device, id: 0 };

    let event = PointerEvent::new(pointer, x, y);
    match controller.on_press(&mut stage, &mut renderer, &container, event) {
        PressOutcome::Captured(id) => {
            if let Some(ring) = stage.ring(id) {
                let update = ring.render_update();
                println!(
                    "{} '{}' -> {} (angle {:.4}, {:.1}% of a turn, linear {:.2})",
                    id,
                    ring.settings().label,
                    update.label_text,
                    update.angle,
                    ring.fraction() * 100.0,
                    ring.value_for_fraction(ring.fraction())
                );
                println!("arc: {}", update.arc);
            }
            controller.on_release(&mut stage, event);
            Ok(())
        }
        PressOutcome::Missed => {
            println!("no ring at ({}, {}) in {}", x, y, container);
            Ok(())
        }
        PressOutcome::UnknownContainer => anyhow::bail!("there is no container '{}'", container),
        PressOutcome::Busy => anyhow::bail!("another pointer holds the drag session"),
    }
}
