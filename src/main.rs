use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;

use kicad_laser_svg::{Side, convert, kicad};

#[derive(Parser)]
#[command(
    version,
    about = "Generate laser cut/etch SVGs from a KiCad PCB file",
    long_about = None
)]
struct Cli {
    /// Input KiCad PCB file
    #[arg(value_name = "PCB_FILE")]
    pcb_file: PathBuf,

    /// Output directory
    #[arg(short, long, value_name = "DIR", default_value = "output")]
    output: PathBuf,

    /// Which side(s) to generate
    #[arg(short, long, value_enum, default_value_t = SideArg::Both)]
    side: SideArg,

    /// Generate drill holes SVG
    #[arg(long)]
    drill: bool,

    /// Generate solder mask SVG
    #[arg(long)]
    mask: bool,

    /// Generate user comments layer SVG
    #[arg(long)]
    comments: bool,

    /// Generate all outputs (isolation, drill, mask, edge cuts, comments)
    #[arg(long)]
    all: bool,

    /// Generate a single multi-color SVG per side instead of individual files
    #[arg(long)]
    multi: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SideArg {
    Front,
    Back,
    Both,
}

impl From<SideArg> for Side {
    fn from(side: SideArg) -> Self {
        match side {
            SideArg::Front => Side::Front,
            SideArg::Back => Side::Back,
            SideArg::Both => Side::Both,
        }
    }
}

fn init_logging() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::prelude::*;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let board = kicad::load_board(&cli.pcb_file)
        .with_context(|| format!("failed to load board {:?}", cli.pcb_file))?;
    info!(
        layers = board.layers.len(),
        tracks = board.tracks.len(),
        vias = board.vias.len(),
        footprints = board.footprints.len(),
        zones = board.zones.len(),
        "board loaded"
    );

    let side: Side = cli.side.into();
    let copper_layers = side.copper_layers();
    let out_dir = &cli.output;

    if cli.multi {
        if copper_layers.contains(&"F.Cu") {
            convert::generate_multi_color_svg(&board, &["F.Cu"], out_dir)?;
        }
        if copper_layers.contains(&"B.Cu") {
            convert::generate_multi_color_svg_back(&board, &["B.Cu"], out_dir)?;
        }
    } else {
        for layer in &copper_layers {
            convert::generate_isolation_svg(&board, layer, out_dir)?;
        }
        if cli.drill || cli.all {
            convert::generate_drill_holes_svg(&board, out_dir)?;
        }
        if cli.mask || cli.all {
            for layer in &copper_layers {
                convert::generate_solder_mask_svg(&board, layer, out_dir)?;
            }
        }
        if cli.comments || cli.all {
            convert::generate_user_comments_svg(&board, out_dir)?;
        }
        // the outline is always needed to cut the board free
        convert::generate_edge_cuts_svg(&board, out_dir)?;
    }

    info!("done, SVGs ready for laser cutting/etching");
    Ok(())
}
