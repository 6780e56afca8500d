use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::fmt::SubscriberBuilder;

mod params;
mod pipeline;
mod tools;

use pipeline::PipelineConfig;

#[derive(Parser)]
#[command(name = "shapepipe")]
#[command(about = "Shape-modeling pipeline runner (groom, optimize, analyze)")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Run the full pipeline end to end
    Run {
        #[command(flatten)]
        config: PipelineConfig,
    },
    /// Propagate a picked cutting plane into the aligned frame and print it
    Propagate {
        /// JSON file with three [x, y, z] points
        #[arg(long)]
        plane: PathBuf,
        /// Prefix of the sample the plane was picked on
        #[arg(long)]
        prefix: String,
        /// Grooming output root holding the transform records
        #[arg(long)]
        groom_dir: PathBuf,
        #[arg(long, default_value = "1x_hip")]
        img_suffix: String,
    },
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Run { config } => pipeline::run(&config),
        Action::Propagate {
            plane,
            prefix,
            groom_dir,
            img_suffix,
        } => propagate(plane, prefix, groom_dir, img_suffix),
    }
}

fn propagate(plane: PathBuf, prefix: String, groom_dir: PathBuf, img_suffix: String) -> Result<()> {
    use shapepipe::propagate::{propagate_cutting_plane, RecordDirs};

    let plane = pipeline::load_plane(&plane)?;
    let dirs = RecordDirs::under(&groom_dir);
    let out = propagate_cutting_plane(plane, &prefix, &dirs, &img_suffix)?;
    let points: Vec<[f64; 3]> = out.points().iter().map(|p| [p.x, p.y, p.z]).collect();
    println!("{}", serde_json::to_string_pretty(&points)?);
    Ok(())
}
