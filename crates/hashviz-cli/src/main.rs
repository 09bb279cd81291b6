mod output;
mod progress;
mod runner;
mod utils;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args as ClapArgs, Parser, Subcommand};
use hashviz::utils::counter;
use utils::{
    AvailableExecutionMode, AvailableFunction, AvailableOutput, AvailableShape,
    AvailableTransition, Vec3Arg,
};

#[derive(Parser, Debug)]
pub struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate one snapshot and write it to disk
    Sample(SampleArgs),
    /// Run the function timeline and write one height map per frame
    Animate(AnimateArgs),
    /// Query a demo gravity world
    Gravity(GravityArgs),
    /// Animate a fractal and write the matrices of its last frame
    Fractal(FractalArgs),
}

#[derive(ClapArgs, Debug)]
pub struct SampleArgs {
    #[arg(long, value_enum, default_value_t)]
    /// Shape selector
    pub shape: AvailableShape,

    #[arg(short, long, default_value_t = 64)]
    /// Samples along one side of the grid
    pub resolution: u32,

    #[arg(long, default_value_t, allow_negative_numbers = true)]
    /// Seed of the hash. Given a seed the output is fully deterministic.
    pub seed: i32,

    #[arg(long, default_value_t, allow_negative_numbers = true)]
    /// Time fed to the function shapes
    pub time: f32,

    #[arg(long, default_value = "0,0,0", allow_hyphen_values = true)]
    /// Placement of the shape, `x,y,z`
    pub translation: Vec3Arg,

    #[arg(long, default_value = "0,0,0", allow_hyphen_values = true)]
    /// Euler angles in degrees, applied around z, then x, then y
    pub rotation: Vec3Arg,

    #[arg(long, default_value = "1,1,1")]
    pub scale: Vec3Arg,

    #[arg(long, default_value = "8,8,8")]
    /// Size of the hash cells is the inverse of this scale
    pub lattice_scale: Vec3Arg,

    #[arg(short, long, value_enum, default_value_t)]
    pub execution_mode: AvailableExecutionMode,

    #[arg(short, long, value_enum)]
    pub output: Vec<AvailableOutput>,

    #[arg(long, default_value = "output/")]
    pub outdir: PathBuf,
}

#[derive(ClapArgs, Debug)]
pub struct AnimateArgs {
    #[arg(long, value_enum, default_value_t)]
    /// Function shown first
    pub function: AvailableFunction,

    #[arg(long, value_enum, default_value_t)]
    pub transition: AvailableTransition,

    #[arg(long, default_value_t = 1.0)]
    /// Seconds each function is shown
    pub function_duration: f32,

    #[arg(long, default_value_t = 1.0)]
    /// Seconds each morph lasts
    pub transition_duration: f32,

    #[arg(long, default_value_t = 60)]
    pub frames: u32,

    #[arg(long, default_value_t = 1.0 / 30.0)]
    /// Seconds between two frames
    pub dt: f32,

    #[arg(short, long, default_value_t = 64)]
    pub resolution: u32,

    #[arg(long, default_value_t, allow_negative_numbers = true)]
    /// Seed of the hash and of the random transitions
    pub seed: i32,

    #[arg(short, long, value_enum, default_value_t)]
    pub execution_mode: AvailableExecutionMode,

    #[arg(long, default_value = "output/frames/")]
    pub outdir: PathBuf,
}

#[derive(ClapArgs, Debug)]
pub struct GravityArgs {
    #[arg(long, allow_hyphen_values = true)]
    /// Query point, `x,y,z`
    pub position: Vec3Arg,

    #[arg(long, default_value = "0,0,0", allow_hyphen_values = true)]
    /// Center of the gravity sphere
    pub center: Vec3Arg,

    #[arg(long, allow_negative_numbers = true)]
    /// Adds a horizontal gravity plane at this height
    pub plane_height: Option<f32>,
}

#[derive(ClapArgs, Debug)]
pub struct FractalArgs {
    #[arg(short, long, default_value_t = 4)]
    /// Levels of the fractal, the root included
    pub depth: u32,

    #[arg(long, default_value_t = 60)]
    pub frames: u32,

    #[arg(long, default_value_t = 1.0 / 30.0)]
    /// Seconds between two frames
    pub dt: f32,

    #[arg(long, default_value_t)]
    /// Seed of the sag angles and spin speeds
    pub seed: u64,

    #[arg(long, default_value_t = 1.0)]
    /// Scale of the root part
    pub scale: f32,

    #[arg(short, long, value_enum, default_value_t)]
    pub execution_mode: AvailableExecutionMode,

    #[arg(long, default_value = "output/fractal/")]
    pub outdir: PathBuf,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    match args.command {
        Command::Sample(args) => runner::run_sample(args)?,
        Command::Animate(args) => runner::run_animate(args)?,
        Command::Gravity(args) => runner::run_gravity(args),
        Command::Fractal(args) => runner::run_fractal(args)?,
    }

    counter::report_counters();
    Ok(())
}
