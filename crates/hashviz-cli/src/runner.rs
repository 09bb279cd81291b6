use std::collections::HashSet;

use anyhow::Result;
use glam::{Quat, Vec3};
use hashviz::{
    field::SampleField,
    fractal::{Fractal, FractalConfig},
    function::timeline::FunctionTimeline,
    generator::{BatchSampler, GeneratorConfig},
    gravity::{GravityPlane, GravitySphere, GravityWorld},
    math::transform::SpaceTrs,
    utils::timer::timed_scope_log,
};

use crate::{
    output::{write_fractal_matrices, FinalOutput, HashImageOutput, HeightImageOutput, RawOutput},
    progress::PercentBar,
    AnimateArgs, AvailableOutput, FractalArgs, GravityArgs, SampleArgs,
};

pub fn run_sample(args: SampleArgs) -> Result<()> {
    let mut outputs: HashSet<AvailableOutput> = HashSet::from_iter(args.output);
    if outputs.is_empty() {
        outputs.insert(AvailableOutput::default());
    }

    let final_outputs: Vec<Box<dyn FinalOutput>> = outputs
        .into_iter()
        .map(|o| -> Box<dyn FinalOutput> {
            match o {
                AvailableOutput::Image => Box::new(HashImageOutput {
                    outdir: args.outdir.clone(),
                }),
                AvailableOutput::Raw => Box::new(RawOutput {
                    outdir: args.outdir.clone(),
                }),
            }
        })
        .collect();

    let config = GeneratorConfig::builder()
        .shape(args.shape.into())
        .resolution(args.resolution)
        .seed(args.seed)
        .time(args.time)
        .domain(SpaceTrs {
            translation: args.translation.0,
            rotation: args.rotation.0,
            scale: args.scale.0,
        })
        .lattice(SpaceTrs {
            scale: args.lattice_scale.0,
            ..SpaceTrs::IDENTITY
        })
        .execution_mode(args.execution_mode.into())
        .build();

    log::info!(
        "sampling {:?} at resolution {} with seed {}",
        config.shape,
        config.resolution,
        config.seed
    );
    let snapshot = timed_scope_log("generate snapshot", || {
        BatchSampler::new().generate(&config)
    })
    .res?;

    for final_output in final_outputs {
        final_output.commit(&snapshot)?;
    }
    Ok(())
}

pub fn run_animate(args: AnimateArgs) -> Result<()> {
    let mut timeline = FunctionTimeline::new(
        args.function.into(),
        args.transition.into(),
        args.function_duration,
        args.transition_duration,
        args.seed as u64,
    )?;
    let output = HeightImageOutput::new(args.outdir);

    let config_at = |time: f32, timeline: &FunctionTimeline| {
        GeneratorConfig::builder()
            .shape(timeline.shape())
            .resolution(args.resolution)
            .seed(args.seed)
            .time(time)
            .execution_mode(args.execution_mode.into())
            .build()
    };

    log::info!("animating {} frames", args.frames);
    timed_scope_log("animate", || -> Result<()> {
        let mut time = 0.0;
        let mut field = SampleField::init(config_at(time, &timeline))?;
        for frame in 0..args.frames {
            if frame > 0 {
                time += args.dt;
                timeline.advance(args.dt);
                field.regenerate(config_at(time, &timeline))?;
            }
            output.commit(field.snapshot())?;
            PercentBar {
                percent: (frame + 1) as f32 / args.frames as f32,
                width: 50,
            }
            .print();
        }
        println!();
        field.release();
        Ok(())
    })
    .res
}

pub fn run_gravity(args: GravityArgs) {
    let mut world = GravityWorld::new();
    world.register(GravitySphere::new(args.center.0));
    if let Some(height) = args.plane_height {
        world.register(GravityPlane::new(Vec3::new(0.0, height, 0.0), Quat::IDENTITY));
    }

    let (gravity, up) = world.gravity_with_up(args.position.0);
    log::info!("{} gravity sources", world.len());
    println!("position: {}", args.position);
    println!("gravity:  {gravity}");
    println!("up axis:  {up}");
}

pub fn run_fractal(args: FractalArgs) -> Result<()> {
    let mut fractal = Fractal::new(FractalConfig {
        depth: args.depth,
        seed: args.seed,
        execution_mode: args.execution_mode.into(),
        ..Default::default()
    })?;
    let root = SpaceTrs::from_scale(args.scale);

    log::info!(
        "animating a fractal of {} parts over {} frames",
        fractal.part_count(),
        args.frames
    );
    timed_scope_log("fractal", || {
        for frame in 0..args.frames {
            fractal.update(&root, args.dt);
            PercentBar {
                percent: (frame + 1) as f32 / args.frames as f32,
                width: 50,
            }
            .print();
        }
        println!();
    });

    write_fractal_matrices(&args.outdir, &fractal)
}
