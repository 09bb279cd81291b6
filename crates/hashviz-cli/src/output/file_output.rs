use std::path::{Path, PathBuf};

use anyhow::Result;
use image::{ImageBuffer, Luma, Rgb};

use crate::output::FinalOutput;
use hashviz::{fractal::Fractal, generator::Snapshot};

/// Color of a hash: its three low bytes as red, green and blue.
fn hash_color(hash: u32) -> Rgb<u8> {
    let [r, g, b, _] = hash.to_le_bytes();
    Rgb([r, g, b])
}

/// Height in `[-1, 1]` mapped to the full gray range.
fn height_luma(y: f32) -> Luma<u8> {
    Luma([((y * 0.5 + 0.5).clamp(0.0, 1.0) * 255.0).round() as u8])
}

/// Sample `x + z * resolution` lands on pixel `(x, z)`.
fn grid_image<P: image::Pixel<Subpixel = u8>, T>(
    snapshot: &Snapshot,
    values: &[T],
    f: impl Fn(&T) -> P,
) -> ImageBuffer<P, Vec<u8>> {
    let resolution = snapshot.resolution();
    ImageBuffer::from_fn(resolution, resolution, |x, z| {
        f(&values[(x + z * resolution) as usize])
    })
}

pub struct HashImageOutput {
    pub outdir: PathBuf,
}

impl FinalOutput for HashImageOutput {
    fn commit(&self, snapshot: &Snapshot) -> Result<()> {
        std::fs::create_dir_all(&self.outdir)?;
        let path = self.outdir.join("hashes.png");
        log::info!("Saving hash image to {}", path.display());
        grid_image(snapshot, snapshot.hashes(), |&h| hash_color(h)).save(path)?;
        Ok(())
    }
}

/// Writes one gray image per committed frame, numbered in commit order.
pub struct HeightImageOutput {
    pub outdir: PathBuf,
    frame: std::sync::atomic::AtomicU32,
}

impl HeightImageOutput {
    pub fn new(outdir: PathBuf) -> Self {
        Self {
            outdir,
            frame: Default::default(),
        }
    }
}

impl FinalOutput for HeightImageOutput {
    fn commit(&self, snapshot: &Snapshot) -> Result<()> {
        let frame = self
            .frame
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        std::fs::create_dir_all(&self.outdir)?;
        let path = self.outdir.join(format!("frame_{frame:04}.png"));
        log::debug!("Saving frame {frame} to {}", path.display());
        grid_image(snapshot, snapshot.positions(), |p| height_luma(p.y)).save(path)?;
        Ok(())
    }
}

pub struct RawOutput {
    pub outdir: PathBuf,
}

fn write_le<T: Copy>(path: &Path, values: &[T], to_bytes: impl Fn(T) -> [u8; 4]) -> Result<()> {
    let bytes: Vec<u8> = values.iter().flat_map(|&v| to_bytes(v)).collect();
    std::fs::write(path, bytes)?;
    Ok(())
}

impl FinalOutput for RawOutput {
    fn commit(&self, snapshot: &Snapshot) -> Result<()> {
        std::fs::create_dir_all(&self.outdir)?;
        log::info!("Saving raw buffers to {}", self.outdir.display());

        let positions: &[f32] = bytemuck::cast_slice(snapshot.positions());
        let normals: &[f32] = bytemuck::cast_slice(snapshot.normals());
        write_le(&self.outdir.join("positions.bin"), positions, f32::to_le_bytes)?;
        write_le(&self.outdir.join("normals.bin"), normals, f32::to_le_bytes)?;
        write_le(&self.outdir.join("hashes.bin"), snapshot.hashes(), u32::to_le_bytes)?;
        Ok(())
    }
}

/// One file per level, each part as twelve floats: the three scaled rotation
/// columns then the position.
pub fn write_fractal_matrices(outdir: &Path, fractal: &Fractal) -> Result<()> {
    std::fs::create_dir_all(outdir)?;
    log::info!("Saving fractal matrices to {}", outdir.display());
    for (level, matrices) in fractal.matrices().iter().enumerate() {
        let cols: Vec<glam::Vec3> = matrices.iter().flat_map(|m| m.cols).collect();
        let floats: &[f32] = bytemuck::cast_slice(&cols);
        write_le(&outdir.join(format!("level_{level}.bin")), floats, f32::to_le_bytes)?;
    }
    Ok(())
}
