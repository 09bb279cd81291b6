mod file_output;

use anyhow::Result;
pub use file_output::{write_fractal_matrices, HashImageOutput, HeightImageOutput, RawOutput};
use hashviz::generator::Snapshot;

/// Consumer of a finished snapshot.
pub trait FinalOutput: Send {
    fn commit(&self, snapshot: &Snapshot) -> Result<()>;
}
