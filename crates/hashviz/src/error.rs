use derive_more::Display;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Display)]
pub enum Error {
    #[display("resolution must be at least 1, got {resolution}")]
    InvalidResolution { resolution: u32 },

    #[display("resolution {resolution} gives more samples than can be indexed")]
    ResolutionTooLarge { resolution: u32 },

    #[display("no shape with index {index}")]
    UnknownShape { index: usize },

    #[display("no function with index {index}")]
    UnknownFunction { index: usize },

    #[display("gravity source {id} is not registered")]
    UnknownGravitySource { id: u32 },

    #[display("{name} must be finite and non negative, got {value}")]
    InvalidDuration { name: &'static str, value: f32 },

    #[display("fractal depth must be between 1 and 8, got {depth}")]
    InvalidFractalDepth { depth: u32 },

    #[display("fractal {name} is out of range, got {value}")]
    InvalidFractalParameter { name: &'static str, value: f32 },
}

impl std::error::Error for Error {}
