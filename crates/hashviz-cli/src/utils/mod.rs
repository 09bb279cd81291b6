use core::fmt::Display;
use std::str::FromStr;

use clap::ValueEnum;
use glam::Vec3;
use hashviz::{
    batch::ExecutionMode,
    function::{timeline::TransitionMode, FunctionName},
    shape::Shape,
};

#[derive(Debug, Default, Clone, Copy, ValueEnum)]
pub enum AvailableShape {
    #[default]
    Plane,
    Sphere,
    Torus,
    Wave,
    MultiWave,
    Ripple,
    SphereField,
    TorusField,
    Knot,
}

impl From<AvailableShape> for Shape {
    fn from(val: AvailableShape) -> Self {
        match val {
            AvailableShape::Plane => Shape::Plane,
            AvailableShape::Sphere => Shape::Sphere,
            AvailableShape::Torus => Shape::Torus,
            AvailableShape::Wave => Shape::Function(FunctionName::Wave),
            AvailableShape::MultiWave => Shape::Function(FunctionName::MultiWave),
            AvailableShape::Ripple => Shape::Function(FunctionName::Ripple),
            AvailableShape::SphereField => Shape::Function(FunctionName::Sphere),
            AvailableShape::TorusField => Shape::Function(FunctionName::Torus),
            AvailableShape::Knot => Shape::Function(FunctionName::Knot),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, ValueEnum)]
pub enum AvailableFunction {
    #[default]
    Wave,
    MultiWave,
    Ripple,
    Sphere,
    Torus,
    Knot,
}

impl From<AvailableFunction> for FunctionName {
    fn from(val: AvailableFunction) -> Self {
        match val {
            AvailableFunction::Wave => FunctionName::Wave,
            AvailableFunction::MultiWave => FunctionName::MultiWave,
            AvailableFunction::Ripple => FunctionName::Ripple,
            AvailableFunction::Sphere => FunctionName::Sphere,
            AvailableFunction::Torus => FunctionName::Torus,
            AvailableFunction::Knot => FunctionName::Knot,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, ValueEnum)]
pub enum AvailableTransition {
    #[default]
    Cycle,
    Random,
}

impl From<AvailableTransition> for TransitionMode {
    fn from(val: AvailableTransition) -> Self {
        match val {
            AvailableTransition::Cycle => TransitionMode::Cycle,
            AvailableTransition::Random => TransitionMode::Random,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, ValueEnum)]
pub enum AvailableExecutionMode {
    #[default]
    Multithreaded,
    Monothreaded,
}

impl From<AvailableExecutionMode> for ExecutionMode {
    fn from(val: AvailableExecutionMode) -> Self {
        match val {
            AvailableExecutionMode::Multithreaded => ExecutionMode::Multithreaded,
            AvailableExecutionMode::Monothreaded => ExecutionMode::Monothreaded,
        }
    }
}

#[derive(Default, Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Hash)]
pub enum AvailableOutput {
    /// PNG colored by the hash bytes
    #[default]
    Image,
    /// Little endian dumps of positions, normals and hashes
    Raw,
}

/// A vector given as `x,y,z`
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Vec3Arg(pub Vec3);

impl FromStr for Vec3Arg {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut split_it = s.split(',').map(str::trim);
        let (Some(x), Some(y), Some(z), None) =
            (split_it.next(), split_it.next(), split_it.next(), split_it.next())
        else {
            return Err(anyhow::anyhow!("Incorrect format, expected `x,y,z`"));
        };

        Ok(Vec3Arg(Vec3::new(x.parse()?, y.parse()?, z.parse()?)))
    }
}

impl Display for Vec3Arg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{},{},{}", self.0.x, self.0.y, self.0.z))
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::Vec3Arg;

    #[test]
    fn parse_vec3() {
        assert_eq!(
            "1,-2.5, 3".parse::<Vec3Arg>().unwrap(),
            Vec3Arg(Vec3::new(1.0, -2.5, 3.0))
        );
        assert!("1,2".parse::<Vec3Arg>().is_err());
        assert!("1,2,3,4".parse::<Vec3Arg>().is_err());
        assert!("a,b,c".parse::<Vec3Arg>().is_err());
        assert_eq!(Vec3Arg(Vec3::new(0.5, 0.0, 8.0)).to_string(), "0.5,0,8");
    }
}
