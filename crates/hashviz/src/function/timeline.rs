//! Time driven switching between functions, with eased transitions.

use rand::SeedableRng;

use super::FunctionName;
use crate::{math::float::FloatAsExt, shape::Shape, Error, Result};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum TransitionMode {
    #[default]
    Cycle,
    Random,
}

/// Shows each function for `function_duration` seconds, then morphs into the
/// next one over `transition_duration` seconds.
pub struct FunctionTimeline {
    function: FunctionName,
    transition_function: FunctionName,
    transitioning: bool,
    duration: f32,
    function_duration: f32,
    transition_duration: f32,
    mode: TransitionMode,
    rng: crate::Rng,
}

fn check_duration(name: &'static str, value: f32) -> Result<f32> {
    value
        .into_finite()
        .filter(|v| *v >= 0.0)
        .ok_or(Error::InvalidDuration { name, value })
}

impl FunctionTimeline {
    pub fn new(
        start: FunctionName,
        mode: TransitionMode,
        function_duration: f32,
        transition_duration: f32,
        seed: u64,
    ) -> Result<Self> {
        Ok(Self {
            function: start,
            transition_function: start,
            transitioning: false,
            duration: 0.0,
            function_duration: check_duration("function duration", function_duration)?,
            transition_duration: check_duration("transition duration", transition_duration)?,
            mode,
            rng: crate::Rng::seed_from_u64(seed),
        })
    }

    pub fn function(&self) -> FunctionName {
        self.function
    }

    pub fn is_transitioning(&self) -> bool {
        self.transitioning
    }

    /// Moves time forward by `dt` seconds.
    ///
    /// At most one phase change happens per call, the leftover time is carried
    /// into the next phase. Negative or non-finite steps are ignored.
    pub fn advance(&mut self, dt: f32) {
        if !(dt.is_finite() && dt >= 0.0) {
            log::warn!("ignoring invalid timeline step {dt}");
            return;
        }
        self.duration += dt;
        if self.transitioning {
            if self.duration >= self.transition_duration {
                self.duration -= self.transition_duration;
                self.transitioning = false;
            }
        } else if self.duration >= self.function_duration {
            self.duration -= self.function_duration;
            self.transitioning = true;
            self.transition_function = self.function;
            self.function = self.pick_next();
            log::debug!(
                "function transition {:?} -> {:?}",
                self.transition_function,
                self.function
            );
        }
    }

    fn pick_next(&mut self) -> FunctionName {
        match self.mode {
            TransitionMode::Cycle => self.function.next(),
            TransitionMode::Random => self.function.random_other_than(&mut self.rng),
        }
    }

    /// Transition progress in `[0, 1]`, or None when showing a single function.
    pub fn progress(&self) -> Option<f32> {
        self.transitioning.then(|| {
            self.duration
                .into_non_zero(0.0)
                .map_or(0.0, |d| (d / self.transition_duration).min(1.0))
        })
    }

    /// The shape to sample for the current instant.
    pub fn shape(&self) -> Shape {
        match self.progress() {
            Some(progress) => Shape::Morph {
                from: self.transition_function,
                to: self.function,
                progress,
            },
            None => Shape::Function(self.function),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FunctionTimeline, TransitionMode};
    use crate::{function::FunctionName, shape::Shape, Error};

    #[test]
    fn invalid_steps_are_ignored() {
        let mut timeline =
            FunctionTimeline::new(FunctionName::Wave, TransitionMode::Cycle, 1.0, 0.5, 0).unwrap();
        timeline.advance(0.5);
        for dt in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY, -0.25] {
            timeline.advance(dt);
            assert_eq!(timeline.shape(), Shape::Function(FunctionName::Wave));
            assert!(!timeline.is_transitioning());
        }

        timeline.advance(0.5);
        assert!(timeline.is_transitioning());
        assert_eq!(timeline.progress(), Some(0.0));
    }

    #[test]
    fn cycles_with_transitions() {
        let mut timeline =
            FunctionTimeline::new(FunctionName::Wave, TransitionMode::Cycle, 1.0, 0.5, 0).unwrap();
        assert_eq!(timeline.shape(), Shape::Function(FunctionName::Wave));

        timeline.advance(0.75);
        assert!(!timeline.is_transitioning());

        timeline.advance(0.5);
        assert!(timeline.is_transitioning());
        assert_eq!(
            timeline.shape(),
            Shape::Morph {
                from: FunctionName::Wave,
                to: FunctionName::MultiWave,
                progress: 0.5,
            }
        );

        timeline.advance(0.25);
        assert_eq!(timeline.shape(), Shape::Function(FunctionName::MultiWave));
    }

    #[test]
    fn random_mode_changes_function() {
        let mut timeline =
            FunctionTimeline::new(FunctionName::Torus, TransitionMode::Random, 0.0, 0.0, 9).unwrap();
        let mut previous = timeline.function();
        for _ in 0..50 {
            timeline.advance(0.1);
            if timeline.is_transitioning() {
                assert_ne!(timeline.function(), previous);
                previous = timeline.function();
            }
        }
    }

    #[test]
    fn zero_transition_duration_has_finite_progress() {
        let mut timeline =
            FunctionTimeline::new(FunctionName::Wave, TransitionMode::Cycle, 0.0, 0.0, 0).unwrap();
        timeline.advance(0.0);
        assert!(timeline.is_transitioning());
        assert_eq!(timeline.progress(), Some(0.0));
    }

    #[test]
    fn rejects_bad_durations() {
        assert!(matches!(
            FunctionTimeline::new(FunctionName::Wave, TransitionMode::Cycle, -1.0, 1.0, 0),
            Err(Error::InvalidDuration { .. })
        ));
        assert!(FunctionTimeline::new(FunctionName::Wave, TransitionMode::Cycle, 1.0, f32::NAN, 0)
            .is_err());
    }
}
