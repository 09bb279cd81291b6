//! A long lived sample field, regenerated whenever its configuration changes.

use crate::{
    counter,
    generator::{BatchSampler, GeneratorConfig, Snapshot},
    Result,
};

/// Owns the current [Snapshot] and the buffers used to produce it.
///
/// Regenerating with the same resolution reuses every allocation. The snapshot
/// handed out by [SampleField::snapshot] stays valid until the next successful
/// [SampleField::regenerate].
#[derive(Debug)]
pub struct SampleField {
    config: GeneratorConfig,
    sampler: BatchSampler,
    snapshot: Snapshot,
}

impl SampleField {
    pub fn init(config: GeneratorConfig) -> Result<Self> {
        let mut sampler = BatchSampler::new();
        let snapshot = sampler.generate(&config)?;
        log::debug!("sample field created with {} samples", snapshot.len());
        Ok(Self {
            config,
            sampler,
            snapshot,
        })
    }

    /// Recomputes the whole field from scratch.
    ///
    /// On error nothing changes: the previous configuration and snapshot stay in place.
    pub fn regenerate(&mut self, config: GeneratorConfig) -> Result<()> {
        self.sampler.generate_into(&config, &mut self.snapshot)?;
        self.config = config;
        counter!("Field regenerations");
        Ok(())
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Drops the field and hands its last snapshot to the caller.
    pub fn release(self) -> Snapshot {
        log::debug!("sample field released");
        self.snapshot
    }
}
