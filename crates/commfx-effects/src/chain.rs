//! Sequential application of effects.

use serde::Serialize;

use crate::analysis::{peak, rms};
use crate::buffer::AudioBuffer;
use crate::config::ChainSpec;
use crate::effects::{check_sample_rate, Effect};
use crate::error::AudioResult;
use crate::rng::derive_pass_seed;

/// Levels after one pass of the chain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PassReport {
    /// 0-indexed position in the chain.
    pub index: usize,
    /// Effect name.
    pub name: String,
    /// Peak absolute sample after the pass.
    pub peak: f64,
    /// RMS over all channels after the pass.
    pub rms: f64,
}

/// Result of running a chain.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainOutput {
    /// The processed buffer.
    pub buffer: AudioBuffer,
    /// One report per applied effect.
    pub passes: Vec<PassReport>,
}

/// An ordered list of effects applied one after another.
#[derive(Default)]
pub struct EffectChain {
    effects: Vec<Box<dyn Effect>>,
}

impl EffectChain {
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the chain described by `spec`.
    pub fn from_spec(spec: &ChainSpec) -> Self {
        Self {
            effects: spec.effects.iter().map(|e| e.build()).collect(),
        }
    }

    /// Appends an effect.
    pub fn push(&mut self, effect: Box<dyn Effect>) {
        self.effects.push(effect);
    }

    /// Appends an effect, builder style.
    pub fn with(mut self, effect: impl Effect + 'static) -> Self {
        self.effects.push(Box::new(effect));
        self
    }

    /// Number of effects.
    pub fn len(&self) -> usize {
        self.effects.len()
    }

    /// Returns true if the chain has no effects.
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Names of the effects, in order.
    pub fn names(&self) -> Vec<&'static str> {
        self.effects.iter().map(|e| e.name()).collect()
    }

    /// Runs every effect in order.
    ///
    /// Pass `i` receives a seed derived from `seed` and `i`. The first failing
    /// pass aborts the chain and no buffer is returned.
    pub fn process(
        &self,
        input: &AudioBuffer,
        sample_rate: u32,
        seed: u32,
    ) -> AudioResult<ChainOutput> {
        check_sample_rate(sample_rate)?;

        let mut buffer = input.clone();
        let mut passes = Vec::with_capacity(self.effects.len());

        for (index, effect) in self.effects.iter().enumerate() {
            let pass_seed = derive_pass_seed(seed, index as u32);
            buffer = effect.process(&buffer, sample_rate, pass_seed)?;

            let samples = buffer.to_interleaved();
            passes.push(PassReport {
                index,
                name: effect.name().to_string(),
                peak: peak(&samples),
                rms: rms(&samples),
            });
        }

        Ok(ChainOutput { buffer, passes })
    }
}

impl std::fmt::Debug for EffectChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectChain")
            .field("effects", &self.names())
            .finish()
    }
}
