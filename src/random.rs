use rand::prelude::*;
use rand_distr::{Distribution, Normal};
use rand_pcg::Pcg64;

use crate::error::Error;

/// Source of every random draw the engine makes.
///
/// Kept behind a trait so tests can substitute recorded sequences for the
/// seeded generator. One stream feeds both the initial configuration and the
/// reseed-phase velocity draws, in draw order.
pub trait RandomSource {
    /// Uniform draw in [0, 1).
    fn uniform(&mut self) -> f32;

    /// Draw from N(0, sqrt(KB * T_target)), the thermal velocity scale
    /// before the per-particle 1/sqrt(mass) factor.
    fn thermal(&mut self) -> f32;
}

/// Pcg64 generator carrying the thermal normal distribution for the
/// configured target temperature.
pub struct PcgSource {
    rng: Pcg64,
    normal: Normal<f32>,
}

impl PcgSource {
    pub fn new(seed: u64, kb: f32, temp: f32) -> Result<PcgSource, Error> {
        let normal = Normal::new(0.0f32, (kb * temp).sqrt())
            .map_err(|e| Error::Config(format!("thermal distribution: {}", e)))?;
        Ok(PcgSource {
            rng: Pcg64::seed_from_u64(seed),
            normal: normal,
        })
    }
}

impl RandomSource for PcgSource {
    fn uniform(&mut self) -> f32 {
        self.rng.gen()
    }

    fn thermal(&mut self) -> f32 {
        self.normal.sample(&mut self.rng)
    }
}

/// Replays fixed sequences, cycling when exhausted. Test double for
/// [`PcgSource`]; both sequences must be non-empty.
pub struct ScriptedSource {
    uniforms: Vec<f32>,
    thermals: Vec<f32>,
    next_uniform: usize,
    next_thermal: usize,
}

impl ScriptedSource {
    pub fn new(uniforms: Vec<f32>, thermals: Vec<f32>) -> ScriptedSource {
        ScriptedSource {
            uniforms: uniforms,
            thermals: thermals,
            next_uniform: 0,
            next_thermal: 0,
        }
    }
}

impl RandomSource for ScriptedSource {
    fn uniform(&mut self) -> f32 {
        let value = self.uniforms[self.next_uniform % self.uniforms.len()];
        self.next_uniform += 1;
        value
    }

    fn thermal(&mut self) -> f32 {
        let value = self.thermals[self.next_thermal % self.thermals.len()];
        self.next_thermal += 1;
        value
    }
}
