//! Injectable randomness for the simulator

use rand::Rng;

use super::SimulationParams;
use crate::Kmh;

/// Source of the random decisions taken during a tick.
///
/// Every `rand::Rng` qualifies; tests can script the outcomes instead.
pub trait RandomSource {
    /// `true` with the given probability
    fn chance(&mut self, probability: f64) -> bool;
    /// Uniform sample from `[low, high]`
    fn uniform(&mut self, low: f64, high: f64) -> f64;
}

impl<R: Rng + ?Sized> RandomSource for R {
    fn chance(&mut self, probability: f64) -> bool {
        self.gen_bool(probability.clamp(0.0, 1.0))
    }

    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        if low < high {
            self.gen_range(low..=high)
        } else {
            low
        }
    }
}

/// Random outcomes for one vehicle in one tick
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(crate) struct TickDraws {
    /// Speed change to apply, when the speed roll fired
    pub(crate) speed_change: Option<Kmh>,
    pub(crate) reclassify: bool,
}

impl TickDraws {
    /// Draws in a fixed order: speed roll, speed delta (only when the roll
    /// fired), status roll.
    pub(crate) fn sample<R: RandomSource + ?Sized>(rng: &mut R, params: &SimulationParams) -> Self {
        let speed_change = rng
            .chance(params.speed_change_probability)
            .then(|| rng.uniform(-params.speed_delta, params.speed_delta));
        let reclassify = rng.chance(params.status_change_probability);
        Self {
            speed_change,
            reclassify,
        }
    }
}
