use crate::error::Error;
use crate::random::RandomSource;
use crate::system::System;

/// Control phase, keyed on the step index. Transitions are forward only:
/// Frozen until `freeze_until`, Reseed until `randomize_until`, then Rescale
/// to the end of the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Frozen,
    Reseed,
    Rescale,
}

/// Staged velocity controller with running kinetic-energy accounting.
///
/// `scale_v` is recomputed only at stride boundaries while in Rescale phase,
/// from the temperature of the interval that just closed, and applied
/// unchanged to every step until the next boundary. The one-interval lag is
/// intentional and matches the weak-coupling scheme this controller
/// implements.
pub struct Thermostat {
    pub freeze_until: usize,
    pub randomize_until: usize,
    pub target: f32,
    pub kb: f32,
    pub coupling: f32,
    pub scale_v: f32,
    accum: f32,
}

impl Thermostat {
    pub fn new(
        freeze_until: usize,
        randomize_until: usize,
        target: f32,
        kb: f32,
        dt: f32,
        relax: f32,
    ) -> Thermostat {
        Thermostat {
            freeze_until: freeze_until,
            randomize_until: randomize_until,
            target: target,
            kb: kb,
            coupling: dt / relax,
            scale_v: 1.0,
            accum: 0.0,
        }
    }

    pub fn phase(&self, step: usize) -> Phase {
        if step < self.freeze_until {
            Phase::Frozen
        } else if step < self.randomize_until {
            Phase::Reseed
        } else {
            Phase::Rescale
        }
    }

    // per-step velocity policy, applied after the integrator has finished
    // every particle. the finalized velocities feed the kinetic sum, whatever
    // the phase did to them.
    pub fn apply<R: RandomSource>(&mut self, step: usize, sys: &mut System, randoms: &mut R) {
        let phase = self.phase(step);
        for i in 0..sys.len() {
            match phase {
                Phase::Frozen => {
                    sys.v[i] = [0.0, 0.0, 0.0];
                }
                Phase::Reseed => {
                    // a fresh thermal velocity every step, discarding the
                    // integrated one
                    let root_m = sys.m[i].sqrt();
                    for k in 0..3 {
                        sys.v[i][k] = randoms.thermal() / root_m;
                    }
                }
                Phase::Rescale => {
                    for k in 0..3 {
                        sys.v[i][k] *= self.scale_v;
                    }
                }
            }
            let v = &sys.v[i];
            self.accum += sys.m[i] * (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]);
        }
    }

    // close a reporting interval: average the accumulated kinetic sum into a
    // temperature, reset it, and in Rescale phase derive the scale for the
    // steps ahead from the interval that just ended
    pub fn finish_interval(&mut self, step: usize, num: usize, stride: usize) -> Result<f32, Error> {
        let t_avg = self.accum / (num as f32 * stride as f32 * self.kb * 3.0);
        self.accum = 0.0;
        if self.phase(step) == Phase::Rescale {
            let radicand = 1.0 - ((t_avg - self.target) / self.target) * self.coupling;
            if !radicand.is_finite() || radicand < 0.0 {
                return Err(Error::ThermostatScale {
                    step: step,
                    t_avg: t_avg,
                });
            }
            self.scale_v = radicand.sqrt();
        }
        Ok(t_avg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::random::ScriptedSource;
    use crate::system::System;
    use approx::assert_relative_eq;

    fn thermostat() -> Thermostat {
        Thermostat::new(1000, 2000, 300.0, 8.31e-3, 0.001, 0.1)
    }

    fn small_system(num: usize) -> System {
        let mut config = Config::default();
        config.num = num;
        let mut randoms = ScriptedSource::new(vec![0.3], vec![0.0]);
        System::new(&config, &mut randoms)
    }

    #[test]
    fn phase_thresholds() {
        let t = thermostat();
        assert_eq!(t.phase(0), Phase::Frozen);
        assert_eq!(t.phase(999), Phase::Frozen);
        assert_eq!(t.phase(1000), Phase::Reseed);
        assert_eq!(t.phase(1999), Phase::Reseed);
        assert_eq!(t.phase(2000), Phase::Rescale);
        assert_eq!(t.phase(1000000), Phase::Rescale);
    }

    #[test]
    fn frozen_phase_zeroes_every_velocity() {
        let mut t = thermostat();
        let mut sys = small_system(4);
        let mut randoms = ScriptedSource::new(vec![0.5], vec![1.0]);

        for i in 0..sys.len() {
            sys.v[i] = [1.0, -2.0, 3.0];
        }
        t.apply(0, &mut sys, &mut randoms);

        for i in 0..sys.len() {
            assert_eq!(sys.v[i], [0.0, 0.0, 0.0]);
        }
    }

    #[test]
    fn reseed_phase_redraws_from_source() {
        let mut t = thermostat();
        let mut sys = small_system(2);
        let mut randoms = ScriptedSource::new(vec![0.5], vec![0.6, -0.2, 0.4, 0.1, -0.3, 0.5]);

        sys.v[0] = [9.0, 9.0, 9.0];
        sys.v[1] = [9.0, 9.0, 9.0];
        t.apply(1500, &mut sys, &mut randoms);

        let root_m0 = sys.m[0].sqrt();
        let root_m1 = sys.m[1].sqrt();
        assert_eq!(sys.v[0], [0.6 / root_m0, -0.2 / root_m0, 0.4 / root_m0]);
        assert_eq!(sys.v[1], [0.1 / root_m1, -0.3 / root_m1, 0.5 / root_m1]);
    }

    #[test]
    fn reseed_steps_do_not_carry_velocity_memory() {
        let mut t = thermostat();
        let mut sys = small_system(2);
        let draws = vec![
            0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0, 1.1, 1.2,
        ];
        let mut randoms = ScriptedSource::new(vec![0.5], draws);

        t.apply(1500, &mut sys, &mut randoms);
        let first = sys.v[0];
        t.apply(1501, &mut sys, &mut randoms);

        // the second draw replaces the first outright, no integration leaks in
        let root_m = sys.m[0].sqrt();
        assert_eq!(sys.v[0], [0.7 / root_m, 0.8 / root_m, 0.9 / root_m]);
        assert_ne!(sys.v[0], first);
    }

    #[test]
    fn rescale_phase_applies_one_shared_factor() {
        let mut t = thermostat();
        t.scale_v = 0.5;
        let mut sys = small_system(4);
        let mut randoms = ScriptedSource::new(vec![0.5], vec![1.0]);

        for i in 0..sys.len() {
            sys.v[i] = [2.0, -4.0, 6.0];
        }
        t.apply(2500, &mut sys, &mut randoms);

        for i in 0..sys.len() {
            assert_eq!(sys.v[i], [1.0, -2.0, 3.0]);
        }
    }

    #[test]
    fn interval_temperature_from_kinetic_sum() {
        let mut t = thermostat();
        let mut sys = small_system(2);
        let mut randoms = ScriptedSource::new(vec![0.5], vec![1.0]);

        // rescale phase with unit scale leaves velocities untouched
        sys.v[0] = [1.0, 0.0, 0.0];
        sys.v[1] = [0.0, 1.0, 0.0];
        t.apply(2500, &mut sys, &mut randoms);

        let expected_sum = sys.m[0] + sys.m[1];
        let expected_t = expected_sum / (2.0 * 1.0 * 8.31e-3 * 3.0);
        let t_avg = t.finish_interval(2500, 2, 1).unwrap();
        assert_relative_eq!(t_avg, expected_t, max_relative = 1e-6);
    }

    #[test]
    fn accumulator_resets_at_interval_boundary() {
        let mut t = thermostat();
        let mut sys = small_system(2);
        let mut randoms = ScriptedSource::new(vec![0.5], vec![1.0]);

        sys.v[0] = [1.0, 0.0, 0.0];
        t.apply(2500, &mut sys, &mut randoms);
        t.finish_interval(2500, 2, 1).unwrap();

        // a fresh interval with zero velocities reads back zero
        sys.v[0] = [0.0, 0.0, 0.0];
        t.apply(2501, &mut sys, &mut randoms);
        let t_avg = t.finish_interval(2501, 2, 1).unwrap();
        assert_eq!(t_avg, 0.0);
    }

    #[test]
    fn scale_untouched_outside_rescale_phase() {
        let mut t = thermostat();
        let mut sys = small_system(2);
        let mut randoms = ScriptedSource::new(vec![0.5], vec![1.0]);

        sys.v[0] = [5.0, 0.0, 0.0];
        t.apply(500, &mut sys, &mut randoms);
        t.finish_interval(500, 2, 1).unwrap();
        assert_eq!(t.scale_v, 1.0);

        t.apply(1500, &mut sys, &mut randoms);
        t.finish_interval(1500, 2, 1).unwrap();
        assert_eq!(t.scale_v, 1.0);
    }

    #[test]
    fn scale_recomputed_from_closed_interval() {
        let mut t = thermostat();
        let mut sys = small_system(2);
        let mut randoms = ScriptedSource::new(vec![0.5], vec![1.0]);

        sys.v[0] = [1.0, 1.0, 1.0];
        sys.v[1] = [1.0, -1.0, 1.0];
        t.apply(2500, &mut sys, &mut randoms);

        let t_avg = t.finish_interval(2500, 2, 1).unwrap();
        let radicand = 1.0 - ((t_avg - 300.0) / 300.0) * (0.001 / 0.1);
        assert_relative_eq!(t.scale_v, radicand.sqrt(), max_relative = 1e-6);
    }

    #[test]
    fn runaway_temperature_is_fatal() {
        // coupling of one makes any interval hotter than twice the target
        // push the radicand negative
        let mut t = Thermostat::new(0, 0, 1.0, 1.0, 1.0, 1.0);
        let mut sys = small_system(2);
        let mut randoms = ScriptedSource::new(vec![0.5], vec![1.0]);

        sys.v[0] = [100.0, 0.0, 0.0];
        t.apply(0, &mut sys, &mut randoms);

        match t.finish_interval(0, 2, 1) {
            Err(Error::ThermostatScale { step, .. }) => assert_eq!(step, 0),
            other => panic!("expected thermostat error, got {:?}", other),
        }
    }
}
