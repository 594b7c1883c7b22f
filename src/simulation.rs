use log::{debug, info};

use crate::boundary::PeriodicBox;
use crate::config::Config;
use crate::error::Error;
use crate::forces;
use crate::integrate;
use crate::random::{PcgSource, RandomSource};
use crate::system::System;
use crate::thermostat::Thermostat;
use crate::trajectory::TrajectoryWriter;

/// Owns one run: particle arrays, box geometry, thermostat state, the random
/// stream and the trajectory writer. Single threaded; the step loop is the
/// only writer of particle state.
pub struct Simulation<R: RandomSource> {
    pub config: Config,
    pub system: System,
    pub bounds: PeriodicBox,
    pub thermostat: Thermostat,
    pub randoms: R,
    pub writer: TrajectoryWriter,
}

impl Simulation<PcgSource> {
    // initialize system from Config struct
    pub fn new_from_config(config: &Config) -> Result<Simulation<PcgSource>, Error> {
        let randoms = PcgSource::new(config.seed, config.kb, config.temp)?;
        Simulation::with_randoms(config, randoms)
    }
}

impl<R: RandomSource> Simulation<R> {
    // same, with a caller-supplied random source
    pub fn with_randoms(config: &Config, mut randoms: R) -> Result<Simulation<R>, Error> {
        config.validate()?;
        let system = System::new(config, &mut randoms);
        let bounds = PeriodicBox::new(config.length);
        let thermostat = Thermostat::new(
            config.freeze_until,
            config.randomize_until,
            config.temp,
            config.kb,
            config.dt,
            config.relax,
        );
        let writer = TrajectoryWriter::create(config.trajectory_path())?;
        Ok(Simulation {
            config: config.clone(),
            system: system,
            bounds: bounds,
            thermostat: thermostat,
            randoms: randoms,
            writer: writer,
        })
    }

    // one full step. the ordering is a contract: forces over all pairs
    // complete first, the integrator then consumes and clears them for every
    // particle, and only then does the thermostat override velocities and
    // close its kinetic sum. returns the interval temperature at stride
    // boundaries, after writing the frame.
    pub fn step(&mut self, step: usize) -> Result<Option<f32>, Error> {
        forces::accumulate(&mut self.system, &self.bounds, self.config.coulomb);
        integrate::advance(&mut self.system, &self.bounds, self.config.dt, step)?;
        self.thermostat
            .apply(step, &mut self.system, &mut self.randoms);

        if step % self.config.stride == 0 {
            let t_avg = self
                .thermostat
                .finish_interval(step, self.config.num, self.config.stride)?;
            debug!(
                "step {}: T_avg = {:.3}, scale_v = {:.6}",
                step, t_avg, self.thermostat.scale_v
            );
            self.writer.write_frame(&self.system, self.config.length)?;
            return Ok(Some(t_avg));
        }
        Ok(None)
    }

    // run the fixed-length step loop, reporting the interval temperature on
    // stdout every stride
    pub fn run(&mut self) -> Result<(), Error> {
        info!(
            "starting run: {} particles, box edge {}, target T {}, {} steps",
            self.config.num, self.config.length, self.config.temp, self.config.step_max
        );
        for step in 0..(self.config.step_max + 1) {
            if let Some(t_avg) = self.step(step)? {
                println!("{:8} {:10.3}", step, t_avg);
            }
        }
        info!("run complete, trajectory in {}", self.config.trajectory_path());
        Ok(())
    }
}
