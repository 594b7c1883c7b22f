use clap::{App, Arg};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::Error;

/// Static parameters of one ion species.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesParams {
    pub name: String,
    pub charge: f32,
    pub mass: f32,
    pub sigma: f32,
    pub epsilon: f32,
}

/// Immutable run configuration.
///
/// Built once before the step loop and shared by every component; nothing in
/// here changes during a run. Units are nm, ps, amu and kJ/mol throughout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub num: usize,
    pub length: f32,
    pub temp: f32,
    pub dt: f32,
    pub relax: f32,
    pub step_max: usize,
    pub stride: usize,
    pub freeze_until: usize,
    pub randomize_until: usize,
    pub seed: u64,
    pub coulomb: f32,
    pub kb: f32,
    pub cation: SpeciesParams,
    pub anion: SpeciesParams,
    pub traj: Option<String>,
}

impl Default for Config {
    // reference NaCl melt parameters; ion sigma/epsilon from the CHARMM
    // SOD/CLA entries
    fn default() -> Config {
        Config {
            num: 100,
            length: 5.0,
            temp: 300.0,
            dt: 0.001,
            relax: 0.1,
            step_max: 20000,
            stride: 100,
            freeze_until: 1000,
            randomize_until: 2000,
            seed: 123456,
            coulomb: 138.9118,
            kb: 8.31e-3,
            cation: SpeciesParams {
                name: String::from("Na"),
                charge: 1.0,
                mass: 22.98,
                sigma: 0.2514,
                epsilon: 0.1962,
            },
            anion: SpeciesParams {
                name: String::from("Cl"),
                charge: -1.0,
                mass: 35.45,
                sigma: 0.4045,
                epsilon: 0.6276,
            },
            traj: None,
        }
    }
}

impl Config {
    // initialize configuration from command line arguments
    pub fn new() -> Result<Config, Error> {
        let matches = App::new("NaCl melt simulation")
            .version("0.2.0")
            .about("Runs a classical MD simulation of a 1:1 salt melt in a cubic periodic box. \
                    Computes pairwise Coulomb and Lennard-Jones forces, integrates with \
                    semi-implicit Euler, and controls temperature with a staged velocity policy.")
            .arg(Arg::with_name("NUM")
                .short("n")
                .long("num")
                .help("Number of particles in the box (even, half cations half anions)")
                .takes_value(true)
                .default_value("100"))
            .arg(Arg::with_name("LENGTH")
                .short("l")
                .long("length")
                .help("Edge length of the cubic box")
                .takes_value(true)
                .default_value("5.0"))
            .arg(Arg::with_name("TEMP")
                .short("t")
                .long("temp")
                .help("Target temperature of the system")
                .takes_value(true)
                .default_value("300.0"))
            .arg(Arg::with_name("DT")
                .long("dt")
                .help("Size of the system timestep")
                .takes_value(true)
                .default_value("0.001"))
            .arg(Arg::with_name("RELAX")
                .long("relax")
                .help("Relaxation time of the velocity-rescale thermostat")
                .takes_value(true)
                .default_value("0.1"))
            .arg(Arg::with_name("STEP")
                .short("s")
                .long("steps")
                .help("Maximum number of simulation steps")
                .takes_value(true)
                .default_value("20000"))
            .arg(Arg::with_name("STRIDE")
                .short("o")
                .long("stride")
                .help("Number of steps between temperature reports and trajectory frames")
                .takes_value(true)
                .default_value("100"))
            .arg(Arg::with_name("FREEZE")
                .long("freeze")
                .help("Step count of the frozen-velocity relaxation phase")
                .takes_value(true)
                .default_value("1000"))
            .arg(Arg::with_name("RANDOMIZE")
                .long("randomize")
                .help("Step up to which velocities are redrawn from the thermal distribution")
                .takes_value(true)
                .default_value("2000"))
            .arg(Arg::with_name("SEED")
                .long("seed")
                .help("Random seed to initialize the system state")
                .takes_value(true)
                .default_value("123456"))
            .arg(Arg::with_name("TRAJ")
                .long("traj")
                .help("Trajectory output path (overrides the generated name)")
                .takes_value(true))
            .arg(Arg::with_name("CONFIG")
                .short("c")
                .long("config")
                .help("Load all parameters, including the per-species tables, from a TOML file")
                .takes_value(true))
            .get_matches();

        // a config file carries everything, including the species tables
        // that have no command line flag
        if let Some(path) = matches.value_of("CONFIG") {
            let config: Config = confy::load_path(path)?;
            config.validate()?;
            return Ok(config);
        }

        let mut config = Config::default();
        config.num = Config::conv_match::<usize>(&matches, "NUM");
        config.length = Config::conv_match::<f32>(&matches, "LENGTH");
        config.temp = Config::conv_match::<f32>(&matches, "TEMP");
        config.dt = Config::conv_match::<f32>(&matches, "DT");
        config.relax = Config::conv_match::<f32>(&matches, "RELAX");
        config.step_max = Config::conv_match::<usize>(&matches, "STEP");
        config.stride = Config::conv_match::<usize>(&matches, "STRIDE");
        config.freeze_until = Config::conv_match::<usize>(&matches, "FREEZE");
        config.randomize_until = Config::conv_match::<usize>(&matches, "RANDOMIZE");
        config.seed = Config::conv_match::<u64>(&matches, "SEED");
        config.traj = matches.value_of("TRAJ").map(String::from);
        config.validate()?;
        Ok(config)
    }

    // reject bad parameters before the step loop starts
    pub fn validate(&self) -> Result<(), Error> {
        if self.num == 0 || self.num % 2 != 0 {
            return Err(Error::Config(format!(
                "particle count must be even and nonzero, got {}",
                self.num
            )));
        }
        if !(self.length > 0.0) {
            return Err(Error::Config(format!(
                "box edge must be positive, got {}",
                self.length
            )));
        }
        if !(self.temp > 0.0) {
            return Err(Error::Config(format!(
                "target temperature must be positive, got {}",
                self.temp
            )));
        }
        if !(self.dt > 0.0) {
            return Err(Error::Config(format!(
                "timestep must be positive, got {}",
                self.dt
            )));
        }
        if !(self.relax > 0.0) {
            return Err(Error::Config(format!(
                "relaxation time must be positive, got {}",
                self.relax
            )));
        }
        if self.stride == 0 {
            return Err(Error::Config(String::from("stride must be at least 1")));
        }
        if self.freeze_until > self.randomize_until {
            return Err(Error::Config(format!(
                "freeze phase ({}) cannot outlast the randomize threshold ({})",
                self.freeze_until, self.randomize_until
            )));
        }
        if !(self.cation.mass > 0.0) || !(self.anion.mass > 0.0) {
            return Err(Error::Config(String::from("species masses must be positive")));
        }
        Ok(())
    }

    // format output file suffix with configuration data
    pub fn format_file_suffix(&self) -> String {
        format!(
            "n{}_l{}_t{}_step{}_dt{}_seed{}",
            self.num, self.length, self.temp, self.step_max, self.dt, self.seed
        )
    }

    pub fn trajectory_path(&self) -> String {
        match &self.traj {
            Some(path) => path.clone(),
            None => format!("traj_{}.gro", self.format_file_suffix()),
        }
    }

    // convert matches to corresponding generic types
    fn conv_match<T>(matches: &clap::ArgMatches, tag: &str) -> T
    where
        T: FromStr,
        <T as std::str::FromStr>::Err: std::fmt::Debug,
    {
        FromStr::from_str(matches.value_of(tag).unwrap()).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn odd_particle_count_rejected() {
        let mut config = Config::default();
        config.num = 99;
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_particle_count_rejected() {
        let mut config = Config::default();
        config.num = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn nonpositive_box_rejected() {
        let mut config = Config::default();
        config.length = 0.0;
        assert!(config.validate().is_err());
        config.length = -5.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_stride_rejected() {
        let mut config = Config::default();
        config.stride = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn inverted_phase_thresholds_rejected() {
        let mut config = Config::default();
        config.freeze_until = 3000;
        config.randomize_until = 2000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn trajectory_path_encodes_parameters() {
        let config = Config::default();
        assert_eq!(
            config.trajectory_path(),
            "traj_n100_l5_t300_step20000_dt0.001_seed123456.gro"
        );
    }

    #[test]
    fn trajectory_path_override() {
        let mut config = Config::default();
        config.traj = Some(String::from("out.gro"));
        assert_eq!(config.trajectory_path(), "out.gro");
    }

    #[test]
    fn config_loads_from_toml_file() {
        let path = std::env::temp_dir().join(format!("md_salt_config_{}.toml", std::process::id()));
        let toml = r#"
num = 8
length = 4.0
temp = 250.0
dt = 0.002
relax = 0.2
step_max = 500
stride = 50
freeze_until = 100
randomize_until = 200
seed = 7
coulomb = 138.9118
kb = 0.00831

[cation]
name = "Na"
charge = 1.0
mass = 22.98
sigma = 0.2514
epsilon = 0.1962

[anion]
name = "Cl"
charge = -1.0
mass = 35.45
sigma = 0.4045
epsilon = 0.6276
"#;
        std::fs::write(&path, toml).unwrap();
        let config: Config = confy::load_path(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.num, 8);
        assert_eq!(config.temp, 250.0);
        assert_eq!(config.seed, 7);
        assert_eq!(config.anion.mass, 35.45);
        assert_eq!(config.traj, None);
        assert!(config.validate().is_ok());
    }
}
