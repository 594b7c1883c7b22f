use md_salt::config::Config;
use md_salt::error::Error;
use md_salt::simulation::Simulation;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("md-salt: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Error> {
    // parse command line options
    let config = Config::new()?;

    // initialize the simulation
    let mut sim = Simulation::new_from_config(&config)?;

    // run the step loop
    sim.run()
}
