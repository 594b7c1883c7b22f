use crate::config::Config;
use crate::random::RandomSource;

/// Ion species, fixed per particle at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Species {
    Cation,
    Anion,
}

/// Per-particle state as parallel arrays, all indexed 0..num.
///
/// The first half of every array is the cation species, the second half the
/// anion. Trajectory output encodes this ordering positionally, so nothing
/// may resize or reorder the arrays after construction; position, velocity
/// and force are the only fields mutated during a run.
pub struct System {
    pub species: Vec<Species>,
    pub name: Vec<String>,
    pub q: Vec<f32>,
    pub m: Vec<f32>,
    pub sigma: Vec<f32>,
    pub eps: Vec<f32>,
    pub r: Vec<[f32; 3]>,
    pub v: Vec<[f32; 3]>,
    pub f: Vec<[f32; 3]>,
}

impl System {
    // assign static parameters by index, then draw the initial state:
    // positions uniform in [0, l)^3, velocities thermal over sqrt(mass),
    // three position components then three velocity components per particle
    pub fn new<R: RandomSource>(config: &Config, randoms: &mut R) -> System {
        let num = config.num;

        let mut species = Vec::with_capacity(num);
        let mut name = Vec::with_capacity(num);
        let mut q = Vec::with_capacity(num);
        let mut m = Vec::with_capacity(num);
        let mut sigma = Vec::with_capacity(num);
        let mut eps = Vec::with_capacity(num);

        for i in 0..num {
            let (s, params) = if i < num / 2 {
                (Species::Cation, &config.cation)
            } else {
                (Species::Anion, &config.anion)
            };
            species.push(s);
            name.push(params.name.clone());
            q.push(params.charge);
            m.push(params.mass);
            sigma.push(params.sigma);
            eps.push(params.epsilon);
        }

        let mut r = Vec::with_capacity(num);
        let mut v = Vec::with_capacity(num);
        for i in 0..num {
            r.push([
                randoms.uniform() * config.length,
                randoms.uniform() * config.length,
                randoms.uniform() * config.length,
            ]);
            let root_m = m[i].sqrt();
            v.push([
                randoms.thermal() / root_m,
                randoms.thermal() / root_m,
                randoms.thermal() / root_m,
            ]);
        }

        System {
            species: species,
            name: name,
            q: q,
            m: m,
            sigma: sigma,
            eps: eps,
            r: r,
            v: v,
            f: vec![[0.0; 3]; num],
        }
    }

    pub fn len(&self) -> usize {
        self.r.len()
    }

    pub fn is_empty(&self) -> bool {
        self.r.is_empty()
    }
}
