use crate::boundary::PeriodicBox;
use crate::system::System;

// accumulate Coulomb and Lennard-Jones forces over all unique pairs into the
// per-particle accumulators. every contribution on i is paired with its exact
// negative on j, so the total force sums to zero up to rounding. accumulators
// are expected to hold zero on entry; the integrator clears them after
// consuming. O(N^2) over minimum-image separations, no cutoff.
pub fn accumulate(sys: &mut System, bounds: &PeriodicBox, coulomb: f32) {
    let num = sys.len();
    let mut comp: f32;
    for i in 0..(num - 1) {
        for j in (i + 1)..num {
            let dv = bounds.min_image(&sys.r[i], &sys.r[j]);
            let dr2 = dv[0] * dv[0] + dv[1] * dv[1] + dv[2] * dv[2];
            let dr = dr2.sqrt();

            // Coulomb coefficient k q_i q_j / dr^3
            let dfc = coulomb * sys.q[i] * sys.q[j] / (dr2 * dr);

            // Lennard-Jones with arithmetic-mean sigma and geometric-mean
            // epsilon; diverges as dr -> 0, overlapping particles are the
            // caller's problem
            let sig = 0.5 * (sys.sigma[i] + sys.sigma[j]);
            let eps = -12.0 * (sys.eps[i] * sys.eps[j]).sqrt();
            let s2 = sig * sig / dr2;
            let s6 = s2 * s2 * s2;
            let dflj = eps * s6 * (1.0 - s6) / dr2;

            let df = dfc + dflj;
            for k in 0..3 {
                comp = df * dv[k];
                sys.f[i][k] += comp;
                sys.f[j][k] -= comp;
            }
        }
    }
}
