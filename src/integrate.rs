use crate::boundary::PeriodicBox;
use crate::error::Error;
use crate::system::System;

// advance every particle one time step with semi-implicit Euler: velocity
// first, from the force computed at the start of the step, then position
// from the just-updated velocity. positions leave wrapped into [0, l). the
// force accumulator is consumed here and cleared, so the next force pass
// starts from zero. the first particle with a non-finite position or
// velocity aborts the run.
pub fn advance(sys: &mut System, bounds: &PeriodicBox, dt: f32, step: usize) -> Result<(), Error> {
    let num = sys.len();
    for i in 0..num {
        let mut finite = true;
        for k in 0..3 {
            sys.v[i][k] += dt * sys.f[i][k] / sys.m[i];
            sys.r[i][k] = bounds.wrap(sys.r[i][k] + dt * sys.v[i][k]);
            sys.f[i][k] = 0.0;
            finite &= sys.v[i][k].is_finite() && sys.r[i][k].is_finite();
        }
        if !finite {
            return Err(Error::Diverged {
                step: step,
                particle: i,
            });
        }
    }
    Ok(())
}
