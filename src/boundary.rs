/// Cubic periodic box of edge length `l`, same on all three axes.
pub struct PeriodicBox {
    pub l: f32,
}

impl PeriodicBox {
    pub fn new(l: f32) -> PeriodicBox {
        PeriodicBox { l: l }
    }

    // shortest signed displacement between the periodic images of a and b;
    // each component comes out with magnitude at most l/2
    pub fn min_image(&self, a: &[f32; 3], b: &[f32; 3]) -> [f32; 3] {
        let mut dr = [0.0f32; 3];
        for k in 0..3 {
            let d = a[k] - b[k];
            dr[k] = d - self.l * (d / self.l).round();
        }
        dr
    }

    // wrap a coordinate into [0, l); closed form, holds for arbitrarily
    // large excursions
    pub fn wrap(&self, x: f32) -> f32 {
        let w = x.rem_euclid(self.l);
        // rem_euclid can round up to l itself for tiny negative x
        if w >= self.l {
            0.0
        } else {
            w
        }
    }
}
