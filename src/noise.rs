//! Seedable coherent value noise.
//!
//! A 4096-entry lattice of random values is interpolated with a cosine
//! ease and summed over several octaves. The lattice is filled by a 32-bit
//! LCG so the field is fully determined by a single seed value.

use std::f64::consts::PI;

const Y_WRAP_BITS: i32 = 4;
const Y_WRAP: i32 = 1 << Y_WRAP_BITS;
const Z_WRAP_BITS: i32 = 8;
const Z_WRAP: i32 = 1 << Z_WRAP_BITS;
const LATTICE_MASK: i32 = 4095;
const LATTICE_SIZE: usize = LATTICE_MASK as usize + 1;

const OCTAVES: usize = 4;
const AMP_FALLOFF: f64 = 0.5;

/// Lattice fill generator (Numerical Recipes constants, modulus 2^32)
struct Lcg {
    state: u64,
}

impl Lcg {
    const A: u64 = 1664525;
    const C: u64 = 1013904223;
    const M: u64 = 1 << 32;

    fn new(seed: u32) -> Self {
        Self { state: seed as u64 }
    }

    fn next_f64(&mut self) -> f64 {
        self.state = (Self::A * self.state + Self::C) % Self::M;
        self.state as f64 / Self::M as f64
    }
}

fn scaled_cosine(t: f64) -> f64 {
    0.5 * (1.0 - (t * PI).cos())
}

/// Multi-octave value noise over a seeded lattice
#[derive(Clone)]
pub struct NoiseField {
    lattice: Vec<f64>,
}

impl NoiseField {
    /// Seed the lattice. The value is truncated to an unsigned 32-bit integer.
    pub fn from_seed(seed: f64) -> Self {
        let mut lcg = Lcg::new(seed as u32);
        let lattice = (0..LATTICE_SIZE).map(|_| lcg.next_f64()).collect();
        Self { lattice }
    }

    fn at(&self, offset: i32) -> f64 {
        self.lattice[(offset & LATTICE_MASK) as usize]
    }

    /// Sample the noise at a point. Result lies in [0, 1).
    pub fn sample(&self, x: f64, y: f64, z: f64) -> f64 {
        let (x, y, z) = (x.abs(), y.abs(), z.abs());

        // Lattice coordinates wrap like 32-bit integers; the mask picks the cell
        let mut xi = x.floor() as i64 as i32;
        let mut yi = y.floor() as i64 as i32;
        let mut zi = z.floor() as i64 as i32;
        let mut xf = x - x.floor();
        let mut yf = y - y.floor();
        let mut zf = z - z.floor();

        let mut r = 0.0;
        let mut ampl = 0.5;

        for _ in 0..OCTAVES {
            let mut of = xi
                .wrapping_add(yi << Y_WRAP_BITS)
                .wrapping_add(zi << Z_WRAP_BITS);

            let rxf = scaled_cosine(xf);
            let ryf = scaled_cosine(yf);

            let mut n1 = self.at(of);
            n1 += rxf * (self.at(of.wrapping_add(1)) - n1);
            let mut n2 = self.at(of.wrapping_add(Y_WRAP));
            n2 += rxf * (self.at(of.wrapping_add(Y_WRAP + 1)) - n2);
            n1 += ryf * (n2 - n1);

            of = of.wrapping_add(Z_WRAP);
            n2 = self.at(of);
            n2 += rxf * (self.at(of.wrapping_add(1)) - n2);
            let mut n3 = self.at(of.wrapping_add(Y_WRAP));
            n3 += rxf * (self.at(of.wrapping_add(Y_WRAP + 1)) - n3);
            n2 += ryf * (n3 - n2);

            n1 += scaled_cosine(zf) * (n2 - n1);

            r += n1 * ampl;
            ampl *= AMP_FALLOFF;

            xi <<= 1;
            xf *= 2.0;
            yi <<= 1;
            yf *= 2.0;
            zi <<= 1;
            zf *= 2.0;

            if xf >= 1.0 {
                xi = xi.wrapping_add(1);
                xf -= 1.0;
            }
            if yf >= 1.0 {
                yi = yi.wrapping_add(1);
                yf -= 1.0;
            }
            if zf >= 1.0 {
                zi = zi.wrapping_add(1);
                zf -= 1.0;
            }
        }

        r
    }

    /// 2D convenience wrapper (z = 0)
    pub fn sample2(&self, x: f64, y: f64) -> f64 {
        self.sample(x, y, 0.0)
    }
}
