use crate::NoiseGenerator;

// Smallest scale accepted before it is treated as degenerate
pub const MIN_SCALE: f64 = 1e-5;

// Ken Perlin's reference permutation of 0..=255
const PERMUTATION: [u8; 256] = [
    151, 160, 137, 91, 90, 15, 131, 13, 201, 95, 96, 53, 194, 233, 7, 225, 140, 36, 103, 30, 69,
    142, 8, 99, 37, 240, 21, 10, 23, 190, 6, 148, 247, 120, 234, 75, 0, 26, 197, 62, 94, 252, 219,
    203, 117, 35, 11, 32, 57, 177, 33, 88, 237, 149, 56, 87, 174, 20, 125, 136, 171, 168, 68, 175,
    74, 165, 71, 134, 139, 48, 27, 166, 77, 146, 158, 231, 83, 111, 229, 122, 60, 211, 133, 230,
    220, 105, 92, 41, 55, 46, 245, 40, 244, 102, 143, 54, 65, 25, 63, 161, 1, 216, 80, 73, 209, 76,
    132, 187, 208, 89, 18, 169, 200, 196, 135, 130, 116, 188, 159, 86, 164, 100, 109, 198, 173,
    186, 3, 64, 52, 217, 226, 250, 124, 123, 5, 202, 38, 147, 118, 126, 255, 82, 85, 212, 207, 206,
    59, 227, 47, 16, 58, 17, 182, 189, 28, 42, 223, 183, 170, 213, 119, 248, 152, 2, 44, 154, 163,
    70, 221, 153, 101, 155, 167, 43, 172, 9, 129, 22, 39, 253, 19, 98, 108, 110, 79, 113, 224, 232,
    178, 185, 112, 104, 218, 246, 97, 228, 251, 34, 242, 193, 238, 210, 144, 12, 191, 179, 162,
    241, 81, 51, 145, 235, 249, 14, 239, 107, 49, 192, 214, 31, 181, 199, 106, 157, 184, 84, 204,
    176, 115, 121, 50, 45, 127, 4, 150, 254, 138, 236, 205, 93, 222, 114, 67, 29, 24, 72, 243, 141,
    128, 195, 78, 66, 215, 61, 156, 180,
];

// Fade function as defined by Ken Perlin: 6t^5 − 15t^4 + 10t^3
// First and second derivatives are zero at t=0 and t=1, so neighbouring
// cells join without visible creases.
#[inline]
pub fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

// Dot product of one of the 12 cube-edge gradients with (x, y, z).
// The low 4 bits of the hash pick the gradient; 12..16 repeat four of them.
#[inline]
fn grad(hash: u8, x: f64, y: f64, z: f64) -> f64 {
    let h = hash & 0xF;
    let u = if h < 8 { x } else { y };
    let v = if h < 4 {
        y
    } else if h == 12 || h == 14 {
        x
    } else {
        z
    };
    let sign_u = if (h & 1) == 0 { u } else { -u };
    let sign_v = if (h & 2) == 0 { v } else { -v };
    sign_u + sign_v
}

// Deterministic 3D gradient noise over a fixed permutation table.
// No seed: identical inputs give bit-identical output on every run.
#[derive(Debug, Clone)]
pub struct Perlin3D {
    perm: [u8; 512], // reference table duplicated to avoid wrapping lookups
}

impl Default for Perlin3D {
    fn default() -> Self {
        Self::new()
    }
}

impl Perlin3D {
    pub fn new() -> Self {
        let mut perm = [0u8; 512];
        for (i, slot) in perm.iter_mut().enumerate() {
            *slot = PERMUTATION[i & 255];
        }
        Self { perm }
    }

    #[inline]
    fn p(&self, i: usize) -> usize {
        self.perm[i] as usize
    }

    // Raw single-octave noise at (x, y, z), in [-1, 1]
    pub fn sample(&self, x: f64, y: f64, z: f64) -> f64 {
        let (x0, y0, z0) = (x.floor(), y.floor(), z.floor());
        // i64 keeps large octave offsets from saturating before the wrap
        let xi = (x0 as i64 & 255) as usize;
        let yi = (y0 as i64 & 255) as usize;
        let zi = (z0 as i64 & 255) as usize;
        let (xf, yf, zf) = (x - x0, y - y0, z - z0);

        let u = fade(xf);
        let v = fade(yf);
        let w = fade(zf);

        // Every index stays below 512: p(..) <= 255, plus a coordinate <= 255, plus 1
        let a = self.p(xi) + yi;
        let aa = self.p(a) + zi;
        let ab = self.p(a + 1) + zi;
        let b = self.p(xi + 1) + yi;
        let ba = self.p(b) + zi;
        let bb = self.p(b + 1) + zi;

        let x1 = lerp(
            grad(self.perm[aa], xf, yf, zf),
            grad(self.perm[ba], xf - 1.0, yf, zf),
            u,
        );
        let x2 = lerp(
            grad(self.perm[ab], xf, yf - 1.0, zf),
            grad(self.perm[bb], xf - 1.0, yf - 1.0, zf),
            u,
        );
        let y1 = lerp(x1, x2, v);

        let x3 = lerp(
            grad(self.perm[aa + 1], xf, yf, zf - 1.0),
            grad(self.perm[ba + 1], xf - 1.0, yf, zf - 1.0),
            u,
        );
        let x4 = lerp(
            grad(self.perm[ab + 1], xf, yf - 1.0, zf - 1.0),
            grad(self.perm[bb + 1], xf - 1.0, yf - 1.0, zf - 1.0),
            u,
        );
        let y2 = lerp(x3, x4, v);

        lerp(y1, y2, w).clamp(-1.0, 1.0)
    }

    // Sum `octaves` layers at one point, divided by the total amplitude.
    // Result stays in [-1, 1]; zero octaves gives 0.
    #[allow(clippy::too_many_arguments)]
    pub fn octave(
        &self,
        x: f64,
        y: f64,
        z: f64,
        scale: f64,
        octaves: usize,
        persistence: f64,
        lacunarity: f64,
    ) -> f64 {
        let scale = if scale <= 0.0 { MIN_SCALE } else { scale };
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        let mut total = 0.0;
        let mut max_amp = 0.0;

        for _ in 0..octaves {
            total += self.sample(
                x / scale * frequency,
                y / scale * frequency,
                z / scale * frequency,
            ) * amplitude;
            max_amp += amplitude;
            amplitude *= persistence;
            frequency *= lacunarity;
        }

        if max_amp > 0.0 { total / max_amp } else { 0.0 }
    }
}

impl NoiseGenerator for Perlin3D {
    fn get3(&self, x: f64, y: f64, z: f64) -> f64 {
        self.sample(x, y, z)
    }
}
