// Precomputed erosion brush for a square grid.
// For every cell: the in-bounds neighbours within `radius`, each weighted by
// linear falloff `1 - dist / radius` and normalized to sum to 1.
// Stored in compressed rows: cell i owns entries `starts[i]..starts[i + 1]`.
#[derive(Debug, Clone)]
pub struct ErosionBrush {
    grid_size: usize,
    radius: usize,
    starts: Vec<usize>,
    indices: Vec<usize>,
    weights: Vec<f32>,
}

impl ErosionBrush {
    // Build brushes for every cell of a grid_size×grid_size map
    pub fn new(grid_size: usize, radius: usize) -> Self {
        let radius = radius.max(1);
        let r = radius as isize;
        let n = grid_size as isize;

        // disc offsets shared by every cell, clipped per cell below
        let mut disc = Vec::new();
        for dy in -r..=r {
            for dx in -r..=r {
                let sqr_dst = dx * dx + dy * dy;
                if sqr_dst < r * r {
                    let weight = 1.0 - (sqr_dst as f32).sqrt() / radius as f32;
                    disc.push((dx, dy, weight));
                }
            }
        }

        let cells = grid_size * grid_size;
        let mut starts = Vec::with_capacity(cells + 1);
        let mut indices = Vec::with_capacity(cells * disc.len());
        let mut weights = Vec::with_capacity(cells * disc.len());

        for cy in 0..n {
            for cx in 0..n {
                let start = indices.len();
                starts.push(start);
                let mut weight_sum = 0.0f32;
                for &(dx, dy, w) in &disc {
                    let x = cx + dx;
                    let y = cy + dy;
                    if x >= 0 && x < n && y >= 0 && y < n {
                        indices.push((y * n + x) as usize);
                        weights.push(w);
                        weight_sum += w;
                    }
                }
                // the centre (weight 1) is always present, so the sum is positive
                for w in &mut weights[start..] {
                    *w /= weight_sum;
                }
            }
        }
        starts.push(indices.len());

        Self {
            grid_size,
            radius,
            starts,
            indices,
            weights,
        }
    }

    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    pub fn radius(&self) -> usize {
        self.radius
    }

    // True when this brush can be reused for the given grid and radius
    pub fn matches(&self, grid_size: usize, radius: usize) -> bool {
        self.grid_size == grid_size && self.radius == radius.max(1)
    }

    // (neighbour index, weight) pairs for the cell at `index`
    pub fn at(&self, index: usize) -> impl Iterator<Item = (usize, f32)> + '_ {
        let range = self.starts[index]..self.starts[index + 1];
        self.indices[range.clone()]
            .iter()
            .copied()
            .zip(self.weights[range].iter().copied())
    }
}
