//! Sample world generation: a row of heightmap chunks painted from the
//! configured palette.

use noise::{NoiseFn, Simplex};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;
use warfest_voxel::{Chunk, ChunkError, Color, Voxel};

/// Chance that a buried voxel is swapped for a random palette color.
const SPECKLE_CHANCE: f64 = 0.04;

/// Deterministic chunk generator.
///
/// Terrain height is two octaves of simplex noise sampled in world space, so
/// neighboring chunks line up. The surface uses the third palette color, the
/// next few voxels the second, and everything below the first, with random
/// speckles of the whole palette underground.
pub struct WorldGenerator {
    noise: Simplex,
    rng: Xoshiro256StarStar,
    palette: Vec<Color>,
    dims: [usize; 3],
}

impl WorldGenerator {
    pub fn new(seed: u64, palette: Vec<Color>, dims: [usize; 3]) -> Self {
        Self {
            noise: Simplex::new(seed as u32),
            rng: Xoshiro256StarStar::seed_from_u64(seed),
            palette,
            dims,
        }
    }

    /// Surface height at world column `(x, z)`, within `[1, size_y]`.
    fn surface_height(&self, x: f64, z: f64) -> usize {
        let size_y = self.dims[1] as f64;
        let sample = self.noise.get([x * 0.05, z * 0.05]) * 0.7
            + self.noise.get([x * 0.15, z * 0.15]) * 0.3;
        let height = (0.5 + sample * 0.35) * size_y;
        (height.round() as usize).clamp(1, self.dims[1])
    }

    fn layer_color(&self, depth: usize) -> Color {
        let band = match depth {
            0 => 2,
            1..=3 => 1,
            _ => 0,
        };
        self.palette[band.min(self.palette.len() - 1)]
    }

    /// Generates the chunk at position `index` along the world x axis.
    ///
    /// An empty palette yields an all-air chunk.
    pub fn generate(&mut self, index: u32) -> Result<Chunk, ChunkError> {
        let [size_x, size_y, size_z] = self.dims;
        let mut chunk = Chunk::new(size_x, size_y, size_z)?;
        if self.palette.is_empty() {
            return Ok(chunk);
        }

        let origin_x = index as f64 * size_x as f64;
        for z in 0..size_z {
            for x in 0..size_x {
                let height = self.surface_height(origin_x + x as f64, z as f64);
                for y in 0..height {
                    let depth = height - 1 - y;
                    let color = if depth > 3 && self.rng.gen_bool(SPECKLE_CHANCE) {
                        self.palette[self.rng.gen_range(0..self.palette.len())]
                    } else {
                        self.layer_color(depth)
                    };
                    chunk.set(x, y, z, Voxel::solid(color))?;
                }
            }
        }
        Ok(chunk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn palette() -> Vec<Color> {
        vec![Color::rgb(127, 127, 127), Color::rgb(110, 70, 30), Color::GREEN]
    }

    #[test]
    fn test_same_seed_same_world() {
        let mut a = WorldGenerator::new(42, palette(), [8, 16, 8]);
        let mut b = WorldGenerator::new(42, palette(), [8, 16, 8]);
        for index in 0..3 {
            assert_eq!(a.generate(index).unwrap(), b.generate(index).unwrap());
        }
    }

    #[test]
    fn test_columns_are_filled_from_the_bottom() {
        let mut world = WorldGenerator::new(7, palette(), [8, 16, 8]);
        let chunk = world.generate(0).unwrap();
        for z in 0..8 {
            for x in 0..8 {
                assert!(chunk.get(x, 0, z).is_solid());
                let top = (0..16).rev().find(|&y| chunk.get(x, y, z).is_solid()).unwrap();
                assert!((0..=top).all(|y| chunk.get(x, y, z).is_solid()));
                assert_eq!(chunk.get(x, top, z).color(), Color::GREEN);
            }
        }
    }

    #[test]
    fn test_only_palette_colors_are_used() {
        let mut world = WorldGenerator::new(3, palette(), [16, 16, 16]);
        let chunk = world.generate(1).unwrap();
        assert!(chunk.solid_colors().iter().all(|c| palette().contains(c)));
    }

    #[test]
    fn test_empty_palette_gives_air() {
        let mut world = WorldGenerator::new(1, Vec::new(), [4, 4, 4]);
        assert_eq!(world.generate(0).unwrap().solid_count(), 0);
    }
}
