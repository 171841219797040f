//! Procedural star shell: random points between two radii, uniformly
//! distributed in direction, tinted blue-violet in HSL space.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::Color;

/// Immutable point positions with per-point colors.
#[derive(Debug, Clone, Default)]
pub struct PointCloud {
    pub positions: Vec<Vec3>,
    pub colors: Vec<Color>,
}

impl PointCloud {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Deterministic star generator. The same seed always yields the same cloud.
pub struct StarfieldGenerator {
    seed: u64,
    star_count: u32,
    inner_radius: f32,
    outer_radius: f32,
}

impl StarfieldGenerator {
    /// Stars between `inner_radius` (inclusive) and `outer_radius` (exclusive).
    pub fn new(seed: u64, star_count: u32, inner_radius: f32, outer_radius: f32) -> Self {
        let (inner_radius, outer_radius) = if inner_radius <= outer_radius {
            (inner_radius, outer_radius)
        } else {
            (outer_radius, inner_radius)
        };
        Self {
            seed,
            star_count,
            inner_radius,
            outer_radius,
        }
    }

    pub fn generate(&self) -> PointCloud {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let count = self.star_count as usize;
        let mut positions = Vec::with_capacity(count);
        let mut colors = Vec::with_capacity(count);
        let span = self.outer_radius - self.inner_radius;

        for _ in 0..count {
            let radius = self.inner_radius + rng.random::<f32>() * span;
            let theta = rng.random::<f32>() * std::f32::consts::TAU;
            let phi = (2.0 * rng.random::<f32>() - 1.0).clamp(-1.0, 1.0).acos();

            let direction = Vec3::new(phi.sin() * theta.cos(), phi.sin() * theta.sin(), phi.cos());
            positions.push(direction * radius);

            let hue = rng.random::<f32>() * 0.2 + 0.5;
            let lightness = rng.random::<f32>() * 0.5 + 0.5;
            colors.push(Color::from_hsl(hue, 0.3, lightness));
        }

        log::debug!(
            "Generated {} stars in shell [{}, {})",
            positions.len(),
            self.inner_radius,
            self.outer_radius
        );

        PointCloud { positions, colors }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_cloud() -> PointCloud {
        StarfieldGenerator::new(42, 10_000, 1000.0, 3000.0).generate()
    }

    #[test]
    fn test_star_count_is_exact() {
        let cloud = default_cloud();
        assert_eq!(cloud.len(), 10_000);
        assert_eq!(cloud.colors.len(), 10_000);
    }

    #[test]
    fn test_star_distances_within_shell() {
        let cloud = default_cloud();
        for (i, p) in cloud.positions.iter().enumerate() {
            let d = p.length();
            // f32 rounding on the unit direction can nudge the length slightly.
            assert!(
                (999.9..=3000.1).contains(&d),
                "Star {i} at distance {d} outside [1000, 3000]"
            );
        }
    }

    #[test]
    fn test_star_distribution_covers_full_sky() {
        let cloud = default_cloud();
        let mut octant_counts = [0u32; 8];
        for p in &cloud.positions {
            let octant = ((p.x >= 0.0) as usize)
                | (((p.y >= 0.0) as usize) << 1)
                | (((p.z >= 0.0) as usize) << 2);
            octant_counts[octant] += 1;
        }
        for (i, &count) in octant_counts.iter().enumerate() {
            assert!(
                (900..=1600).contains(&count),
                "Octant {i} has {count} stars, expected roughly 1250"
            );
        }
    }

    #[test]
    fn test_star_colors_are_cool_and_bright() {
        let cloud = default_cloud();
        for c in &cloud.colors {
            // Hue in [0.5, 0.7) keeps blue >= red; lightness >= 0.5 keeps it visible.
            assert!(c.b >= c.r, "star color not blue-leaning: {c:?}");
            assert!(c.b > 0.2, "star too dark: {c:?}");
        }
    }

    #[test]
    fn test_same_seed_same_cloud() {
        let a = StarfieldGenerator::new(7, 500, 1000.0, 3000.0).generate();
        let b = StarfieldGenerator::new(7, 500, 1000.0, 3000.0).generate();
        assert_eq!(a.positions, b.positions);
        assert_eq!(a.colors, b.colors);
    }

    #[test]
    fn test_different_seed_different_cloud() {
        let a = StarfieldGenerator::new(1, 100, 1000.0, 3000.0).generate();
        let b = StarfieldGenerator::new(2, 100, 1000.0, 3000.0).generate();
        assert_ne!(a.positions, b.positions);
    }

    #[test]
    fn test_zero_count_is_empty() {
        let cloud = StarfieldGenerator::new(0, 0, 1000.0, 3000.0).generate();
        assert!(cloud.is_empty());
    }
}
