//! Random expression builder.

use anyhow::ensure;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Serialize, Deserialize};

use crate::{avg, cos_pi, prod, sin_pi, x, y, Color, Expr};

/// Depth ranges for the red, green and blue channel trees.
pub const CHANNEL_DEPTHS: [(u32, u32); 3] = [(11, 12), (12, 13), (13, 14)];

/// Builds a random expression with depth in `min_depth..=max_depth`.
///
/// The depth is drawn once at the root. Every child then gets a fixed
/// budget of one less, so the realized depth is the same along every path
/// from the root to a terminal. Re-randomizing the depth per level would
/// change the tree distribution, so the degenerate child range is kept.
///
/// Fails when `min_depth > max_depth`.
pub fn random_expr<R: Rng + ?Sized>(
    rng: &mut R,
    min_depth: u32,
    max_depth: u32
) -> anyhow::Result<Expr> {
    ensure!(min_depth <= max_depth,
        "inverted depth range [{}, {}]", min_depth, max_depth);
    let depth = rng.gen_range(min_depth..=max_depth);
    Ok(random_expr_of_depth(rng, depth))
}

/// Builds a random expression of exact depth `depth`.
///
/// The builder only emits `Prod`, `Avg`, `CosPi` and `SinPi` nodes;
/// `Arctan` and `Step` are evaluable but never generated.
fn random_expr_of_depth<R: Rng + ?Sized>(rng: &mut R, depth: u32) -> Expr {
    if depth == 0 {
        return if rng.gen() {x()} else {y()};
    }
    match rng.gen_range(0..4) {
        0 => prod(random_expr_of_depth(rng, depth - 1),
            random_expr_of_depth(rng, depth - 1)),
        1 => avg(random_expr_of_depth(rng, depth - 1),
            random_expr_of_depth(rng, depth - 1)),
        2 => cos_pi(random_expr_of_depth(rng, depth - 1)),
        _ => sin_pi(random_expr_of_depth(rng, depth - 1)),
    }
}

/// Builds three independent channel trees with the given depth ranges.
pub fn random_color_with<R: Rng + ?Sized>(
    rng: &mut R,
    depths: [(u32, u32); 3]
) -> anyhow::Result<Color> {
    let r = random_expr(rng, depths[0].0, depths[0].1)?;
    let g = random_expr(rng, depths[1].0, depths[1].1)?;
    let b = random_expr(rng, depths[2].0, depths[2].1)?;
    Ok([r, g, b])
}

/// Builds three independent channel trees with the default depth ranges.
pub fn random_color<R: Rng + ?Sized>(rng: &mut R) -> anyhow::Result<Color> {
    random_color_with(rng, CHANNEL_DEPTHS)
}

/// Stores everything needed to reproduce an image.
///
/// The trees themselves are never persisted. A recipe holds the seed and
/// depth ranges instead, and the seeded generator rebuilds the exact same
/// trees on demand.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Recipe {
    /// Seed for the random generator.
    pub seed: u64,
    /// Image size in pixels.
    pub size: [u32; 2],
    /// Depth ranges for the red, green and blue channel trees.
    pub channel_depths: [(u32, u32); 3],
}

impl Recipe {
    /// Creates a recipe with the default channel depth ranges.
    pub fn new(seed: u64, size: [u32; 2]) -> Recipe {
        Recipe {
            seed,
            size,
            channel_depths: CHANNEL_DEPTHS,
        }
    }

    /// Rebuilds the channel trees from the seed.
    pub fn color(&self) -> anyhow::Result<Color> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        random_color_with(&mut rng, self.channel_depths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Shortest and longest root-to-terminal path.
    fn leaf_depths(e: &Expr) -> (u32, u32) {
        use Expr::*;

        match e {
            X | Y => (0, 0),
            CosPi(a) | SinPi(a) | Arctan(a) | Step(a) => {
                let (lo, hi) = leaf_depths(a);
                (lo + 1, hi + 1)
            }
            Prod(ab) | Avg(ab) => {
                let (l_lo, l_hi) = leaf_depths(&ab.0);
                let (r_lo, r_hi) = leaf_depths(&ab.1);
                (l_lo.min(r_lo) + 1, l_hi.max(r_hi) + 1)
            }
        }
    }

    fn contains_dead_ops(e: &Expr) -> bool {
        use Expr::*;

        match e {
            X | Y => false,
            Arctan(_) | Step(_) => true,
            CosPi(a) | SinPi(a) => contains_dead_ops(a),
            Prod(ab) | Avg(ab) => contains_dead_ops(&ab.0) || contains_dead_ops(&ab.1),
        }
    }

    #[test]
    fn test_exact_depth() {
        for seed in 0..32 {
            let mut rng = StdRng::seed_from_u64(seed);
            for d in 0..=6 {
                let e = random_expr(&mut rng, d, d).unwrap();
                let (lo, hi) = leaf_depths(&e);
                assert_eq!(lo, d);
                assert_eq!(hi, d);
                assert_eq!(e.depth(), d);
            }
        }
    }

    #[test]
    fn test_depth_within_range() {
        for seed in 0..32 {
            let mut rng = StdRng::seed_from_u64(seed);
            let e = random_expr(&mut rng, 2, 5).unwrap();
            let (lo, hi) = leaf_depths(&e);
            // The root draw fixes a single depth for all paths.
            assert_eq!(lo, hi);
            assert!(lo >= 2 && lo <= 5);
        }
    }

    #[test]
    fn test_zero_depth_is_terminal() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..16 {
            let e = random_expr(&mut rng, 0, 0).unwrap();
            assert!(e == Expr::X || e == Expr::Y);
        }
    }

    #[test]
    fn test_inverted_range_fails() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(random_expr(&mut rng, 3, 2).is_err());
    }

    #[test]
    fn test_never_generates_dead_ops() {
        for seed in 0..16 {
            let mut rng = StdRng::seed_from_u64(seed);
            let e = random_expr(&mut rng, 4, 6).unwrap();
            assert!(!contains_dead_ops(&e));
        }
    }

    #[test]
    fn test_same_seed_same_trees() {
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        assert_eq!(random_expr(&mut a, 5, 8).unwrap(),
            random_expr(&mut b, 5, 8).unwrap());
    }

    #[test]
    fn test_random_expr_stays_bounded() {
        for seed in 0..8 {
            let mut rng = StdRng::seed_from_u64(seed);
            let e = random_expr(&mut rng, 6, 8).unwrap();
            for i in 0..=8 {
                for j in 0..=8 {
                    let p = [i as f64 / 4.0 - 1.0, j as f64 / 4.0 - 1.0];
                    let v = e.eval(p);
                    assert!(v >= -1.0 && v <= 1.0, "{} out of range at {:?}", v, p);
                }
            }
        }
    }

    #[test]
    fn test_recipe_rebuilds_same_color() {
        let recipe = Recipe {
            seed: 3,
            size: [32, 32],
            channel_depths: [(3, 4), (4, 5), (5, 6)],
        };
        assert_eq!(recipe.color().unwrap(), recipe.color().unwrap());
    }

    #[test]
    fn test_recipe_roundtrip() {
        let recipe = Recipe::new(11, [350, 350]);
        let file = std::env::temp_dir().join("randart_recipe_roundtrip.art");
        let file = file.to_str().unwrap();
        crate::save(file, &recipe).unwrap();
        assert_eq!(crate::open(file).unwrap(), recipe);
        let _ = std::fs::remove_file(file);
    }
}
