#![doc = include_str!("../README.md")]
#![deny(missing_docs)]

use std::f64::consts::PI;
use std::fmt;

use anyhow::ensure;
use serde::{Serialize, Deserialize};

pub mod builder;
#[cfg(feature = "render")]
pub mod render;

/// One expression per color channel (red, green, blue).
pub type Color = [Expr; 3];

/// Stores an expression of two variables (X and Y).
///
/// Every operator maps `[-1, 1]` inputs to a `[-1, 1]` output, so a whole
/// tree evaluated at a remapped pixel coordinate stays in quantizable range.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Expr {
    /// X.
    X,
    /// Y.
    Y,
    /// Cosine of Pi times the argument.
    CosPi(Box<Expr>),
    /// Sine of Pi times the argument.
    SinPi(Box<Expr>),
    /// Arcus tangent, scaled by `1/(2*Pi)` to stay bounded.
    Arctan(Box<Expr>),
    /// Sign of the argument (`-1`, `0` or `1`).
    Step(Box<Expr>),
    /// Product.
    Prod(Box<(Expr, Expr)>),
    /// Average.
    Avg(Box<(Expr, Expr)>),
}

/// X.
pub fn x() -> Expr {Expr::X}
/// Y.
pub fn y() -> Expr {Expr::Y}
/// Cosine of Pi times the argument.
pub fn cos_pi(a: Expr) -> Expr {Expr::CosPi(Box::new(a))}
/// Sine of Pi times the argument.
pub fn sin_pi(a: Expr) -> Expr {Expr::SinPi(Box::new(a))}
/// Arcus tangent, scaled by `1/(2*Pi)`.
pub fn arctan(a: Expr) -> Expr {Expr::Arctan(Box::new(a))}
/// Sign of the argument.
pub fn step(a: Expr) -> Expr {Expr::Step(Box::new(a))}
/// Product.
pub fn prod(a: Expr, b: Expr) -> Expr {Expr::Prod(Box::new((a, b)))}
/// Average.
pub fn avg(a: Expr, b: Expr) -> Expr {Expr::Avg(Box::new((a, b)))}

impl fmt::Display for Expr {
    fn fmt(&self, w: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        use Expr::*;

        match self {
            X => write!(w, "x"),
            Y => write!(w, "y"),
            CosPi(a) => write!(w, "cos(pi*{})", a),
            SinPi(a) => write!(w, "sin(pi*{})", a),
            Arctan(a) => write!(w, "atan({})/(2*pi)", a),
            Step(a) => write!(w, "step({})", a),
            Prod(ab) => write!(w, "({}*{})", ab.0, ab.1),
            Avg(ab) => write!(w, "avg({},{})", ab.0, ab.1),
        }
    }
}

impl Expr {
    /// Evaluate at a 2D point.
    ///
    /// Evaluation is pure: the tree is never mutated and the same point
    /// always yields the identical value.
    pub fn eval(&self, p: [f64; 2]) -> f64 {
        use Expr::*;

        match self {
            X => p[0],
            Y => p[1],
            CosPi(a) => (PI * a.eval(p)).cos(),
            SinPi(a) => (PI * a.eval(p)).sin(),
            Arctan(a) => a.eval(p).atan() / PI / 2.0,
            Step(a) => {
                let v = a.eval(p);
                if v > 0.0 {1.0}
                else if v < 0.0 {-1.0}
                else {0.0}
            }
            Prod(ab) => ab.0.eval(p) * ab.1.eval(p),
            Avg(ab) => 0.5 * (ab.0.eval(p) + ab.1.eval(p)),
        }
    }

    /// Gets the height of the tree (a terminal has depth zero).
    pub fn depth(&self) -> u32 {
        use Expr::*;

        match self {
            X | Y => 0,
            CosPi(a) | SinPi(a) | Arctan(a) | Step(a) => 1 + a.depth(),
            Prod(ab) | Avg(ab) => 1 + ab.0.depth().max(ab.1.depth()),
        }
    }
}

/// Linearly remaps `val` from `[in_lo, in_hi]` to `[out_lo, out_hi]`.
///
/// No clamping: values outside the input interval extrapolate linearly.
/// Fails when the input interval has zero width.
pub fn remap(val: f64, in_lo: f64, in_hi: f64, out_lo: f64, out_hi: f64) -> anyhow::Result<f64> {
    ensure!(in_lo != in_hi, "zero-width input interval [{}, {}]", in_lo, in_hi);
    Ok((val - in_lo) * (out_hi - out_lo) / (in_hi - in_lo) + out_lo)
}

/// Maps a value in `[-1, 1]` to a color channel in `[0, 255]`.
///
/// Truncates toward zero after remapping, so `0.0` maps to `127`.
pub fn color_map(val: f64) -> u8 {
    match remap(val, -1.0, 1.0, 0.0, 255.0) {
        Ok(c) => c as u8,
        // The input interval is fixed and non-empty.
        Err(_) => unreachable!(),
    }
}

/// Saves a generation recipe to a file.
pub fn save(file: &str, recipe: &builder::Recipe) -> anyhow::Result<()> {
    use std::fs::File;
    use std::io::Write;

    let mut file = File::create(file)?;
    let encoded: Vec<u8> = bincode::serialize(recipe)?;
    file.write_all(&encoded)?;
    Ok(())
}

/// Opens a generation recipe from a file.
pub fn open(file: &str) -> anyhow::Result<builder::Recipe> {
    use std::fs::File;
    use std::io::Read;

    let mut file = File::open(file)?;
    let mut decoded: Vec<u8> = vec![];
    file.read_to_end(&mut decoded)?;
    Ok(bincode::deserialize(&decoded)?)
}
