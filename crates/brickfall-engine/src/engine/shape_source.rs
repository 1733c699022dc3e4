use std::{fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{ShapeKind, ShapeSequenceError, core::random_shape};

/// Supplies the engine with the shapes to spawn, one at a time.
///
/// The engine asks for a new shape each time it refills its single-slot
/// lookahead.
pub trait ShapeSource: fmt::Debug + Send {
    fn next_shape(&mut self) -> ShapeKind;
}

/// Seed for deterministic shape generation.
///
/// A 128-bit value serialized as a 32-character hex string. The same seed
/// always yields the same shape sequence, which makes sessions reproducible.
///
/// # Example
///
/// ```
/// use brickfall_engine::{ShapeGenerator, ShapeSeed, ShapeSource as _};
///
/// let seed: ShapeSeed = "000000000000000000000000000000ff".parse().unwrap();
/// let mut a = ShapeGenerator::with_seed(seed);
/// let mut b = ShapeGenerator::with_seed(seed);
/// assert_eq!(a.next_shape(), b.next_shape());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapeSeed([u8; 16]);

impl ShapeSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }
}

impl From<u128> for ShapeSeed {
    fn from(value: u128) -> Self {
        Self(value.to_be_bytes())
    }
}

impl fmt::Display for ShapeSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

impl FromStr for ShapeSeed {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(format!(
                "invalid hex: expected 32 characters, got {}",
                s.len()
            ));
        }
        let num = u128::from_str_radix(s, 16).map_err(|e| format!("invalid hex: {s} ({e})"))?;
        Ok(Self::from(num))
    }
}

impl Serialize for ShapeSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ShapeSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// Enables `rng.random::<ShapeSeed>()`.
impl Distribution<ShapeSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ShapeSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        ShapeSeed(seed)
    }
}

/// Random shape source: every draw is a uniform pick over the catalog.
///
/// Draws are independent of history, so the same kind may repeat any number
/// of times in a row.
#[derive(Debug, Clone)]
pub struct ShapeGenerator {
    rng: Pcg32,
    seed: ShapeSeed,
}

impl Default for ShapeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ShapeGenerator {
    /// Creates a generator seeded from the thread-local RNG.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    #[must_use]
    pub fn with_seed(seed: ShapeSeed) -> Self {
        Self {
            rng: Pcg32::from_seed(seed.0),
            seed,
        }
    }

    /// The seed this generator was created with.
    #[must_use]
    pub fn seed(&self) -> ShapeSeed {
        self.seed
    }
}

impl ShapeSource for ShapeGenerator {
    fn next_shape(&mut self) -> ShapeKind {
        random_shape(&mut self.rng)
    }
}

/// Fixed shape order that repeats from the start once exhausted.
///
/// Used for scripted sessions and for tests that need to know what spawns.
///
/// # Example
///
/// ```
/// use brickfall_engine::{ShapeKind, ShapeSequence, ShapeSource as _};
///
/// let mut seq: ShapeSequence = "IO".parse().unwrap();
/// assert_eq!(seq.next_shape(), ShapeKind::I);
/// assert_eq!(seq.next_shape(), ShapeKind::O);
/// assert_eq!(seq.next_shape(), ShapeKind::I);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeSequence {
    shapes: Vec<ShapeKind>,
    index: usize,
}

impl ShapeSequence {
    pub fn new<I>(shapes: I) -> Result<Self, ShapeSequenceError>
    where
        I: IntoIterator<Item = ShapeKind>,
    {
        let shapes: Vec<_> = shapes.into_iter().collect();
        if shapes.is_empty() {
            return Err(ShapeSequenceError::Empty);
        }
        Ok(Self { shapes, index: 0 })
    }

    #[must_use]
    pub fn shapes(&self) -> &[ShapeKind] {
        &self.shapes
    }
}

/// Parses a run of shape letters such as `"IOTZS"`; whitespace and commas are ignored.
impl FromStr for ShapeSequence {
    type Err = ShapeSequenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let shapes = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != ',')
            .map(|ch| ShapeKind::from_char(ch).ok_or(ShapeSequenceError::InvalidShape { ch }))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(shapes)
    }
}

impl ShapeSource for ShapeSequence {
    fn next_shape(&mut self) -> ShapeKind {
        let shape = self.shapes[self.index];
        self.index = (self.index + 1) % self.shapes.len();
        shape
    }
}
