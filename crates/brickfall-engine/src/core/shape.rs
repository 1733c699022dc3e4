use std::fmt;

use rand::{
    Rng,
    distr::{Distribution, StandardUniform},
};
use serde::{Deserialize, Serialize, Serializer};

/// Largest edge of any shape mask, in either orientation.
pub const MAX_MASK_SIZE: usize = 4;

/// The five shape variants of the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum ShapeKind {
    /// Straight bar, 1×4 at spawn.
    I = 0,
    /// Square, 2×2.
    O = 1,
    /// T-shape, 2×3 with the stem up.
    T = 2,
    /// Z-shape, 2×3.
    Z = 3,
    /// S-shape, 2×3.
    S = 4,
}

/// Uniform pick over all shape kinds, with replacement.
///
/// There is intentionally no bag: long runs of the same kind can happen.
impl Distribution<ShapeKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ShapeKind {
        ShapeKind::ALL[rng.random_range(0..ShapeKind::LEN)]
    }
}

/// Draws a shape kind uniformly at random.
///
/// The only side effect is consuming the random source.
pub fn random_shape<R>(rng: &mut R) -> ShapeKind
where
    R: Rng + ?Sized,
{
    rng.random()
}

impl ShapeKind {
    /// Number of shape kinds (5).
    pub const LEN: usize = 5;

    pub const ALL: [Self; Self::LEN] = [Self::I, Self::O, Self::T, Self::Z, Self::S];

    /// Returns the spawn-orientation mask of this kind.
    #[must_use]
    pub const fn mask(self) -> ShapeMask {
        SHAPE_MASKS[self as usize]
    }

    /// Returns the single character representation of this kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use brickfall_engine::ShapeKind;
    ///
    /// assert_eq!(ShapeKind::I.as_char(), 'I');
    /// assert_eq!(ShapeKind::S.as_char(), 'S');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            ShapeKind::I => 'I',
            ShapeKind::O => 'O',
            ShapeKind::T => 'T',
            ShapeKind::Z => 'Z',
            ShapeKind::S => 'S',
        }
    }

    /// Parses a kind from its character (case-insensitive).
    ///
    /// # Examples
    ///
    /// ```
    /// use brickfall_engine::ShapeKind;
    ///
    /// assert_eq!(ShapeKind::from_char('t'), Some(ShapeKind::T));
    /// assert_eq!(ShapeKind::from_char('J'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'I' => Some(ShapeKind::I),
            'O' => Some(ShapeKind::O),
            'T' => Some(ShapeKind::T),
            'Z' => Some(ShapeKind::Z),
            'S' => Some(ShapeKind::S),
            _ => None,
        }
    }
}

/// Rectangular occupancy mask of a shape in one orientation.
///
/// Masks are small `Copy` values: rotating returns a new mask and leaves the
/// original untouched, so a candidate rotation can be validated while the
/// current mask stays in place.
///
/// Cells outside `rows × cols` are always empty, which keeps the derived
/// equality exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapeMask {
    rows: u8,
    cols: u8,
    cells: [[bool; MAX_MASK_SIZE]; MAX_MASK_SIZE],
}

impl ShapeMask {
    /// Builds a mask from a row-major pattern.
    ///
    /// # Panics
    ///
    /// Panics if the pattern is empty or larger than [`MAX_MASK_SIZE`] in
    /// either direction.
    #[must_use]
    #[expect(clippy::cast_possible_truncation)]
    pub const fn from_pattern<const R: usize, const C: usize>(pattern: [[bool; C]; R]) -> Self {
        assert!(R > 0 && R <= MAX_MASK_SIZE);
        assert!(C > 0 && C <= MAX_MASK_SIZE);
        let mut cells = [[false; MAX_MASK_SIZE]; MAX_MASK_SIZE];
        let mut r = 0;
        while r < R {
            let mut c = 0;
            while c < C {
                cells[r][c] = pattern[r][c];
                c += 1;
            }
            r += 1;
        }
        Self {
            rows: R as u8,
            cols: C as u8,
            cells,
        }
    }

    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows as usize
    }

    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols as usize
    }

    /// Returns whether the cell at `(row, col)` is occupied.
    ///
    /// Out-of-range coordinates are reported as empty.
    #[must_use]
    pub const fn is_occupied(&self, row: usize, col: usize) -> bool {
        row < self.rows() && col < self.cols() && self.cells[row][col]
    }

    /// Iterates over the `(dx, dy)` offsets of the occupied cells, row by row.
    pub fn occupied_offsets(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        (0..self.rows).flat_map(move |r| {
            (0..self.cols)
                .filter(move |&c| self.cells[usize::from(r)][usize::from(c)])
                .map(move |c| (i32::from(c), i32::from(r)))
        })
    }

    /// Number of occupied cells.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.iter().flatten().filter(|&&cell| cell).count()
    }

    /// Returns this mask turned 90° clockwise.
    ///
    /// The new cell `(r, c)` is the old cell `(rows - 1 - c, r)`, so the
    /// dimensions swap.
    ///
    /// # Examples
    ///
    /// ```
    /// use brickfall_engine::ShapeKind;
    ///
    /// let bar = ShapeKind::I.mask();
    /// let upright = bar.rotated_clockwise();
    /// assert_eq!((upright.rows(), upright.cols()), (4, 1));
    /// assert_eq!(upright.rotated_clockwise().rotated_clockwise().rotated_clockwise(), bar);
    /// ```
    #[must_use]
    pub const fn rotated_clockwise(self) -> Self {
        let old_rows = self.rows as usize;
        let new_rows = self.cols as usize;
        let mut cells = [[false; MAX_MASK_SIZE]; MAX_MASK_SIZE];
        let mut r = 0;
        while r < new_rows {
            let mut c = 0;
            while c < old_rows {
                cells[r][c] = self.cells[old_rows - 1 - c][r];
                c += 1;
            }
            r += 1;
        }
        Self {
            rows: self.cols,
            cols: self.rows,
            cells,
        }
    }

    fn row_string(&self, row: usize) -> String {
        (0..self.cols())
            .map(|col| if self.is_occupied(row, col) { '#' } else { '.' })
            .collect()
    }
}

/// Renders the mask as `#`/`.` rows separated by newlines.
impl fmt::Display for ShapeMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows() {
            if row > 0 {
                writeln!(f)?;
            }
            f.write_str(&self.row_string(row))?;
        }
        Ok(())
    }
}

/// Serialized as a list of row strings, e.g. `[".#.", "###"]`.
impl Serialize for ShapeMask {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq((0..self.rows()).map(|row| self.row_string(row)))
    }
}

const SHAPE_MASKS: [ShapeMask; ShapeKind::LEN] = {
    const X: bool = true;
    const E: bool = false;
    [
        // I
        ShapeMask::from_pattern([[X, X, X, X]]),
        // O
        ShapeMask::from_pattern([[X, X], [X, X]]),
        // T
        ShapeMask::from_pattern([[E, X, E], [X, X, X]]),
        // Z
        ShapeMask::from_pattern([[X, X, E], [E, X, X]]),
        // S
        ShapeMask::from_pattern([[E, X, X], [X, X, E]]),
    ]
};
