use serde::{Deserialize, Serialize};

/// Points per cleared line, multiplied by the level at the time of the clear.
pub const POINTS_PER_LINE: u64 = 100;

/// Score needed to advance one level.
pub const SCORE_PER_LEVEL: u64 = 2000;

/// Game statistics tracking score, level, lines and locked pieces.
///
/// # Scoring
///
/// A lock that clears `n` lines at level `L` is worth `n * 100 * L` points.
/// The level is then recomputed as `score / 2000 + 1`. Score never decreases,
/// so neither does the level. There are no combo or multi-line bonuses.
///
/// # Example
///
/// ```
/// use brickfall_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// assert_eq!(stats.complete_piece_drop(2), 200);
/// assert_eq!(stats.score(), 200);
/// assert_eq!(stats.level(), 1);
/// assert_eq!(stats.line_cleared_counter()[2], 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GameStats {
    score: u64,
    level: u32,
    completed_pieces: usize,
    total_cleared_lines: usize,
    line_cleared_counter: [usize; 5],
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            level: 1,
            completed_pieces: 0,
            total_cleared_lines: 0,
            line_cleared_counter: [0; 5],
        }
    }

    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    /// Current level, starting at 1.
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// Pieces locked into the board so far.
    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    #[must_use]
    pub const fn total_cleared_lines(&self) -> usize {
        self.total_cleared_lines
    }

    /// Histogram of locks by lines cleared.
    ///
    /// - `[0]`: locks that cleared nothing
    /// - `[1]`..`[3]`: singles, doubles, triples
    /// - `[4]`: four or more lines at once
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; 5] {
        &self.line_cleared_counter
    }

    /// Records one locked piece and returns the points it earned.
    pub fn complete_piece_drop(&mut self, cleared_lines: usize) -> u64 {
        self.completed_pieces += 1;
        self.total_cleared_lines += cleared_lines;
        let bucket = cleared_lines.min(self.line_cleared_counter.len() - 1);
        self.line_cleared_counter[bucket] += 1;

        let lines = u64::try_from(cleared_lines).unwrap_or(u64::MAX);
        let points = lines
            .saturating_mul(POINTS_PER_LINE)
            .saturating_mul(u64::from(self.level));
        self.score = self.score.saturating_add(points);
        self.level = level_for_score(self.score).max(self.level);
        points
    }
}

/// `score / 2000 + 1`, saturating at `u32::MAX`.
#[must_use]
pub fn level_for_score(score: u64) -> u32 {
    u32::try_from(score / SCORE_PER_LEVEL)
        .unwrap_or(u32::MAX - 1)
        .saturating_add(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let stats = GameStats::new();
        assert_eq!(stats.score(), 0);
        assert_eq!(stats.level(), 1);
        assert_eq!(stats.completed_pieces(), 0);
        assert_eq!(stats.total_cleared_lines(), 0);
    }

    #[test]
    fn test_no_lines_no_points() {
        let mut stats = GameStats::new();
        assert_eq!(stats.complete_piece_drop(0), 0);
        assert_eq!(stats.score(), 0);
        assert_eq!(stats.completed_pieces(), 1);
        assert_eq!(stats.line_cleared_counter(), &[1, 0, 0, 0, 0]);
    }

    #[test]
    fn test_level_multiplies_points() {
        let mut stats = GameStats::new();
        // 5 quads at level 1: 5 * 400 = 2000 -> level 2.
        for _ in 0..5 {
            assert_eq!(stats.complete_piece_drop(4), 400);
        }
        assert_eq!(stats.score(), 2000);
        assert_eq!(stats.level(), 2);

        // Next single is worth 100 * 2.
        assert_eq!(stats.complete_piece_drop(1), 200);
        assert_eq!(stats.score(), 2200);
        assert_eq!(stats.total_cleared_lines(), 21);
        assert_eq!(stats.line_cleared_counter(), &[0, 1, 0, 0, 5]);
    }

    #[test]
    fn test_points_use_level_before_update() {
        let mut stats = GameStats::new();
        for _ in 0..4 {
            stats.complete_piece_drop(4);
        }
        assert_eq!(stats.score(), 1600);
        // 1600 + 400 crosses into level 2, but this clear still scores at level 1.
        assert_eq!(stats.complete_piece_drop(4), 400);
        assert_eq!(stats.level(), 2);
    }

    #[test]
    fn test_oversized_clear_goes_to_last_bucket() {
        let mut stats = GameStats::new();
        stats.complete_piece_drop(6);
        assert_eq!(stats.line_cleared_counter()[4], 1);
        assert_eq!(stats.score(), 600);
    }

    #[test]
    fn test_level_for_score() {
        assert_eq!(level_for_score(0), 1);
        assert_eq!(level_for_score(1999), 1);
        assert_eq!(level_for_score(2000), 2);
        assert_eq!(level_for_score(9_999), 5);
        assert_eq!(level_for_score(u64::MAX), u32::MAX);
    }
}
