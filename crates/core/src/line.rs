//! Line engine - compaction and merge of a single row or column
//!
//! A line is always processed toward index 0. Callers that want the opposite
//! direction reverse the line before and after (see [`crate::transform`]).
//!
//! Merge rule: one left-to-right pass over the compacted tiles. Two equal
//! neighbours combine into one tile of double value; the merged tile is not
//! considered again in the same pass, so `[2, 2, 2, 2]` becomes `[4, 4, _, _]`.
//! A pair whose sum would not fit in a `u32` stays unmerged.

use arrayvec::ArrayVec;

use crate::board::Line;
use crate::types::GRID_SIZE;

/// Outcome of processing one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineResult {
    pub line: Line,
    /// True iff any position differs from the input line.
    pub changed: bool,
    /// Sum of every tile created by a merge.
    pub score_gained: u32,
}

/// Compact and merge `line` toward index 0.
///
/// ```
/// use tui_2048_core::process_line;
///
/// let result = process_line([Some(2), None, Some(2), Some(2)]);
/// assert_eq!(result.line, [Some(4), Some(2), None, None]);
/// assert_eq!(result.score_gained, 4);
/// assert!(result.changed);
/// ```
pub fn process_line(line: Line) -> LineResult {
    let tiles: ArrayVec<u32, GRID_SIZE> = line.iter().flatten().copied().collect();

    let mut out: Line = [None; GRID_SIZE];
    let mut write = 0;
    let mut score_gained: u32 = 0;
    let mut i = 0;
    while i < tiles.len() {
        let value = tiles[i];
        let merged = tiles
            .get(i + 1)
            .filter(|&&next| next == value)
            .and_then(|_| value.checked_mul(2));
        if let Some(merged) = merged {
            out[write] = Some(merged);
            score_gained = score_gained.saturating_add(merged);
            i += 2;
        } else {
            out[write] = Some(value);
            i += 1;
        }
        write += 1;
    }

    LineResult {
        line: out,
        changed: out != line,
        score_gained,
    }
}

/// Process a line toward its high-index end.
pub fn process_line_reversed(mut line: Line) -> LineResult {
    line.reverse();
    let mut result = process_line(line);
    result.line.reverse();
    result
}
