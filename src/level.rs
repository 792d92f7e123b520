//! Brick fields
//!
//! Each level is a fixed 10-column bitmask. A set cell becomes a brick at a
//! deterministic grid position; the row picks a tint from the palette.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::LevelError;

/// One level's brick mask, rows top to bottom
pub type BrickShape = &'static [[u8; BRICK_COLS]];

/// Row tints (0xRRGGBB), cycled when a shape has more rows
pub const ROW_TINTS: [u32; 12] = [
    0xff4455, 0xff6633, 0xff9922, 0xffcc11, 0x44dd44, 0x22ccaa, 0x4499ff, 0x6655ff, 0x9944ff,
    0xff44cc, 0xff4455, 0xff6633,
];

const HEART: BrickShape = &[
    [0, 0, 1, 1, 0, 0, 1, 1, 0, 0],
    [0, 1, 1, 1, 1, 1, 1, 1, 1, 0],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [0, 1, 1, 1, 1, 1, 1, 1, 1, 0],
    [0, 1, 1, 1, 1, 1, 1, 1, 1, 0],
    [0, 0, 1, 1, 1, 1, 1, 1, 0, 0],
    [0, 0, 0, 1, 1, 1, 1, 0, 0, 0],
    [0, 0, 0, 0, 1, 1, 0, 0, 0, 0],
];

const SPACE_INVADER: BrickShape = &[
    [0, 0, 1, 0, 0, 0, 0, 1, 0, 0],
    [0, 0, 0, 1, 0, 0, 1, 0, 0, 0],
    [0, 1, 1, 1, 1, 1, 1, 1, 1, 0],
    [1, 1, 1, 0, 1, 1, 0, 1, 1, 1],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [1, 0, 1, 1, 1, 1, 1, 1, 0, 1],
    [1, 0, 1, 0, 1, 1, 0, 1, 0, 1],
    [0, 1, 1, 1, 1, 1, 1, 1, 1, 0],
    [0, 0, 1, 1, 0, 0, 1, 1, 0, 0],
    [0, 1, 1, 0, 0, 0, 0, 1, 1, 0],
];

const SKULL: BrickShape = &[
    [0, 1, 1, 1, 1, 1, 1, 1, 1, 0],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [1, 1, 0, 0, 1, 1, 0, 0, 1, 1],
    [1, 1, 0, 0, 1, 1, 0, 0, 1, 1],
    [1, 1, 1, 1, 0, 0, 1, 1, 1, 1],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [0, 1, 1, 1, 0, 0, 1, 1, 1, 0],
    [0, 1, 1, 1, 1, 1, 1, 1, 1, 0],
    [0, 0, 1, 0, 1, 1, 0, 1, 0, 0],
    [0, 0, 0, 1, 1, 1, 1, 0, 0, 0],
];

const LEVEL_SHAPES: [BrickShape; 3] = [HEART, SPACE_INVADER, SKULL];

/// Number of levels; clearing this one wins the run
pub const MAX_LEVEL: u32 = LEVEL_SHAPES.len() as u32;

/// Where one brick goes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrickPlacement {
    pub col: usize,
    pub row: usize,
    /// Brick centre
    pub x: f32,
    pub y: f32,
    pub tint: u32,
}

/// Reject level indices outside `1..=MAX_LEVEL`
pub fn check_level(level: u32) -> Result<u32, LevelError> {
    if (1..=MAX_LEVEL).contains(&level) {
        Ok(level)
    } else {
        Err(LevelError::InvalidLevelIndex {
            requested: level,
            max: MAX_LEVEL,
        })
    }
}

/// Shape of a 1-based level
pub fn shape_for(level: u32) -> Result<BrickShape, LevelError> {
    let level = check_level(level)?;
    Ok(LEVEL_SHAPES[(level - 1) as usize])
}

pub fn tint_for_row(row: usize) -> u32 {
    ROW_TINTS[row % ROW_TINTS.len()]
}

/// Place a shape's bricks, centring the grid horizontally in the field
pub fn layout(shape: BrickShape, field_width: f32) -> Vec<BrickPlacement> {
    let total_w = BRICK_COLS as f32 * BRICK_W + (BRICK_COLS as f32 - 1.0) * BRICK_PAD;
    let start_x = (field_width - total_w) / 2.0 + BRICK_W / 2.0;

    let mut placements = Vec::new();
    for (row, cells) in shape.iter().enumerate() {
        for (col, &cell) in cells.iter().enumerate() {
            if cell == 0 {
                continue;
            }
            placements.push(BrickPlacement {
                col,
                row,
                x: start_x + col as f32 * (BRICK_W + BRICK_PAD),
                y: BRICK_TOP_Y + row as f32 * (BRICK_H + BRICK_PAD),
                tint: tint_for_row(row),
            });
        }
    }
    placements
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(shape: BrickShape) -> usize {
        shape.iter().flatten().filter(|&&c| c == 1).count()
    }

    #[test]
    fn test_shape_lookup_bounds() {
        assert!(shape_for(1).is_ok());
        assert!(shape_for(MAX_LEVEL).is_ok());
        assert_eq!(
            shape_for(0),
            Err(LevelError::InvalidLevelIndex { requested: 0, max: MAX_LEVEL })
        );
        assert!(shape_for(MAX_LEVEL + 1).is_err());
    }

    #[test]
    fn test_brick_counts() {
        assert_eq!(count(HEART), 70);
        assert_eq!(count(SPACE_INVADER), 80);
        assert_eq!(count(SKULL), 90);
        assert_eq!(layout(SKULL, FIELD_WIDTH).len(), 90);
    }

    #[test]
    fn test_layout_is_centred() {
        let placements = layout(HEART, FIELD_WIDTH);
        let min_x = placements.iter().map(|p| p.x).fold(f32::MAX, f32::min);
        let max_x = placements.iter().map(|p| p.x).fold(f32::MIN, f32::max);
        assert!(((min_x + max_x) / 2.0 - FIELD_WIDTH / 2.0).abs() < 0.01);

        let first = placements[0];
        assert_eq!((first.col, first.row), (2, 0));
        assert_eq!(first.y, BRICK_TOP_Y);
        assert_eq!(first.x, 116.0 + 2.0 * 88.0);
    }

    #[test]
    fn test_row_tints_cycle() {
        assert_eq!(tint_for_row(0), 0xff4455);
        assert_eq!(tint_for_row(12), tint_for_row(0));
        assert_eq!(tint_for_row(13), tint_for_row(1));
    }
}
