//! マス（Square）

use serde::{Deserialize, Serialize};

/// 盤上のマス（0始まりの行・列）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Square {
    pub row: usize,
    pub col: usize,
}

impl Square {
    #[inline]
    pub const fn new(row: usize, col: usize) -> Square {
        Square { row, col }
    }

    /// 盤内かどうか
    #[inline]
    pub const fn is_valid(self, board_size: usize) -> bool {
        self.row < board_size && self.col < board_size
    }

    /// 差分だけずらしたマス（盤外なら None）
    #[inline]
    pub fn offset(self, d_row: i32, d_col: i32, board_size: usize) -> Option<Square> {
        let row = self.row as i64 + d_row as i64;
        let col = self.col as i64 + d_col as i64;
        let n = board_size as i64;
        if (0..n).contains(&row) && (0..n).contains(&col) {
            Some(Square::new(row as usize, col as usize))
        } else {
            None
        }
    }
}

impl std::fmt::Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_offset() {
        let sq = Square::new(0, 8);
        assert_eq!(sq.offset(1, -1, 9), Some(Square::new(1, 7)));
        assert_eq!(sq.offset(-1, 0, 9), None);
        assert_eq!(sq.offset(0, 1, 9), None);
        assert_eq!(Square::new(7, 7).offset(1, 0, 8), None);
    }

    #[test]
    fn test_square_valid() {
        assert!(Square::new(7, 7).is_valid(8));
        assert!(!Square::new(8, 0).is_valid(8));
    }
}
