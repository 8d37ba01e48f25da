//! 盤面（Board Model）
//!
//! N×N の `Option<Piece>` 配列と、駒の幾何的な候補手生成。
//! 候補手は動きのパターン・遮り・自駒の有無だけで決まり、王手は考慮しない。
//! 自玉を危険にさらす手の除外は `rules::legal` が担う。

pub mod layout;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::catalog::{movement_pattern, MovementSpec, Offset};
use crate::types::{Piece, PieceFamily, PieceKind, Player, Square};

/// 候補マスのリスト（クイーンでも 9×9 で最大 32 マス程度）
pub type SquareList = SmallVec<[Square; 32]>;

/// 盤面
///
/// 手番ごとのスナップショットとして扱う。探索や王手判定のシミュレーションは
/// `with_move` 等でコピーを作り、元の盤面は書き換えない。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Board {
    size: usize,
    /// 行優先（row * size + col）
    cells: Vec<Option<Piece>>,
}

impl Board {
    /// 空の盤面を生成
    pub fn empty(size: usize) -> Board {
        Board {
            size,
            cells: vec![None; size * size],
        }
    }

    /// 行ごとの配列から盤面を生成（正方でなければ None）
    pub fn from_rows(rows: Vec<Vec<Option<Piece>>>) -> Option<Board> {
        let size = rows.len();
        if rows.iter().any(|r| r.len() != size) {
            return None;
        }
        Some(Board {
            size,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    /// 一辺のマス数
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// 盤内かどうか
    #[inline]
    pub fn is_valid(&self, sq: Square) -> bool {
        sq.is_valid(self.size)
    }

    #[inline]
    fn index(&self, sq: Square) -> usize {
        sq.row * self.size + sq.col
    }

    /// マスの駒（盤外・空きマスは None）
    #[inline]
    pub fn get(&self, sq: Square) -> Option<Piece> {
        if self.is_valid(sq) {
            self.cells[self.index(sq)]
        } else {
            None
        }
    }

    /// マスに駒を置く（盤外は無視して false を返す）
    #[inline]
    pub fn set(&mut self, sq: Square, piece: Option<Piece>) -> bool {
        if !self.is_valid(sq) {
            return false;
        }
        let idx = self.index(sq);
        self.cells[idx] = piece;
        true
    }

    /// 全マスを行優先で列挙
    pub fn squares(&self) -> impl Iterator<Item = Square> + '_ {
        let n = self.size;
        (0..n).flat_map(move |row| (0..n).map(move |col| Square::new(row, col)))
    }

    /// 全ての駒を行優先で列挙
    pub fn occupied(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.squares().filter_map(|sq| self.get(sq).map(|p| (sq, p)))
    }

    /// 指定プレイヤーの駒を行優先で列挙
    pub fn pieces_of(&self, player: Player) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.occupied().filter(move |(_, p)| p.owner() == player)
    }

    /// 玉（キング）の位置（複数ある場合は走査順で最初のもの）
    pub fn find_royal(&self, player: Player) -> Option<Square> {
        self.pieces_of(player).find(|(_, p)| p.is_royal()).map(|(sq, _)| sq)
    }

    /// 玉（キング）の数
    pub fn royal_count(&self, player: Player) -> usize {
        self.pieces_of(player).filter(|(_, p)| p.is_royal()).count()
    }

    /// 駒を動かした盤面のコピーを返す
    ///
    /// `to` にあった駒は盤上から消える（持ち駒への移動は呼び出し側の責務）。
    pub fn with_move(&self, from: Square, to: Square, placed: Piece) -> Board {
        let mut next = self.clone();
        next.set(from, None);
        next.set(to, Some(placed));
        next
    }

    /// 駒を打った盤面のコピーを返す
    pub fn with_drop(&self, to: Square, piece: Piece) -> Board {
        let mut next = self.clone();
        next.set(to, Some(piece));
        next
    }

    /// チェスのポーンが2マス進める段（自陣側から2段目）
    #[inline]
    pub fn chess_pawn_start_row(&self, player: Player) -> Option<usize> {
        match player {
            Player::First => self.size.checked_sub(2),
            Player::Second => (self.size >= 2).then_some(1),
        }
    }

    /// 幾何的な候補手（王手は考慮しない）
    ///
    /// 移動パターン・遮り・自駒への移動禁止のみを判定する。
    /// `piece` は `from` にある駒として扱う（盤上の値とは照合しない）。
    pub fn candidate_moves(&self, from: Square, piece: Piece) -> SquareList {
        let mut out = SquareList::new();
        let owner = piece.owner();
        let sign = -owner.forward();

        match movement_pattern(piece.kind(), piece.is_promoted()) {
            MovementSpec::Steps(steps) => self.add_steps(&mut out, from, owner, steps, 1),
            MovementSpec::ForwardSteps(steps) => self.add_steps(&mut out, from, owner, steps, sign),
            MovementSpec::Rays(rays) => self.add_rays(&mut out, from, owner, rays, 1),
            MovementSpec::ForwardRays(rays) => self.add_rays(&mut out, from, owner, rays, sign),
            MovementSpec::RaysAndSteps { rays, steps } => {
                self.add_rays(&mut out, from, owner, rays, 1);
                self.add_steps(&mut out, from, owner, steps, 1);
            }
            MovementSpec::ChessPawn => self.add_chess_pawn(&mut out, from, owner),
        }
        out
    }

    /// 空きマスまたは敵駒なら追加。空きマスのときだけ true（走りを継続できる）
    #[inline]
    fn try_add(&self, out: &mut SquareList, to: Square, owner: Player) -> bool {
        match self.get(to) {
            None => {
                out.push(to);
                true
            }
            Some(target) => {
                if target.owner() != owner {
                    out.push(to);
                }
                false
            }
        }
    }

    fn add_steps(
        &self,
        out: &mut SquareList,
        from: Square,
        owner: Player,
        steps: &[Offset],
        sign: i32,
    ) {
        for &(dr, dc) in steps {
            if let Some(to) = from.offset(dr * sign, dc, self.size) {
                self.try_add(out, to, owner);
            }
        }
    }

    fn add_rays(
        &self,
        out: &mut SquareList,
        from: Square,
        owner: Player,
        rays: &[Offset],
        sign: i32,
    ) {
        for &(dr, dc) in rays {
            let mut cur = from;
            while let Some(to) = cur.offset(dr * sign, dc, self.size) {
                if !self.try_add(out, to, owner) {
                    break;
                }
                cur = to;
            }
        }
    }

    fn add_chess_pawn(&self, out: &mut SquareList, from: Square, owner: Player) {
        let dir = owner.forward();

        // 前方1マス（空きマスのみ）
        let one = from.offset(dir, 0, self.size).filter(|&sq| self.get(sq).is_none());
        if let Some(one) = one {
            out.push(one);

            // 初期段から2マス（途中も行き先も空きマス）
            if self.chess_pawn_start_row(owner) == Some(from.row) {
                let two = from.offset(dir * 2, 0, self.size).filter(|&sq| self.get(sq).is_none());
                if let Some(two) = two {
                    out.push(two);
                }
            }
        }

        // 斜め前の敵駒を取る（アンパッサンは扱わない）
        for dc in [-1, 1] {
            if let Some(to) = from.offset(dir, dc, self.size) {
                if self.get(to).is_some_and(|t| t.owner() != owner) {
                    out.push(to);
                }
            }
        }
    }

    /// 指定系統・指定プレイヤーの駒があるか
    pub fn has_family(&self, player: Player, family: PieceFamily) -> bool {
        self.pieces_of(player).any(|(_, p)| p.family() == family)
    }

    /// 指定列に対象プレイヤーの成っていない駒種 `kind` があるか
    pub fn column_has_unpromoted(&self, col: usize, player: Player, kind: PieceKind) -> bool {
        (0..self.size).any(|row| {
            self.get(Square::new(row, col))
                .is_some_and(|p| p.owner() == player && p.kind() == kind && !p.is_promoted())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(row: usize, col: usize) -> Square {
        Square::new(row, col)
    }

    fn sorted(list: SquareList) -> Vec<Square> {
        let mut v = list.to_vec();
        v.sort();
        v
    }

    #[test]
    fn test_rook_ray_stops_at_pieces() {
        let mut board = Board::empty(9);
        let rook = Piece::new(PieceKind::Rook, Player::First);
        board.set(sq(4, 4), Some(rook));
        board.set(sq(2, 4), Some(Piece::new(PieceKind::Pawn, Player::Second)));
        board.set(sq(4, 6), Some(Piece::new(PieceKind::Pawn, Player::First)));

        let moves = board.candidate_moves(sq(4, 4), rook);
        // 上: (3,4), (2,4)=敵駒を取って停止
        assert!(moves.contains(&sq(2, 4)));
        assert!(!moves.contains(&sq(1, 4)));
        // 右: (4,5) のみ（(4,6) は自駒）
        assert!(moves.contains(&sq(4, 5)));
        assert!(!moves.contains(&sq(4, 6)));
        // 下: (5,4)..(8,4)、左: (4,0)..(4,3)
        assert_eq!(moves.len(), 2 + 1 + 4 + 4);
    }

    #[test]
    fn test_forward_pieces_are_oriented() {
        let board = Board::empty(9);
        let p1 = Piece::new(PieceKind::Knight, Player::First);
        let p2 = Piece::new(PieceKind::Knight, Player::Second);
        assert_eq!(sorted(board.candidate_moves(sq(4, 4), p1)), vec![sq(2, 3), sq(2, 5)]);
        assert_eq!(sorted(board.candidate_moves(sq(4, 4), p2)), vec![sq(6, 3), sq(6, 5)]);

        let pawn = Piece::new(PieceKind::Pawn, Player::Second);
        assert_eq!(sorted(board.candidate_moves(sq(4, 4), pawn)), vec![sq(5, 4)]);
    }

    #[test]
    fn test_lance_slides_forward_only() {
        let mut board = Board::empty(9);
        let lance = Piece::new(PieceKind::Lance, Player::First);
        board.set(sq(1, 0), Some(Piece::new(PieceKind::Gold, Player::First)));
        let moves = sorted(board.candidate_moves(sq(8, 0), lance));
        assert_eq!(moves, (2..8).map(|r| sq(r, 0)).collect::<Vec<_>>());
    }

    #[test]
    fn test_gold_and_silver_steps() {
        let board = Board::empty(9);
        let gold = Piece::new(PieceKind::Gold, Player::First);
        assert_eq!(board.candidate_moves(sq(4, 4), gold).len(), 6);
        assert!(!board.candidate_moves(sq(4, 4), gold).contains(&sq(5, 3)));

        let silver = Piece::new(PieceKind::Silver, Player::Second);
        let moves = sorted(board.candidate_moves(sq(4, 4), silver));
        assert_eq!(moves, vec![sq(3, 3), sq(3, 5), sq(5, 3), sq(5, 4), sq(5, 5)]);
    }

    #[test]
    fn test_promoted_pieces() {
        let board = Board::empty(9);
        let dragon = Piece::new(PieceKind::Rook, Player::First).promote();
        assert_eq!(board.candidate_moves(sq(4, 4), dragon).len(), 16 + 4);
        let horse = Piece::new(PieceKind::Bishop, Player::First).promote();
        assert_eq!(board.candidate_moves(sq(4, 4), horse).len(), 16 + 4);
        let tokin = Piece::new(PieceKind::Pawn, Player::Second).promote();
        let moves = sorted(board.candidate_moves(sq(4, 4), tokin));
        assert_eq!(moves, vec![sq(3, 4), sq(4, 3), sq(4, 5), sq(5, 3), sq(5, 4), sq(5, 5)]);
    }

    #[test]
    fn test_chess_pawn_rules() {
        let mut board = Board::empty(8);
        let pawn = Piece::new(PieceKind::ChessPawn, Player::First);
        board.set(sq(6, 4), Some(pawn));
        assert_eq!(sorted(board.candidate_moves(sq(6, 4), pawn)), vec![sq(4, 4), sq(5, 4)]);

        // 前方が塞がれていれば前進できない（駒も取れない）
        board.set(sq(5, 4), Some(Piece::new(PieceKind::ChessKnight, Player::Second)));
        assert!(board.candidate_moves(sq(6, 4), pawn).is_empty());

        // 斜め前の敵駒は取れる、味方は取れない
        board.set(sq(5, 3), Some(Piece::new(PieceKind::ChessRook, Player::Second)));
        board.set(sq(5, 5), Some(Piece::new(PieceKind::ChessRook, Player::First)));
        assert_eq!(sorted(board.candidate_moves(sq(6, 4), pawn)), vec![sq(5, 3)]);
    }

    #[test]
    fn test_chess_pawn_double_step_blocked_by_far_square() {
        let mut board = Board::empty(8);
        let pawn = Piece::new(PieceKind::ChessPawn, Player::Second);
        board.set(sq(1, 2), Some(pawn));
        board.set(sq(3, 2), Some(Piece::new(PieceKind::ChessPawn, Player::First)));
        assert_eq!(sorted(board.candidate_moves(sq(1, 2), pawn)), vec![sq(2, 2)]);
    }

    #[test]
    fn test_with_move_does_not_touch_original() {
        let mut board = Board::empty(9);
        let king = Piece::new(PieceKind::King, Player::First);
        board.set(sq(8, 4), Some(king));
        let next = board.with_move(sq(8, 4), sq(7, 4), king);
        assert_eq!(board.get(sq(8, 4)), Some(king));
        assert_eq!(next.get(sq(8, 4)), None);
        assert_eq!(next.find_royal(Player::First), Some(sq(7, 4)));
    }

    #[test]
    fn test_queen_and_knight_counts_on_empty_board() {
        let board = Board::empty(8);
        let queen = Piece::new(PieceKind::ChessQueen, Player::First);
        assert_eq!(board.candidate_moves(sq(0, 0), queen).len(), 21);
        let knight = Piece::new(PieceKind::ChessKnight, Player::Second);
        assert_eq!(board.candidate_moves(sq(0, 0), knight).len(), 2);
        assert_eq!(board.candidate_moves(sq(4, 4), knight).len(), 8);
    }
}
