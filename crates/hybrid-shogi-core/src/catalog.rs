//! 駒の動き定義（Piece Catalog）
//!
//! 各駒種の動きを静的データとして定義する。
//! 手番依存の動き（`Forward*`）はプレイヤー1（行番号が減る方向へ進む側）を基準に記述し、
//! プレイヤー2では行差分の符号を反転する。
//! 配列の並び順はそのまま候補手の生成順になる（探索の同点手選択に影響する）。

use crate::types::PieceKind;

/// (行差分, 列差分)
pub type Offset = (i32, i32);

/// 動きの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementSpec {
    /// 手番に依存しない1マスの跳び（玉・キング、ナイト）
    Steps(&'static [Offset]),
    /// 前方基準の1マスの跳び（金・銀・桂・歩、成金）
    ForwardSteps(&'static [Offset]),
    /// 手番に依存しない走り（飛・角・ルーク・ビショップ・クイーン）
    Rays(&'static [Offset]),
    /// 前方基準の走り（香）
    ForwardRays(&'static [Offset]),
    /// 走りと1マスの跳びの複合（竜・馬）
    RaysAndSteps {
        rays: &'static [Offset],
        steps: &'static [Offset],
    },
    /// チェスのポーン（前進は空きマスのみ、初期段から2マス、斜め前は駒取りのみ）
    ChessPawn,
}

/// 縦横4方向
pub const ORTHOGONAL: [Offset; 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// 斜め4方向
pub const DIAGONAL: [Offset; 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// 全8方向
pub const ALL_DIRECTIONS: [Offset; 8] =
    [(-1, -1), (-1, 0), (-1, 1), (0, -1), (0, 1), (1, -1), (1, 0), (1, 1)];

/// 金将（前3方向・横2方向・後ろ1方向）
pub const GOLD_STEPS: [Offset; 6] = [(-1, -1), (-1, 0), (-1, 1), (0, -1), (0, 1), (1, 0)];

/// 銀将（前3方向・斜め後ろ2方向）
pub const SILVER_STEPS: [Offset; 5] = [(-1, -1), (-1, 0), (-1, 1), (1, -1), (1, 1)];

/// 桂馬（前方2マス・左右1マス）
pub const KNIGHT_STEPS: [Offset; 2] = [(-2, -1), (-2, 1)];

/// 歩兵・香車の前方
pub const FORWARD: [Offset; 1] = [(-1, 0)];

/// チェスのナイト（L字8方向）
pub const CHESS_KNIGHT_STEPS: [Offset; 8] =
    [(-2, -1), (-2, 1), (-1, -2), (-1, 2), (1, -2), (1, 2), (2, -1), (2, 1)];

/// 駒種と成りの有無から動きを返す
///
/// 成れない駒種に `promoted = true` を渡した場合は成っていない動きを返す。
pub const fn movement_pattern(kind: PieceKind, promoted: bool) -> MovementSpec {
    if promoted {
        match kind {
            // と金・成香・成桂・成銀は金と同じ動き
            PieceKind::Pawn | PieceKind::Lance | PieceKind::Knight | PieceKind::Silver => {
                return MovementSpec::ForwardSteps(&GOLD_STEPS);
            }
            // 竜王: 飛車の動き + 斜め1マス
            PieceKind::Rook => {
                return MovementSpec::RaysAndSteps {
                    rays: &ORTHOGONAL,
                    steps: &DIAGONAL,
                };
            }
            // 竜馬: 角の動き + 縦横1マス
            PieceKind::Bishop => {
                return MovementSpec::RaysAndSteps {
                    rays: &DIAGONAL,
                    steps: &ORTHOGONAL,
                };
            }
            _ => {}
        }
    }

    match kind {
        PieceKind::King | PieceKind::ChessKing => MovementSpec::Steps(&ALL_DIRECTIONS),
        PieceKind::Rook | PieceKind::ChessRook => MovementSpec::Rays(&ORTHOGONAL),
        PieceKind::Bishop | PieceKind::ChessBishop => MovementSpec::Rays(&DIAGONAL),
        PieceKind::Gold => MovementSpec::ForwardSteps(&GOLD_STEPS),
        PieceKind::Silver => MovementSpec::ForwardSteps(&SILVER_STEPS),
        PieceKind::Knight => MovementSpec::ForwardSteps(&KNIGHT_STEPS),
        PieceKind::Lance => MovementSpec::ForwardRays(&FORWARD),
        PieceKind::Pawn => MovementSpec::ForwardSteps(&FORWARD),
        PieceKind::ChessQueen => MovementSpec::Rays(&ALL_DIRECTIONS),
        PieceKind::ChessKnight => MovementSpec::Steps(&CHESS_KNIGHT_STEPS),
        PieceKind::ChessPawn => MovementSpec::ChessPawn,
    }
}
