//! 盤面テキスト形式とプリセット
//!
//! 1行を1文字列で表し、マスごとの駒コードを空白区切りで並べる。
//!
//! - 将棋駒: `K R B G S N L P`
//! - チェス駒: `CK CQ CR CB CN CP`
//! - 大文字がプレイヤー1、小文字がプレイヤー2、`.` が空きマス
//! - 成り駒は `+` を前置する（`+P`, `+r`）
//!
//! 成り駒を含まない盤面は従来の保存形式と完全に一致する。
//! 盤面はこの境界で一度だけ `Board` に変換し、コア内部で再パースはしない。

use serde::{Deserialize, Serialize};

use super::Board;
use crate::error::{LayoutError, LayoutResult};
use crate::types::{Piece, PieceKind, Player, Square};

/// 盤面プリセット
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// 本将棋の初期配置（9×9）
    Shogi,
    /// チェスの初期配置（8×8）
    Chess,
    /// 空の 8×8
    Empty8,
    /// 空の 9×9
    Empty9,
}

/// 本将棋の初期配置
pub const SHOGI_LAYOUT: [&str; 9] = [
    "l n s g k g s n l",
    ". r . . . . . b .",
    "p p p p p p p p p",
    ". . . . . . . . .",
    ". . . . . . . . .",
    ". . . . . . . . .",
    "P P P P P P P P P",
    ". B . . . . . R .",
    "L N S G K G S N L",
];

/// チェスの初期配置
pub const CHESS_LAYOUT: [&str; 8] = [
    "cr cn cb cq ck cb cn cr",
    "cp cp cp cp cp cp cp cp",
    ". . . . . . . .",
    ". . . . . . . .",
    ". . . . . . . .",
    ". . . . . . . .",
    "CP CP CP CP CP CP CP CP",
    "CR CN CB CQ CK CB CN CR",
];

impl Preset {
    /// プリセットの盤面を生成
    pub fn board(self) -> Board {
        match self {
            Preset::Shogi => place_rows(&SHOGI_LAYOUT),
            Preset::Chess => place_rows(&CHESS_LAYOUT),
            Preset::Empty8 => Board::empty(8),
            Preset::Empty9 => Board::empty(9),
        }
    }

    /// 名前から解決（"shogi" / "chess" / "empty8" / "empty9"）
    pub fn from_name(name: &str) -> Option<Preset> {
        match name {
            "shogi" => Some(Preset::Shogi),
            "chess" => Some(Preset::Chess),
            "empty8" => Some(Preset::Empty8),
            "empty9" => Some(Preset::Empty9),
            _ => None,
        }
    }
}

/// 組み込みの配置を盤面に並べる（解釈できないトークンは空きマス扱い）
fn place_rows(rows: &[&str]) -> Board {
    let mut board = Board::empty(rows.len());
    for (row, line) in rows.iter().enumerate() {
        for (col, token) in line.split_whitespace().enumerate() {
            if let Some(Some(piece)) = parse_token(token) {
                board.set(Square::new(row, col), Some(piece));
            }
        }
    }
    board
}

/// 1マス分のトークンを解釈する（空きマスは `Ok(None)`）
pub fn parse_token(token: &str) -> Option<Option<Piece>> {
    if token == "." {
        return Some(None);
    }
    let (promoted, body) = match token.strip_prefix('+') {
        Some(rest) => (true, rest),
        None => (false, token),
    };
    if body.is_empty() || !body.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let owner = if body.chars().all(|c| c.is_ascii_uppercase()) {
        Player::First
    } else if body.chars().all(|c| c.is_ascii_lowercase()) {
        Player::Second
    } else {
        return None;
    };
    let kind = PieceKind::from_code(&body.to_ascii_uppercase())?;
    if promoted {
        Piece::new_promoted(kind, owner).map(Some)
    } else {
        Some(Some(Piece::new(kind, owner)))
    }
}

/// 駒を1トークンに変換
pub fn format_token(piece: Option<Piece>) -> String {
    let Some(piece) = piece else {
        return ".".to_string();
    };
    let code = match piece.owner() {
        Player::First => piece.kind().code().to_string(),
        Player::Second => piece.kind().code().to_ascii_lowercase(),
    };
    if piece.is_promoted() {
        format!("+{code}")
    } else {
        code
    }
}

/// 行文字列の配列から盤面を構成する
///
/// 行数・各行のトークン数が一致する正方盤面のみ受け付け、各プレイヤーの玉は1枚以下。
pub fn parse_layout<S: AsRef<str>>(rows: &[S]) -> LayoutResult<Board> {
    let size = rows.len();
    if size == 0 {
        return Err(LayoutError::Empty);
    }

    let mut board = Board::empty(size);
    for (r, row) in rows.iter().enumerate() {
        let tokens: Vec<&str> = row.as_ref().split_whitespace().collect();
        if tokens.len() != size {
            return Err(LayoutError::RowLength {
                row: r,
                expected: size,
                actual: tokens.len(),
            });
        }
        for (c, token) in tokens.into_iter().enumerate() {
            let piece = parse_token(token).ok_or_else(|| LayoutError::UnknownToken {
                token: token.to_string(),
                row: r,
                col: c,
            })?;
            board.set(Square::new(r, c), piece);
        }
    }

    validate(&board)?;
    Ok(board)
}

/// 盤面の不変条件を検証する（各プレイヤーの玉は1枚以下）
pub fn validate(board: &Board) -> LayoutResult<()> {
    if board.size() == 0 {
        return Err(LayoutError::Empty);
    }
    for player in Player::ALL {
        let count = board.royal_count(player);
        if count > 1 {
            return Err(LayoutError::DuplicateRoyal { player, count });
        }
    }
    Ok(())
}

/// 盤面を行文字列の配列に変換する
pub fn format_layout(board: &Board) -> Vec<String> {
    let n = board.size();
    (0..n)
        .map(|row| {
            (0..n)
                .map(|col| format_token(board.get(Square::new(row, col))))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

impl TryFrom<Vec<String>> for Board {
    type Error = LayoutError;

    fn try_from(rows: Vec<String>) -> Result<Self, Self::Error> {
        parse_layout(&rows)
    }
}

impl From<Board> for Vec<String> {
    fn from(board: Board) -> Vec<String> {
        format_layout(&board)
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in format_layout(self) {
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}
