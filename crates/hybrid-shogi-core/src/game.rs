//! 対局状態（GameState）
//!
//! 盤面・持ち駒・手番・棋譜・終局情報を保持し、1手ずつ検証して適用する。
//! 非合法な入力は状態を変えずに `MoveError` を返す。

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::board::layout::Preset;
use crate::error::{LayoutResult, MoveError, MoveResult};
use crate::rules::{
    Hand, PromotionPolicy, RuleSet, StalemateOutcome, all_legal_moves, has_legal_move, is_in_check,
    legal_drop_squares, legal_drops, legal_moves, resolve_promotion,
};
use crate::setup::BoardSetup;
use crate::types::{Move, MoveInput, Piece, Player, Promotion};

/// 対局の進行状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    Playing,
    Finished,
}

/// 勝者
///
/// JSON 上はプレイヤー番号（1/2）か文字列 `"draw"`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "WinnerRepr", into = "WinnerRepr")]
pub enum Winner {
    Player(Player),
    Draw,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum WinnerRepr {
    Player(Player),
    Label(String),
}

impl From<Winner> for WinnerRepr {
    fn from(winner: Winner) -> Self {
        match winner {
            Winner::Player(p) => WinnerRepr::Player(p),
            Winner::Draw => WinnerRepr::Label("draw".to_string()),
        }
    }
}

impl TryFrom<WinnerRepr> for Winner {
    type Error = String;

    fn try_from(repr: WinnerRepr) -> Result<Self, Self::Error> {
        match repr {
            WinnerRepr::Player(p) => Ok(Winner::Player(p)),
            WinnerRepr::Label(s) if s == "draw" => Ok(Winner::Draw),
            WinnerRepr::Label(s) => Err(format!("unknown winner {s:?}")),
        }
    }
}

/// 終局の理由
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// 詰み
    Checkmate,
    /// 玉が取られた
    RoyalCaptured,
    /// 盤上に玉がない
    NoRoyal,
    /// 指す手がないが王手ではない
    Stalemate,
}

/// 1手適用した結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    /// 確定した指し手
    pub mv: Move,
    /// 次の手番側に王手がかかっているか
    pub gives_check: bool,
    /// この手で終局したか
    pub terminal: bool,
}

/// 対局状態
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    board: Board,
    /// `Player::index()` 順
    hands: [Hand; 2],
    side_to_move: Player,
    history: Vec<Move>,
    status: GameStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    winner: Option<Winner>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    termination: Option<Termination>,
    #[serde(default)]
    rules: RuleSet,
}

impl GameState {
    /// 盤面とルールから対局を開始する（プレイヤー1が先手）
    ///
    /// 開始局面がすでに終局している場合（玉がない、指す手がない）は `Finished` で返す。
    pub fn new(board: Board, rules: RuleSet) -> GameState {
        GameState::with_side_to_move(board, rules, Player::First)
    }

    /// 手番を指定して対局を開始する
    pub fn with_side_to_move(board: Board, rules: RuleSet, side_to_move: Player) -> GameState {
        let mut state = GameState {
            board,
            hands: [Hand::new(), Hand::new()],
            side_to_move,
            history: Vec::new(),
            status: GameStatus::Playing,
            winner: None,
            termination: None,
            rules,
        };
        state.evaluate_terminal();
        state
    }

    /// プリセット盤面で開始する
    pub fn from_preset(preset: Preset) -> GameState {
        GameState::new(preset.board(), RuleSet::for_preset(preset))
    }

    /// 盤面設定ドキュメントから開始する
    pub fn from_setup(setup: &BoardSetup) -> LayoutResult<GameState> {
        let (board, rules) = setup.build()?;
        Ok(GameState::new(board, rules))
    }

    /// 開始局面の持ち駒を設定する（終局判定をやり直す）
    pub fn with_hand(mut self, player: Player, hand: Hand) -> GameState {
        self.hands[player.index()] = hand;
        self.status = GameStatus::Playing;
        self.winner = None;
        self.termination = None;
        self.evaluate_terminal();
        self
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn hand(&self, player: Player) -> &Hand {
        &self.hands[player.index()]
    }

    #[inline]
    pub fn side_to_move(&self) -> Player {
        self.side_to_move
    }

    #[inline]
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    #[inline]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    #[inline]
    pub fn winner(&self) -> Option<Winner> {
        self.winner
    }

    #[inline]
    pub fn termination(&self) -> Option<Termination> {
        self.termination
    }

    #[inline]
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.status == GameStatus::Finished
    }

    /// 手番側の持ち駒（持ち駒を使わないルールなら None）
    fn usable_hand(&self, player: Player) -> Option<&Hand> {
        self.rules.uses_hand(player).then(|| self.hand(player))
    }

    /// 手番側の合法手（盤上の駒 → 駒打ちの順）
    pub fn legal_moves(&self, policy: PromotionPolicy) -> Vec<Move> {
        if self.is_finished() {
            return Vec::new();
        }
        let player = self.side_to_move;
        let mut moves = all_legal_moves(&self.board, player, self.rules.zones(player), policy);
        if let Some(hand) = self.usable_hand(player) {
            moves.extend(legal_drops(&self.board, player, hand));
        }
        moves
    }

    /// 指し手を検証して適用する
    pub fn apply(&mut self, input: MoveInput) -> MoveResult<MoveOutcome> {
        if self.is_finished() {
            return Err(MoveError::GameFinished);
        }
        let mv = self.validate(input)?;
        let mover = self.side_to_move;

        match mv.from {
            Some(from) => {
                self.board = self.board.with_move(from, mv.to, mv.placed_piece());
                if let Some(captured) = mv.captured {
                    if self.rules.uses_hand(mover) {
                        self.hands[mover.index()].bank(captured);
                    }
                }
            }
            None => {
                self.hands[mover.index()].take(mv.piece.kind());
                self.board = self.board.with_drop(mv.to, mv.piece);
            }
        }
        self.history.push(mv);
        self.side_to_move = mover.opponent();
        debug!("[Game] ply {}: {} by {}", self.history.len(), mv, mover);

        if mv.captured.is_some_and(|p| p.is_royal()) {
            self.finish(Winner::Player(mover), Termination::RoyalCaptured);
        } else {
            self.evaluate_terminal();
        }

        Ok(MoveOutcome {
            mv,
            gives_check: is_in_check(&self.board, self.side_to_move),
            terminal: self.is_finished(),
        })
    }

    /// 入力を確定した指し手に変換する（状態は変更しない）
    fn validate(&self, input: MoveInput) -> MoveResult<Move> {
        let player = self.side_to_move;
        let n = self.board.size();
        match input {
            MoveInput::Board { from, to, promotion } => {
                let piece = self.board.get(from).ok_or(MoveError::NoPiece(from))?;
                if piece.owner() != player {
                    return Err(MoveError::NotYourPiece {
                        square: from,
                        owner: piece.owner(),
                        side_to_move: player,
                    });
                }
                if !legal_moves(&self.board, from, piece).contains(&to) {
                    return Err(MoveError::IllegalDestination { from, to });
                }
                let zones = self.rules.zones(player);
                let promotion = resolve_promotion(piece, from, to, promotion, zones, n)?;
                Ok(Move {
                    from: Some(from),
                    to,
                    piece,
                    captured: self.board.get(to),
                    promotion,
                })
            }
            MoveInput::Drop { kind, to } => {
                let in_hand = self.usable_hand(player).is_some_and(|h| h.count(kind) > 0);
                if !in_hand {
                    return Err(MoveError::NotInHand { kind, player });
                }
                let piece = Piece::new(kind, player);
                let allowed = legal_drop_squares(&self.board, kind, player).contains(&to)
                    && !is_in_check(&self.board.with_drop(to, piece), player);
                if !allowed {
                    return Err(MoveError::IllegalDrop { kind, to });
                }
                Ok(Move {
                    from: None,
                    to,
                    piece,
                    captured: None,
                    promotion: Promotion::NoPromotion,
                })
            }
        }
    }

    /// 手番側から見た終局判定
    fn evaluate_terminal(&mut self) {
        let player = self.side_to_move;
        let opponent = player.opponent();

        let has_royal = self.board.find_royal(player).is_some();
        let opponent_has_royal = self.board.find_royal(opponent).is_some();
        let missing_royal = match (has_royal, opponent_has_royal) {
            (true, true) => None,
            (false, false) => Some(Winner::Draw),
            (false, true) => Some(Winner::Player(opponent)),
            (true, false) => Some(Winner::Player(player)),
        };
        if let Some(winner) = missing_royal {
            self.finish(winner, Termination::NoRoyal);
            return;
        }

        if has_legal_move(&self.board, player, self.usable_hand(player)) {
            return;
        }
        if is_in_check(&self.board, player) {
            self.finish(Winner::Player(opponent), Termination::Checkmate);
        } else {
            let winner = match self.rules.stalemate {
                StalemateOutcome::Draw => Winner::Draw,
                StalemateOutcome::StalematedPlayerLoses => Winner::Player(opponent),
            };
            self.finish(winner, Termination::Stalemate);
        }
    }

    fn finish(&mut self, winner: Winner, termination: Termination) {
        self.status = GameStatus::Finished;
        self.winner = Some(winner);
        self.termination = Some(termination);
        info!(
            "[Game] finished after {} plies: {:?}, winner {:?}",
            self.history.len(),
            termination,
            winner
        );
    }

    /// 保存用の JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// 保存した JSON から復元する（盤面の検証はデシリアライズ時に行う）
    pub fn from_json(json: &str) -> serde_json::Result<GameState> {
        serde_json::from_str(json)
    }
}
