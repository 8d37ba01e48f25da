//! ミニマックス探索（アルファベータ枝刈り）
//!
//! - 評価値は AI 側から見た値で、AI の手番で最大化、相手の手番で最小化する
//! - ルートの各手は全幅の窓で読み、評価値が真に大きい手だけで最善手を更新する
//!   （同点は走査順で先の手）
//! - 合法手がない局面は詰み・ステイルメイトを区別せず静的評価を返す

use log::debug;

use super::config::AiConfig;
use super::eval::evaluate;
use super::ordering::{order_moves, position_key, KillerTable, OrderingCache};
use crate::board::Board;
use crate::rules::{all_legal_moves, legal_drops, Hand, PromotionPolicy, RuleSet};
use crate::types::{Move, Player};

/// 探索する局面（盤面と両者の持ち駒）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchNode {
    pub board: Board,
    pub hands: [Hand; 2],
}

impl SearchNode {
    pub fn new(board: Board) -> SearchNode {
        SearchNode {
            board,
            hands: [Hand::new(), Hand::new()],
        }
    }

    /// 指し手を適用した子局面
    ///
    /// `track_hands` が false のときは持ち駒を更新しない。
    pub fn child(&self, mv: &Move, rules: &RuleSet, track_hands: bool) -> SearchNode {
        let mover = mv.piece.owner();
        let mut hands = self.hands.clone();
        let board = match mv.from {
            Some(from) => {
                if track_hands && rules.uses_hand(mover) {
                    if let Some(captured) = mv.captured {
                        hands[mover.index()].bank(captured);
                    }
                }
                self.board.with_move(from, mv.to, mv.placed_piece())
            }
            None => {
                hands[mover.index()].take(mv.piece.kind());
                self.board.with_drop(mv.to, mv.piece)
            }
        };
        SearchNode { board, hands }
    }
}

/// ルートの評価結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RootScore {
    pub mv: Move,
    pub score: i32,
}

/// 1回の探索の状態
pub struct Searcher<'a> {
    player: Player,
    rules: &'a RuleSet,
    config: &'a AiConfig,
    cache: OrderingCache,
    killers: KillerTable,
    nodes: u64,
}

impl<'a> Searcher<'a> {
    pub fn new(player: Player, rules: &'a RuleSet, config: &'a AiConfig) -> Searcher<'a> {
        Searcher {
            player,
            rules,
            config,
            cache: OrderingCache::new(),
            killers: KillerTable::new(),
            nodes: 0,
        }
    }

    /// 探索したノード数
    #[inline]
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    #[inline]
    fn ordering_enabled(&self) -> bool {
        self.config.use_ordering_cache || self.config.use_killers
    }

    /// 手番側の指し手（盤上の駒 → 駒打ち）
    pub fn generate(&self, node: &SearchNode, side: Player) -> Vec<Move> {
        let zones = self.rules.zones(side);
        let mut moves = all_legal_moves(&node.board, side, zones, PromotionPolicy::Auto);
        if self.config.use_drops && self.rules.uses_hand(side) {
            moves.extend(legal_drops(&node.board, side, &node.hands[side.index()]));
        }
        moves
    }

    /// ルートの全ての手を評価し、最善手を返す
    ///
    /// `moves` は生成順のまま評価する。空なら None。
    pub fn search_root(
        &mut self,
        root: &SearchNode,
        moves: &[Move],
        depth: u8,
    ) -> Option<RootScore> {
        let mut best: Option<RootScore> = None;
        for &mv in moves {
            let child = root.child(&mv, self.rules, self.config.use_drops);
            let score = self.minimax(&child, depth.saturating_sub(1), false, i32::MIN, i32::MAX, 1);
            debug!("[Search] root {mv}: score {score}");
            if best.is_none_or(|b| score > b.score) {
                best = Some(RootScore { mv, score });
            }
        }
        best
    }

    fn minimax(
        &mut self,
        node: &SearchNode,
        depth: u8,
        maximizing: bool,
        mut alpha: i32,
        mut beta: i32,
        ply: usize,
    ) -> i32 {
        self.nodes += 1;
        if depth == 0 {
            return evaluate(&node.board, &node.hands, self.player, self.config);
        }

        let side = if maximizing { self.player } else { self.player.opponent() };
        let mut moves = self.generate(node, side);
        if moves.is_empty() {
            return evaluate(&node.board, &node.hands, self.player, self.config);
        }

        let key = position_key(&node.board, side);
        if self.ordering_enabled() {
            let cached = if self.config.use_ordering_cache {
                self.cache.get(key).copied()
            } else {
                None
            };
            let killers =
                if self.config.use_killers { self.killers.get(ply) } else { [None, None] };
            order_moves(&mut moves, cached.as_ref(), &killers);
        }

        let mut best_score = if maximizing { i32::MIN } else { i32::MAX };
        let mut best_move = None;
        for mv in moves {
            let child = node.child(&mv, self.rules, self.config.use_drops);
            let score = self.minimax(&child, depth - 1, !maximizing, alpha, beta, ply + 1);

            let improved = if maximizing { score > best_score } else { score < best_score };
            if improved {
                best_score = score;
                best_move = Some(mv);
            }
            if maximizing {
                alpha = alpha.max(score);
            } else {
                beta = beta.min(score);
            }
            if beta <= alpha {
                if self.config.use_killers {
                    self.killers.record(ply, mv);
                }
                break;
            }
        }

        if self.config.use_ordering_cache {
            if let Some(mv) = best_move {
                self.cache.store(key, mv);
            }
        }
        best_score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::layout::parse_layout;
    use crate::types::{PieceKind, Square};

    fn chess_rules() -> RuleSet {
        RuleSet::for_preset(crate::board::layout::Preset::Chess)
    }

    #[test]
    fn test_takes_hanging_queen() {
        let board = parse_layout(&[
            "ck . . . .", //
            ". . . . .",
            ". . cq . .",
            ". . . . .",
            ". . CR CK .",
        ])
        .unwrap();
        let rules = chess_rules();
        let config = AiConfig::from_level(2).with_depth(2);
        let mut searcher = Searcher::new(Player::First, &rules, &config);
        let root = SearchNode::new(board);
        let moves = searcher.generate(&root, Player::First);
        let best = searcher.search_root(&root, &moves, config.max_depth).unwrap();
        assert_eq!(best.mv.to, Square::new(2, 2));
        assert_eq!(best.mv.captured.map(|p| p.kind()), Some(PieceKind::ChessQueen));
        assert!(searcher.nodes() > 0);
    }

    #[test]
    fn test_ordering_does_not_change_root_scores() {
        let board = parse_layout(&[
            ". . k . .", //
            ". s . g .",
            ". . p . .",
            ". P . B .",
            ". . K . .",
        ])
        .unwrap();
        let rules = RuleSet::default();
        let root = SearchNode::new(board);

        let plain = AiConfig::from_level(2).with_depth(3);
        let mut ordered = AiConfig::from_level(4).with_depth(3);
        ordered.use_pst = plain.use_pst;

        let mut a = Searcher::new(Player::First, &rules, &plain);
        let mut b = Searcher::new(Player::First, &rules, &ordered);
        let moves = a.generate(&root, Player::First);
        assert_eq!(a.search_root(&root, &moves, 3), b.search_root(&root, &moves, 3));
    }

    #[test]
    fn test_child_banks_captures_only_when_tracking() {
        let board = parse_layout(&["k . .", "g R .", ". . K"]).unwrap();
        let rules = RuleSet::default();
        let config = AiConfig::default();
        let searcher = Searcher::new(Player::First, &rules, &config);
        let root = SearchNode::new(board);
        let capture = searcher
            .generate(&root, Player::First)
            .into_iter()
            .find(|m| m.is_capture())
            .unwrap();

        let tracked = root.child(&capture, &rules, true);
        assert_eq!(tracked.hands[0].count(PieceKind::Gold), 1);
        let untracked = root.child(&capture, &rules, false);
        assert!(untracked.hands[0].is_empty());
    }
}
