//! Search session management for asynchronous AI turns.
//!
//! `SearchSession` runs one search on a disposable background thread and
//! delivers the result over a channel. The search itself has no cancellation:
//! a caller that no longer needs the result (e.g. the game was reset) simply
//! drops the session or ignores results whose `session_id` is stale.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use log::{info, warn};

use super::alpha_beta::SearchNode;
use super::config::AiConfig;
use super::{random_legal_move, search_node, SearchOutcome};
use crate::board::Board;
use crate::error::{SearchError, SearchResult};
use crate::game::GameState;
use crate::rules::{Hand, RuleSet};
use crate::types::Player;

static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

/// Result type for non-blocking poll operations on SearchSession.
///
/// This distinguishes between "still running", "completed", and "disconnected"
/// states, allowing the caller to handle thread failures gracefully.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TryResult<T> {
    /// Search is still running, no result available yet
    Pending,
    /// Search completed with a result
    Ok(T),
    /// Search thread disconnected without sending a result
    Disconnected,
}

/// An owned snapshot of everything one search needs.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub board: Board,
    pub hands: [Hand; 2],
    pub player: Player,
    pub rules: RuleSet,
    pub config: AiConfig,
}

impl SearchRequest {
    pub fn new(board: Board, player: Player, rules: RuleSet, config: AiConfig) -> SearchRequest {
        SearchRequest {
            board,
            hands: [Hand::new(), Hand::new()],
            player,
            rules,
            config,
        }
    }

    /// Snapshot the side to move of a game, including both reserves.
    pub fn from_game(game: &GameState, config: AiConfig) -> SearchRequest {
        SearchRequest {
            board: game.board().clone(),
            hands: [game.hand(Player::First).clone(), game.hand(Player::Second).clone()],
            player: game.side_to_move(),
            rules: game.rules().clone(),
            config,
        }
    }

    fn node(&self) -> SearchNode {
        SearchNode {
            board: self.board.clone(),
            hands: self.hands.clone(),
        }
    }

    /// Run the search synchronously on the current thread.
    pub fn run(&self) -> SearchResult<SearchOutcome> {
        search_node(self.node(), self.player, &self.rules, &self.config)
    }
}

/// A handle to an ongoing search running in a background thread.
#[must_use = "SearchSession should be stored and polled for results"]
pub struct SearchSession {
    /// Unique identifier for this search session
    session_id: u64,

    /// Receiver for the search result
    result_rx: mpsc::Receiver<SearchResult<SearchOutcome>>,

    /// Optional handle to the background thread for explicit joining
    handle: Option<thread::JoinHandle<()>>,

    /// Copy of the request, used by the fallback path
    request: SearchRequest,
}

impl SearchSession {
    /// Start a search on a new worker thread.
    ///
    /// Panics inside the search are caught and reported as
    /// `SearchError::WorkerPanicked`.
    pub fn start(request: SearchRequest) -> SearchResult<SearchSession> {
        let session_id = NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed);
        let (tx, result_rx) = mpsc::channel();
        let worker_request = request.clone();
        let handle = thread::Builder::new()
            .name(format!("search-{session_id}"))
            .spawn(move || {
                let result = run_guarded(|| worker_request.run());
                // The receiver may already be gone when the caller discarded the session.
                let _ = tx.send(result);
            })
            .map_err(|e| SearchError::Spawn(e.to_string()))?;
        info!("[Session] started search session {session_id} for {}", request.player);
        Ok(SearchSession {
            session_id,
            result_rx,
            handle: Some(handle),
            request,
        })
    }

    /// Get the session ID.
    pub fn session_id(&self) -> u64 {
        self.session_id
    }

    /// The request this session is searching.
    pub fn request(&self) -> &SearchRequest {
        &self.request
    }

    /// Try to receive the search result without blocking.
    ///
    /// Returns `Some(result)` if the search has completed, `None` if it's still running.
    /// Use `try_poll()` to tell a dead worker apart from a running one.
    pub fn try_recv_result(&self) -> Option<SearchResult<SearchOutcome>> {
        self.result_rx.try_recv().ok()
    }

    /// Try to poll the search result without blocking, distinguishing disconnection.
    pub fn try_poll(&self) -> TryResult<SearchResult<SearchOutcome>> {
        use std::sync::mpsc::TryRecvError;
        match self.result_rx.try_recv() {
            Ok(result) => TryResult::Ok(result),
            Err(TryRecvError::Empty) => TryResult::Pending,
            Err(TryRecvError::Disconnected) => TryResult::Disconnected,
        }
    }

    /// Receive the search result with a timeout.
    ///
    /// A worker that dies without sending maps to `SearchError::Disconnected`,
    /// an expired timeout to `SearchError::Timeout`.
    pub fn recv_result_timeout(&self, timeout: Duration) -> SearchResult<SearchOutcome> {
        use std::sync::mpsc::RecvTimeoutError;
        match self.result_rx.recv_timeout(timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => Err(SearchError::Timeout(timeout.as_millis() as u64)),
            Err(RecvTimeoutError::Disconnected) => Err(SearchError::Disconnected),
        }
    }

    /// Block until the search result is available.
    pub fn recv_result(&self) -> SearchResult<SearchOutcome> {
        self.result_rx.recv().unwrap_or(Err(SearchError::Disconnected))
    }

    /// Wait up to the configured `timeout_ms`.
    ///
    /// On timeout or worker failure (panic, disconnect, spawn error) the
    /// session degrades in order:
    /// 1. a depth-1 search on the calling thread
    /// 2. a uniformly random legal move
    ///
    /// A malformed board is never degraded: `SearchError::MalformedBoard` is
    /// returned as is. The timed-out worker is detached and its result discarded.
    pub fn resolve_with_fallback(self) -> SearchResult<SearchOutcome> {
        let timeout = Duration::from_millis(self.request.config.timeout_ms);
        self.resolve_within(timeout)
    }

    /// Same as `resolve_with_fallback` with an explicit timeout.
    pub fn resolve_within(mut self, timeout: Duration) -> SearchResult<SearchOutcome> {
        let err = match self.recv_result_timeout(timeout) {
            Ok(outcome) => {
                self.join_worker();
                return Ok(outcome);
            }
            Err(err @ SearchError::MalformedBoard(_)) => {
                self.join_worker();
                return Err(err);
            }
            Err(err) => err,
        };
        let id = self.session_id;
        warn!("[Session] session {id} failed ({err}), falling back to a depth-1 search");

        let shallow = SearchRequest {
            config: AiConfig {
                random_move_rate: 0.0,
                ..self.request.config.with_depth(1)
            },
            ..self.request.clone()
        };
        match run_guarded(|| shallow.run()) {
            Ok(outcome) => return Ok(outcome),
            Err(err @ SearchError::MalformedBoard(_)) => return Err(err),
            Err(err) => warn!("[Session] depth-1 fallback failed ({err}), choosing a random move"),
        }

        let SearchRequest { board, hands, player, rules, config } = &self.request;
        let best = match panic::catch_unwind(AssertUnwindSafe(|| {
            random_legal_move(board, hands, *player, rules, config)
        })) {
            Ok(best) => best?,
            Err(payload) => {
                warn!("[Session] random fallback panicked ({})", panic_message(payload.as_ref()));
                None
            }
        };
        Ok(SearchOutcome {
            best,
            score: 0,
            nodes: 0,
            depth: 0,
            randomized: best.is_some(),
        })
    }

    /// Join the background thread, if it has finished.
    fn join_worker(&mut self) {
        if let Some(handle) = self.handle.take() {
            if handle.is_finished() {
                let _ = handle.join();
            }
        }
    }

    /// Block until the search finishes and join the worker thread.
    pub fn join_blocking(mut self) -> SearchResult<SearchOutcome> {
        let result = self.recv_result();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        result
    }
}

/// Run a search, turning a panic into `SearchError::WorkerPanicked`.
fn run_guarded(
    search: impl FnOnce() -> SearchResult<SearchOutcome>,
) -> SearchResult<SearchOutcome> {
    panic::catch_unwind(AssertUnwindSafe(search)).unwrap_or_else(|payload| {
        Err(SearchError::WorkerPanicked(panic_message(payload.as_ref())))
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::layout::{parse_layout, Preset};

    /// Session whose worker already delivered `result` (or died without one).
    fn finished_session(
        request: SearchRequest,
        result: Option<SearchResult<SearchOutcome>>,
    ) -> SearchSession {
        let (tx, result_rx) = mpsc::channel();
        if let Some(result) = result {
            tx.send(result).unwrap();
        }
        drop(tx);
        SearchSession {
            session_id: 0,
            result_rx,
            handle: None,
            request,
        }
    }

    fn malformed_request() -> SearchRequest {
        let mut board = Board::empty(3);
        let king = crate::types::Piece::new(crate::types::PieceKind::King, Player::Second);
        board.set(crate::types::Square::new(0, 0), Some(king));
        board.set(crate::types::Square::new(0, 2), Some(king));
        SearchRequest::new(board, Player::Second, RuleSet::default(), AiConfig::from_level(2))
    }

    fn legal_moves_of(request: &SearchRequest) -> Vec<crate::types::Move> {
        GameState::with_side_to_move(request.board.clone(), request.rules.clone(), request.player)
            .legal_moves(crate::rules::PromotionPolicy::Auto)
    }

    fn small_request(level: u8) -> SearchRequest {
        let board = parse_layout(&["ck . . .", ". . cq .", ". CR . .", ". . . CK"]).unwrap();
        SearchRequest::new(
            board,
            Player::First,
            RuleSet::for_preset(Preset::Chess),
            AiConfig::from_level(level).with_depth(2),
        )
    }

    #[test]
    fn test_session_matches_synchronous_search() {
        let request = small_request(2);
        let expected = request.run().unwrap();
        let session = SearchSession::start(request).unwrap();
        assert!(session.session_id() > 0);
        assert_eq!(session.join_blocking().unwrap(), expected);
    }

    #[test]
    fn test_session_ids_are_unique() {
        let a = SearchSession::start(small_request(2)).unwrap();
        let b = SearchSession::start(small_request(2)).unwrap();
        assert_ne!(a.session_id(), b.session_id());
        let _ = a.join_blocking();
        let _ = b.join_blocking();
    }

    #[test]
    fn test_poll_until_done() {
        let session = SearchSession::start(small_request(2)).unwrap();
        let result = loop {
            match session.try_poll() {
                TryResult::Pending => thread::sleep(Duration::from_millis(1)),
                TryResult::Ok(result) => break result,
                TryResult::Disconnected => panic!("worker disconnected"),
            }
        };
        assert!(result.unwrap().best.is_some());
    }

    #[test]
    fn test_zero_timeout_falls_back_to_a_legal_move() {
        let request = SearchRequest::new(
            Preset::Shogi.board(),
            Player::First,
            RuleSet::default(),
            AiConfig::from_level(4),
        );
        let legal =
            GameState::from_preset(Preset::Shogi).legal_moves(crate::rules::PromotionPolicy::Auto);
        let session = SearchSession::start(request).unwrap();
        let outcome = session.resolve_within(Duration::ZERO).unwrap();
        let best = outcome.best.unwrap();
        assert!(legal.contains(&best));
        assert!(outcome.depth <= 1);
    }

    #[test]
    fn test_malformed_board_is_reported() {
        let session = SearchSession::start(malformed_request()).unwrap();
        assert!(matches!(session.join_blocking(), Err(SearchError::MalformedBoard(_))));
    }

    #[test]
    fn test_malformed_board_is_not_degraded() {
        let session = SearchSession::start(malformed_request()).unwrap();
        let result = session.resolve_with_fallback();
        assert!(matches!(result, Err(SearchError::MalformedBoard(_))), "got {result:?}");

        // 探索スレッドが落ちた後でも、不正な盤面をランダム手で埋めない
        let session = finished_session(malformed_request(), None);
        let result = session.resolve_within(Duration::from_millis(10));
        assert!(matches!(result, Err(SearchError::MalformedBoard(_))), "got {result:?}");
    }

    #[test]
    fn test_worker_panic_is_captured() {
        let result = run_guarded(|| panic!("search exploded"));
        assert_eq!(result, Err(SearchError::WorkerPanicked("search exploded".to_string())));
    }

    #[test]
    fn test_panicked_worker_falls_back_to_depth_one() {
        let request = small_request(2);
        let legal = legal_moves_of(&request);
        let panicked = Err(SearchError::WorkerPanicked("boom".to_string()));
        let outcome = finished_session(request, Some(panicked))
            .resolve_within(Duration::from_secs(1))
            .unwrap();
        assert!(legal.contains(&outcome.best.unwrap()));
        assert_eq!(outcome.depth, 1);
        assert!(!outcome.randomized);
    }

    #[test]
    fn test_disconnected_worker_falls_back_to_a_legal_move() {
        let request = small_request(4);
        let legal = legal_moves_of(&request);
        let session = finished_session(request, None);
        assert_eq!(session.try_poll(), TryResult::Disconnected);
        let outcome = session.resolve_within(Duration::from_secs(1)).unwrap();
        assert!(legal.contains(&outcome.best.unwrap()));
        assert!(outcome.depth <= 1);
    }

    #[test]
    fn test_panic_message_extraction() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");
        let payload: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(payload.as_ref()), "bang");
    }
}
