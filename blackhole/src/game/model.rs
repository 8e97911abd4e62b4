//! The owner of the running game.
use std::{
    fmt,
    io::{Read, Write},
};

use tracing::{debug, info};

use crate::{
    board::{Board, Cell, Coordinate, TableSize},
    game::{
        CannotMoveReason, GameEvent, GameObserver, Move, MoveOutcome, Player, Score, Session,
        Status, SubscriptionId,
    },
    persistence::{self, GameDataError, Storage},
};

/// Sole authority over the game state.
///
/// Every change goes through `&mut self`, so a save (which borrows the model shared)
/// can never observe a half-applied move, and observers can't re-enter the model while
/// they are being notified.
pub struct GameModel {
    /// The running game.
    session: Session,

    /// Subscribed observers in subscription order.
    observers: Vec<(SubscriptionId, Box<dyn GameObserver>)>,

    /// Id to hand out to the next subscriber.
    next_id: u64,
}

impl GameModel {
    /// Create a model running a fresh game of the given size.
    pub fn new(size: TableSize) -> Self {
        Self::with_session(Session::new(size))
    }

    /// Create a model running the given session.
    pub fn with_session(session: Session) -> Self {
        Self {
            session,
            observers: Vec::new(),
            next_id: 0,
        }
    }

    /// Register an observer. It receives every event from now on.
    pub fn subscribe<O: GameObserver + 'static>(&mut self, observer: O) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove a previously registered observer. Returns false if it was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        self.observers.len() != before
    }

    /// Start a new game of the given size, discarding the current one.
    pub fn new_game(&mut self, size: TableSize) {
        info!(%size, "starting new game");
        self.session = Session::new(size);
        self.emit(GameEvent::GameLoaded);
    }

    /// Attempt a move for the current player.
    ///
    /// Illegal moves are ignored: nothing changes and no event is sent. Returns whether
    /// the move was applied; callers are free to ignore it and rely on the events.
    pub fn player_clicked<M: Into<Move>>(&mut self, mv: M) -> bool {
        let mv = mv.into();
        let mover = self.session.current();
        let outcome = match self.session.apply(mv) {
            Ok(outcome) => outcome,
            Err(reason) => {
                debug!(?mover, %mv, %reason, "ignoring illegal move");
                return false;
            }
        };
        debug!(?mover, %mv, "move applied");

        let at = outcome.changed();
        if let Some(cell) = self.session.cell(at) {
            self.emit(GameEvent::FieldChanged { at, cell });
        }
        match outcome {
            MoveOutcome::Continue { next, .. } => self.emit(GameEvent::PlayerChanged(next)),
            MoveOutcome::Finished { winner, .. } => {
                info!(%winner, "game over");
                self.emit(GameEvent::GameOver { winner });
            }
        }
        true
    }

    /// Check whether the current player may make the given move.
    pub fn check_move(&self, mv: Move) -> Result<(), CannotMoveReason> {
        self.session.check_move(mv)
    }

    /// List the legal moves of the current player.
    pub fn legal_moves(&self) -> Vec<Move> {
        self.session.legal_moves()
    }

    /// Write the whole session to `writer`.
    pub fn save_game<W: Write>(&self, writer: W) -> Result<(), GameDataError> {
        persistence::write_session(&self.session, writer)?;
        info!(size = %self.session.size(), "game saved");
        Ok(())
    }

    /// Replace the session with the one read from `reader`. On error the current session
    /// is kept and no event is sent.
    pub fn load_game<R: Read>(&mut self, reader: R) -> Result<(), GameDataError> {
        let session = persistence::read_session(reader)?;
        info!(size = %session.size(), over = session.is_over(), "game loaded");
        self.session = session;
        self.emit(GameEvent::GameLoaded);
        Ok(())
    }

    /// Save the session under `name` in the given storage.
    pub fn save_to<S: Storage + ?Sized>(&self, storage: &S, name: &str) -> Result<(), GameDataError> {
        let mut writer = storage.open_write(name)?;
        self.save_game(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Load the session stored under `name` in the given storage.
    pub fn load_from<S: Storage + ?Sized>(
        &mut self,
        storage: &S,
        name: &str,
    ) -> Result<(), GameDataError> {
        let reader = storage.open_read(name)?;
        self.load_game(reader)
    }

    /// Get the running session.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Snapshot of the whole board, for rebuilding a view after [`GameEvent::GameLoaded`].
    pub fn board(&self) -> &Board {
        self.session.board()
    }

    /// Get the player whose turn it is. `None` once the game is over.
    pub fn current_player(&self) -> Option<Player> {
        self.session.current()
    }

    /// Get the size of the board.
    pub fn table_size(&self) -> TableSize {
        self.session.size()
    }

    /// Get the content of a cell. Returns `None` if the coordinate is out of bounds.
    pub fn cell(&self, at: Coordinate) -> Option<Cell> {
        self.session.cell(at)
    }

    /// Get the status of the game.
    pub fn status(&self) -> Status {
        self.session.status()
    }

    /// Get the winner. `None` while the game is running.
    pub fn winner(&self) -> Option<Player> {
        self.session.winner()
    }

    /// Returns true if the game is over.
    pub fn is_over(&self) -> bool {
        self.session.is_over()
    }

    /// Get the most recent placement of the given player.
    pub fn focus(&self, player: Player) -> Option<Coordinate> {
        self.session.focus(player)
    }

    /// Score of the given player in the current position.
    pub fn score(&self, player: Player) -> Score {
        self.session.score(player)
    }

    /// Deliver an event to every observer.
    fn emit(&mut self, event: GameEvent) {
        for (_, observer) in self.observers.iter_mut() {
            observer.notify(&event);
        }
    }
}

impl Default for GameModel {
    /// A model running a fresh game of the default size.
    fn default() -> Self {
        Self::new(TableSize::default())
    }
}

impl fmt::Debug for GameModel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("GameModel")
            .field("session", &self.session)
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{cell::RefCell, rc::Rc};

    fn recorded(model: &mut GameModel) -> Rc<RefCell<Vec<GameEvent>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        model.subscribe(move |event: &GameEvent| sink.borrow_mut().push(*event));
        events
    }

    #[test]
    fn new_game_notifies_reload() {
        let mut model = GameModel::default();
        let events = recorded(&mut model);
        model.new_game(TableSize::Nine);
        assert_eq!(model.table_size(), TableSize::Nine);
        assert_eq!(*events.borrow(), [GameEvent::GameLoaded]);
    }

    #[test]
    fn unsubscribed_observers_hear_nothing() {
        let mut model = GameModel::default();
        let events = Rc::new(RefCell::new(0));
        let sink = events.clone();
        let id = model.subscribe(move |_: &GameEvent| *sink.borrow_mut() += 1);
        model.new_game(TableSize::Five);
        assert!(model.unsubscribe(id));
        assert!(!model.unsubscribe(id));
        model.new_game(TableSize::Five);
        assert_eq!(*events.borrow(), 1);
    }

    #[test]
    fn observers_are_called_in_subscription_order() {
        let mut model = GameModel::default();
        let order = Rc::new(RefCell::new(Vec::new()));
        for tag in 0..3 {
            let order = order.clone();
            model.subscribe(move |_: &GameEvent| order.borrow_mut().push(tag));
        }
        model.new_game(TableSize::Five);
        assert_eq!(*order.borrow(), [0, 1, 2]);
    }

    #[test]
    fn failed_load_sends_nothing() {
        let mut model = GameModel::default();
        model.player_clicked(Coordinate::new(0, 0));
        let before = model.session().clone();
        let events = recorded(&mut model);
        assert!(model.load_game(&b"{\"format\":"[..]).is_err());
        assert_eq!(model.session(), &before);
        assert!(events.borrow().is_empty());
    }
}
