//! Game model: board reconstruction, pending moves, dialogs, clock
//!
//! A [`Game`] is built from a server [`Snapshot`] and keeps the tile
//! dictionary (board plus rack) derivable from the move history at all
//! times. Local edits only touch draggable tiles; every server update
//! rebuilds the board from scratch.

pub mod clock;
pub mod error;
pub mod moves;
pub mod rack;
pub mod scoring;
pub mod snapshot;
pub mod tile;

#[cfg(test)]
pub(crate) mod test_support;

use crate::board::{BoardType, Square, RACK_SIZE};
use crate::config::Config;
use crate::storage::{self, TileStore};
use crate::transport::{Request, Response, Ticket};
use clock::Clock;
use error::{ErrorKind, GameError, GAME_OVER_CODE};
use moves::{Move, MoveKind};
use snapshot::{ChatMessage, LastMoveTile, Snapshot};
use std::collections::{BTreeMap, HashMap};
use std::sync::mpsc::Sender;
use std::time::{Duration, Instant};
use tile::{Highlight, Tile, BLANK};

/// Confirmation dialog currently shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialog {
    Pass,
    Challenge,
    Exchange,
    Resign,
}

pub struct Game {
    pub uuid: String,
    /// Random id of this value, carried by every request it issues
    instance: u64,
    /// Bumped on every server update
    generation: u64,
    torn_down: bool,

    pub locale: String,
    pub alphabet: String,
    pub tile_scores: HashMap<char, u32>,
    pub board_type: BoardType,
    /// Seat of the viewing player
    pub player: usize,
    pub userid: [String; 2],
    pub nickname: [String; 2],
    pub fullname: [String; 2],
    pub autoplayer: [bool; 2],
    pub scores: [i32; 2],
    pub moves: Vec<Move>,
    pub rack: Vec<(char, u32)>,
    pub bag: String,
    pub over: bool,
    pub manual: bool,
    pub fairplay: bool,
    pub xchg: bool,
    pub chall: bool,
    pub last_chall: bool,
    pub succ_chall: bool,
    pub overdue: bool,
    pub lastmove: Vec<LastMoveTile>,
    pub two_letter_words: serde_json::Value,

    pub localturn: bool,
    pub congratulate: bool,

    /// Board squares and rack slots
    pub tiles: BTreeMap<Square, Tile>,
    /// Tile-laying moves on the board so far
    pub num_tile_moves: usize,
    next_index: u32,
    /// Move index the board is shown up to, while reviewing
    pub reviewing: Option<usize>,

    pub current_score: Option<i32>,
    pub current_word: Option<String>,
    pub word_good: bool,
    pub word_bad: bool,
    pub current_error: Option<ErrorKind>,
    pub current_message: Option<String>,

    pub showing_dialog: Option<Dialog>,
    /// Blank tile waiting for a letter: (from, to)
    pub asking_for_blank: Option<(Square, Square)>,
    pub selected_square: Option<Square>,
    pub move_in_progress: bool,

    pub messages: Vec<ChatMessage>,
    pub chat_seen: bool,
    pub best_moves: Vec<Move>,

    pub clock: Clock,
    refresh_delay: Duration,
    store: Box<dyn TileStore>,
    sink: Sender<Request>,
}

impl Game {
    /// Build a game from its first snapshot.
    ///
    /// Restores any saved tile placement, starts the clock of an ongoing
    /// timed game and asks for the chat history.
    pub fn new(
        uuid: &str,
        snapshot: Snapshot,
        sink: Sender<Request>,
        store: Box<dyn TileStore>,
        config: &Config,
    ) -> Result<Game, GameError> {
        let mut game = Game {
            uuid: uuid.to_string(),
            instance: rand::random(),
            generation: 0,
            torn_down: false,
            locale: String::new(),
            alphabet: String::new(),
            tile_scores: HashMap::new(),
            board_type: BoardType::default(),
            player: 0,
            userid: Default::default(),
            nickname: Default::default(),
            fullname: Default::default(),
            autoplayer: [false; 2],
            scores: [0; 2],
            moves: Vec::new(),
            rack: Vec::new(),
            bag: String::new(),
            over: false,
            manual: false,
            fairplay: false,
            xchg: true,
            chall: false,
            last_chall: false,
            succ_chall: false,
            overdue: false,
            lastmove: Vec::new(),
            two_letter_words: serde_json::Value::Null,
            localturn: false,
            congratulate: false,
            tiles: BTreeMap::new(),
            num_tile_moves: 0,
            next_index: 0,
            reviewing: None,
            current_score: None,
            current_word: None,
            word_good: false,
            word_bad: false,
            current_error: None,
            current_message: None,
            showing_dialog: None,
            asking_for_blank: None,
            selected_square: None,
            move_in_progress: false,
            messages: Vec::new(),
            chat_seen: true,
            best_moves: Vec::new(),
            clock: Clock::new(config.max_overtime),
            refresh_delay: config.refresh_delay,
            store,
            sink,
        };

        let saved = game.store.load_tiles();
        game.init(snapshot)?;
        if game.restore_tiles(&saved) {
            game.update_score();
        }
        if game.is_timed() && !game.over {
            game.start_clock();
        }
        if !(game.autoplayer[0] && game.autoplayer[1]) {
            game.load_messages();
        }
        Ok(game)
    }

    /// Build a game whose tile placement is kept in local storage.
    pub fn open(
        uuid: &str,
        snapshot: Snapshot,
        sink: Sender<Request>,
        config: &Config,
    ) -> Result<Game, GameError> {
        let store = storage::open_tile_store(config, uuid);
        Game::new(uuid, snapshot, sink, store, config)
    }

    /// Ticket for a request issued now
    pub fn ticket(&self) -> Ticket {
        Ticket {
            instance: self.instance,
            generation: self.generation,
        }
    }

    /// Apply a snapshot and rebuild the board.
    ///
    /// A snapshot carrying an error code only sets the error; nothing
    /// else changes.
    pub fn init(&mut self, snapshot: Snapshot) -> Result<(), GameError> {
        let result = snapshot.result.unwrap_or(0);
        if result != 0 && result != GAME_OVER_CODE {
            let kind = ErrorKind::from_code(result);
            log::debug!("game {}: server reported {:?}", self.uuid, kind);
            self.current_error = Some(kind);
            self.current_message = snapshot.msg;
            return Ok(());
        }
        self.clear_error();
        self.merge(snapshot);
        self.localturn = self.moves.len() % 2 == self.player;
        let opponent = 1 - self.player;
        self.congratulate = self.over && self.scores[self.player] > self.scores[opponent];
        self.reviewing = None;
        self.place_tiles(None, false)
    }

    /// Copy every field the snapshot carries onto the game.
    fn merge(&mut self, snap: Snapshot) {
        if let Some(locale) = snap.locale {
            self.locale = locale;
        }
        if let Some(alphabet) = snap.alphabet {
            self.alphabet = alphabet;
        }
        if let Some(scores) = snap.tile_scores {
            self.tile_scores = scores
                .into_iter()
                .filter_map(|(letter, score)| letter.chars().next().map(|c| (c, score)))
                .collect();
        }
        if let Some(name) = snap.board_type {
            self.board_type = BoardType::from_name(&name);
        }
        if let Some(player) = snap.player {
            if player <= 1 {
                self.player = player;
            } else {
                log::warn!("ignoring player seat {}", player);
            }
        }
        if let Some(userid) = snap.userid {
            self.userid = userid;
        }
        if let Some(nickname) = snap.nickname {
            self.nickname = nickname;
        }
        if let Some(fullname) = snap.fullname {
            self.fullname = fullname;
        }
        if let Some(autoplayer) = snap.autoplayer {
            self.autoplayer = autoplayer;
        }
        if let Some(scores) = snap.scores {
            self.scores = scores;
        }
        if let Some(moves) = snap.moves {
            self.moves = moves;
        }
        if let Some(newmoves) = snap.newmoves {
            self.moves.extend(newmoves);
        }
        if let Some(rack) = snap.rack {
            self.rack = rack
                .into_iter()
                .filter_map(|(tile, score)| tile.chars().next().map(|c| (c, score)))
                .collect();
        }
        if let Some(bag) = snap.bag {
            self.bag = bag;
        }
        if let Some(over) = snap.over {
            self.over = over;
        }
        if let Some(manual) = snap.manual {
            self.manual = manual;
        }
        if let Some(fairplay) = snap.fairplay {
            self.fairplay = fairplay;
        }
        if let Some(xchg) = snap.xchg {
            self.xchg = xchg;
        }
        if let Some(chall) = snap.chall {
            self.chall = chall;
        }
        if let Some(last_chall) = snap.last_chall {
            self.last_chall = last_chall;
        }
        if let Some(succ_chall) = snap.succ_chall {
            self.succ_chall = succ_chall;
        }
        if let Some(overdue) = snap.overdue {
            self.overdue = overdue;
        }
        if let Some(lastmove) = snap.lastmove {
            self.lastmove = lastmove;
        }
        if let Some(words) = snap.two_letter_words {
            self.two_letter_words = words;
        }
        if let Some(messages) = snap.messages {
            self.messages = messages;
        }
        if let Some(info) = snap.time_info {
            self.clock.duration = info.duration;
            self.clock.elapsed = info.elapsed;
        }
    }

    /// Apply a server push: a move result or an opponent's move.
    pub fn update(&mut self, snapshot: Snapshot) -> Result<(), GameError> {
        self.update_at(snapshot, Instant::now())
    }

    pub fn update_at(&mut self, snapshot: Snapshot, now: Instant) -> Result<(), GameError> {
        for tile in self.tiles.values_mut() {
            tile.fresh = false;
        }
        self.generation += 1;
        self.init(snapshot)?;
        if self.current_error.is_none() {
            if self.succ_chall {
                // Our last move was challenged off the board
                self.reset_rack();
            } else {
                self.update_score();
            }
        }
        self.save_tiles();
        if self.is_timed() {
            self.reset_clock_at(now);
        }
        Ok(())
    }

    /// Rebuild the tile dictionary from the move history.
    ///
    /// With `upto`, only the first `upto` moves are replayed and the last
    /// of them is highlighted. Otherwise the opponent's latest move is
    /// highlighted when it is our turn and the server sent no separate
    /// last-move detail.
    pub fn place_tiles(&mut self, upto: Option<usize>, suppress_highlight: bool) -> Result<(), GameError> {
        self.tiles.clear();
        self.num_tile_moves = 0;
        self.next_index = 0;

        let last = upto.map_or(self.moves.len(), |n| n.min(self.moves.len()));
        let highlight_last = match upto {
            Some(_) => true,
            None => self.lastmove.is_empty() && self.localturn,
        };

        for i in 0..last {
            let (coord, letters) = match &self.moves[i].kind {
                MoveKind::Placement { coord, tiles } => (coord.clone(), tiles.clone()),
                _ => continue,
            };
            // Challenged off the board two moves later
            if i + 2 < last && self.moves[i + 2].is_successful_challenge() {
                continue;
            }
            let player = self.moves[i].player;
            let highlight = !suppress_highlight && highlight_last && i + 1 == last;
            self.place_move(player, &coord, &letters, highlight);
            self.num_tile_moves += 1;
        }

        let viewer = self.player as i32;
        for (i, &(letter, score)) in self.rack.iter().take(RACK_SIZE).enumerate() {
            self.tiles
                .insert(Square::Rack(i + 1), Tile::rack(viewer, letter, score));
        }

        if upto.is_none() && self.localturn {
            for (i, detail) in self.lastmove.iter().enumerate() {
                let square: Square = detail
                    .square()
                    .parse()
                    .map_err(|_| GameError::LastMoveMissing(detail.square().to_string()))?;
                let tile = self
                    .tiles
                    .get_mut(&square)
                    .ok_or_else(|| GameError::LastMoveMissing(detail.square().to_string()))?;
                tile.fresh = true;
                tile.index = i as u32;
            }
        }

        Ok(())
    }

    /// Lay one historical move onto the board.
    ///
    /// A `?` in `letters` marks the letter after it as a blank. Squares
    /// that are already occupied keep their tile.
    pub fn place_move(&mut self, player: i32, coord: &str, letters: &str, highlight: bool) {
        let Some(vector) = crate::board::vector_of(coord) else {
            log::warn!("skipping move with bad coordinate [{}]", coord);
            return;
        };
        if player == -1 {
            log::warn!("move at {} has no owner", coord);
        }
        let (mut row, mut col) = (vector.row, vector.col);
        let mut next_is_blank = false;
        for c in letters.chars() {
            if c == BLANK {
                next_is_blank = true;
                continue;
            }
            let Some(square) = Square::board(row, col) else {
                log::warn!("move at {} runs off the board", coord);
                break;
            };
            if !self.tiles.contains_key(&square) {
                let tile = if next_is_blank { BLANK } else { c };
                let mut placed = Tile {
                    player,
                    tile,
                    letter: c,
                    score: self.tile_score(tile),
                    fresh: false,
                    draggable: false,
                    index: 0,
                    xchg: false,
                    highlight: None,
                };
                if highlight {
                    placed.highlight = Some(if player == self.player as i32 {
                        Highlight::Local
                    } else {
                        Highlight::Remote
                    });
                    placed.index = self.next_index;
                    self.next_index += 1;
                }
                self.tiles.insert(square, placed);
            }
            next_is_blank = false;
            row += vector.dy;
            col += vector.dx;
        }
    }

    /// Point value of a tile identity; blanks are always 0.
    pub fn tile_score(&self, tile: char) -> u32 {
        if tile == BLANK {
            return 0;
        }
        self.tile_scores.get(&tile).copied().unwrap_or(0)
    }

    /// Show the board as it was after `move_index` moves.
    pub fn review(&mut self, move_index: usize) -> Result<(), GameError> {
        self.place_tiles(Some(move_index), false)?;
        self.reviewing = Some(move_index);
        Ok(())
    }

    /// Return to the live board.
    pub fn end_review(&mut self) -> Result<(), GameError> {
        self.reviewing = None;
        self.place_tiles(None, false)
    }

    /// Recompute the score of the pending move and ask for a word check.
    pub fn update_score(&mut self) {
        self.word_good = false;
        self.word_bad = false;
        match self.calc_score() {
            Some(scored) => {
                self.current_score = Some(scored.score);
                self.current_word = Some(scored.word.clone());
                if !self.manual {
                    self.send(Request::CheckWords {
                        ticket: self.ticket(),
                        locale: self.locale.clone(),
                        word: scored.word,
                        words: scored.words,
                    });
                }
            }
            None => {
                self.current_score = None;
                self.current_word = None;
            }
        }
    }

    /// Apply the reply to an earlier request.
    pub fn handle_response(&mut self, ticket: Ticket, response: Response) -> Result<(), GameError> {
        self.handle_response_at(ticket, response, Instant::now())
    }

    pub fn handle_response_at(
        &mut self,
        ticket: Ticket,
        response: Response,
        now: Instant,
    ) -> Result<(), GameError> {
        if self.torn_down || ticket.instance != self.instance {
            log::debug!("game {}: discarding response for a stale instance", self.uuid);
            return Ok(());
        }
        match response {
            Response::MoveResult(result) => {
                self.move_in_progress = false;
                match result {
                    Ok(snapshot) => self.update_at(snapshot, now)?,
                    Err(e) => {
                        log::warn!("game {}: move submission failed: {}", self.uuid, e);
                        self.current_error = Some(ErrorKind::Server);
                        self.current_message = Some(e.to_string());
                    }
                }
            }
            Response::Refreshed(result) => {
                self.move_in_progress = false;
                match result {
                    Ok(snapshot) => self.update_at(snapshot, now)?,
                    Err(e) => log::debug!("game {}: refresh failed: {}", self.uuid, e),
                }
            }
            Response::WordCheck(result) => match result {
                Ok(check) => {
                    if ticket.generation == self.generation
                        && self.current_word.as_deref() == Some(check.word.as_str())
                    {
                        self.word_good = check.ok;
                        self.word_bad = !check.ok;
                    } else {
                        log::trace!("stale word check for [{}]", check.word);
                    }
                }
                Err(e) => log::debug!("word check failed: {}", e),
            },
            Response::Messages(result) => match result {
                Ok(messages) => self.messages = messages,
                Err(e) => log::debug!("loading chat failed: {}", e),
            },
            Response::BestMoves(result) => match result {
                Ok(best) => self.best_moves = best,
                Err(e) => log::debug!("loading best moves failed: {}", e),
            },
        }
        Ok(())
    }

    pub fn submit_pass(&mut self) {
        self.open_dialog(Dialog::Pass);
    }

    pub fn submit_challenge(&mut self) {
        self.open_dialog(Dialog::Challenge);
    }

    pub fn submit_exchange(&mut self) {
        self.open_dialog(Dialog::Exchange);
    }

    pub fn submit_resign(&mut self) {
        self.open_dialog(Dialog::Resign);
    }

    fn open_dialog(&mut self, dialog: Dialog) {
        if self.over {
            return;
        }
        self.showing_dialog = Some(dialog);
        self.selected_square = None;
    }

    pub fn confirm_pass(&mut self, yes: bool) {
        self.showing_dialog = None;
        if yes {
            self.send_move(vec!["pass".to_string()]);
        }
    }

    pub fn confirm_challenge(&mut self, yes: bool) {
        self.showing_dialog = None;
        if yes {
            self.send_move(vec!["chall".to_string()]);
        }
    }

    pub fn confirm_resign(&mut self, yes: bool) {
        self.showing_dialog = None;
        if yes {
            self.send_move(vec!["rsgn".to_string()]);
        }
    }

    /// Close the exchange dialog, sending the selected tiles if confirmed.
    pub fn confirm_exchange(&mut self, yes: bool) {
        self.showing_dialog = None;
        let mut letters = String::new();
        for square in Square::rack_slots() {
            if let Some(tile) = self.tiles.get_mut(&square) {
                if tile.xchg {
                    letters.push(tile.tile);
                    tile.xchg = false;
                }
            }
        }
        if yes && !letters.is_empty() {
            self.send_move(vec![format!("exch={}", letters)]);
        }
    }

    /// Flip the exchange mark of a rack tile while the exchange dialog is open.
    pub fn toggle_exchange(&mut self, square: Square) {
        if self.showing_dialog != Some(Dialog::Exchange) || !square.is_rack() {
            return;
        }
        if let Some(tile) = self.tiles.get_mut(&square) {
            tile.xchg = !tile.xchg;
        }
    }

    /// Send the pending placement, if any.
    pub fn submit_move(&mut self) {
        if self.over {
            return;
        }
        let tokens: Vec<String> = self
            .tiles_placed()
            .into_iter()
            .filter_map(|square| {
                self.tiles
                    .get(&square)
                    .map(|tile| format!("{}={}", square, tile.token()))
            })
            .collect();
        if !tokens.is_empty() {
            self.send_move(tokens);
        }
    }

    fn send_move(&mut self, moves: Vec<String>) {
        self.move_in_progress = true;
        self.selected_square = None;
        self.send(Request::SubmitMove {
            ticket: self.ticket(),
            uuid: self.uuid.clone(),
            moves,
            mcount: self.moves.len(),
        });
    }

    /// Resign on behalf of an opponent who has run out of overtime.
    pub fn force_resign(&mut self) {
        self.move_in_progress = true;
        self.send(Request::ForceResign {
            ticket: self.ticket(),
            uuid: self.uuid.clone(),
            mcount: self.moves.len(),
        });
    }

    pub fn request_best_moves(&mut self, move_index: usize) {
        self.best_moves.clear();
        self.send(Request::BestMoves {
            ticket: self.ticket(),
            uuid: self.uuid.clone(),
            move_index,
        });
    }

    fn load_messages(&mut self) {
        self.send(Request::LoadMessages {
            ticket: self.ticket(),
            channel: format!("game:{}", self.uuid),
        });
    }

    /// Append a chat message pushed by the server.
    pub fn add_chat_message(&mut self, from_userid: &str, msg: &str, ts: &str) {
        self.messages.push(ChatMessage {
            from_userid: from_userid.to_string(),
            msg: msg.to_string(),
            ts: ts.to_string(),
        });
        if from_userid != self.userid[self.player] {
            self.chat_seen = false;
        }
    }

    pub fn mark_chat_seen(&mut self) {
        self.chat_seen = true;
    }

    pub fn select_square(&mut self, square: Square) {
        self.selected_square = Some(square);
    }

    pub fn deselect(&mut self) {
        self.selected_square = None;
    }

    pub fn clear_error(&mut self) {
        self.current_error = None;
        self.current_message = None;
    }

    /// Stop the clock and ignore every reply still in flight.
    pub fn cleanup(&mut self) {
        self.clock.stop();
        self.torn_down = true;
    }

    fn send(&self, request: Request) {
        if let Err(e) = self.sink.send(request) {
            log::debug!("game {}: request dropped, sink closed: {}", self.uuid, e);
        }
    }
}
