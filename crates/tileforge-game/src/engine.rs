//! The round/turn engine: a [`RoomBehavior`] that runs the tile game.
//!
//! ```text
//! READY*  ─→ START ─→ (lock) ─→ round ─→ PLAY_HAND / PASS ... ─→ settlement
//!                                  ↑                                  │
//!                                  └──────── no bankruptcy ───────────┤
//!                                                                     ▼
//!                                                    GAME_END, reset, unlock
//! ```
//!
//! Every handler validates first and mutates second, so a rejected action
//! leaves the state exactly as it was.

use rand::SeedableRng;
use rand::rngs::StdRng;

use tileforge_protocol::{
    ClientAction, GameEndEntry, JoinOptions, PlayHandPayload, RoundEndEntry, ServerEvent,
    SessionId, check_payload, is_play_hand_payload, is_ready_payload,
};
use tileforge_room::{MessageRouter, RoomBehavior, RoomConfig, RoomContext};
use tileforge_session::shuffle_in_place;

use crate::{
    ClassicRules, Connection, GameConfig, GameError, GameOptions, GameState, GameStateView,
    GameStatus, PlayerState, TableHand, TileRules, budget_deltas,
};

/// A game room, generic over its rule table.
pub struct GameRoom<R = ClassicRules> {
    state: GameState,
    rules: R,
    config: GameConfig,
    rng: StdRng,
}

impl<R: TileRules + Default> GameRoom<R> {
    pub fn new(config: GameConfig) -> Self {
        Self::with_rules(config, R::default())
    }

    pub fn with_rules(config: GameConfig, rules: R) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        Self {
            state: GameState::default(),
            rules,
            config,
            rng,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    // =====================================================================
    // Message handlers
    // =====================================================================

    /// `READY`: sets the sender's readiness. Only while waiting.
    pub fn ready(
        &mut self,
        _ctx: &mut RoomContext<Self>,
        client: &SessionId,
        is_ready: bool,
    ) -> Result<(), GameError> {
        if self.state.status != GameStatus::Waiting {
            return Err(GameError::AlreadyStarted(self.state.status));
        }
        let player = self
            .state
            .player_mut(client)
            .ok_or_else(|| GameError::NotAParticipant(client.clone()))?;

        player.is_ready = is_ready;
        tracing::info!(%client, is_ready, "readiness changed");
        Ok(())
    }

    /// `START`: checks the preconditions, then locks the room. The match
    /// itself starts in [`Self::complete_start`] once the lock is held.
    pub fn start(&mut self, ctx: &mut RoomContext<Self>, client: &SessionId) -> Result<(), GameError> {
        if self.state.status != GameStatus::Waiting {
            return Err(GameError::AlreadyStarted(self.state.status));
        }
        if self.state.position(client).is_none() {
            return Err(GameError::NotAParticipant(client.clone()));
        }
        self.can_start()?;

        self.state.status = GameStatus::Starting;
        ctx.lock(client);
        tracing::info!(%client, "start requested, locking room");
        Ok(())
    }

    /// Runs once the lock is held. Anything that changed while it was being
    /// acquired is caught by the second check.
    pub fn complete_start(
        &mut self,
        ctx: &mut RoomContext<Self>,
        requester: &SessionId,
    ) -> Result<(), GameError> {
        if self.state.status != GameStatus::Starting {
            tracing::debug!(status = %self.state.status, "lock acquired outside a start");
            return Ok(());
        }
        if let Err(err) = self.can_start() {
            self.state.status = GameStatus::Waiting;
            ctx.unlock();
            return Err(err);
        }

        for player in &mut self.state.players {
            player.budget = self.config.default_budget;
        }
        self.state.status = GameStatus::Ongoing;
        self.start_round();
        tracing::info!(%requester, players = self.state.players.len(), "match started");
        Ok(())
    }

    /// `PLAY_HAND`: lays tiles on the table. Emptying the hand ends the
    /// round.
    pub fn play_hand(
        &mut self,
        ctx: &mut RoomContext<Self>,
        client: &SessionId,
        payload: PlayHandPayload,
    ) -> Result<(), GameError> {
        let index = self.current_turn(client)?;
        let top = self.rules.top_number(self.state.players.len());
        let hand = self
            .rules
            .resolve_hand(&payload.tiles, top)
            .ok_or(GameError::IllegalHand("not a valid combination"))?;

        let player = &self.state.players[index];
        if !player.holds_all(&hand.tiles) {
            return Err(GameError::IllegalHand("tiles not in hand"));
        }
        if let Some(table) = &self.state.table {
            if table.owner != *client && !self.rules.beats(&hand, &table.hand) {
                return Err(GameError::IllegalHand("does not beat the table"));
            }
        }

        let player = &mut self.state.players[index];
        player.remove_tiles(&hand.tiles);
        let emptied = player.tile_count() == 0;
        tracing::info!(%client, kind = ?hand.kind, tiles = hand.len(), "hand played");
        self.state.table = Some(TableHand {
            owner: client.clone(),
            hand,
        });

        if emptied {
            self.finish_round(ctx);
        } else {
            self.advance_turn();
        }
        Ok(())
    }

    /// `PASS`: gives the turn away without playing.
    pub fn pass(&mut self, _ctx: &mut RoomContext<Self>, client: &SessionId) -> Result<(), GameError> {
        self.current_turn(client)?;
        tracing::info!(%client, "passed");
        self.advance_turn();
        Ok(())
    }

    // =====================================================================
    // Rounds
    // =====================================================================

    fn start_round(&mut self) {
        let count = self.state.players.len();
        let top = self.rules.top_number(count);
        let per_player = self.rules.tiles_per_player(count);
        let mut deck = self.rules.generate_all_tiles(top);
        shuffle_in_place(&mut deck, &mut self.rng);

        let mut deck = deck.into_iter();
        for player in &mut self.state.players {
            player.set_tiles(deck.by_ref().take(per_player).collect());
        }

        let holders: Vec<usize> = self
            .state
            .players
            .iter()
            .enumerate()
            .filter(|(_, player)| player.tiles().iter().any(|t| self.rules.is_starting_tile(t)))
            .map(|(index, _)| index)
            .collect();
        if holders.len() != 1 {
            tracing::warn!(holders = holders.len(), "starting tile not held by exactly one player");
        }

        self.state.current_player_index = holders.first().copied().unwrap_or(0);
        self.state.table = None;
        tracing::info!(
            top,
            per_player,
            first = self.state.current_player_index,
            "round dealt"
        );
    }

    fn finish_round(&mut self, ctx: &mut RoomContext<Self>) {
        let penalties: Vec<i64> = self
            .state
            .players
            .iter()
            .map(|player| self.rules.penalty(player.tiles()))
            .collect();
        let deltas = budget_deltas(&penalties);

        let entries: Vec<RoundEndEntry> = self
            .state
            .players
            .iter()
            .zip(penalties.iter().zip(&deltas))
            .map(|(player, (penalty, delta))| RoundEndEntry {
                player_id: player.id.clone(),
                tiles: player.tiles().to_vec(),
                penalty: *penalty,
                prev_budget: player.budget,
                new_budget: player.budget + delta,
            })
            .collect();

        for (player, entry) in self.state.players.iter_mut().zip(&entries) {
            player.budget = entry.new_budget;
        }
        ctx.broadcast(ServerEvent::RoundEnd(entries));
        tracing::info!(?penalties, ?deltas, "round settled");

        if self.state.players.iter().any(|player| player.budget <= 0) {
            self.finish_game(ctx);
        } else {
            self.start_round();
        }
    }

    fn finish_game(&mut self, ctx: &mut RoomContext<Self>) {
        let entries: Vec<GameEndEntry> = self
            .state
            .players
            .iter()
            .map(|player| GameEndEntry {
                player_id: player.id.clone(),
                budget: player.budget,
            })
            .collect();
        ctx.broadcast(ServerEvent::GameEnd(entries));

        for player in &mut self.state.players {
            player.budget = 0;
            player.clear_tiles();
            player.is_ready = false;
        }
        self.state.current_player_index = 0;
        self.state.table = None;
        self.state.status = GameStatus::Waiting;
        ctx.unlock();
        tracing::info!("match finished, room unlocked");
    }

    // =====================================================================
    // Helpers
    // =====================================================================

    /// Unready players are reported before a short table.
    fn can_start(&self) -> Result<(), GameError> {
        if self.state.players.iter().any(|player| !player.is_ready) {
            return Err(GameError::UnreadyPlayers);
        }
        let present = self.state.players.len();
        let required = self.config.min_players.max(2);
        if present < required {
            return Err(GameError::NotEnoughPlayers { required, present });
        }
        Ok(())
    }

    /// The sender's seat index, if it is their turn in an ongoing match.
    fn current_turn(&self, client: &SessionId) -> Result<usize, GameError> {
        if self.state.status != GameStatus::Ongoing {
            return Err(GameError::NotStarted(self.state.status));
        }
        let index = self
            .state
            .position(client)
            .ok_or_else(|| GameError::NotAParticipant(client.clone()))?;
        if index != self.state.current_player_index {
            let current = self.state.players[self.state.current_player_index].id.clone();
            return Err(GameError::NotYourTurn(current));
        }
        Ok(index)
    }

    /// Moves to the next seat. The table clears when the turn comes back
    /// round to whoever played it.
    fn advance_turn(&mut self) {
        let next = (self.state.current_player_index + 1) % self.state.players.len();
        self.state.current_player_index = next;
        let owner_is_next = self
            .state
            .table
            .as_ref()
            .is_some_and(|table| table.owner == self.state.players[next].id);
        if owner_is_next {
            self.state.table = None;
        }
    }

    /// Frees a seat for good. Leaving mid-match ends the match first.
    fn remove_player(&mut self, ctx: &mut RoomContext<Self>, client: &SessionId) {
        if self.state.status == GameStatus::Ongoing {
            tracing::info!(%client, "player left mid-match, ending the match");
            self.finish_game(ctx);
        }
        if let Some(index) = self.state.position(client) {
            self.state.players.remove(index);
            tracing::info!(%client, players = self.state.players.len(), "seat removed");
        }
    }
}

impl<R: TileRules + Default> RoomBehavior for GameRoom<R> {
    type Options = GameOptions;
    type Error = GameError;
    type View = GameStateView;
    type ServerMessage = ServerEvent;

    fn create(options: &GameOptions) -> Self {
        Self::new(options.game.clone())
    }

    fn name() -> &'static str {
        "game_room"
    }

    fn room_config(options: &GameOptions) -> RoomConfig {
        options.room.clone()
    }

    fn routes() -> MessageRouter<Self> {
        MessageRouter::new()
            .on(
                ClientAction::Ready.as_str(),
                check_payload(is_ready_payload),
                Self::ready,
            )
            .on_unit(ClientAction::Start.as_str(), Self::start)
            .on(
                ClientAction::PlayHand.as_str(),
                check_payload(is_play_hand_payload),
                Self::play_hand,
            )
            .on_unit(ClientAction::Pass.as_str(), Self::pass)
            .on_any(|_game: &mut Self, _ctx: &mut RoomContext<Self>, _client: &SessionId, action: &str| {
                Err(GameError::UnknownAction(action.to_string()))
            })
    }

    fn on_create(&mut self, ctx: &mut RoomContext<Self>) {
        tracing::info!(
            max_clients = ctx.config().max_clients,
            default_budget = self.config.default_budget,
            "game room ready"
        );
    }

    fn on_join(&mut self, _ctx: &mut RoomContext<Self>, client: &SessionId, options: &JoinOptions) {
        if self.state.position(client).is_some() {
            tracing::warn!(%client, "player already seated");
            return;
        }
        let name = options
            .name
            .clone()
            .unwrap_or_else(|| format!("Player {}", self.state.players.len() + 1));
        tracing::info!(%client, %name, "registering player");
        self.state.players.push(PlayerState::new(client.clone(), name));
    }

    fn on_leave(&mut self, ctx: &mut RoomContext<Self>, client: &SessionId, consented: bool) {
        if self.state.position(client).is_none() {
            tracing::warn!(%client, "leaving player not found");
            return;
        }

        if self.state.status != GameStatus::Waiting && !consented {
            let deadline = ctx.allow_reconnection(client);
            if let Some(player) = self.state.player_mut(client) {
                player.connection = Connection::PendingReconnection { deadline };
            }
            tracing::info!(%client, "waiting for reconnection");
            return;
        }

        self.remove_player(ctx, client);
    }

    fn on_reconnect(&mut self, _ctx: &mut RoomContext<Self>, client: &SessionId) {
        if let Some(player) = self.state.player_mut(client) {
            player.connection = Connection::Connected;
            tracing::info!(%client, "player reconnected");
        }
    }

    fn on_reconnection_expired(&mut self, ctx: &mut RoomContext<Self>, client: &SessionId) {
        tracing::info!(%client, "player failed to reconnect");
        self.remove_player(ctx, client);
    }

    fn on_lock_acquired(
        &mut self,
        ctx: &mut RoomContext<Self>,
        requester: &SessionId,
    ) -> Result<(), GameError> {
        self.complete_start(ctx, requester)
    }

    fn on_dispose(&mut self, _ctx: &mut RoomContext<Self>) {
        tracing::info!(players = self.state.players.len(), "game room disposed");
    }

    fn view_for(&self, viewer: Option<&SessionId>) -> GameStateView {
        self.state.view_for(viewer)
    }
}
