//! Ledger store implementation using fjall.

use std::path::Path;
use std::sync::{Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use fjall::{Keyspace, KeyspaceCreateOptions, PersistMode};

use crate::logging::{debug, info, warn};
use crate::score::{GameResult, RuleSet, normalize};

use super::error::StoreError;
use super::format::{decode_row, encode_row};
use super::types::{GameRecord, LedgerExport, PlayerAggregate};

/// Keyspace holding one immutable row per game, keyed by game id.
const GAMES_KEYSPACE: &str = "games";
/// Keyspace holding one mutable running-totals row per player.
const PLAYERS_KEYSPACE: &str = "players";
/// Metadata keyspace.
const META_KEYSPACE: &str = "_meta";
const META_CONFIG_KEY: &str = "config";

/// Current store version.
/// Increment when changing the on-disk layout or row format; the store
/// refuses to open databases with a different version.
const STORE_VERSION: u32 = 1;

/// Append-only game ledger with derived per-player totals, backed by fjall.
///
/// The ledger (games) table is the single source of truth; the players
/// table is a running fold over it, updated in the same unit of work as
/// every append and independently checkable with
/// [`verify`](LedgerStore::verify).
///
/// All writes funnel through one internal writer lock, so two concurrent
/// appends naming the same player cannot race on that player's totals.
/// Reads never take the lock.
pub struct LedgerStore {
    db: fjall::Database,
    games: Keyspace,
    players: Keyspace,
    meta: Keyspace,
    write_lock: Mutex<()>,
}

impl std::fmt::Debug for LedgerStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedgerStore").finish_non_exhaustive()
    }
}

impl LedgerStore {
    /// Open an existing ledger at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "opening ledger store");

        if !path.exists() {
            return Err(StoreError::NotInitialized(path.display().to_string()));
        }

        let db = fjall::Database::builder(path).open()?;
        let meta = db.keyspace(META_KEYSPACE, KeyspaceCreateOptions::default)?;

        // Verify store version
        if let Some(config) = meta.get(META_CONFIG_KEY)? {
            let version = u32::from_le_bytes(
                config
                    .as_ref()
                    .try_into()
                    .map_err(|_| StoreError::InvalidFormat("Invalid config format".to_string()))?,
            );
            if version != STORE_VERSION {
                return Err(StoreError::InvalidFormat(format!(
                    "Store version mismatch: expected {}, got {}",
                    STORE_VERSION, version
                )));
            }
        } else {
            return Err(StoreError::NotInitialized(path.display().to_string()));
        }

        let games = db.keyspace(GAMES_KEYSPACE, KeyspaceCreateOptions::default)?;
        let players = db.keyspace(PLAYERS_KEYSPACE, KeyspaceCreateOptions::default)?;

        info!(path = %path.display(), "ledger store opened");
        Ok(Self {
            db,
            games,
            players,
            meta,
            write_lock: Mutex::new(()),
        })
    }

    /// Initialize a new ledger at the given path.
    pub fn init(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "initializing ledger store");

        let db = fjall::Database::builder(path).open()?;
        let meta = db.keyspace(META_KEYSPACE, KeyspaceCreateOptions::default)?;

        // Write store version
        meta.insert(META_CONFIG_KEY, STORE_VERSION.to_le_bytes())?;

        let games = db.keyspace(GAMES_KEYSPACE, KeyspaceCreateOptions::default)?;
        let players = db.keyspace(PLAYERS_KEYSPACE, KeyspaceCreateOptions::default)?;
        db.persist(PersistMode::SyncAll)?;

        info!(path = %path.display(), version = STORE_VERSION, "ledger store initialized");
        Ok(Self {
            db,
            games,
            players,
            meta,
            write_lock: Mutex::new(()),
        })
    }

    /// Normalize raw tokens and append the game in one call.
    ///
    /// This is the external append operation: it runs the score normalizer
    /// and, only if validation passes, writes the game via
    /// [`append`](Self::append).
    pub fn record_game<S: AsRef<str>>(
        &self,
        game_id: &str,
        tokens: &[S],
        rules: &RuleSet,
    ) -> Result<GameRecord, crate::Error> {
        let result = normalize(tokens, rules)?;
        Ok(self.append(game_id, &result)?)
    }

    /// Append a normalized game and fold its seats into the player totals.
    ///
    /// The store is the authority on duplicates: an existing `game_id` is
    /// rejected with [`StoreError::DuplicateGame`] before anything is
    /// written, regardless of whether the caller checked
    /// [`has_game`](Self::has_game) first. The ledger row and the four
    /// aggregate upserts happen under the writer lock with a single
    /// durability point at the end.
    pub fn append(&self, game_id: &str, result: &GameResult) -> Result<GameRecord, StoreError> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if self.games.get(game_id)?.is_some() {
            warn!(game_id = game_id, "rejecting duplicate game");
            return Err(StoreError::DuplicateGame(game_id.to_string()));
        }

        let record = GameRecord::new(game_id, now_ms(), result);
        self.games.insert(game_id, encode_row(&record)?)?;

        // Upserts run seat by seat so a player occupying two seats of the
        // same game still folds both into one row.
        for (i, seat) in record.seats.iter().enumerate() {
            let mut row = self
                .load_player(&seat.player_id)?
                .unwrap_or_else(|| PlayerAggregate::new(&seat.player_id));
            row.apply(seat, (i + 1) as u8);
            self.players.insert(&seat.player_id, encode_row(&row)?)?;
        }

        self.db.persist(PersistMode::SyncAll)?;

        info!(game_id = game_id, timestamp_ms = record.timestamp_ms, "game appended");
        Ok(record)
    }

    /// Whether a game id is already present in the ledger.
    ///
    /// Advisory only; [`append`](Self::append) re-checks under the writer
    /// lock.
    pub fn has_game(&self, game_id: &str) -> Result<bool, StoreError> {
        Ok(self.games.get(game_id)?.is_some())
    }

    /// Fetch one game record.
    pub fn get_game(&self, game_id: &str) -> Result<Option<GameRecord>, StoreError> {
        match self.games.get(game_id)? {
            Some(buf) => Ok(Some(decode_row(game_id, buf.as_ref())?)),
            None => Ok(None),
        }
    }

    /// Fetch one player's running totals.
    pub fn player(&self, player_id: &str) -> Result<Option<PlayerAggregate>, StoreError> {
        self.load_player(player_id)
    }

    /// The `n` most recent games, newest first.
    pub fn list_recent(&self, n: usize) -> Result<Vec<GameRecord>, StoreError> {
        let mut games = self.all_games()?;
        games.sort_by(|a, b| b.timestamp_ms.cmp(&a.timestamp_ms));
        games.truncate(n);
        Ok(games)
    }

    /// Every game in the ledger, in key order.
    pub fn all_games(&self) -> Result<Vec<GameRecord>, StoreError> {
        let mut games = Vec::new();
        for key in self.scan_keys(&self.games) {
            if let Some(buf) = self.games.get(&key)? {
                games.push(decode_row(&key, buf.as_ref())?);
            }
        }
        Ok(games)
    }

    /// Every player aggregate row, in key order.
    pub fn all_players(&self) -> Result<Vec<PlayerAggregate>, StoreError> {
        let mut players = Vec::new();
        for key in self.scan_keys(&self.players) {
            if let Some(buf) = self.players.get(&key)? {
                players.push(decode_row(&key, buf.as_ref())?);
            }
        }
        Ok(players)
    }

    /// Dump both tables for offline audit or export.
    pub fn export(&self) -> Result<LedgerExport, StoreError> {
        Ok(LedgerExport {
            games: self.all_games()?,
            players: self.all_players()?,
        })
    }

    // Helper methods

    fn scan_keys(&self, keyspace: &Keyspace) -> Vec<String> {
        keyspace
            .iter()
            .filter_map(|kv| kv.key().ok())
            .map(|k| String::from_utf8_lossy(&k).into_owned())
            .collect()
    }

    fn load_player(&self, player_id: &str) -> Result<Option<PlayerAggregate>, StoreError> {
        match self.players.get(player_id)? {
            Some(buf) => Ok(Some(decode_row(player_id, buf.as_ref())?)),
            None => Ok(None),
        }
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
