//! Tic-tac-toe ladder server.
//!
//! Players register under a name and a precomputed credential hash, open
//! matches against each other, take turns marking cells, and collect one
//! leaderboard point per won match.
//!
//! # Architecture
//!
//! - **Engine**: [`MatchEngine`] applies the rules over any [`Store`]
//! - **Persistence**: [`SqliteStore`] (diesel, embedded migrations) and
//!   [`MemoryStore`] implement the [`Repository`] contract
//! - **Input**: [`PlayerName`], [`CredentialHash`] and the `parse_*`
//!   functions validate request fields before the engine sees them
//! - **HTTP**: [`router`] exposes the engine as form-encoded routes
//!
//! # Example
//!
//! ```
//! use ladder_server::{CredentialHash, MatchEngine, MemoryStore, PlayerName, Position};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = MatchEngine::new(MemoryStore::new());
//! let alice = PlayerName::new("alice")?;
//! let bob = PlayerName::new("bob")?;
//! let alice_hash = CredentialHash::new("aaaa0001")?;
//!
//! engine.register_player(&alice, &alice_hash)?;
//! engine.register_player(&bob, &CredentialHash::new("bbbb0002")?)?;
//!
//! let match_id = engine.create_match(&alice, &alice_hash, &bob)?;
//! engine.apply_move(&alice, &alice_hash, Position::Center, match_id)?;
//!
//! let view = engine.match_state(&alice, &alice_hash, match_id)?;
//! assert_eq!(view.turn(), "bob");
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod db;
mod engine;
mod http;
mod input;

// Crate-level exports - Configuration
pub use config::{ConfigError, ServerConfig};

// Crate-level exports - Persistence
pub use db::{
    DbError, DbErrorKind, Match, MatchId, MemoryStore, NewMatch, NewPlayer, Player, PlayerId,
    Repository, SqliteRepository, SqliteStore, Standing, Store,
};

// Crate-level exports - Engine
pub use engine::{
    Ack, Conflict, EngineError, ErrorKind, MatchCreated, MatchEngine, MatchView, NotFound, Reply,
    Scores,
};

// Crate-level exports - HTTP
pub use http::{AppState, router, status_for};

// Crate-level exports - Input validation
pub use input::{
    CREDENTIAL_HASH_LENGTH, CredentialHash, MAX_NAME_LENGTH, PlayerName, ValidationError,
    parse_match_id, parse_max_entries, parse_position,
};

// Crate-level exports - Board types
pub use ladder_board::{BoardState, BoardStatus, Mark, Position};
