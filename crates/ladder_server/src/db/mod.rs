//! Persistence for players and matches.

mod error;
mod memory;
mod models;
mod repository;
mod schema; // Diesel generated schema - internal use only
mod store;

pub use error::{DbError, DbErrorKind};
pub use memory::MemoryStore;
pub use models::{Match, MatchId, NewMatch, NewPlayer, Player, PlayerId, Standing};
pub use repository::{Repository, SqliteRepository};
pub use store::{SqliteStore, Store};
