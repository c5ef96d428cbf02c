//! CRUD contract for players and matches, and its SQLite implementation.

use diesel::prelude::*;
use tracing::{debug, info, instrument};

use crate::db::{DbError, DbErrorKind, Match, MatchId, NewMatch, NewPlayer, Player, PlayerId, schema};

/// CRUD operations the match engine consumes.
///
/// Implementations are reached through [`crate::Store`], which decides
/// whether a batch of calls runs as one exclusive unit.
pub trait Repository {
    /// Gets a player by name. Returns `None` if not found.
    fn find_player_by_name(&mut self, name: &str) -> Result<Option<Player>, DbError>;

    /// Gets a player by id. Returns `None` if not found.
    fn find_player_by_id(&mut self, id: PlayerId) -> Result<Option<Player>, DbError>;

    /// Inserts a player with a zero score.
    ///
    /// Fails with [`DbErrorKind::Duplicate`] if the name is taken.
    fn create_player(&mut self, player: NewPlayer) -> Result<Player, DbError>;

    /// Gets a match by id. Returns `None` if not found.
    fn find_match_by_id(&mut self, id: MatchId) -> Result<Option<Match>, DbError>;

    /// Inserts a match and returns it with its assigned id.
    fn create_match(&mut self, game: NewMatch) -> Result<Match, DbError>;

    /// Writes a match's board, turn and update time.
    fn update_match(&mut self, game: &Match) -> Result<(), DbError>;

    /// Writes a player's score.
    fn update_player(&mut self, player: &Player) -> Result<(), DbError>;

    /// Lists up to `limit` players, highest score first, ties by ascending id.
    fn list_players_by_score_desc(&mut self, limit: i64) -> Result<Vec<Player>, DbError>;
}

/// [`Repository`] over a borrowed SQLite connection.
///
/// Whatever transaction the connection is in covers every call.
pub struct SqliteRepository<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> SqliteRepository<'c> {
    /// Wraps a connection.
    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        Self { conn }
    }

    fn conn(&mut self) -> &mut SqliteConnection {
        &mut *self.conn
    }
}

impl Repository for SqliteRepository<'_> {
    #[instrument(skip(self))]
    fn find_player_by_name(&mut self, name: &str) -> Result<Option<Player>, DbError> {
        debug!(name = %name, "Looking up player by name");
        let player = schema::players::table
            .filter(schema::players::name.eq(name))
            .select(Player::as_select())
            .first(self.conn())
            .optional()?;

        if let Some(ref p) = player {
            debug!(player_id = p.id(), "Player found");
        } else {
            debug!("Player not found");
        }

        Ok(player)
    }

    #[instrument(skip(self))]
    fn find_player_by_id(&mut self, id: PlayerId) -> Result<Option<Player>, DbError> {
        debug!(player_id = id, "Looking up player by id");
        let player = schema::players::table
            .find(id)
            .select(Player::as_select())
            .first(self.conn())
            .optional()?;
        Ok(player)
    }

    #[instrument(skip(self, player), fields(name = %player.name()))]
    fn create_player(&mut self, player: NewPlayer) -> Result<Player, DbError> {
        debug!("Inserting player");
        let player = diesel::insert_into(schema::players::table)
            .values(&player)
            .returning(Player::as_returning())
            .get_result(self.conn())?;

        info!(player_id = player.id(), name = %player.name(), "Player created");
        Ok(player)
    }

    #[instrument(skip(self))]
    fn find_match_by_id(&mut self, id: MatchId) -> Result<Option<Match>, DbError> {
        debug!(match_id = id, "Looking up match");
        let game = schema::matches::table
            .find(id)
            .select(Match::as_select())
            .first(self.conn())
            .optional()?;
        Ok(game)
    }

    #[instrument(skip(self))]
    fn create_match(&mut self, game: NewMatch) -> Result<Match, DbError> {
        debug!("Inserting match");
        let game = diesel::insert_into(schema::matches::table)
            .values(&game)
            .returning(Match::as_returning())
            .get_result(self.conn())?;

        info!(match_id = game.id(), "Match created");
        Ok(game)
    }

    #[instrument(skip(self, game), fields(match_id = game.id(), board = game.board()))]
    fn update_match(&mut self, game: &Match) -> Result<(), DbError> {
        use schema::matches::dsl;

        let rows = diesel::update(dsl::matches.find(*game.id()))
            .set((
                dsl::board.eq(*game.board()),
                dsl::turn_player_id.eq(*game.turn_player_id()),
                dsl::updated_at.eq(*game.updated_at()),
            ))
            .execute(self.conn())?;

        if rows == 0 {
            return Err(DbError::with_kind(
                DbErrorKind::Missing,
                format!("match {} does not exist", game.id()),
            ));
        }
        debug!("Match updated");
        Ok(())
    }

    #[instrument(skip(self, player), fields(player_id = player.id(), score = player.score()))]
    fn update_player(&mut self, player: &Player) -> Result<(), DbError> {
        use schema::players::dsl;

        let rows = diesel::update(dsl::players.find(*player.id()))
            .set(dsl::score.eq(*player.score()))
            .execute(self.conn())?;

        if rows == 0 {
            return Err(DbError::with_kind(
                DbErrorKind::Missing,
                format!("player {} does not exist", player.id()),
            ));
        }
        debug!("Player score updated");
        Ok(())
    }

    #[instrument(skip(self))]
    fn list_players_by_score_desc(&mut self, limit: i64) -> Result<Vec<Player>, DbError> {
        let players = schema::players::table
            .order((schema::players::score.desc(), schema::players::id.asc()))
            .limit(limit)
            .select(Player::as_select())
            .load(self.conn())?;

        debug!(count = players.len(), "Leaderboard loaded");
        Ok(players)
    }
}
