//! HTTP request layer.
//!
//! Form-encoded POST routes plus one GET route, all answering JSON in the
//! [`Reply`] shape. Handlers validate every field into the engine's input
//! types, then run the engine call on the blocking pool since stores do
//! synchronous I/O.

use std::sync::Arc;

use axum::{
    Form, Json, Router,
    extract::{Path, State, rejection::FormRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::db::Store;
use crate::engine::{Ack, EngineError, ErrorKind, MatchCreated, MatchEngine, Reply, Scores};
use crate::input::{
    CredentialHash, PlayerName, ValidationError, parse_match_id, parse_max_entries, parse_position,
};

/// Shared engine handed to every handler.
pub type AppState<S> = Arc<MatchEngine<S>>;

/// Builds the router over a shared engine.
#[instrument(skip(engine))]
pub fn router<S: Store>(engine: AppState<S>) -> Router {
    info!("Building ladder router");
    Router::new()
        .route("/register_player", post(register_player::<S>))
        .route("/create_match", post(create_match::<S>))
        .route("/leaderboard/{max_entries}", get(leaderboard::<S>))
        .route("/match_state", post(match_state::<S>))
        .route("/apply_move", post(apply_move::<S>))
        .with_state(engine)
}

/// Transport status for an error category.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::Authentication => StatusCode::UNAUTHORIZED,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn respond<T: Serialize>(reply: Reply<T>) -> Response {
    let status = reply.error_kind().map(status_for).unwrap_or(StatusCode::OK);
    if let Some(kind) = reply.error_kind() {
        warn!(kind = %kind, status = status.as_u16(), "Request rejected");
    }
    (status, Json(reply)).into_response()
}

fn reject(err: ValidationError) -> Response {
    respond(Reply::from(Err::<Ack, _>(EngineError::from(err))))
}

/// Runs an engine call on the blocking pool.
async fn run_engine<S, T, F>(engine: AppState<S>, work: F) -> Reply<T>
where
    S: Store,
    T: Send + 'static,
    F: FnOnce(&MatchEngine<S>) -> Result<T, EngineError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || work(&engine))
        .await
        .unwrap_or_else(|e| Err(EngineError::internal(format!("engine task failed: {}", e))))
        .into()
}

fn unpack<T>(form: Result<Form<T>, FormRejection>) -> Result<T, ValidationError> {
    form.map(|Form(inner)| inner).map_err(|rejection| {
        debug!(error = %rejection, "Form rejected");
        ValidationError::new("body", "expected a form-encoded body")
    })
}

fn required(field: &'static str, value: Option<String>) -> Result<String, ValidationError> {
    value.ok_or_else(|| ValidationError::missing(field))
}

fn name_field(field: &'static str, value: Option<String>) -> Result<PlayerName, ValidationError> {
    PlayerName::new(required(field, value)?).map_err(|e| e.on_field(field))
}

fn hash_field(value: Option<String>) -> Result<CredentialHash, ValidationError> {
    CredentialHash::new(required("pw_hash", value)?.to_lowercase())
}

/// Form for `POST /register_player`.
#[derive(Debug, Deserialize)]
struct RegisterForm {
    name: Option<String>,
    pw_hash: Option<String>,
}

/// Form for `POST /create_match`.
#[derive(Debug, Deserialize)]
struct CreateMatchForm {
    player_1_name: Option<String>,
    pw_hash: Option<String>,
    player_2_name: Option<String>,
}

/// Form for `POST /match_state`.
#[derive(Debug, Deserialize)]
struct MatchStateForm {
    name: Option<String>,
    pw_hash: Option<String>,
    match_id: Option<String>,
}

/// Form for `POST /apply_move`.
#[derive(Debug, Deserialize)]
struct ApplyMoveForm {
    name: Option<String>,
    pw_hash: Option<String>,
    position: Option<String>,
    match_id: Option<String>,
}

#[instrument(skip_all)]
async fn register_player<S: Store>(
    State(engine): State<AppState<S>>,
    form: Result<Form<RegisterForm>, FormRejection>,
) -> Response {
    let parsed = unpack(form).and_then(|form| {
        Ok((name_field("name", form.name)?, hash_field(form.pw_hash)?))
    });
    let (name, hash) = match parsed {
        Ok(fields) => fields,
        Err(err) => return reject(err),
    };

    debug!(name = %name, "register_player");
    respond(
        run_engine(engine, move |engine| {
            engine.register_player(&name, &hash).map(|()| Ack)
        })
        .await,
    )
}

#[instrument(skip_all)]
async fn create_match<S: Store>(
    State(engine): State<AppState<S>>,
    form: Result<Form<CreateMatchForm>, FormRejection>,
) -> Response {
    let parsed = unpack(form).and_then(|form| {
        Ok((
            name_field("player_1_name", form.player_1_name)?,
            hash_field(form.pw_hash)?,
            name_field("player_2_name", form.player_2_name)?,
        ))
    });
    let (player_one, hash, player_two) = match parsed {
        Ok(fields) => fields,
        Err(err) => return reject(err),
    };

    debug!(player_one = %player_one, player_two = %player_two, "create_match");
    respond(
        run_engine(engine, move |engine| {
            engine
                .create_match(&player_one, &hash, &player_two)
                .map(MatchCreated::new)
        })
        .await,
    )
}

#[instrument(skip_all)]
async fn leaderboard<S: Store>(
    State(engine): State<AppState<S>>,
    Path(max_entries): Path<String>,
) -> Response {
    let max_entries = match parse_max_entries(&max_entries) {
        Ok(max) => max,
        Err(err) => return reject(err),
    };

    respond(
        run_engine(engine, move |engine| {
            engine.leaderboard(max_entries).map(Scores::new)
        })
        .await,
    )
}

#[instrument(skip_all)]
async fn match_state<S: Store>(
    State(engine): State<AppState<S>>,
    form: Result<Form<MatchStateForm>, FormRejection>,
) -> Response {
    let parsed = unpack(form).and_then(|form| {
        Ok((
            name_field("name", form.name)?,
            hash_field(form.pw_hash)?,
            parse_match_id(&required("match_id", form.match_id)?)?,
        ))
    });
    let (name, hash, match_id) = match parsed {
        Ok(fields) => fields,
        Err(err) => return reject(err),
    };

    debug!(name = %name, match_id, "match_state");
    respond(
        run_engine(engine, move |engine| {
            engine.match_state(&name, &hash, match_id)
        })
        .await,
    )
}

#[instrument(skip_all)]
async fn apply_move<S: Store>(
    State(engine): State<AppState<S>>,
    form: Result<Form<ApplyMoveForm>, FormRejection>,
) -> Response {
    let parsed = unpack(form).and_then(|form| {
        Ok((
            name_field("name", form.name)?,
            hash_field(form.pw_hash)?,
            parse_position(&required("position", form.position)?)?,
            parse_match_id(&required("match_id", form.match_id)?)?,
        ))
    });
    let (name, hash, position, match_id) = match parsed {
        Ok(fields) => fields,
        Err(err) => return reject(err),
    };

    debug!(name = %name, position = position.to_index(), match_id, "apply_move");
    respond(
        run_engine(engine, move |engine| {
            engine
                .apply_move(&name, &hash, position, match_id)
                .map(|()| Ack)
        })
        .await,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_for(ErrorKind::Validation), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(ErrorKind::Authentication), StatusCode::UNAUTHORIZED);
        assert_eq!(status_for(ErrorKind::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_for(ErrorKind::Conflict), StatusCode::CONFLICT);
        assert_eq!(status_for(ErrorKind::Internal), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_hash_is_lowercased() {
        let hash = hash_field(Some("0BADC0DE".to_string())).expect("normalized");
        assert_eq!(hash.as_str(), "0badc0de");
    }

    #[test]
    fn test_missing_field_named() {
        let err = name_field("player_2_name", None).expect_err("missing");
        assert_eq!(err.to_string(), "invalid player_2_name: missing");
    }
}
