//! Vote routes.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use cloudvote_common::error::AppError;
use cloudvote_common::types::{Candidate, Tally, Vote};
use cloudvote_common::votes::VoteService;

use crate::state::AppState;

/// Number of recent votes returned by `GET /votes`.
const RECENT_VOTES: u32 = 5;

pub fn router() -> Router<AppState> {
    Router::new().route("/votes", get(list_votes).post(cast_vote))
}

#[derive(Debug, Serialize)]
pub struct VoteSummary {
    pub tally: Tally,
    pub leader: Option<Candidate>,
    pub recent: Vec<Vote>,
}

#[derive(Debug, Deserialize)]
pub struct CastVoteParams {
    pub candidate: String,
}

/// GET /votes — Current tally and the most recent votes.
async fn list_votes(State(state): State<AppState>) -> Result<Json<VoteSummary>, AppError> {
    let tally = VoteService::tally(&state.pool).await?;
    let recent = VoteService::recent(&state.pool, RECENT_VOTES).await?;

    Ok(Json(VoteSummary {
        leader: tally.leader(),
        tally,
        recent,
    }))
}

/// POST /votes — Cast a vote for TABS or SPACES.
async fn cast_vote(
    State(state): State<AppState>,
    Json(params): Json<CastVoteParams>,
) -> Result<Json<Vote>, AppError> {
    let candidate: Candidate = params.candidate.parse()?;
    let vote = VoteService::cast(&state.pool, candidate).await?;
    Ok(Json(vote))
}
