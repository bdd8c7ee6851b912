//! Vote persistence against the `votes` table.

use chrono::Utc;
use sqlx::MySqlPool;

use crate::error::AppError;
use crate::types::{Candidate, Tally, Vote};

/// Stateless repository for votes.
pub struct VoteService;

impl VoteService {
    /// Record a vote for `candidate`, timestamped now.
    pub async fn cast(pool: &MySqlPool, candidate: Candidate) -> Result<Vote, AppError> {
        let time_cast = Utc::now();

        let result = sqlx::query("INSERT INTO votes (time_cast, candidate) VALUES (?, ?)")
            .bind(time_cast)
            .bind(candidate.as_str())
            .execute(pool)
            .await?;

        tracing::info!(candidate = %candidate, vote_id = result.last_insert_id(), "Vote cast");

        Ok(Vote {
            vote_id: result.last_insert_id(),
            time_cast,
            candidate: candidate.as_str().to_string(),
        })
    }

    /// Most recent votes, newest first.
    pub async fn recent(pool: &MySqlPool, limit: u32) -> Result<Vec<Vote>, AppError> {
        let votes = sqlx::query_as::<_, Vote>(
            "SELECT vote_id, time_cast, candidate FROM votes ORDER BY time_cast DESC, vote_id DESC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(votes)
    }

    /// Count votes per candidate.
    pub async fn tally(pool: &MySqlPool) -> Result<Tally, AppError> {
        let rows: Vec<(String, i64)> =
            sqlx::query_as("SELECT candidate, COUNT(*) FROM votes GROUP BY candidate")
                .fetch_all(pool)
                .await?;

        let mut tally = Tally::default();
        for (candidate, count) in rows {
            match candidate.parse::<Candidate>() {
                Ok(Candidate::Tabs) => tally.tabs = count,
                Ok(Candidate::Spaces) => tally.spaces = count,
                Err(_) => tracing::warn!(candidate = %candidate, "Ignoring unknown candidate in votes"),
            }
        }
        Ok(tally)
    }
}
