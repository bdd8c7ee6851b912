use sqlx::{Executor, MySql};

/// DDL for the `votes` table. Safe to run on every start.
pub const CREATE_VOTES_TABLE: &str = "CREATE TABLE IF NOT EXISTS votes ( \
     vote_id SERIAL NOT NULL, time_cast timestamp NOT NULL, candidate CHAR(6) NOT NULL, \
     PRIMARY KEY (vote_id) );";

/// Create the `votes` table if it does not already exist.
pub async fn ensure_votes_table<'e, E>(executor: E) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = MySql>,
{
    sqlx::query(CREATE_VOTES_TABLE).execute(executor).await?;

    tracing::info!("Verified votes table schema");
    Ok(())
}
