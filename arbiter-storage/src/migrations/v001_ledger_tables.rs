//! v001: Ledger tables — feedback, per-type counters, cached scores, escrow.

use rusqlite::Connection;

use arbiter_core::errors::ArbiterResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> ArbiterResult<()> {
    conn.execute_batch(
        "
        -- Append-only feedback ledger. Removal is a soft mark: rating is
        -- zeroed and `removed` set, the row is never deleted.
        CREATE TABLE IF NOT EXISTS feedback (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            reviewer      TEXT NOT NULL,
            agent_id      TEXT NOT NULL,
            feedback_type TEXT NOT NULL,
            rating        INTEGER NOT NULL,
            context_hash  TEXT NOT NULL DEFAULT '',
            metadata      TEXT NOT NULL DEFAULT '',
            posted_at     TEXT NOT NULL,
            stake         INTEGER NOT NULL DEFAULT 0,
            disputed      INTEGER NOT NULL DEFAULT 0,
            removed       INTEGER NOT NULL DEFAULT 0
        );

        CREATE INDEX IF NOT EXISTS idx_feedback_agent ON feedback(agent_id, id);
        CREATE INDEX IF NOT EXISTS idx_feedback_reviewer ON feedback(reviewer, id);
        CREATE INDEX IF NOT EXISTS idx_feedback_disputed ON feedback(disputed);

        -- Per-agent per-type running totals.
        CREATE TABLE IF NOT EXISTS feedback_counts (
            agent_id      TEXT NOT NULL,
            feedback_type TEXT NOT NULL,
            count         INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (agent_id, feedback_type)
        );

        -- Cached per-agent reputation scores.
        CREATE TABLE IF NOT EXISTS agent_scores (
            agent_id       TEXT PRIMARY KEY,
            score          INTEGER NOT NULL DEFAULT 5000,
            feedback_count INTEGER NOT NULL DEFAULT 0,
            updated_at     TEXT NOT NULL
        );

        -- Escrowed stakes, one row per staked feedback entry.
        CREATE TABLE IF NOT EXISTS stake_escrow (
            feedback_id INTEGER PRIMARY KEY,
            reviewer    TEXT NOT NULL,
            amount      INTEGER NOT NULL,
            held_at     TEXT NOT NULL,
            released_at TEXT,
            recipient   TEXT,
            FOREIGN KEY (feedback_id) REFERENCES feedback(id)
        );
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
