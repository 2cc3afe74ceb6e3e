//! StakeVault — hold and release escrowed value for feedback entries.

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use tracing::{debug, instrument};

use arbiter_core::constants::VAULT_PRINCIPAL;
use arbiter_core::errors::{ArbiterResult, VaultError};
use arbiter_core::models::feedback::FeedbackId;
use arbiter_core::models::principal::Principal;
use arbiter_core::traits::IValueTransfer;

use arbiter_storage::queries::escrow_ops;

/// Moves stakes into and out of vault custody.
pub struct StakeVault;

impl StakeVault {
    /// Take custody of `amount` from `reviewer` for a feedback entry.
    ///
    /// Records the escrow row, then moves the funds from the reviewer to the
    /// vault principal. A failed transfer propagates; the caller's
    /// transaction rolls the escrow row back with it.
    #[instrument(skip(conn, book))]
    pub fn hold(
        conn: &Connection,
        book: &dyn IValueTransfer,
        feedback_id: FeedbackId,
        reviewer: &Principal,
        amount: u64,
        at: DateTime<Utc>,
    ) -> ArbiterResult<()> {
        escrow_ops::insert_escrow(
            conn,
            feedback_id.0,
            reviewer.as_str(),
            amount,
            &at.to_rfc3339(),
        )?;
        book.transfer(reviewer, &Principal::from(VAULT_PRINCIPAL), amount)?;
        debug!(id = %feedback_id, amount, "stake held");
        Ok(())
    }

    /// Move the full escrowed amount to exactly one recipient.
    ///
    /// The escrow is marked released before the transfer runs; a failed
    /// transfer propagates without touching any other state, and the caller's
    /// transaction rolls the release mark back with it.
    #[instrument(skip(conn, book))]
    pub fn release(
        conn: &Connection,
        book: &dyn IValueTransfer,
        feedback_id: FeedbackId,
        recipient: &Principal,
        at: DateTime<Utc>,
    ) -> ArbiterResult<u64> {
        let escrow = escrow_ops::get_escrow(conn, feedback_id.0)?
            .ok_or(VaultError::MissingEscrow(feedback_id.0))?;
        if escrow.released_at.is_some() {
            return Err(VaultError::AlreadyReleased(feedback_id.0).into());
        }

        escrow_ops::mark_released(conn, feedback_id.0, recipient.as_str(), &at.to_rfc3339())?;
        book.transfer(&Principal::from(VAULT_PRINCIPAL), recipient, escrow.amount)?;

        debug!(id = %feedback_id, amount = escrow.amount, recipient = %recipient, "stake released");
        Ok(escrow.amount)
    }
}
