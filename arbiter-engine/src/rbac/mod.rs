//! Capability table: role grants checked at the top of privileged
//! operations.
//!
//! Grant and revoke are themselves privileged; the engine surface gates them
//! behind the admin capability.

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use tracing::{debug, instrument};

use arbiter_core::errors::{ArbiterError, ArbiterResult};
use arbiter_core::models::principal::{Principal, Role};

use arbiter_storage::queries::capability_ops;

/// Pure predicate: does `principal` hold `role`?
pub fn has_capability(conn: &Connection, role: Role, principal: &Principal) -> ArbiterResult<bool> {
    capability_ops::has_grant(conn, role.as_str(), principal.as_str())
}

/// Check a capability, failing `Unauthorized` when missing.
pub fn require(conn: &Connection, role: Role, principal: &Principal) -> ArbiterResult<()> {
    if has_capability(conn, role, principal)? {
        Ok(())
    } else {
        Err(ArbiterError::Unauthorized {
            principal: principal.to_string(),
            role: role.to_string(),
        })
    }
}

/// Grant `role` to `principal`.
#[instrument(skip(conn))]
pub fn grant(
    conn: &Connection,
    role: Role,
    principal: &Principal,
    granted_by: &Principal,
    at: DateTime<Utc>,
) -> ArbiterResult<()> {
    capability_ops::insert_grant(
        conn,
        role.as_str(),
        principal.as_str(),
        granted_by.as_str(),
        &at.to_rfc3339(),
    )?;
    debug!(role = %role, principal = %principal, "capability granted");
    Ok(())
}

/// Revoke `role` from `principal`.
#[instrument(skip(conn))]
pub fn revoke(conn: &Connection, role: Role, principal: &Principal) -> ArbiterResult<()> {
    capability_ops::delete_grant(conn, role.as_str(), principal.as_str())?;
    debug!(role = %role, principal = %principal, "capability revoked");
    Ok(())
}

/// Principals holding a role.
pub fn grants(conn: &Connection, role: Role) -> ArbiterResult<Vec<Principal>> {
    let rows = capability_ops::list_grants(conn, role.as_str())?;
    Ok(rows.into_iter().map(Principal::from).collect())
}
