//! SQL access for sessions and their zone data.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use common::model::session::{SessionStatus, SignatureSession, SignatureZoneData};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};

use crate::error::ServiceError;

pub fn insert_session(conn: &Connection, session: &SignatureSession) -> Result<(), ServiceError> {
    let field_values =
        serde_json::to_string(&session.field_values).map_err(|e| ServiceError::Corrupt(e.to_string()))?;
    conn.execute(
        "INSERT INTO sessions (id, template_id, owner_name, property_address, commission_rate,
            status, signer_ip, signed_at, field_values, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            &session.id,
            &session.template_id,
            &session.owner_name,
            &session.property_address,
            session.commission_rate,
            session.status.as_str(),
            &session.signer_ip,
            session.signed_at.map(|at| at.to_rfc3339()),
            field_values,
            Utc::now().to_rfc3339(),
        ],
    )?;
    Ok(())
}

pub fn load_session(conn: &Connection, session_id: &str) -> Result<SignatureSession, ServiceError> {
    let row = conn
        .query_row(
            "SELECT id, template_id, owner_name, property_address, commission_rate, status,
                    signer_ip, signed_at, field_values
             FROM sessions WHERE id = ?1",
            params![session_id],
            |row| {
                Ok((
                    SignatureSession {
                        id: row.get(0)?,
                        template_id: row.get(1)?,
                        owner_name: row.get(2)?,
                        property_address: row.get(3)?,
                        commission_rate: row.get(4)?,
                        status: SessionStatus::Pending,
                        signer_ip: row.get(6)?,
                        signed_at: None,
                        field_values: BTreeMap::new(),
                    },
                    row.get::<_, String>(5)?,
                    row.get::<_, Option<String>>(7)?,
                    row.get::<_, String>(8)?,
                ))
            },
        )
        .optional()?;
    let (mut session, status, signed_at, field_values) =
        row.ok_or_else(|| ServiceError::NotFound(format!("session {}", session_id)))?;

    session.status = SessionStatus::parse(&status)
        .ok_or_else(|| ServiceError::Corrupt(format!("session {} has status {:?}", session_id, status)))?;
    session.signed_at = signed_at
        .map(|raw| DateTime::parse_from_rfc3339(&raw).map(|at| at.with_timezone(&Utc)))
        .transpose()
        .map_err(|e| ServiceError::Corrupt(format!("session {} signed_at: {}", session_id, e)))?;
    session.field_values = serde_json::from_str(&field_values)
        .map_err(|e| ServiceError::Corrupt(format!("session {} field_values: {}", session_id, e)))?;
    Ok(session)
}

/// Zone data of a session in insertion order.
pub fn load_zone_data(conn: &Connection, session_id: &str) -> Result<Vec<SignatureZoneData>, ServiceError> {
    let mut stmt = conn.prepare(
        "SELECT session_id, zone_id, value FROM zone_data WHERE session_id = ?1 ORDER BY rowid",
    )?;
    let rows = stmt.query_map(params![session_id], |row| {
        Ok(SignatureZoneData {
            session_id: row.get(0)?,
            zone_id: row.get(1)?,
            value: row.get(2)?,
        })
    })?;
    Ok(rows.collect::<Result<_, _>>()?)
}

/// Pending → viewed. Later states are left alone.
pub fn mark_viewed(conn: &Connection, session_id: &str) -> Result<bool, ServiceError> {
    let changed = conn.execute(
        "UPDATE sessions SET status = 'viewed' WHERE id = ?1 AND status = 'pending'",
        params![session_id],
    )?;
    Ok(changed == 1)
}

/// Appends one zone record. A record for the same zone is never overwritten.
pub fn insert_zone_data(
    conn: &Connection,
    record: &SignatureZoneData,
    field_values: &BTreeMap<String, String>,
) -> Result<(), ServiceError> {
    let inserted = conn.execute(
        "INSERT INTO zone_data (session_id, zone_id, value, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![&record.session_id, &record.zone_id, &record.value, Utc::now().to_rfc3339()],
    );
    match inserted {
        Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
            return Err(ServiceError::Conflict(format!(
                "zone {} already completed",
                record.zone_id
            )));
        }
        other => other?,
    };
    let field_values = serde_json::to_string(field_values).map_err(|e| ServiceError::Corrupt(e.to_string()))?;
    conn.execute(
        "UPDATE sessions SET field_values = ?1 WHERE id = ?2",
        params![field_values, &record.session_id],
    )?;
    Ok(())
}

/// Closes the session unless another request already did.
pub fn mark_signed(
    conn: &Connection,
    session_id: &str,
    signed_at: DateTime<Utc>,
    signer_ip: Option<&str>,
) -> Result<(), ServiceError> {
    let changed = conn.execute(
        "UPDATE sessions SET status = 'signed', signed_at = ?1, signer_ip = ?2
         WHERE id = ?3 AND status != 'signed'",
        params![signed_at.to_rfc3339(), signer_ip, session_id],
    )?;
    if changed == 0 {
        return Err(ServiceError::Conflict(format!("session {} is already signed", session_id)));
    }
    Ok(())
}
