//! Audit trail writer.

use sea_orm::{ActiveModelTrait, ConnectionTrait, DbErr, Set};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::entities::{audit_log, sea_orm_active_enums::AuditAction};

/// Audit repository.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuditRepository;

impl AuditRepository {
    /// Creates a new audit repository.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Records one audited action inside the caller's transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn record<C: ConnectionTrait>(
        &self,
        conn: &C,
        entity_type: &str,
        entity_id: Uuid,
        action: AuditAction,
        changes: Option<JsonValue>,
    ) -> Result<(), DbErr> {
        audit_log::ActiveModel {
            id: Set(Uuid::now_v7()),
            entity_type: Set(entity_type.to_string()),
            entity_id: Set(entity_id),
            action: Set(action),
            changes: Set(changes),
            created_at: Set(chrono::Utc::now().into()),
        }
        .insert(conn)
        .await?;

        tracing::debug!(entity_type, %entity_id, ?action, "Audit recorded");
        Ok(())
    }
}
