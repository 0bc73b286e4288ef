use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error};

use crate::api::health::HealthState;
use crate::db::models::LeadRecord;
use crate::error::Result;

/// Receives LeadRecords from the submit handler and persists them to SQLite.
/// Runs as a dedicated background task so the request path never waits on disk.
pub struct LeadWriter {
    pool: sqlx::SqlitePool,
    lead_rx: mpsc::Receiver<LeadRecord>,
    health: Arc<HealthState>,
}

impl LeadWriter {
    pub fn new(
        pool: sqlx::SqlitePool,
        lead_rx: mpsc::Receiver<LeadRecord>,
        health: Arc<HealthState>,
    ) -> Self {
        Self { pool, lead_rx, health }
    }

    pub async fn run(mut self) {
        while let Some(lead) = self.lead_rx.recv().await {
            match write_lead(&self.pool, &lead).await {
                Ok(id) => {
                    self.health.inc_leads_stored();
                    debug!(lead_id = id, company = %lead.contact.company, "lead stored");
                }
                Err(e) => error!("DB write error: {e}"),
            }
        }
    }
}

/// Insert one lead, returning its row id.
pub async fn write_lead(pool: &sqlx::SqlitePool, lead: &LeadRecord) -> Result<i64> {
    let input_json = serde_json::to_string(&lead.input)?;
    let result_json = serde_json::to_string(&lead.result)?;
    let received_at = lead.received_at_ns as i64;

    let done = sqlx::query(
        r#"
        INSERT INTO leads (
            full_name, company, phone, email,
            input_json, result_json, received_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&lead.contact.full_name)
    .bind(&lead.contact.company)
    .bind(&lead.contact.phone)
    .bind(&lead.contact.email)
    .bind(input_json)
    .bind(result_json)
    .bind(received_at)
    .execute(pool)
    .await?;

    Ok(done.last_insert_rowid())
}
