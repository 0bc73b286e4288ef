use crate::types::{Contact, RoiInput, RoiResult};

/// One accepted submission, handed from the request path to the writer task.
#[derive(Debug, Clone)]
pub struct LeadRecord {
    pub contact: Contact,
    pub input: RoiInput,
    pub result: RoiResult,
    /// Nanosecond UTC epoch timestamp.
    pub received_at_ns: u64,
}

/// Row shape of the `leads` table. Input and result are stored as their JSON wire form.
#[derive(Debug, sqlx::FromRow)]
pub struct LeadRow {
    pub id: i64,
    pub full_name: String,
    pub company: String,
    pub phone: Option<String>,
    pub email: String,
    pub input_json: String,
    pub result_json: String,
    pub received_at: i64,
}
