//! Shared counters for the /api/health endpoint.
//! Updated by the request handlers and LeadWriter.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct HealthState {
    /// Successful /api/calculate-roi responses.
    pub calculations_served: AtomicU64,
    /// Accepted /api/submit-roi requests.
    pub submissions_received: AtomicU64,
    /// Leads the writer persisted.
    pub leads_stored: AtomicU64,
    /// Leads dropped because the writer channel was full or closed.
    pub leads_dropped: AtomicU64,
}

impl HealthState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc_calculations_served(&self) {
        self.calculations_served.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_submissions_received(&self) {
        self.submissions_received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_leads_stored(&self) {
        self.leads_stored.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_leads_dropped(&self) {
        self.leads_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn calculations_served(&self) -> u64 {
        self.calculations_served.load(Ordering::Relaxed)
    }

    pub fn submissions_received(&self) -> u64 {
        self.submissions_received.load(Ordering::Relaxed)
    }

    pub fn leads_stored(&self) -> u64 {
        self.leads_stored.load(Ordering::Relaxed)
    }

    pub fn leads_dropped(&self) -> u64 {
        self.leads_dropped.load(Ordering::Relaxed)
    }
}
