//! Fire-and-forget notification events
//!
//! Real email delivery is out of scope; events surface as structured
//! log lines only. Emission cannot fail and never blocks the request.

use tracing::info;

/// One-way notification emitter
#[derive(Debug, Clone, Default)]
pub struct Notifier;

impl Notifier {
    pub fn new() -> Self {
        Self
    }

    pub fn employee_added(&self, name: &str, email: &str) {
        info!("[mock email] New employee added: {} ({})", name, email);
    }

    pub fn employee_updated(&self, name: &str, email: &str) {
        info!("[mock email] Employee updated: {} ({})", name, email);
    }
}
