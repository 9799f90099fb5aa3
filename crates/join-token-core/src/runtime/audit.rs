// crates/join-token-core/src/runtime/audit.rs
// ============================================================================
// Module: Token Audit Sinks
// Description: Concrete sinks for token validation audit events.
// Purpose: Emit JSON-line audit records to stderr, files, or memory.
// Dependencies: crate::interfaces, serde_json
// ============================================================================

//! ## Overview
//! Sinks are intentionally lightweight so deployments can route events to
//! their preferred logging pipeline. Write failures are swallowed: auditing
//! never changes a validation outcome.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use crate::interfaces::TokenAuditEvent;
use crate::interfaces::TokenAuditSink;

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl TokenAuditSink for StderrAuditSink {
    fn record(&self, event: &TokenAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self { file: Mutex::new(file) })
    }
}

impl TokenAuditSink for FileAuditSink {
    fn record(&self, event: &TokenAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// Audit sink that keeps events in memory.
#[derive(Default)]
pub struct MemoryAuditSink {
    /// Recorded events in arrival order.
    events: Mutex<Vec<TokenAuditEvent>>,
}

impl MemoryAuditSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<TokenAuditEvent> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }
}

impl TokenAuditSink for MemoryAuditSink {
    fn record(&self, event: &TokenAuditEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl TokenAuditSink for NoopAuditSink {
    fn record(&self, _event: &TokenAuditEvent) {}
}
