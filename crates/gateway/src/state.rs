use std::sync::Arc;

use {
    crosslist_channels::AuditLog,
    crosslist_sync::{PublishDispatcher, SyncReconciler},
};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<PublishDispatcher>,
    pub reconciler: Arc<SyncReconciler>,
    pub audit: Arc<dyn AuditLog>,
    /// Shared secret for webhook signatures. `None` disables verification
    /// (local development).
    pub webhook_secret: Option<String>,
}
