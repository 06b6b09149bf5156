use std::sync::Arc;

use crate::services::EventService;
use crate::store::MemberDirectory;

/// Shared handler state. Both capabilities are injected so nothing in
/// the request path reaches for module-level globals.
#[derive(Clone)]
pub struct AppState {
    pub events: EventService,
    pub members: Arc<dyn MemberDirectory>,
}

impl AppState {
    pub fn new(events: EventService, members: Arc<dyn MemberDirectory>) -> Self {
        Self { events, members }
    }
}
