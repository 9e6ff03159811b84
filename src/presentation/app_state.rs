// Application state for HTTP handlers
use crate::application::backend::TasteShiftBackend;
use crate::application::session::SessionRegistry;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionRegistry,
    pub backend: Arc<dyn TasteShiftBackend>,
}
