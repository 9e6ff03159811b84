// Surface trait - the page and charting library a renderer draws into
use crate::domain::figure::{Figure, PlotConfig, Trace};
use crate::domain::payload::PayloadError;
use crate::domain::scene::{Overlay, Popup};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ChartError {
    #[error("container '{0}' not found")]
    MissingContainer(String),
    #[error("chart library not loaded")]
    LibraryUnavailable,
    #[error("invalid chart payload: {0}")]
    InvalidPayload(#[from] PayloadError),
    #[error("chart library rejected figure: {0}")]
    Library(String),
    #[error("real-time update failed for '{container_id}': {reason}")]
    Update {
        container_id: String,
        reason: String,
    },
}

pub type ChartResult<T> = Result<T, ChartError>;

/// Mount points plus the declarative charting library behind them.
///
/// Implementations own all visible state; the renderer only issues commands.
pub trait ChartSurface: Send + Sync {
    fn has_container(&self, container_id: &str) -> bool;

    fn library_available(&self) -> bool;

    /// Remove whatever the container currently shows, including overlays and popups.
    fn clear(&mut self, container_id: &str);

    /// Draw a new figure, replacing any previous plot in the container.
    fn new_plot(&mut self, container_id: &str, figure: &Figure, config: &PlotConfig) -> ChartResult<()>;

    /// Transition the traces of an existing plot to new values.
    fn animate(&mut self, container_id: &str, data: &[Trace], transition_ms: u64) -> ChartResult<()>;

    /// Free library resources held for the container.
    fn purge(&mut self, container_id: &str);

    fn show_loading(&mut self, container_id: &str, message: &str);

    fn show_placeholder(&mut self, container_id: &str, message: &str);

    fn set_overlay(&mut self, container_id: &str, overlay: Option<Overlay>);

    fn show_popup(&mut self, container_id: &str, popup: Popup);

    fn show_indicator(&mut self, container_id: &str, text: &str, expires_at_ms: i64);

    fn highlight(&mut self, container_id: &str, point_number: usize);

    fn set_text(&mut self, element_id: &str, text: &str);

    /// Drop popups and indicators whose lifetime has passed.
    fn expire_transients(&mut self, now_ms: i64);
}
