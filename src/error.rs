use thiserror::Error;

/// Failures of the host window service. Never fatal to the engine.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("no monitor available for screen geometry")]
    NoMonitor,
    #[error("window system rejected request: {0}")]
    Window(#[from] winit::error::ExternalError),
}
