/// Host-side state of the running surface
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    /// Enable debug overlay
    pub debug: bool,
    /// Clock frozen
    pub paused: bool,
    /// Frames per second measured over the last second
    pub fps: f64,
}
