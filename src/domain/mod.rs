// Domain layer - Chart figures, payloads and the scene view model
pub mod analysis;
pub mod chart_instance;
pub mod figure;
pub mod payload;
pub mod scene;
