// Application layer - Rendering, sessions and backend-driven services
pub mod backend;
pub mod chart_renderer;
pub mod chart_surface;
pub mod clock;
pub mod cross_domain;
pub mod figure_builders;
pub mod figure_enhancer;
pub mod insights_service;
pub mod persona_service;
pub mod realtime;
pub mod realtime_scheduler;
pub mod session;
