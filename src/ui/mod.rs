pub mod app;
pub mod components;
pub mod render;
pub mod state;

pub use app::ChatApp;
pub use render::RenderStrategy;
