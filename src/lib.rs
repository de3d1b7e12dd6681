pub mod codec;
pub mod config;
pub mod editor;
pub mod error;
pub mod logging;
pub mod menubar;
pub mod player;
pub mod renderer;
pub mod scene;
pub mod types;
pub mod viewport;
