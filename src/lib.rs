//! Endless-runner game engine: jump over ground obstacles, duck under flying
//! monsters, shoot them once armed, and burn turbo when it is ready.
//!
//! [`engine::Engine`] owns the whole simulation.  A host supplies a
//! [`surface::Surface`] to draw on, calls [`engine::Engine::frame`] once per
//! animation frame and forwards input events between frames.

pub mod autopilot;
pub mod compute;
pub mod config;
pub mod engine;
pub mod entities;
pub mod error;
pub mod render;
pub mod sprites;
pub mod surface;

pub use config::GameConfig;
pub use engine::Engine;
pub use error::{ConfigError, EngineError};
