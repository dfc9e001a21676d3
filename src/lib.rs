//! Snowrunner: a small 2D platformer.
//!
//! The library holds the whole game core (sprites, animation, collision, the
//! object manager and session state) and knows nothing about windows; the
//! `snowrunner` binary hosts it in a winit window with a wgpu renderer.

pub mod animation;
pub mod catalog;
pub mod collision;
pub mod components;
pub mod config;
pub mod controller;
pub mod entity;
pub mod error;
pub mod level;
pub mod math;
pub mod session;
pub mod systems;
pub mod world;

pub use error::GameError;
