pub mod draw;
pub mod input;
pub mod physics;
pub mod renderer;
pub mod timing;

pub use draw::{DrawCall, DrawList, RenderTarget};
pub use input::{InputCommand, InputSystem, KeyboardState};
pub use physics::PhysicsSystem;
pub use renderer::Renderer;
pub use timing::{FrameTick, GameTime, TimeSystem};
