//! Simulation core
//!
//! All gameplay logic lives here, free of rendering and platform concerns:
//! - Time arrives as [`FrameTime`], input as [`TickInput`]
//! - Randomness only through [`PercentRoll`]
//! - Pools keep stable slot order, so iteration is deterministic

pub mod collision;
pub mod particles;
pub mod physics;
pub mod pool;
pub mod powerup;
pub mod rect;
pub mod rng;
pub mod screen;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use collision::{
    CollisionEvent, Contact, EarliestContacts, SweptHit, Wall, earliest_contacts,
    swept_rect_vs_rect,
};
pub use particles::Particle;
pub use pool::{Pool, Slot};
pub use powerup::{PowerUp, PowerUpKind};
pub use rect::Rect;
pub use rng::{PercentRoll, ScriptedRoll, SeededRoll};
pub use screen::{ScreenChange, run_frame};
pub use snapshot::{BrickView, PowerUpView, RenderSnapshot};
pub use state::{Ball, Brick, BrickGrid, GameEvent, GameState, Paddle, Screen};
pub use tick::{FrameTime, TickInput, tick};
