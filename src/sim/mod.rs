//! Platform-free overlay simulation
//!
//! Everything that moves or changes state lives here:
//! - Cats drift in px/ms and bounce inside the interactive area
//! - The hold meter charges while the key is down and gates the unlock
//! - Particles and the celebration are spawned and expired by timers
//!
//! No DOM, no clocks: callers pass timestamps in and read events out.

pub mod attractor;
pub mod celebration;
pub mod entity;
pub mod hold;
pub mod particles;
pub mod pool;
pub mod runtime;
pub mod state;
pub mod tick;
pub mod timers;

pub use attractor::{attract, pull_fraction};
pub use celebration::Celebration;
pub use entity::{Bounce, Bounds, Cat};
pub use hold::{HoldMeter, LockState, OverlayMode, Release};
pub use particles::{Particle, ParticleKind, ParticlePose, ParticleSet, SparkleEmitter};
pub use pool::CatPool;
pub use runtime::Overlay;
pub use state::{OverlayEvent, OverlayState};
pub use tick::{FrameInput, frame, sanitize_dt};
pub use timers::{Task, TimerId, TimerQueue};
