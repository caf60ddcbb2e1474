//! Contraption 2D Physics
//!
//! A 2D rigid body physics kernel: convex polygons and composites, persistent contacts,
//! distance constraints and sleeping.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! 1. **common** - Identifier allocation (bodies, constraints, collision groups)
//! 2. **geometry** - Vector helpers, vertex loops, edge axes
//! 3. **physics** - Bodies, collision detection, contact resolution, constraints, sleeping
//! 4. **runner** - Frame-time sampling for a host loop
//!
//! # Example
//!
//! ```
//! use contraption::{Bodies, BodyOptions, Engine};
//!
//! let mut engine = Engine::default();
//! let ground = Bodies::rectangle(
//!     400.0,
//!     600.0,
//!     800.0,
//!     60.0,
//!     BodyOptions { is_static: true, ..Default::default() },
//! )?;
//! engine.world.add_body(ground);
//! let ball = engine
//!     .world
//!     .add_body(Bodies::circle(400.0, 100.0, 20.0, BodyOptions::default(), None)?);
//!
//! for _ in 0..60 {
//!     engine.update(1000.0 / 60.0, 1.0);
//! }
//! assert!(engine.world.body(ball).unwrap().position().y > 100.0);
//! # Ok::<(), contraption::Error>(())
//! ```

pub mod common;
pub mod error;
pub mod geometry;
pub mod physics;
pub mod runner;

// Re-export commonly used types
pub use common::{reset_ids, BodyId, ConstraintId};
pub use error::{Error, Result};
pub use geometry::{Vector, Vertex};

pub use physics::body::{Body, BodyOptions};
pub use physics::collider::{Bounds, CollisionFilter};
pub use physics::constraint::{Constraint, ConstraintOptions};
pub use physics::contact::{Contact, ContactId, Pair, PairId};
pub use physics::factory::Bodies;
pub use physics::narrowphase::Collision;
pub use physics::world::World;
pub use physics::{Engine, EngineConfig, Gravity, Timing};

pub use runner::{Runner, RunnerConfig};

// Re-export glam for convenience
pub use glam;
