//! 2D rigid body engine with Verlet integration and iterative contact resolution.
//!
//! # Architecture
//!
//! One call to [`Engine::step`] runs this pipeline over the bodies in the [`World`]:
//!
//! 1. Update sleep state (when enabled)
//! 2. Apply forces (gravity)
//! 3. Integrate positions and angles (Verlet)
//! 4. Solve constraints (first pass)
//! 5. Broadphase (sweep and prune) and narrowphase (SAT) collision detection
//! 6. Update persistent pairs and wake bodies hit by moving ones
//! 7. Solve contact positions
//! 8. Solve constraints (second pass)
//! 9. Solve contact velocities (sequential impulses, warm started)
//! 10. Clear force accumulators
//!
//! Units: distances in pixels, time in milliseconds. Velocities are per step.

pub mod body;
pub mod broadphase;
pub mod collider;
pub mod constraint;
pub mod contact;
pub mod factory;
pub mod narrowphase;
pub mod pairs;
pub mod rigid_body;
pub mod sleeping;
pub mod solver;
pub mod world;

use tracing::trace;

use crate::geometry::Vector;

use self::broadphase::Detector;
use self::contact::PairId;
use self::pairs::Pairs;
use self::world::World;

/// Gravity as a direction and a scale applied to each body's mass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gravity {
    /// Default: (0, 1), i.e. down the screen.
    pub direction: Vector,
    /// Default: 0.001.
    pub scale: f64,
}

impl Default for Gravity {
    fn default() -> Self {
        Self {
            direction: Vector::new(0.0, 1.0),
            scale: 0.001,
        }
    }
}

/// Configuration for the engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Position solver iterations per step. Default: 6.
    pub position_iterations: u32,
    /// Velocity solver iterations per step. Default: 4.
    pub velocity_iterations: u32,
    /// Constraint iterations per pass. Default: 2.
    pub constraint_iterations: u32,
    /// Whether resting bodies are put to sleep. Default: false.
    pub enable_sleeping: bool,
    pub gravity: Gravity,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            position_iterations: 6,
            velocity_iterations: 4,
            constraint_iterations: 2,
            enable_sleeping: false,
            gravity: Gravity::default(),
        }
    }
}

/// Simulation clock, advanced by every step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timing {
    /// Simulated time in milliseconds.
    pub timestamp: f64,
    /// Multiplier on simulated time; 0 freezes the simulation. Default: 1.
    pub time_scale: f64,
    /// Scaled delta of the last step.
    pub last_delta: f64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            timestamp: 0.0,
            time_scale: 1.0,
            last_delta: 0.0,
        }
    }
}

/// Owns a world and steps it forward.
#[derive(Debug, Default)]
pub struct Engine {
    pub world: World,
    pub config: EngineConfig,
    pub timing: Timing,
    detector: Detector,
    pairs: Pairs,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn pairs(&self) -> &Pairs {
        &self.pairs
    }

    pub fn detector(&self) -> &Detector {
        &self.detector
    }

    /// Pairs that started touching during the last step.
    pub fn collision_start(&self) -> &[PairId] {
        self.pairs.collision_start()
    }

    /// Pairs that kept touching during the last step.
    pub fn collision_active(&self) -> &[PairId] {
        self.pairs.collision_active()
    }

    /// Pairs that stopped touching during the last step.
    pub fn collision_end(&self) -> &[PairId] {
        self.pairs.collision_end()
    }

    /// Step forward by `delta` milliseconds at the current [`Timing::time_scale`].
    pub fn update(&mut self, delta: f64, correction: f64) {
        self.step(delta, self.timing.time_scale, correction);
    }

    /// Step forward by `delta` milliseconds.
    ///
    /// `correction` is the ratio of this delta to the previous one, used to keep Verlet
    /// velocities consistent when the step length varies. Pass 1 for a fixed step.
    pub fn step(&mut self, delta: f64, time_scale: f64, correction: f64) {
        self.timing.time_scale = time_scale;
        self.timing.timestamp += delta * time_scale;
        self.timing.last_delta = delta * time_scale;
        let timestamp = self.timing.timestamp;

        if self.world.is_modified() {
            self.detector.set_bodies(self.world.bodies().len());
            self.pairs.refresh_slots(&self.world);
            self.world.set_modified(false);
        }

        if self.config.enable_sleeping {
            sleeping::update(self.world.bodies_mut(), time_scale);
        }

        rigid_body::apply_gravity(self.world.bodies_mut(), &self.config.gravity);
        rigid_body::update_bodies(self.world.bodies_mut(), delta, time_scale, correction);

        self.solve_constraints(time_scale);

        let collisions = self.detector.collisions(self.world.bodies());
        let candidates = collisions.len();
        self.pairs.update(collisions, &self.world, timestamp);

        if self.config.enable_sleeping {
            sleeping::after_collisions(self.pairs.list(), self.world.bodies_mut(), time_scale);
        }

        let bodies = self.world.bodies_mut();
        solver::pre_solve_position(self.pairs.list(), bodies);
        for _ in 0..self.config.position_iterations {
            solver::solve_position(self.pairs.list_mut(), bodies, time_scale);
        }
        solver::post_solve_position(bodies);

        self.solve_constraints(time_scale);

        let bodies = self.world.bodies_mut();
        solver::pre_solve_velocity(self.pairs.list(), bodies);
        for _ in 0..self.config.velocity_iterations {
            solver::solve_velocity(self.pairs.list_mut(), bodies, time_scale);
        }

        rigid_body::clear_forces(bodies);

        trace!(
            timestamp,
            bodies = self.world.bodies().len(),
            collisions = candidates,
            pairs = self.pairs.len(),
            "step"
        );
    }

    /// Remove every body, constraint and pair.
    pub fn clear(&mut self) {
        self.world.clear(false);
        self.pairs.clear();
        self.detector.clear();
    }

    fn solve_constraints(&mut self, time_scale: f64) {
        if self.world.constraints().is_empty() {
            return;
        }
        let (constraints, bodies) = self.world.constraints_and_bodies();
        constraint::pre_solve_all(bodies);
        for _ in 0..self.config.constraint_iterations {
            constraint::solve_all(constraints, bodies, time_scale);
        }
        constraint::post_solve_all(bodies);
    }
}
