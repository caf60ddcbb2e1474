//! Container for the bodies and constraints of one simulation.

use std::collections::HashMap;

use tracing::debug;

use crate::common::{BodyId, ConstraintId};
use crate::error::{Error, Result};

use super::body::Body;
use super::constraint::{Constraint, ConstraintOptions};

/// Bodies and constraints stored in insertion order, with an id→slot index.
///
/// Every structural change raises the modified flag; the engine clears it once the broadphase
/// and pair table have caught up.
#[derive(Debug, Default)]
pub struct World {
    bodies: Vec<Body>,
    constraints: Vec<Constraint>,
    index: HashMap<BodyId, usize>,
    is_modified: bool,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_body(&mut self, body: Body) -> BodyId {
        let id = body.id();
        self.index.insert(id, self.bodies.len());
        self.bodies.push(body);
        self.is_modified = true;
        debug!(body = %id, count = self.bodies.len(), "body added");
        id
    }

    /// Remove a body along with every constraint attached to it.
    pub fn remove_body(&mut self, id: BodyId) -> Result<Body> {
        let slot = self.slot(id).ok_or(Error::UnknownBody(id))?;
        let body = self.bodies.remove(slot);

        let before = self.constraints.len();
        self.constraints
            .retain(|c| c.body_a != Some(id) && c.body_b != Some(id));
        let detached = before - self.constraints.len();

        self.reindex();
        self.is_modified = true;
        debug!(body = %id, detached, count = self.bodies.len(), "body removed");
        Ok(body)
    }

    /// Add a constraint whose bodies are already in the world.
    pub fn add_constraint(&mut self, mut constraint: Constraint) -> Result<ConstraintId> {
        constraint.slot_a = self.resolve(constraint.body_a)?;
        constraint.slot_b = self.resolve(constraint.body_b)?;
        let id = constraint.id;
        self.constraints.push(constraint);
        self.is_modified = true;
        debug!(constraint = %id, count = self.constraints.len(), "constraint added");
        Ok(id)
    }

    /// Build and add a constraint between world bodies; `None` anchors that end in world space.
    pub fn constrain(
        &mut self,
        body_a: Option<BodyId>,
        body_b: Option<BodyId>,
        options: ConstraintOptions,
    ) -> Result<ConstraintId> {
        let lookup = |id: Option<BodyId>| match id {
            Some(id) => self.body(id).map(Some).ok_or(Error::UnknownBody(id)),
            None => Ok(None),
        };
        let constraint = Constraint::new(lookup(body_a)?, lookup(body_b)?, options)?;
        self.add_constraint(constraint)
    }

    pub fn remove_constraint(&mut self, id: ConstraintId) -> Result<Constraint> {
        let slot = self
            .constraints
            .iter()
            .position(|c| c.id == id)
            .ok_or(Error::UnknownConstraint(id))?;
        let constraint = self.constraints.remove(slot);
        self.is_modified = true;
        debug!(constraint = %id, count = self.constraints.len(), "constraint removed");
        Ok(constraint)
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.slot(id).map(|slot| &self.bodies[slot])
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.slot(id).map(|slot| &mut self.bodies[slot])
    }

    pub fn constraint(&self, id: ConstraintId) -> Option<&Constraint> {
        self.constraints.iter().find(|c| c.id == id)
    }

    pub fn constraint_mut(&mut self, id: ConstraintId) -> Option<&mut Constraint> {
        self.constraints.iter_mut().find(|c| c.id == id)
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub(crate) fn bodies_mut(&mut self) -> &mut [Body] {
        &mut self.bodies
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Borrow constraints and bodies mutably at the same time.
    pub(crate) fn constraints_and_bodies(&mut self) -> (&mut [Constraint], &mut [Body]) {
        (&mut self.constraints, &mut self.bodies)
    }

    /// Storage slot of a root body.
    pub fn slot(&self, id: BodyId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    pub fn is_modified(&self) -> bool {
        self.is_modified
    }

    pub fn set_modified(&mut self, is_modified: bool) {
        self.is_modified = is_modified;
    }

    /// Remove everything, keeping static bodies when `keep_static` is set.
    pub fn clear(&mut self, keep_static: bool) {
        if keep_static {
            self.bodies.retain(Body::is_static);
        } else {
            self.bodies.clear();
        }
        self.constraints.clear();
        self.reindex();
        self.is_modified = true;
        debug!(keep_static, count = self.bodies.len(), "world cleared");
    }

    fn resolve(&self, id: Option<BodyId>) -> Result<Option<usize>> {
        match id {
            Some(id) => self.slot(id).map(Some).ok_or(Error::UnknownBody(id)),
            None => Ok(None),
        }
    }

    fn reindex(&mut self) {
        self.index.clear();
        for (slot, body) in self.bodies.iter().enumerate() {
            self.index.insert(body.id(), slot);
        }
        let index = &self.index;
        for constraint in &mut self.constraints {
            constraint.slot_a = constraint.body_a.and_then(|id| index.get(&id).copied());
            constraint.slot_b = constraint.body_b.and_then(|id| index.get(&id).copied());
        }
    }
}
