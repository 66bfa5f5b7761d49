//! [`RopeWorld`] owns every live rope and drives them with fixed ticks.
//!
//! Ropes that tear produce new ropes. Those are registered here as well, so a
//! single rope handed to the world can turn into many over time.

use crate::physics::RopeScene;
use crate::rendering::{GeometrySink, RopeGeometry};
use crate::rope::VerletRope;
use log::debug;
use slotmap::{SlotMap, new_key_type};

new_key_type! {
    pub struct RopeId;
}

#[derive(Debug, Default)]
pub struct RopeWorld {
    ropes: SlotMap<RopeId, VerletRope>,
}

impl RopeWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, rope: VerletRope) -> RopeId {
        self.ropes.insert(rope)
    }

    pub fn remove(&mut self, id: RopeId) -> Option<VerletRope> {
        self.ropes.remove(id)
    }

    pub fn get(&self, id: RopeId) -> Option<&VerletRope> {
        self.ropes.get(id)
    }

    pub fn get_mut(&mut self, id: RopeId) -> Option<&mut VerletRope> {
        self.ropes.get_mut(id)
    }

    pub fn len(&self) -> usize {
        self.ropes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ropes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (RopeId, &VerletRope)> {
        self.ropes.iter()
    }

    /// Steps every rope once. Returns the ids of ropes that were torn off this tick.
    ///
    /// Torn off ropes are only stepped from the next tick on.
    pub fn fixed_update<S: RopeScene + ?Sized>(&mut self, dt: f32, scene: &mut S) -> Vec<RopeId> {
        let torn: Vec<VerletRope> = self
            .ropes
            .values_mut()
            .filter_map(|rope| rope.step(&mut *scene, dt))
            .collect();

        let spawned: Vec<RopeId> = torn.into_iter().map(|rope| self.ropes.insert(rope)).collect();
        if !spawned.is_empty() {
            debug!("[Ropes] {} rope(s) torn off, {} alive", spawned.len(), self.len());
        }
        spawned
    }

    pub fn render(&self, id: RopeId) -> Option<RopeGeometry> {
        self.ropes.get(id).map(VerletRope::render)
    }

    /// Pushes the geometry of every rope to `sink`.
    pub fn render_all<G: GeometrySink + ?Sized>(&self, sink: &mut G) {
        for rope in self.ropes.values() {
            rope.render_into(sink);
        }
    }
}
