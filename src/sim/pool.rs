//! Live cat collection

use super::entity::{Bounds, Cat};

/// Owns every live cat in spawn order
#[derive(Debug, Clone, Default)]
pub struct CatPool {
    cats: Vec<Cat>,
    /// Population after start-up
    pub target_population: usize,
    /// Top-up checks spawn until this many are alive
    pub floor: usize,
    /// Respawns are skipped at or above this population
    pub cap: usize,
}

impl CatPool {
    pub fn new(target_population: usize, floor: usize, cap: usize) -> Self {
        Self {
            cats: Vec::with_capacity(cap),
            target_population,
            floor,
            cap,
        }
    }

    pub fn len(&self) -> usize {
        self.cats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cats.is_empty()
    }

    /// Cats missing before the floor is met
    pub fn deficit(&self) -> usize {
        self.floor.saturating_sub(self.cats.len())
    }

    pub fn at_cap(&self) -> bool {
        self.cats.len() >= self.cap
    }

    pub fn insert(&mut self, cat: Cat) {
        self.cats.push(cat);
    }

    /// Remove by id; a cat that is already gone is a no-op
    pub fn remove(&mut self, id: u32) -> Option<Cat> {
        let idx = self.cats.iter().position(|c| c.id == id)?;
        Some(self.cats.remove(idx))
    }

    pub fn contains(&self, id: u32) -> bool {
        self.cats.iter().any(|c| c.id == id)
    }

    pub fn get(&self, id: u32) -> Option<&Cat> {
        self.cats.iter().find(|c| c.id == id)
    }

    pub fn get_mut(&mut self, id: u32) -> Option<&mut Cat> {
        self.cats.iter_mut().find(|c| c.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cat> {
        self.cats.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Cat> {
        self.cats.iter_mut()
    }

    /// Advance every cat; returns how many bounced
    pub fn step(&mut self, dt_ms: f32, area: &Bounds, margin: f32) -> usize {
        let mut bounced = 0;
        for cat in &mut self.cats {
            let bounce = cat.step(dt_ms, area, margin);
            if bounce.x || bounce.y {
                bounced += 1;
            }
        }
        bounced
    }

    /// Set every cat's render scale from its index
    pub fn apply_scale(&mut self, scale_for: impl Fn(usize) -> f32) {
        for (i, cat) in self.cats.iter_mut().enumerate() {
            cat.scale = scale_for(i);
        }
    }

    /// Remove everything, returning the removed ids
    pub fn drain_ids(&mut self) -> Vec<u32> {
        self.cats.drain(..).map(|c| c.id).collect()
    }
}
