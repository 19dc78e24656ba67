#![warn(clippy::all, clippy::pedantic)]

use bevy_ecs::prelude::*;

use crate::components::{Piece, PieceColor, Shape};

/// Source of uniform choices for piece selection.
pub trait RandomSource: Send + Sync {
    /// Returns an index in `0..len`. `len` is never zero.
    fn index(&mut self, len: usize) -> usize;
}

impl RandomSource for fastrand::Rng {
    fn index(&mut self, len: usize) -> usize {
        self.usize(0..len)
    }
}

#[derive(Resource)]
pub struct Randomizer(Box<dyn RandomSource>);

impl Randomizer {
    pub fn new(source: impl RandomSource + 'static) -> Self {
        Self(Box::new(source))
    }

    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::new(fastrand::Rng::with_seed(seed))
    }

    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(fastrand::Rng::new())
    }

    pub fn index(&mut self, len: usize) -> usize {
        self.0.index(len)
    }
}

/// The shapes and colors new pieces are drawn from.
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    shapes: Vec<Shape>,
    colors: Vec<PieceColor>,
}

impl Catalog {
    /// Returns `None` when either list is empty.
    #[must_use]
    pub fn new(shapes: Vec<Shape>, colors: Vec<PieceColor>) -> Option<Self> {
        if shapes.is_empty() || colors.is_empty() {
            return None;
        }
        Some(Self { shapes, colors })
    }

    #[must_use]
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    #[cfg(test)]
    #[must_use]
    pub fn colors(&self) -> &[PieceColor] {
        &self.colors
    }

    /// Picks a shape, then a color, each uniformly and independently.
    pub fn draw(&self, rng: &mut Randomizer) -> Piece {
        let shape = self.shapes[rng.index(self.shapes.len())].clone();
        let color = self.colors[rng.index(self.colors.len())];
        Piece::new(shape, color)
    }
}
