pub mod camera;
pub mod fade;
pub mod leaf;
pub mod road;
pub mod spawner;
pub mod star;

use crate::gfx::render::RenderSink;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Star,
    Leaf,
    RoadSegment,
    PriceTag,
    TaxText,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId {
    pub kind: EntityKind,
    pub index: u32,
}

impl EntityId {
    pub fn new(kind: EntityKind, index: u32) -> Self {
        Self { kind, index }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            EntityKind::Star => write!(f, "star_{:03}", self.index),
            EntityKind::Leaf => write!(f, "leaf_{:04}", self.index),
            EntityKind::RoadSegment => write!(f, "road_{:03}", self.index),
            EntityKind::PriceTag => write!(f, "price_tag"),
            EntityKind::TaxText => write!(f, "tax_text"),
        }
    }
}

/// Outcome of one tick of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Running,
    /// The entity reached its terminal phase on its own during this tick.
    /// Reported exactly once per entity.
    Completed,
    /// Already terminal; nothing happened.
    Idle,
}

pub trait Entity {
    fn id(&self) -> EntityId;

    fn update(&mut self, dt: f32, sink: &mut dyn RenderSink) -> Step;

    /// Aborts the entity wherever it is. Never reported as a completion.
    fn terminate(&mut self, sink: &mut dyn RenderSink);

    fn is_terminal(&self) -> bool;
}
