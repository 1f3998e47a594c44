pub mod archetype;
pub mod color;
pub mod particle;
