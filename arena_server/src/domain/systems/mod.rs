// Pure rules applied to the world by the single-writer arena.

pub mod combat;
pub mod movement;
pub mod spawn;
