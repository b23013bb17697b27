pub mod config;
pub mod error;
pub mod loader;
pub mod maps;
pub mod moves;
pub mod pathfinding;
pub mod result;
pub mod simulation;
pub mod strategy;
pub mod vec2;
pub mod world;

pub use config::*;
pub use error::Error;
pub use loader::*;
pub use maps::*;
pub use moves::*;
pub use pathfinding::*;
pub use result::*;
pub use simulation::*;
pub use strategy::*;
pub use vec2::*;
pub use world::*;
