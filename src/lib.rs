//! boing: tile-based platformer movement (kinematic bodies, axis-separated
//! resolution, one-way platforms, coyote time and jump buffering)

pub mod types;
pub mod error;
pub mod config;
pub mod api;
pub mod tilemap;
pub mod broadphase;
pub mod body;
pub mod mover;
pub mod resolver;
pub mod jump;
pub mod dash;
pub mod character;
pub mod world;

pub use crate::types::*;
pub use crate::api::*;
pub use crate::error::ConfigError;
pub use crate::config::{DashConfig, JumpConfig, MovementConfig, WallJumpConfig, WorldConfig};
pub use crate::tilemap::{Tilemap, TilemapDesc, TileProperties, TILE_EMPTY, TILE_ONE_WAY, TILE_SOLID};
pub use crate::body::KinematicBody;
pub use crate::character::Character;
pub use crate::jump::{JumpController, JumpState};
pub use crate::dash::DashState;
pub use crate::world::PlatformerWorld;
