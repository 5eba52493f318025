//! 世界模块
//!
//! 空间分区（区块图）、tile、角色以及把它们组合起来的游戏世界上下文。

// 子模块声明
mod actor;
mod chunk;
mod chunk_graph;
mod error;
mod game_world;
mod id;
mod position;
mod tile;

// 重新导出公共接口
pub use actor::{Actor, ActorKind, Destination};
pub use chunk::{Chunk, ChunkCoord};
pub use chunk_graph::{ChunkGraph, ChunkTransition, WorldConfig};
pub use error::WorldError;
pub use game_world::GameWorld;
pub use id::{ActorId, ChunkId, TileId};
pub use position::Position;
pub use tile::{Obstacle, Tile};
