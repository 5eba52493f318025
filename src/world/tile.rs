//! 地图格子
//!
//! tile 是寻路图的节点：有位置、摩擦（移动代价）、障碍物和八邻接的邻居列表，
//! 并记录当前站在上面的角色。由 `ChunkGraph` 持有。

use serde::{Deserialize, Serialize};

use super::id::{ActorId, ChunkId, TileId};
use super::position::Position;

/// tile 上的障碍物。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Obstacle {
    #[default]
    None,
    /// 墙、石头等，任何角色都不能通过
    Solid,
    Door {
        locked: bool,
        open: bool,
    },
}

#[derive(Debug, Clone)]
pub struct Tile {
    id: TileId,
    position: Position,
    chunk: ChunkId,
    friction: u32,
    obstacle: Obstacle,
    neighbours: Vec<TileId>,
    occupants: Vec<ActorId>,
}

impl Tile {
    pub(crate) fn new(id: TileId, position: Position, chunk: ChunkId, friction: u32) -> Self {
        Self {
            id,
            position,
            chunk,
            friction,
            obstacle: Obstacle::None,
            neighbours: Vec::new(),
            occupants: Vec::new(),
        }
    }

    pub fn id(&self) -> TileId {
        self.id
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn chunk(&self) -> ChunkId {
        self.chunk
    }

    pub fn friction(&self) -> u32 {
        self.friction
    }

    pub fn obstacle(&self) -> Obstacle {
        self.obstacle
    }

    pub fn neighbours(&self) -> &[TileId] {
        &self.neighbours
    }

    pub fn occupants(&self) -> &[ActorId] {
        &self.occupants
    }

    pub fn has_occupants(&self) -> bool {
        !self.occupants.is_empty()
    }

    /// 从 `from` 走到本格的代价；斜向移动乘以 `diagonal_multiplier`。
    pub fn movement_weight(&self, from: &Tile, diagonal_multiplier: u32) -> u64 {
        let base = u64::from(self.friction);
        if self.position.is_diagonal_to(from.position) {
            base.saturating_mul(u64::from(diagonal_multiplier))
        } else {
            base
        }
    }

    pub fn manhattan_distance_to(&self, other: &Tile) -> u32 {
        self.position.manhattan_distance(other.position)
    }

    pub(crate) fn set_friction(&mut self, friction: u32) {
        self.friction = friction;
    }

    pub(crate) fn set_obstacle(&mut self, obstacle: Obstacle) {
        self.obstacle = obstacle;
    }

    pub(crate) fn link(&mut self, other: TileId) {
        if !self.neighbours.contains(&other) {
            self.neighbours.push(other);
        }
    }

    pub(crate) fn add_occupant(&mut self, actor: ActorId) {
        if !self.occupants.contains(&actor) {
            self.occupants.push(actor);
        }
    }

    pub(crate) fn remove_occupant(&mut self, actor: ActorId) {
        self.occupants.retain(|&a| a != actor);
    }
}
