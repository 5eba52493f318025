//! 各类角色的通行规则
//!
//! 寻路时由调用方传入的占用判定。

use crate::world::{ActorKind, Obstacle, Tile};

impl ActorKind {
    /// 对该类角色而言 tile 是否被占用（不可踏入）。
    ///
    /// 有角色站着的 tile、实心障碍和上锁的关门对所有人都不可通行；
    /// 未上锁的关门只有玩家和 NPC 能自己打开，怪物视为墙。
    pub fn is_tile_occupied(self, tile: &Tile) -> bool {
        if tile.has_occupants() {
            return true;
        }
        match (self, tile.obstacle()) {
            (_, Obstacle::None) => false,
            (_, Obstacle::Solid) => true,
            (_, Obstacle::Door { open: true, .. }) => false,
            (_, Obstacle::Door { locked: true, .. }) => true,
            (ActorKind::Player | ActorKind::Npc, Obstacle::Door { .. }) => false,
            (ActorKind::Monster, Obstacle::Door { .. }) => true,
        }
    }
}
