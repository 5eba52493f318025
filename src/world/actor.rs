//! 角色
//!
//! 玩家、怪物和 NPC 共用的状态：类型、移动速度、目的地和行走锁。

use serde::{Deserialize, Serialize};

use super::id::ActorId;
use super::position::Position;
use crate::path::PathMode;
use crate::sim::TimedLock;

/// 角色类型。通行规则等按类型显式匹配。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorKind {
    Player,
    Monster,
    Npc,
}

/// 行走目标。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Destination {
    pub target: Position,
    pub mode: PathMode,
}

pub struct Actor {
    id: ActorId,
    kind: ActorKind,
    name: String,
    /// 移动速度，越大走得越快
    speed: u32,
    destination: Option<Destination>,
    walk_lock: TimedLock,
    steps: u64,
}

impl Actor {
    pub const DEFAULT_SPEED: u32 = 220;

    pub fn new(id: ActorId, kind: ActorKind, name: impl Into<String>, speed: u32) -> Self {
        Self {
            id,
            kind,
            name: name.into(),
            speed: speed.max(1),
            destination: None,
            walk_lock: TimedLock::new(),
            steps: 0,
        }
    }

    pub fn id(&self) -> ActorId {
        self.id
    }

    pub fn kind(&self) -> ActorKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn speed(&self) -> u32 {
        self.speed
    }

    pub fn destination(&self) -> Option<Destination> {
        self.destination
    }

    pub fn set_destination(&mut self, target: Position, mode: PathMode) {
        self.destination = Some(Destination { target, mode });
    }

    pub fn clear_destination(&mut self) {
        self.destination = None;
    }

    pub fn walk_lock(&self) -> &TimedLock {
        &self.walk_lock
    }

    /// 正在走一步（行走锁未到期）。
    pub fn is_walking(&self) -> bool {
        self.walk_lock.is_locked()
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub(crate) fn record_step(&mut self) {
        self.steps += 1;
    }

    /// 走过代价为 `weight` 的一步所需毫秒：`weight × 1000 / speed`，向上取整。
    pub fn step_duration_ms(&self, weight: u64) -> u64 {
        weight.saturating_mul(1_000).div_ceil(u64::from(self.speed))
    }
}
