//! 游戏世界
//!
//! 显式的仿真上下文：区块图、角色表、寻路器和在线玩家集合。实现 [`World`]，
//! 每帧的 think 阶段只推进活跃区块内的角色。

use std::any::Any;
use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, trace, warn};

use super::actor::{Actor, ActorKind};
use super::chunk_graph::{ChunkGraph, ChunkTransition};
use super::error::WorldError;
use super::id::{ActorId, ChunkId};
use super::position::Position;
use crate::config::SimConfig;
use crate::path::{PathMode, Pathfinder};
use crate::sim::{Scheduler, World};

pub struct GameWorld {
    pub chunks: ChunkGraph,
    pub pathfinder: Pathfinder,
    actors: BTreeMap<ActorId, Actor>,
    online: BTreeSet<ActorId>,
    transitions: Vec<ChunkTransition>,
    next_actor_id: u64,
}

impl GameWorld {
    pub fn new(cfg: &SimConfig) -> Self {
        Self {
            chunks: ChunkGraph::new(cfg.world.clone()),
            pathfinder: Pathfinder::new(cfg.path.clone()),
            actors: BTreeMap::new(),
            online: BTreeSet::new(),
            transitions: Vec::new(),
            next_actor_id: 1,
        }
    }

    /// 生成角色并放到 `at`。玩家生成后即视为在线。
    pub fn spawn(
        &mut self,
        kind: ActorKind,
        name: impl Into<String>,
        at: Position,
        speed: u32,
    ) -> Result<ActorId, WorldError> {
        let id = ActorId(self.next_actor_id);
        self.chunks.add_actor(id, at)?;
        self.next_actor_id += 1;

        let actor = Actor::new(id, kind, name, speed);
        debug!(?id, ?kind, name = actor.name(), %at, "生成角色");
        self.actors.insert(id, actor);
        if kind == ActorKind::Player {
            self.online.insert(id);
        }
        Ok(id)
    }

    /// 移除角色；先取消它的行走锁，避免到期事件在角色消失后触发。
    pub fn despawn(&mut self, sim: &mut Scheduler, id: ActorId) -> Result<Position, WorldError> {
        let actor = self.actors.remove(&id).ok_or(WorldError::UnknownActor(id))?;
        actor.walk_lock().cancel(sim);
        self.online.remove(&id);
        self.chunks.remove_actor(id)
    }

    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(&id)
    }

    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.get_mut(&id)
    }

    pub fn actors(&self) -> impl Iterator<Item = &Actor> {
        self.actors.values()
    }

    pub fn set_destination(
        &mut self,
        id: ActorId,
        target: Position,
        mode: PathMode,
    ) -> Result<(), WorldError> {
        let actor = self.actors.get_mut(&id).ok_or(WorldError::UnknownActor(id))?;
        actor.set_destination(target, mode);
        Ok(())
    }

    pub fn set_online(&mut self, id: ActorId, online: bool) -> Result<(), WorldError> {
        if !self.actors.contains_key(&id) {
            return Err(WorldError::UnknownActor(id));
        }
        if online {
            self.online.insert(id);
        } else {
            self.online.remove(&id);
        }
        Ok(())
    }

    pub fn online_players(&self) -> impl Iterator<Item = ActorId> + '_ {
        self.online.iter().copied()
    }

    pub fn active_chunks(&self) -> BTreeSet<ChunkId> {
        self.chunks.active_chunks(self.online_players())
    }

    /// 取走积累的跨区块记录（供广播层决定谁该看到谁）。
    pub fn drain_transitions(&mut self) -> Vec<ChunkTransition> {
        std::mem::take(&mut self.transitions)
    }

    /// think 阶段：活跃区块内的角色按 id 顺序各自尝试走一步。
    pub fn think(&mut self, sim: &mut Scheduler) {
        let active = self.active_chunks();
        let ready: Vec<ActorId> = self
            .actors
            .keys()
            .copied()
            .filter(|&id| {
                self.chunks
                    .actor_chunk(id)
                    .is_some_and(|chunk| active.contains(&chunk))
            })
            .collect();
        trace!(active = active.len(), ready = ready.len(), "think");

        for id in ready {
            self.step_actor(sim, id);
        }
    }

    fn step_actor(&mut self, sim: &mut Scheduler, id: ActorId) {
        let Some(actor) = self.actors.get(&id) else {
            return;
        };
        let Some(dest) = actor.destination() else {
            return;
        };
        if actor.is_walking() {
            return;
        }
        let kind = actor.kind();

        let Some(from) = self.chunks.actor_tile(id) else {
            return;
        };
        let Some(to) = self.chunks.tile_at(dest.target) else {
            warn!(?id, target = %dest.target, "目的地没有 tile，放弃行走");
            self.clear_destination(id);
            return;
        };

        let path = self.pathfinder.search(
            &self.chunks,
            |tile| kind.is_tile_occupied(tile),
            from,
            to,
            dest.mode,
        );
        let Some(&next) = path.last() else {
            debug!(?id, target = %dest.target, "找不到路径");
            self.clear_destination(id);
            return;
        };
        if next == from {
            debug!(?id, "已到达目的地");
            self.clear_destination(id);
            return;
        }

        let weight = self.chunks.tile(next).movement_weight(
            self.chunks.tile(from),
            self.pathfinder.config().diagonal_multiplier,
        );
        let next_pos = self.chunks.tile(next).position();
        match self.chunks.move_actor(id, next_pos) {
            Ok(transition) if transition.crossed() => self.transitions.push(transition),
            Ok(_) => {}
            Err(err) => {
                warn!(?id, %err, "移动失败");
                return;
            }
        }

        let Some(actor) = self.actors.get_mut(&id) else {
            return;
        };
        actor.record_step();
        let frames = sim
            .tick_interval()
            .frames_covering(actor.step_duration_ms(weight));
        actor.walk_lock().lock(sim, frames);
        trace!(?id, to = %next_pos, frames, "走一步");

        if path.len() == 1 {
            actor.clear_destination();
        }
    }

    fn clear_destination(&mut self, id: ActorId) {
        if let Some(actor) = self.actors.get_mut(&id) {
            actor.clear_destination();
        }
    }
}

impl World for GameWorld {
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn on_tick(&mut self, sim: &mut Scheduler) {
        self.think(sim);
    }
}
