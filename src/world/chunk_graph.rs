//! 区块图
//!
//! 把有界世界网格划分为固定尺寸的区块，维护 tile/区块两个 arena 以及坐标索引：
//! - 区块在插入第一个 tile 时按需创建，创建时与已存在的相邻区块双向连接；
//! - tile 插入时与同层八个方向已存在的 tile 双向连接；
//! - 角色的位置、所在 tile 和所在区块在每次移动时同步更新，始终保持一致。

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::chunk::{Chunk, ChunkCoord};
use super::error::WorldError;
use super::id::{ActorId, ChunkId, TileId};
use super::position::Position;
use super::tile::{Obstacle, Tile};

/// 世界与区块尺寸（以 tile 为单位）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub chunk_width: u32,
    pub chunk_height: u32,
    pub chunk_depth: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 2048,
            height: 2048,
            depth: 16,
            chunk_width: 16,
            chunk_height: 16,
            chunk_depth: 1,
        }
    }
}

/// 一次移动对区块归属的影响。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkTransition {
    pub actor: ActorId,
    pub from: ChunkId,
    pub to: ChunkId,
    /// 新进入角色视野范围的区块
    pub entered: Vec<ChunkId>,
    /// 离开角色视野范围的区块
    pub left: Vec<ChunkId>,
}

impl ChunkTransition {
    pub fn crossed(&self) -> bool {
        self.from != self.to
    }
}

#[derive(Debug, Clone, Copy)]
struct Placement {
    position: Position,
    tile: TileId,
}

#[derive(Debug)]
pub struct ChunkGraph {
    cfg: WorldConfig,
    chunks: Vec<Chunk>,
    chunk_index: HashMap<ChunkCoord, ChunkId>,
    tiles: Vec<Tile>,
    tile_index: HashMap<Position, TileId>,
    actors: HashMap<ActorId, Placement>,
}

impl ChunkGraph {
    pub fn new(mut cfg: WorldConfig) -> Self {
        cfg.chunk_width = cfg.chunk_width.max(1);
        cfg.chunk_height = cfg.chunk_height.max(1);
        cfg.chunk_depth = cfg.chunk_depth.max(1);
        Self {
            cfg,
            chunks: Vec::new(),
            chunk_index: HashMap::new(),
            tiles: Vec::new(),
            tile_index: HashMap::new(),
            actors: HashMap::new(),
        }
    }

    pub fn config(&self) -> &WorldConfig {
        &self.cfg
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// 按 id 取 tile；id 必须来自本图。
    pub fn tile(&self, id: TileId) -> &Tile {
        &self.tiles[id.0]
    }

    pub fn chunk(&self, id: ChunkId) -> &Chunk {
        &self.chunks[id.0]
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        let within = |v: i32, limit: u32| v >= 0 && (v as u32) < limit;
        within(pos.x, self.cfg.width) && within(pos.y, self.cfg.height) && within(pos.z, self.cfg.depth)
    }

    pub fn chunk_coord(&self, pos: Position) -> ChunkCoord {
        ChunkCoord {
            x: pos.x.div_euclid(self.cfg.chunk_width as i32),
            y: pos.y.div_euclid(self.cfg.chunk_height as i32),
            z: pos.z.div_euclid(self.cfg.chunk_depth as i32),
        }
    }

    /// 位置所在的区块；区块尚未创建时为 `None`。
    pub fn chunk_of(&self, pos: Position) -> Option<ChunkId> {
        self.chunk_index.get(&self.chunk_coord(pos)).copied()
    }

    pub fn tile_at(&self, pos: Position) -> Option<TileId> {
        self.tile_index.get(&pos).copied()
    }

    /// 插入一个 tile，必要时创建所在区块，并与相邻 tile 互连。
    pub fn insert_tile(&mut self, pos: Position, friction: u32) -> Result<TileId, WorldError> {
        if !self.in_bounds(pos) {
            return Err(WorldError::OutOfBounds(pos));
        }
        if self.tile_index.contains_key(&pos) {
            return Err(WorldError::TileExists(pos));
        }

        let chunk = self.ensure_chunk(self.chunk_coord(pos));
        let id = TileId(self.tiles.len());
        let mut tile = Tile::new(id, pos, chunk, friction);

        for dy in -1..=1 {
            for dx in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                if let Some(&other) = self.tile_index.get(&pos.offset(dx, dy, 0)) {
                    self.tiles[other.0].link(id);
                    tile.link(other);
                }
            }
        }

        self.tiles.push(tile);
        self.tile_index.insert(pos, id);
        self.chunks[chunk.0].add_tile(id);
        trace!(?id, %pos, ?chunk, "插入 tile");
        Ok(id)
    }

    /// 用同一摩擦值铺满 `from`..=`to` 的矩形（同层），返回插入的 tile 数。
    ///
    /// 已存在的 tile 保持不变。
    pub fn fill_floor(&mut self, from: Position, to: Position, friction: u32) -> Result<usize, WorldError> {
        let mut inserted = 0;
        for z in from.z.min(to.z)..=from.z.max(to.z) {
            for y in from.y.min(to.y)..=from.y.max(to.y) {
                for x in from.x.min(to.x)..=from.x.max(to.x) {
                    match self.insert_tile(Position::new(x, y, z), friction) {
                        Ok(_) => inserted += 1,
                        Err(WorldError::TileExists(_)) => {}
                        Err(err) => return Err(err),
                    }
                }
            }
        }
        debug!(%from, %to, inserted, chunks = self.chunks.len(), "铺设地面");
        Ok(inserted)
    }

    pub fn set_obstacle(&mut self, pos: Position, obstacle: Obstacle) -> Result<(), WorldError> {
        let id = self.tile_at(pos).ok_or(WorldError::NoTile(pos))?;
        self.tiles[id.0].set_obstacle(obstacle);
        Ok(())
    }

    pub fn set_friction(&mut self, pos: Position, friction: u32) -> Result<(), WorldError> {
        let id = self.tile_at(pos).ok_or(WorldError::NoTile(pos))?;
        self.tiles[id.0].set_friction(friction);
        Ok(())
    }

    fn ensure_chunk(&mut self, coord: ChunkCoord) -> ChunkId {
        if let Some(&id) = self.chunk_index.get(&coord) {
            return id;
        }

        let id = ChunkId(self.chunks.len());
        let mut chunk = Chunk::new(id, coord);
        for dz in -1..=1 {
            for dy in -1..=1 {
                for dx in -1..=1 {
                    let near = ChunkCoord {
                        x: coord.x + dx,
                        y: coord.y + dy,
                        z: coord.z + dz,
                    };
                    if let Some(&other) = self.chunk_index.get(&near) {
                        self.chunks[other.0].link(id);
                        chunk.link(other);
                    }
                }
            }
        }

        debug!(?id, ?coord, neighbours = chunk.neighbours().len(), "创建区块");
        self.chunks.push(chunk);
        self.chunk_index.insert(coord, id);
        id
    }

    pub fn actor_position(&self, actor: ActorId) -> Option<Position> {
        self.actors.get(&actor).map(|p| p.position)
    }

    pub fn actor_tile(&self, actor: ActorId) -> Option<TileId> {
        self.actors.get(&actor).map(|p| p.tile)
    }

    pub fn actor_chunk(&self, actor: ActorId) -> Option<ChunkId> {
        self.actor_tile(actor).map(|t| self.tiles[t.0].chunk())
    }

    /// 把角色放到 `pos` 所在的 tile 上。
    pub fn add_actor(&mut self, actor: ActorId, pos: Position) -> Result<ChunkId, WorldError> {
        if self.actors.contains_key(&actor) {
            return Err(WorldError::ActorExists(actor));
        }
        let tile = self.tile_at(pos).ok_or(WorldError::NoTile(pos))?;
        let chunk = self.tiles[tile.0].chunk();

        self.tiles[tile.0].add_occupant(actor);
        self.chunks[chunk.0].insert_actor(actor);
        self.actors.insert(actor, Placement { position: pos, tile });
        debug!(?actor, %pos, ?chunk, "角色加入世界");
        Ok(chunk)
    }

    /// 移动角色，同步更新 tile 占用与区块归属。
    #[tracing::instrument(skip(self))]
    pub fn move_actor(&mut self, actor: ActorId, to: Position) -> Result<ChunkTransition, WorldError> {
        let from = *self.actors.get(&actor).ok_or(WorldError::UnknownActor(actor))?;
        let to_tile = self.tile_at(to).ok_or(WorldError::NoTile(to))?;

        let from_chunk = self.tiles[from.tile.0].chunk();
        let to_chunk = self.tiles[to_tile.0].chunk();

        self.tiles[from.tile.0].remove_occupant(actor);
        self.tiles[to_tile.0].add_occupant(actor);
        self.actors.insert(
            actor,
            Placement {
                position: to,
                tile: to_tile,
            },
        );

        let (entered, left) = if from_chunk == to_chunk {
            (Vec::new(), Vec::new())
        } else {
            self.chunks[from_chunk.0].remove_actor(actor);
            self.chunks[to_chunk.0].insert_actor(actor);
            (
                self.difference(to_chunk, from_chunk),
                self.difference(from_chunk, to_chunk),
            )
        };

        if from_chunk != to_chunk {
            debug!(
                ?from_chunk,
                ?to_chunk,
                entered = entered.len(),
                left = left.len(),
                "角色跨越区块"
            );
        }

        Ok(ChunkTransition {
            actor,
            from: from_chunk,
            to: to_chunk,
            entered,
            left,
        })
    }

    pub fn remove_actor(&mut self, actor: ActorId) -> Result<Position, WorldError> {
        let placement = self.actors.remove(&actor).ok_or(WorldError::UnknownActor(actor))?;
        let chunk = self.tiles[placement.tile.0].chunk();
        self.tiles[placement.tile.0].remove_occupant(actor);
        self.chunks[chunk.0].remove_actor(actor);
        debug!(?actor, position = %placement.position, "角色离开世界");
        Ok(placement.position)
    }

    /// `a` 的邻居中不属于 `b` 邻居的区块。
    pub fn difference(&self, a: ChunkId, b: ChunkId) -> Vec<ChunkId> {
        self.chunks[a.0].difference(&self.chunks[b.0])
    }

    /// 所有在线玩家所在区块的邻居并集：本帧需要推进与广播的区块。
    pub fn active_chunks<I>(&self, players: I) -> BTreeSet<ChunkId>
    where
        I: IntoIterator<Item = ActorId>,
    {
        players
            .into_iter()
            .filter_map(|p| self.actor_chunk(p))
            .flat_map(|c| self.chunks[c.0].neighbours().iter().copied())
            .collect()
    }

    /// 能看到 `pos` 的角色：其所在区块邻居范围内的全部角色。
    pub fn spectators(&self, pos: Position) -> Vec<ActorId> {
        let Some(chunk) = self.chunk_of(pos) else {
            return Vec::new();
        };
        let seen: BTreeSet<ActorId> = self.chunks[chunk.0]
            .neighbours()
            .iter()
            .flat_map(|&c| self.chunks[c.0].actors())
            .collect();
        seen.into_iter().collect()
    }
}
