//! 区块（chunk）
//!
//! 固定尺寸的空间分区，持有范围内的 tile 与角色，以及预先计算好的邻居区块列表。
//! 邻居列表包含区块自身、同层八个方向以及上下层对应区块，按 id 排序。

use std::collections::BTreeSet;

use super::id::{ActorId, ChunkId, TileId};

/// 区块坐标：世界坐标按区块尺寸向下取整。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

#[derive(Debug, Clone)]
pub struct Chunk {
    id: ChunkId,
    coord: ChunkCoord,
    neighbours: Vec<ChunkId>,
    tiles: Vec<TileId>,
    actors: BTreeSet<ActorId>,
}

impl Chunk {
    pub(crate) fn new(id: ChunkId, coord: ChunkCoord) -> Self {
        Self {
            id,
            coord,
            neighbours: vec![id],
            tiles: Vec::new(),
            actors: BTreeSet::new(),
        }
    }

    pub fn id(&self) -> ChunkId {
        self.id
    }

    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    pub fn neighbours(&self) -> &[ChunkId] {
        &self.neighbours
    }

    pub fn tiles(&self) -> &[TileId] {
        &self.tiles
    }

    pub fn actors(&self) -> impl Iterator<Item = ActorId> + '_ {
        self.actors.iter().copied()
    }

    pub fn contains_actor(&self, actor: ActorId) -> bool {
        self.actors.contains(&actor)
    }

    pub fn is_neighbour(&self, other: ChunkId) -> bool {
        self.neighbours.binary_search(&other).is_ok()
    }

    /// 在本区块邻居中、但不在 `other` 邻居中的区块（集合差）。
    ///
    /// 角色从 `other` 跨入本区块时，结果即新进入视野的区块；反过来调用得到离开视野的区块。
    pub fn difference(&self, other: &Chunk) -> Vec<ChunkId> {
        self.neighbours
            .iter()
            .copied()
            .filter(|&c| !other.is_neighbour(c))
            .collect()
    }

    pub(crate) fn link(&mut self, other: ChunkId) {
        if let Err(at) = self.neighbours.binary_search(&other) {
            self.neighbours.insert(at, other);
        }
    }

    pub(crate) fn add_tile(&mut self, tile: TileId) {
        self.tiles.push(tile);
    }

    pub(crate) fn insert_actor(&mut self, actor: ActorId) {
        self.actors.insert(actor);
    }

    pub(crate) fn remove_actor(&mut self, actor: ActorId) {
        self.actors.remove(&actor);
    }
}
