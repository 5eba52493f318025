//! 标识符类型
//!
//! 定义 tile、区块和角色的唯一标识符。tile 与区块的 id 是 `ChunkGraph` 内部数组下标。

use serde::{Deserialize, Serialize};

/// tile 标识符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(pub usize);

/// 区块标识符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ChunkId(pub usize);

/// 角色标识符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(pub u64);
