//! 世界操作错误

use thiserror::Error;

use super::id::ActorId;
use super::position::Position;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorldError {
    #[error("position {0} is outside the world bounds")]
    OutOfBounds(Position),
    #[error("no tile at {0}")]
    NoTile(Position),
    #[error("a tile already exists at {0}")]
    TileExists(Position),
    #[error("unknown actor {0:?}")]
    UnknownActor(ActorId),
    #[error("actor {0:?} is already placed")]
    ActorExists(ActorId),
}
