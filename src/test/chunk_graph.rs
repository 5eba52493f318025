use crate::world::{ActorId, ChunkGraph, ChunkId, Obstacle, Position, WorldConfig, WorldError};
use std::collections::BTreeSet;

fn small_config() -> WorldConfig {
    WorldConfig {
        width: 64,
        height: 64,
        depth: 4,
        chunk_width: 8,
        chunk_height: 8,
        chunk_depth: 1,
    }
}

/// 3x3 个区块（24x24 tile）的地面
fn three_by_three() -> ChunkGraph {
    let mut g = ChunkGraph::new(small_config());
    g.fill_floor(Position::new(0, 0, 0), Position::new(23, 23, 0), 100)
        .expect("fill floor");
    g
}

fn chunk_at(g: &ChunkGraph, x: i32, y: i32, z: i32) -> ChunkId {
    g.chunk_of(Position::new(x, y, z)).expect("chunk exists")
}

#[test]
fn chunks_and_tiles_are_created_lazily() {
    let mut g = ChunkGraph::new(small_config());
    let pos = Position::new(3, 3, 0);
    assert!(g.chunk_of(pos).is_none());
    assert!(g.tile_at(pos).is_none());

    let tile = g.insert_tile(pos, 120).expect("insert");
    assert_eq!(g.chunk_count(), 1);
    assert_eq!(g.tile_at(pos), Some(tile));
    assert_eq!(g.tile(tile).position(), pos);
    assert_eq!(g.tile(tile).friction(), 120);

    let chunk = g.chunk_of(pos).expect("chunk");
    assert_eq!(g.tile(tile).chunk(), chunk);
    assert_eq!(g.chunk(chunk).tiles(), &[tile]);
    // 同一区块内的其他坐标解析到同一区块
    assert_eq!(g.chunk_of(Position::new(7, 0, 0)), Some(chunk));
    assert!(g.chunk_of(Position::new(8, 0, 0)).is_none());
}

#[test]
fn insert_rejects_out_of_bounds_and_duplicates() {
    let mut g = ChunkGraph::new(small_config());
    let pos = Position::new(1, 1, 0);
    g.insert_tile(pos, 100).expect("insert");

    assert_eq!(g.insert_tile(pos, 100), Err(WorldError::TileExists(pos)));
    let outside = Position::new(64, 0, 0);
    assert_eq!(g.insert_tile(outside, 100), Err(WorldError::OutOfBounds(outside)));
    let negative = Position::new(-1, 0, 0);
    assert_eq!(g.insert_tile(negative, 100), Err(WorldError::OutOfBounds(negative)));
    assert_eq!(g.tile_count(), 1);
}

#[test]
fn tiles_link_to_eight_neighbours_on_the_same_floor() {
    let mut g = ChunkGraph::new(small_config());
    let inserted = g
        .fill_floor(Position::new(0, 0, 0), Position::new(2, 2, 0), 100)
        .expect("fill");
    assert_eq!(inserted, 9);
    g.insert_tile(Position::new(1, 1, 1), 100).expect("upper floor");

    let center = g.tile_at(Position::new(1, 1, 0)).expect("center");
    let corner = g.tile_at(Position::new(0, 0, 0)).expect("corner");
    assert_eq!(g.tile(center).neighbours().len(), 8);
    assert_eq!(g.tile(corner).neighbours().len(), 3);
    assert!(g.tile(corner).neighbours().contains(&center));
    assert!(g.tile(center).neighbours().contains(&corner));
}

#[test]
fn chunk_neighbourhood_includes_self_diagonals_and_adjacent_floors() {
    let mut g = three_by_three();
    g.insert_tile(Position::new(12, 12, 1), 100).expect("upper floor");

    let center = chunk_at(&g, 12, 12, 0);
    let corner = chunk_at(&g, 0, 0, 0);
    let above = chunk_at(&g, 12, 12, 1);

    assert_eq!(g.chunk(center).neighbours().len(), 10);
    assert!(g.chunk(center).is_neighbour(center));
    assert!(g.chunk(center).is_neighbour(corner));
    assert!(g.chunk(center).is_neighbour(above));

    // 链接是双向的，晚创建的区块也会回填到已有区块
    assert!(g.chunk(above).is_neighbour(center));
    assert!(g.chunk(above).is_neighbour(corner));
    assert_eq!(g.chunk(corner).neighbours().len(), 5);
}

#[test]
fn difference_of_a_chunk_with_itself_is_empty() {
    let g = three_by_three();
    let center = chunk_at(&g, 12, 12, 0);
    assert!(g.difference(center, center).is_empty());
}

#[test]
fn difference_contains_exactly_neighbours_missing_from_other() {
    let g = three_by_three();
    let west = chunk_at(&g, 0, 12, 0);
    let east = chunk_at(&g, 16, 12, 0);

    let diff: BTreeSet<ChunkId> = g.difference(west, east).into_iter().collect();
    let expected: BTreeSet<ChunkId> = g
        .chunk(west)
        .neighbours()
        .iter()
        .copied()
        .filter(|c| !g.chunk(east).is_neighbour(*c))
        .collect();
    assert_eq!(diff, expected);
    assert_eq!(diff.len(), 3);
    assert!(diff.contains(&west));
}

#[test]
fn moving_across_a_boundary_updates_membership_and_reports_transition() {
    let mut g = three_by_three();
    let actor = ActorId(1);
    let start = Position::new(7, 12, 0);
    let west = g.add_actor(actor, start).expect("add");

    let step = Position::new(8, 12, 0);
    let transition = g.move_actor(actor, step).expect("move");
    let middle = chunk_at(&g, 8, 12, 0);

    assert!(transition.crossed());
    assert_eq!(transition.from, west);
    assert_eq!(transition.to, middle);
    assert_eq!(transition.entered, g.difference(middle, west));
    assert_eq!(transition.left, g.difference(west, middle));
    // 左列三块离开视野，右列三块进入视野
    assert_eq!(transition.entered.len(), 3);
    assert_eq!(transition.left.len(), 3);

    assert!(!g.chunk(west).contains_actor(actor));
    assert!(g.chunk(middle).contains_actor(actor));
    assert_eq!(g.actor_chunk(actor), Some(middle));
    assert_eq!(g.actor_position(actor), Some(step));

    let old_tile = g.tile_at(start).expect("tile");
    let new_tile = g.tile_at(step).expect("tile");
    assert!(g.tile(old_tile).occupants().is_empty());
    assert_eq!(g.tile(new_tile).occupants(), &[actor]);
}

#[test]
fn moving_inside_a_chunk_reports_no_crossing() {
    let mut g = three_by_three();
    let actor = ActorId(7);
    g.add_actor(actor, Position::new(1, 1, 0)).expect("add");

    let transition = g.move_actor(actor, Position::new(2, 2, 0)).expect("move");
    assert!(!transition.crossed());
    assert!(transition.entered.is_empty());
    assert!(transition.left.is_empty());
}

#[test]
fn actor_operations_report_errors() {
    let mut g = three_by_three();
    let actor = ActorId(3);
    let nowhere = Position::new(40, 40, 0);

    assert_eq!(g.add_actor(actor, nowhere), Err(WorldError::NoTile(nowhere)));
    g.add_actor(actor, Position::new(0, 0, 0)).expect("add");
    assert_eq!(
        g.add_actor(actor, Position::new(1, 0, 0)),
        Err(WorldError::ActorExists(actor))
    );
    assert_eq!(
        g.move_actor(ActorId(99), Position::new(1, 0, 0)),
        Err(WorldError::UnknownActor(ActorId(99)))
    );
    assert_eq!(g.move_actor(actor, nowhere), Err(WorldError::NoTile(nowhere)));
    // 失败的移动不改变位置
    assert_eq!(g.actor_position(actor), Some(Position::new(0, 0, 0)));

    assert_eq!(g.remove_actor(actor), Ok(Position::new(0, 0, 0)));
    assert_eq!(g.remove_actor(actor), Err(WorldError::UnknownActor(actor)));
    let tile = g.tile_at(Position::new(0, 0, 0)).expect("tile");
    assert!(!g.tile(tile).has_occupants());
}

#[test]
fn active_chunks_is_union_of_player_neighbourhoods() {
    let mut g = ChunkGraph::new(small_config());
    g.fill_floor(Position::new(0, 0, 0), Position::new(63, 7, 0), 100)
        .expect("fill strip");
    assert_eq!(g.chunk_count(), 8);

    let a = ActorId(1);
    let b = ActorId(2);
    g.add_actor(a, Position::new(0, 0, 0)).expect("add a");
    g.add_actor(b, Position::new(60, 0, 0)).expect("add b");

    let only_a = g.active_chunks([a]);
    assert_eq!(only_a.len(), 2);

    let both = g.active_chunks([a, b]);
    assert_eq!(both.len(), 4);
    assert!(both.contains(&chunk_at(&g, 0, 0, 0)));
    assert!(both.contains(&chunk_at(&g, 8, 0, 0)));
    assert!(both.contains(&chunk_at(&g, 56, 0, 0)));
    assert!(both.contains(&chunk_at(&g, 48, 0, 0)));
    assert!(!both.contains(&chunk_at(&g, 24, 0, 0)));

    // 不在世界里的 id 被忽略
    assert_eq!(g.active_chunks([ActorId(42)]).len(), 0);
}

#[test]
fn spectators_cover_neighbouring_chunks_only() {
    let mut g = ChunkGraph::new(small_config());
    g.fill_floor(Position::new(0, 0, 0), Position::new(31, 7, 0), 100)
        .expect("fill strip");
    g.add_actor(ActorId(1), Position::new(1, 1, 0)).expect("add");
    g.add_actor(ActorId(2), Position::new(9, 1, 0)).expect("add");
    g.add_actor(ActorId(3), Position::new(30, 1, 0)).expect("add");

    assert_eq!(g.spectators(Position::new(2, 2, 0)), vec![ActorId(1), ActorId(2)]);
    assert_eq!(g.spectators(Position::new(60, 60, 0)), Vec::<ActorId>::new());
}

#[test]
fn obstacle_and_friction_updates_require_a_tile() {
    let mut g = three_by_three();
    let pos = Position::new(5, 5, 0);
    g.set_obstacle(pos, Obstacle::Solid).expect("set obstacle");
    g.set_friction(pos, 250).expect("set friction");
    let tile = g.tile(g.tile_at(pos).expect("tile"));
    assert_eq!(tile.obstacle(), Obstacle::Solid);
    assert_eq!(tile.friction(), 250);

    let missing = Position::new(50, 50, 0);
    assert_eq!(g.set_obstacle(missing, Obstacle::Solid), Err(WorldError::NoTile(missing)));
}
