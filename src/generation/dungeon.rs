//! # Dungeon Generation
//!
//! Room-and-corridor level generation.
//!
//! The generator:
//! 1. Samples rectangles and keeps those that clear every accepted room by a
//!    one-cell margin
//! 2. Optionally reserves one middle room as a keyed special room
//! 3. Carves the remaining rooms and joins each to the previous one with an
//!    L-shaped corridor
//! 4. Turns some corridor openings into doors
//! 5. Places the exit, the keys, and finally monsters and items

use super::utils;
use crate::utils::pathfinding::find_path;
use crate::{
    any_free_cell, place_entities, DelveError, DelveResult, Difficulty, Direction,
    GenerationConfig, Generator, GroundItem, ItemId, Monster, PlacementOptions, Position, Room,
    SpecialRoomPlan, TileGrid, TileKind,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

/// A finished main level.
#[derive(Debug, Clone)]
pub struct GeneratedLevel {
    pub grid: TileGrid,
    /// Every accepted room in acceptance order, the special one included
    pub rooms: Vec<Room>,
    pub monsters: Vec<Monster>,
    pub items: Vec<GroundItem>,
    /// Center of the first room
    pub spawn: Position,
    /// The Exit tile, or the LockedDoor standing in for it
    pub exit: Position,
    pub special_rooms: Vec<SpecialRoomPlan>,
}

impl GeneratedLevel {
    /// Rooms carved into the main grid.
    pub fn normal_rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms
            .iter()
            .filter(|room| !self.special_rooms.iter().any(|plan| plan.room == **room))
    }
}

/// Primary dungeon generator using the room-and-corridor algorithm.
///
/// Depth and difficulty only affect what gets placed in the rooms; the layout
/// depends on the configuration and the RNG alone.
#[derive(Debug, Clone)]
pub struct RoomCorridorGenerator {
    pub depth: u32,
    pub difficulty: Difficulty,
}

impl RoomCorridorGenerator {
    /// Creates a generator for the given dungeon depth.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{Difficulty, GenerationConfig, Generator, RoomCorridorGenerator};
    /// use rand::{rngs::StdRng, SeedableRng};
    ///
    /// let generator = RoomCorridorGenerator::new(1, Difficulty::Normal);
    /// let config = GenerationConfig::new(42);
    /// let level = generator.generate(&config, &mut StdRng::seed_from_u64(42)).unwrap();
    /// assert!(!level.rooms.is_empty());
    /// assert!(level.grid.is_passable(level.spawn));
    /// ```
    pub fn new(depth: u32, difficulty: Difficulty) -> Self {
        Self { depth, difficulty }
    }

    /// Samples up to `max_rooms` rectangles, keeping the ones that clear every
    /// accepted room by one cell. Falls back to a single centred room.
    fn place_rooms(&self, config: &GenerationConfig, rng: &mut StdRng) -> Vec<Room> {
        let mut rooms: Vec<Room> = Vec::new();

        for _ in 0..config.max_rooms {
            let width = rng.gen_range(config.min_room_size..=config.max_room_size);
            let height = rng.gen_range(config.min_room_size..=config.max_room_size);
            let x = rng.gen_range(1..=(config.width - width - 1) as i32);
            let y = rng.gen_range(1..=(config.height - height - 1) as i32);
            let room = Room::new(Position::new(x, y), width, height);

            if rooms.iter().all(|existing| !room.intersects(existing, 1)) {
                rooms.push(room);
            }
        }

        if rooms.is_empty() {
            log::warn!("no room could be placed; using a centred fallback room");
            let size = config.min_room_size;
            rooms.push(Room::new(
                Position::new(
                    ((config.width - size) / 2) as i32,
                    ((config.height - size) / 2) as i32,
                ),
                size,
                size,
            ));
        }

        rooms
    }

    /// Picks the room to reserve as special, if any.
    ///
    /// Candidates are neither first nor last and are at least 5 cells on each
    /// side, so the entry point two cells past the door is still inside.
    fn choose_special(
        &self,
        rooms: &[Room],
        config: &GenerationConfig,
        rng: &mut StdRng,
    ) -> Option<usize> {
        if rooms.len() < 3 || !rng.gen_bool(config.special_room_chance) {
            return None;
        }
        let candidates: Vec<usize> = (1..rooms.len() - 1)
            .filter(|&index| rooms[index].width >= 5 && rooms[index].height >= 5)
            .collect();
        candidates.choose(rng).copied()
    }

    fn carve_room(&self, grid: &mut TileGrid, room: &Room) -> DelveResult<()> {
        for pos in room.floor_positions() {
            grid.set_kind(pos, TileKind::Floor)?;
        }
        Ok(())
    }

    /// Carves a corridor from `start` to `end` that stays out of `reserved`.
    ///
    /// Tries horizontal-then-vertical first, then vertical-then-horizontal,
    /// and only if both would cut into the reserved rectangle walks around it
    /// with A*.
    fn carve_corridor(
        &self,
        grid: &mut TileGrid,
        start: Position,
        end: Position,
        reserved: Option<&Room>,
    ) -> DelveResult<()> {
        let crosses = |cells: &[Position]| {
            reserved.is_some_and(|room| cells.iter().any(|&pos| room.contains(pos)))
        };

        let mut route = l_route(start, end, true);
        if crosses(&route) {
            route = l_route(start, end, false);
        }
        if crosses(&route) {
            let (width, height) = (grid.width() as i32, grid.height() as i32);
            let detour = find_path(start, end, |pos| {
                pos.x > 0
                    && pos.y > 0
                    && pos.x < width - 1
                    && pos.y < height - 1
                    && !reserved.is_some_and(|room| room.contains(pos))
            })
            .ok_or_else(|| {
                DelveError::GenerationFailed(format!(
                    "no corridor from {} to {} avoids the special room",
                    start, end
                ))
            })?;
            route = std::iter::once(start).chain(detour).collect();
        }

        for pos in route {
            if grid.kind_at(pos) == Some(TileKind::Wall) {
                grid.set_kind(pos, TileKind::Floor)?;
            }
        }
        Ok(())
    }

    /// Places the special door on the wall of `special` that faces `from`.
    ///
    /// Walls whose outside cell would land on the map border are skipped.
    fn special_door(&self, grid: &TileGrid, special: &Room, from: &Room) -> SpecialRoomPlan {
        let target = from.center();
        let top_left = special.top_left;
        let bottom_right = special.bottom_right();
        let clamp_x = target.x.clamp(top_left.x + 1, bottom_right.x - 1);
        let clamp_y = target.y.clamp(top_left.y + 1, bottom_right.y - 1);
        let candidates = [
            Position::new(top_left.x, clamp_y),
            Position::new(bottom_right.x, clamp_y),
            Position::new(clamp_x, top_left.y),
            Position::new(clamp_x, bottom_right.y),
        ];

        let (width, height) = (grid.width() as i32, grid.height() as i32);
        let door = candidates
            .into_iter()
            .min_by_key(|&door| {
                let outside = door - SpecialRoomPlan { door, room: *special }.inward().to_delta();
                let on_border = outside.x < 1
                    || outside.y < 1
                    || outside.x > width - 2
                    || outside.y > height - 2;
                (on_border, outside.manhattan_distance(target))
            })
            .unwrap_or(candidates[0]);

        SpecialRoomPlan {
            door,
            room: *special,
        }
    }

    /// Turns wall-ring openings that a corridor passes straight through into
    /// doors, each with probability `door_chance`.
    fn add_doors(
        &self,
        grid: &mut TileGrid,
        rooms: &[&Room],
        config: &GenerationConfig,
        rng: &mut StdRng,
    ) -> DelveResult<()> {
        for room in rooms {
            for pos in room.wall_positions() {
                if room.is_corner(pos) || grid.kind_at(pos) != Some(TileKind::Floor) {
                    continue;
                }
                let open = |direction: Direction| grid.is_passable(pos + direction.to_delta());
                let straight_east_west = open(Direction::East)
                    && open(Direction::West)
                    && !open(Direction::North)
                    && !open(Direction::South);
                let straight_north_south = open(Direction::North)
                    && open(Direction::South)
                    && !open(Direction::East)
                    && !open(Direction::West);
                if (straight_east_west || straight_north_south) && rng.gen_bool(config.door_chance)
                {
                    grid.set_kind(pos, TileKind::Door)?;
                }
            }
        }
        Ok(())
    }

    /// Picks the exit cell: a random interior cell of the last room other
    /// than its centre, or the centre if nothing else exists.
    fn exit_position(&self, room: &Room, rng: &mut StdRng) -> Position {
        let center = room.center();
        let options: Vec<Position> = room
            .floor_positions()
            .into_iter()
            .filter(|&pos| pos != center)
            .collect();
        options.choose(rng).copied().unwrap_or(center)
    }
}

/// Cells of an L-shaped corridor, both ends included.
///
/// Horizontal-first runs along `start`'s row then `end`'s column; otherwise
/// along `start`'s column then `end`'s row.
fn l_route(start: Position, end: Position, horizontal_first: bool) -> Vec<Position> {
    let mut cells = Vec::new();
    let corner = if horizontal_first {
        Position::new(end.x, start.y)
    } else {
        Position::new(start.x, end.y)
    };
    for (from, to) in [(start, corner), (corner, end)] {
        let step = Position::new((to.x - from.x).signum(), (to.y - from.y).signum());
        let mut pos = from;
        cells.push(pos);
        while pos != to {
            pos = pos + step;
            cells.push(pos);
        }
    }
    cells.dedup();
    cells
}

impl Generator<GeneratedLevel> for RoomCorridorGenerator {
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> DelveResult<GeneratedLevel> {
        let mut grid = TileGrid::new(config.width, config.height);
        let rooms = self.place_rooms(config, rng);
        let special_index = self.choose_special(&rooms, config, rng);
        let reserved = special_index.map(|index| rooms[index]);

        let mut special_rooms = Vec::new();
        let mut normal: Vec<usize> = Vec::new();
        for (index, room) in rooms.iter().enumerate() {
            let previous = normal.last().map(|&i| rooms[i]);

            if Some(index) == special_index {
                // Room 0 is never special, so a previous room always exists.
                let Some(previous) = previous else {
                    continue;
                };
                let plan = self.special_door(&grid, room, &previous);
                let outside = plan.door - plan.inward().to_delta();
                self.carve_corridor(&mut grid, previous.center(), outside, reserved.as_ref())?;
                grid.set_kind(plan.door, TileKind::SpecialDoor)?;
                special_rooms.push(plan);
                continue;
            }

            self.carve_room(&mut grid, room)?;
            if let Some(previous) = previous {
                self.carve_corridor(&mut grid, previous.center(), room.center(), reserved.as_ref())?;
            }
            normal.push(index);
        }

        let normal_rooms: Vec<&Room> = normal.iter().map(|&i| &rooms[i]).collect();
        self.add_doors(&mut grid, &normal_rooms, config, rng)?;

        let spawn = rooms[0].center();
        let last_index = *normal.last().unwrap_or(&0);
        let exit = self.exit_position(&rooms[last_index], rng);
        grid.set_kind(exit, TileKind::Exit)?;

        let mut monsters = Vec::new();
        let mut items = Vec::new();

        if normal.len() >= 2 && rng.gen_bool(config.locked_exit_chance) {
            let key_rooms: Vec<usize> = normal[..normal.len() - 1].to_vec();
            if let Some(cell) =
                random_key_cell(&grid, &rooms, &key_rooms, &items, spawn, rng)
            {
                items.push(GroundItem::new(ItemId::Key, cell));
                grid.set_kind(exit, TileKind::LockedDoor)?;
            }
        }

        if !special_rooms.is_empty() {
            let key_rooms: Vec<usize> = normal[1..].to_vec();
            match random_key_cell(&grid, &rooms, &key_rooms, &items, spawn, rng) {
                Some(cell) => items.push(GroundItem::new(ItemId::SpecialKey, cell)),
                None => log::warn!("no free cell for the special key; the special room stays sealed"),
            }
        }

        let options = PlacementOptions::normal(self.depth, self.difficulty);
        for &index in &normal {
            place_entities(&grid, &mut monsters, &mut items, spawn, &rooms[index], options, rng);
        }

        let level = GeneratedLevel {
            grid,
            rooms,
            monsters,
            items,
            spawn,
            exit,
            special_rooms,
        };
        self.validate(&level, config)?;

        log::debug!(
            "generated depth {}: {} rooms ({} special), {} monsters, {} items",
            self.depth,
            level.rooms.len(),
            level.special_rooms.len(),
            level.monsters.len(),
            level.items.len()
        );
        Ok(level)
    }

    /// Checks every carved room is reachable from the spawn and that the exit
    /// (or the locked door in front of it) borders walkable ground.
    fn validate(&self, level: &GeneratedLevel, _config: &GenerationConfig) -> DelveResult<()> {
        let normal: Vec<Room> = level.normal_rooms().copied().collect();
        utils::validate_level(&level.grid, level.spawn, &normal)?;

        let reachable = utils::reachable_from(&level.grid, level.spawn);
        let exit_reachable = match level.grid.kind_at(level.exit) {
            Some(TileKind::Exit) => reachable.contains(&level.exit),
            Some(TileKind::LockedDoor) => level
                .exit
                .cardinal_adjacent_positions()
                .iter()
                .any(|pos| reachable.contains(pos)),
            _ => false,
        };
        if !exit_reachable {
            return Err(DelveError::GenerationFailed(format!(
                "exit at {} cannot be reached",
                level.exit
            )));
        }

        for plan in &level.special_rooms {
            let outside = plan.door - plan.inward().to_delta();
            if !reachable.contains(&outside) {
                return Err(DelveError::GenerationFailed(format!(
                    "special door at {} cannot be reached",
                    plan.door
                )));
            }
        }
        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "RoomCorridorGenerator"
    }
}

/// A free floor cell in one of `room_indices`, chosen room first.
fn random_key_cell(
    grid: &TileGrid,
    rooms: &[Room],
    room_indices: &[usize],
    items: &[GroundItem],
    spawn: Position,
    rng: &mut StdRng,
) -> Option<Position> {
    let mut order = room_indices.to_vec();
    order.shuffle(rng);
    for index in order {
        if let Some(cell) = any_free_cell(grid, &[], items, spawn, &rooms[index], rng) {
            return Some(cell);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn generate(seed: u64, config: &GenerationConfig) -> GeneratedLevel {
        RoomCorridorGenerator::new(1, Difficulty::Normal)
            .generate(config, &mut StdRng::seed_from_u64(seed))
            .unwrap()
    }

    #[test]
    fn test_l_route_shape() {
        let route = l_route(Position::new(2, 2), Position::new(5, 4), true);
        assert_eq!(route.first(), Some(&Position::new(2, 2)));
        assert_eq!(route.last(), Some(&Position::new(5, 4)));
        assert!(route.contains(&Position::new(5, 2)));
        assert_eq!(route.len(), 6);

        let route = l_route(Position::new(2, 2), Position::new(5, 4), false);
        assert!(route.contains(&Position::new(2, 4)));
        assert!(!route.contains(&Position::new(5, 2)));
    }

    #[test]
    fn test_rooms_respect_margin() {
        for seed in 0..30 {
            let level = generate(seed, &GenerationConfig::new(seed));
            for (i, a) in level.rooms.iter().enumerate() {
                for b in &level.rooms[i + 1..] {
                    assert!(!a.intersects(b, 1), "seed {}: {:?} vs {:?}", seed, a, b);
                }
                assert!(a.top_left.x >= 1 && a.top_left.y >= 1);
                assert!(a.bottom_right().x < 59 && a.bottom_right().y < 39);
            }
        }
    }

    #[test]
    fn test_border_stays_wall() {
        let level = generate(5, &GenerationConfig::new(5));
        for x in 0..60 {
            assert_eq!(level.grid.kind_at(Position::new(x, 0)), Some(TileKind::Wall));
            assert_eq!(level.grid.kind_at(Position::new(x, 39)), Some(TileKind::Wall));
        }
        for y in 0..40 {
            assert_eq!(level.grid.kind_at(Position::new(0, y)), Some(TileKind::Wall));
            assert_eq!(level.grid.kind_at(Position::new(59, y)), Some(TileKind::Wall));
        }
    }

    #[test]
    fn test_special_room_is_sealed_and_keyed() {
        let config = GenerationConfig {
            special_room_chance: 1.0,
            ..GenerationConfig::new(0)
        };
        let mut found = 0;
        for seed in 0..40 {
            let level = generate(seed, &config);
            let Some(plan) = level.special_rooms.first() else {
                assert!(level.rooms.len() < 3 || level.rooms[1..level.rooms.len() - 1]
                    .iter()
                    .all(|r| r.width < 5 || r.height < 5));
                continue;
            };
            found += 1;
            assert_eq!(level.special_rooms.len(), 1);
            assert_eq!(level.grid.kind_at(plan.door), Some(TileKind::SpecialDoor));
            assert!(plan.room.is_border(plan.door));
            assert!(!plan.room.is_corner(plan.door));
            for pos in plan.room.floor_positions() {
                assert_eq!(level.grid.kind_at(pos), Some(TileKind::Wall));
            }
            assert_ne!(plan.room, level.rooms[0]);
            assert_ne!(Some(&plan.room), level.rooms.last());

            let keys: Vec<_> = level
                .items
                .iter()
                .filter(|i| i.item == ItemId::SpecialKey)
                .collect();
            assert_eq!(keys.len(), 1);
            assert!(!level.rooms[0].contains(keys[0].position));
            assert!(!plan.room.contains(keys[0].position));
        }
        assert!(found > 0);
    }

    #[test]
    fn test_locked_exit_has_a_key() {
        let config = GenerationConfig {
            locked_exit_chance: 1.0,
            ..GenerationConfig::new(0)
        };
        for seed in 0..30 {
            let level = generate(seed, &config);
            let keys = level.items.iter().filter(|i| i.item == ItemId::Key).count();
            match level.grid.kind_at(level.exit) {
                Some(TileKind::LockedDoor) => assert!(keys >= 1),
                Some(TileKind::Exit) => assert_eq!(level.normal_rooms().count(), 1),
                other => panic!("unexpected exit tile {:?}", other),
            }
        }
    }

    #[test]
    fn test_fallback_room_when_nothing_fits() {
        let config = GenerationConfig {
            max_rooms: 0,
            ..GenerationConfig::for_testing(3)
        };
        let level = generate(3, &config);
        assert_eq!(level.rooms.len(), 1);
        assert_eq!(level.spawn, level.rooms[0].center());
        assert!(level.rooms[0].contains_interior(level.exit));
        assert_ne!(level.exit, level.spawn);
        assert!(level.monsters.len() <= 2);
        assert!(level.monsters.iter().all(|m| m.position != level.spawn));
    }

    #[test]
    fn test_doors_only_on_straight_openings() {
        let config = GenerationConfig {
            door_chance: 1.0,
            ..GenerationConfig::new(0)
        };
        let level = generate(11, &config);
        for pos in level.grid.positions_of(TileKind::Door) {
            let ew = level.grid.is_passable(pos + Direction::East.to_delta())
                && level.grid.is_passable(pos + Direction::West.to_delta());
            let ns = level.grid.is_passable(pos + Direction::North.to_delta())
                && level.grid.is_passable(pos + Direction::South.to_delta());
            assert!(ew || ns);
        }
    }

    #[test]
    fn test_generation_is_deterministic() {
        let config = GenerationConfig::new(99);
        let a = generate(99, &config);
        let b = generate(99, &config);
        assert_eq!(a.grid, b.grid);
        assert_eq!(a.monsters, b.monsters);
        assert_eq!(a.items, b.items);
        assert_eq!(a.exit, b.exit);
    }
}
