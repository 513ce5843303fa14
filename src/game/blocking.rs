//! # Blocking Query
//!
//! The one place occupancy rules live. Placement, player movement, teleport
//! targeting and monster pathfinding all ask [`is_blocked`].

use crate::{GroundItem, Monster, Position, TileGrid};

/// Returns true if `pos` cannot be entered.
///
/// A cell is blocked when it is off the grid, its tile is impassable, the
/// player stands on it, a monster stands on it, or (only when `items` is
/// given) an item lies on it.
///
/// # Examples
///
/// ```
/// use delve::{is_blocked, Position, TileGrid, TileKind};
///
/// let mut grid = TileGrid::new(5, 5);
/// grid.set_kind(Position::new(2, 2), TileKind::Floor).unwrap();
/// grid.set_kind(Position::new(3, 2), TileKind::Floor).unwrap();
///
/// let player = Position::new(3, 2);
/// assert!(!is_blocked(&grid, &[], player, Position::new(2, 2), None));
/// assert!(is_blocked(&grid, &[], player, player, None));
/// assert!(is_blocked(&grid, &[], player, Position::new(1, 1), None));
/// ```
pub fn is_blocked(
    grid: &TileGrid,
    monsters: &[Monster],
    player: Position,
    pos: Position,
    items: Option<&[GroundItem]>,
) -> bool {
    if !grid.is_passable(pos) {
        return true;
    }
    if pos == player {
        return true;
    }
    if monster_at(monsters, pos).is_some() {
        return true;
    }
    match items {
        Some(items) => items.iter().any(|item| item.position == pos),
        None => false,
    }
}

/// Index of the monster standing on `pos`, if any.
pub fn monster_at(monsters: &[Monster], pos: Position) -> Option<usize> {
    monsters.iter().position(|monster| monster.position == pos)
}

/// Index of the item lying on `pos`, if any.
pub fn item_at(items: &[GroundItem], pos: Position) -> Option<usize> {
    items.iter().position(|item| item.position == pos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        new_entity_id, Difficulty, ItemId, MonsterBehavior, MonsterTemplate, TileKind,
    };
    use rand::{rngs::StdRng, SeedableRng};

    fn floor_grid() -> TileGrid {
        let mut grid = TileGrid::new(8, 8);
        for y in 1..7 {
            for x in 1..7 {
                grid.set_kind(Position::new(x, y), TileKind::Floor).unwrap();
            }
        }
        grid
    }

    fn rat_at(pos: Position) -> Monster {
        let template = MonsterTemplate {
            name: "Rat",
            hp: 4,
            attack: 1,
            xp_value: 1,
            behavior: MonsterBehavior::Wanderer,
            min_depth: 1,
        };
        let mut rng = StdRng::seed_from_u64(3);
        Monster::from_template(new_entity_id(&mut rng), &template, pos, Difficulty::Normal)
    }

    #[test]
    fn test_player_cell_is_blocked_for_others() {
        let grid = floor_grid();
        let player = Position::new(3, 3);
        assert!(is_blocked(&grid, &[], player, player, None));
    }

    #[test]
    fn test_free_floor_is_open() {
        let grid = floor_grid();
        let monsters = vec![rat_at(Position::new(4, 4))];
        let player = Position::new(3, 3);
        for pos in grid.positions_of(TileKind::Floor) {
            let expected = pos == player || pos == Position::new(4, 4);
            assert_eq!(is_blocked(&grid, &monsters, player, pos, None), expected, "{}", pos);
        }
    }

    #[test]
    fn test_walls_and_bounds_block() {
        let grid = floor_grid();
        let player = Position::new(3, 3);
        assert!(is_blocked(&grid, &[], player, Position::new(0, 0), None));
        assert!(is_blocked(&grid, &[], player, Position::new(-1, 3), None));
        assert!(is_blocked(&grid, &[], player, Position::new(3, 8), None));
    }

    #[test]
    fn test_items_only_block_when_passed() {
        let grid = floor_grid();
        let items = vec![GroundItem::new(ItemId::Gold, Position::new(5, 5))];
        let player = Position::new(1, 1);
        assert!(!is_blocked(&grid, &[], player, Position::new(5, 5), None));
        assert!(is_blocked(&grid, &[], player, Position::new(5, 5), Some(&items)));
        assert_eq!(item_at(&items, Position::new(5, 5)), Some(0));
    }
}
