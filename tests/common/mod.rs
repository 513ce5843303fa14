//! Shared helpers for the integration tests.

#![allow(dead_code)]

use delve::{
    Action, ActionOutcome, CharacterClass, Difficulty, Direction, GameConfig, GameState, ItemId,
    NullSoundSink, Position, TileKind,
};
use rand::{rngs::StdRng, SeedableRng};

/// A running game at depth 1, seeded from the config.
pub fn started_game(config: GameConfig) -> GameState {
    let seed = config.generation.seed;
    let mut state = GameState::new(config, StdRng::seed_from_u64(seed), Box::new(NullSoundSink))
        .expect("config is valid");
    state
        .start_new_game(Difficulty::Normal, CharacterClass::Warrior)
        .expect("level generates");
    state
}

/// Moves the player onto a floor cell next to `target`, clears monsters off
/// both cells and returns the step that reaches `target`.
pub fn stand_next_to(state: &mut GameState, target: Position, cardinal_only: bool) -> Direction {
    let neighbours = if cardinal_only {
        target.cardinal_adjacent_positions()
    } else {
        target.adjacent_positions()
    };
    let spot = neighbours
        .into_iter()
        .find(|&pos| state.grid().kind_at(pos) == Some(TileKind::Floor))
        .expect("target has a floor neighbour");
    state
        .active_level_mut()
        .monsters
        .retain(|m| m.position != spot && m.position != target);
    state.player_mut().position = spot;
    Direction::from_delta(target - spot).expect("spot is adjacent")
}

/// Walks onto the level's exit, unlocking it with a Key first if needed.
pub fn take_exit(state: &mut GameState) -> ActionOutcome {
    let locked = state.grid().positions_of(TileKind::LockedDoor).next();
    let open = state.grid().positions_of(TileKind::Exit).next();

    if let Some(door) = locked {
        stand_next_to(state, door, true);
        state.player_mut().inventory.push(ItemId::Key);
        assert_eq!(state.perform(Action::OpenDoor).unwrap(), ActionOutcome::Free);
    }

    let exit = locked.or(open).expect("level has an exit");
    let step = stand_next_to(state, exit, false);
    state.perform(Action::Move(step)).unwrap()
}

/// First seed from `start` whose test-sized level has a special room.
pub fn game_with_special_room(start: u64) -> GameState {
    for seed in start..start + 200 {
        let mut config = GameConfig::for_testing(seed);
        config.generation.special_room_chance = 1.0;
        let state = started_game(config);
        if !state.special_rooms().is_empty() {
            return state;
        }
    }
    panic!("no special room in 200 seeds");
}
