//! # Game State Module
//!
//! Central game state and turn resolution.
//!
//! [`GameState`] owns the run: the player, the main dungeon level, the cache
//! of special rooms, the message log and the event queue. Every player command
//! goes through [`GameState::perform`], which resolves the action, then lets
//! the monsters on the active map act, then advances the turn counter and
//! expires timed effects.

use crate::{
    award_experience, is_blocked, item_at, kill_gold, monster_at, player_damage,
    run_monster_turns, use_item, Action, ActionOutcome, ActiveEffects, CharacterClass, DelveError, DelveResult,
    Difficulty, Direction, EffectContext, FieldOfView, GameConfig, GameEvent, GeneratedLevel,
    GeneratedSpecialRoom, Generator, GroundItem, ItemId, ItemUse, MessageLog, Monster,
    NullSoundSink, Player, Position, Room, RoomCorridorGenerator, SoundSink, SpecialRoomGenerator,
    SpecialRoomPlan, TileGrid, TileKind,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Level generation is retried this many times before the error is returned.
const GENERATION_ATTEMPTS: usize = 5;

/// One map with everything on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelState {
    pub grid: TileGrid,
    pub monsters: Vec<Monster>,
    pub items: Vec<GroundItem>,
    pub fov: FieldOfView,
}

impl LevelState {
    /// Wraps a grid and its entities with a fresh field of view.
    pub fn new(grid: TileGrid, monsters: Vec<Monster>, items: Vec<GroundItem>) -> Self {
        let fov = FieldOfView::new(grid.width(), grid.height());
        Self {
            grid,
            monsters,
            items,
            fov,
        }
    }
}

/// A special room, live or cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecialRoomState {
    pub level: LevelState,
    pub room: Room,
    pub exit: Position,
    pub entry: Position,
}

impl From<GeneratedSpecialRoom> for SpecialRoomState {
    fn from(generated: GeneratedSpecialRoom) -> Self {
        Self {
            level: LevelState::new(generated.grid, generated.monsters, generated.items),
            room: generated.room,
            exit: generated.exit,
            entry: generated.entry,
        }
    }
}

/// The player's stay inside a special room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecialRoomVisit {
    /// Main-level door the player came through
    pub door: Position,
    /// Main-level cell the player returns to
    pub return_to: Position,
    pub room: SpecialRoomState,
}

/// Which map the player is on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    MainDungeon,
    SpecialRoom(Box<SpecialRoomVisit>),
}

/// How a finished run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Won,
    Lost,
}

/// Lifecycle of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunState {
    NotStarted,
    Playing,
    GameOver { outcome: Outcome },
}

/// How an action resolved internally, before monsters and the clock run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resolution {
    /// Monsters on the active map act, then the turn ends.
    Turn,
    /// The turn ends but the new map's monsters get no move yet.
    TurnWithoutMonsters,
    Free,
    Rejected,
}

/// Central game state containing all run data.
///
/// The RNG and the sound sink are injected, so a run is reproducible from its
/// seed and audio never blocks turn resolution.
///
/// # Examples
///
/// ```
/// use delve::{Action, CharacterClass, Difficulty, GameState, RunState};
///
/// let mut state = GameState::with_seed(7).unwrap();
/// state.start_new_game(Difficulty::Normal, CharacterClass::Warrior).unwrap();
/// assert_eq!(state.run_state(), RunState::Playing);
///
/// state.perform(Action::Wait).unwrap();
/// assert_eq!(state.turn(), 1);
/// ```
pub struct GameState {
    config: GameConfig,
    rng: StdRng,
    sound: Box<dyn SoundSink>,
    difficulty: Difficulty,
    player: Player,
    depth: u32,
    turn: u64,
    run_state: RunState,
    dungeon: LevelState,
    special_plans: Vec<SpecialRoomPlan>,
    location: Location,
    special_cache: HashMap<Position, SpecialRoomState>,
    unlocked_special_doors: HashSet<Position>,
    effects: ActiveEffects,
    messages: MessageLog,
    events: Vec<GameEvent>,
    inventory_open: bool,
    selected_slot: usize,
    screen_size: (u32, u32),
}

impl std::fmt::Debug for GameState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameState")
            .field("run_state", &self.run_state)
            .field("depth", &self.depth)
            .field("turn", &self.turn)
            .field("player", &self.player)
            .field("location", &self.location)
            .finish_non_exhaustive()
    }
}

impl GameState {
    /// Creates a state that has not started a run yet.
    pub fn new(config: GameConfig, rng: StdRng, sound: Box<dyn SoundSink>) -> DelveResult<Self> {
        config.validate()?;
        let grid = TileGrid::new(config.generation.width, config.generation.height);
        Ok(Self {
            messages: MessageLog::new(config.message_capacity),
            config,
            rng,
            sound,
            difficulty: Difficulty::default(),
            player: Player::new(
                CharacterClass::default(),
                Difficulty::default(),
                Position::new(0, 0),
            ),
            depth: 0,
            turn: 0,
            run_state: RunState::NotStarted,
            dungeon: LevelState::new(grid, Vec::new(), Vec::new()),
            special_plans: Vec::new(),
            location: Location::MainDungeon,
            special_cache: HashMap::new(),
            unlocked_special_doors: HashSet::new(),
            effects: ActiveEffects::new(),
            events: Vec::new(),
            inventory_open: false,
            selected_slot: 0,
            screen_size: (0, 0),
        })
    }

    /// Default configuration, seeded RNG and no sound.
    pub fn with_seed(seed: u64) -> DelveResult<Self> {
        Self::new(
            GameConfig::new(seed),
            StdRng::seed_from_u64(seed),
            Box::new(NullSoundSink),
        )
    }

    /// Builds a running game around a hand-made level at depth 1.
    ///
    /// Scenario tests use this to set up exact situations.
    pub fn from_parts(
        config: GameConfig,
        level: LevelState,
        special_plans: Vec<SpecialRoomPlan>,
        player: Player,
        rng: StdRng,
    ) -> DelveResult<Self> {
        let mut state = Self::new(config, rng, Box::new(NullSoundSink))?;
        state.difficulty = Difficulty::Normal;
        state.player = player;
        state.dungeon = level;
        state.special_plans = special_plans;
        state.depth = 1;
        state.run_state = RunState::Playing;
        state.refresh_fov();
        Ok(state)
    }

    /// Replaces the sound sink.
    pub fn set_sound_sink(&mut self, sound: Box<dyn SoundSink>) {
        self.sound = sound;
    }

    /// Starts a fresh run at depth 1.
    pub fn start_new_game(
        &mut self,
        difficulty: Difficulty,
        class: CharacterClass,
    ) -> DelveResult<()> {
        self.difficulty = difficulty;
        self.depth = 1;
        let generated = self.generate_dungeon()?;

        self.turn = 0;
        self.player = Player::new(class, difficulty, generated.spawn);
        self.effects.clear();
        self.messages.clear();
        self.events.clear();
        self.inventory_open = false;
        self.selected_slot = 0;
        self.install_level(generated);
        self.run_state = RunState::Playing;

        log::info!(
            "new game: seed {}, {:?} {:?}",
            self.config.generation.seed,
            difficulty,
            class
        );
        self.message(format!(
            "Welcome, {:?}. Find the way down through {} levels.",
            class, self.config.final_depth
        ));
        Ok(())
    }

    /// Resolves one player command.
    ///
    /// Illegal commands are not errors: they return
    /// [`ActionOutcome::Rejected`] with a message and change nothing else.
    /// Errors are reserved for generation failures during a level change.
    pub fn perform(&mut self, action: Action) -> DelveResult<ActionOutcome> {
        if self.run_state != RunState::Playing {
            log::debug!("ignoring {:?} in state {:?}", action, self.run_state);
            return Ok(ActionOutcome::Rejected);
        }

        let resolution = match action {
            Action::Move(direction) => self.move_player(direction)?,
            Action::Wait => {
                self.message("You wait.");
                Resolution::Turn
            }
            Action::Rest => self.rest(),
            Action::ToggleInventory => {
                self.inventory_open = !self.inventory_open;
                if self.inventory_open {
                    self.selected_slot = 0;
                }
                Resolution::Free
            }
            Action::SelectItem(slot) => self.select_item(slot),
            Action::UseSelectedItem => self.use_selected_item(),
            Action::OpenDoor => self.open_door()?,
        };

        Ok(match resolution {
            Resolution::Turn => {
                self.refresh_fov();
                self.run_monsters();
                self.end_turn();
                ActionOutcome::TurnTaken
            }
            Resolution::TurnWithoutMonsters => {
                // The transition already computed FOV for the map it arrived on.
                self.end_turn();
                ActionOutcome::TurnTaken
            }
            Resolution::Free => ActionOutcome::Free,
            Resolution::Rejected => ActionOutcome::Rejected,
        })
    }

    /// Stores the presentation layer's screen size. The engine never reads it.
    pub fn set_screen_size(&mut self, width: u32, height: u32) {
        self.screen_size = (width, height);
    }

    // Queries

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn is_playing(&self) -> bool {
        self.run_state == RunState::Playing
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn turn(&self) -> u64 {
        self.turn
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn in_special_room(&self) -> bool {
        matches!(self.location, Location::SpecialRoom(_))
    }

    /// The map the player is on.
    pub fn active_level(&self) -> &LevelState {
        match &self.location {
            Location::MainDungeon => &self.dungeon,
            Location::SpecialRoom(visit) => &visit.room.level,
        }
    }

    pub fn active_level_mut(&mut self) -> &mut LevelState {
        select_level(&mut self.dungeon, &mut self.location)
    }

    pub fn grid(&self) -> &TileGrid {
        &self.active_level().grid
    }

    pub fn monsters(&self) -> &[Monster] {
        &self.active_level().monsters
    }

    pub fn items(&self) -> &[GroundItem] {
        &self.active_level().items
    }

    pub fn fov(&self) -> &FieldOfView {
        &self.active_level().fov
    }

    /// Special doors on the main level, with the rooms behind them.
    pub fn special_rooms(&self) -> &[SpecialRoomPlan] {
        &self.special_plans
    }

    pub fn cached_special_room(&self, door: Position) -> Option<&SpecialRoomState> {
        self.special_cache.get(&door)
    }

    pub fn is_special_door_unlocked(&self, door: Position) -> bool {
        self.unlocked_special_doors.contains(&door)
    }

    pub fn effects(&self) -> &ActiveEffects {
        &self.effects
    }

    pub fn inventory(&self) -> &[ItemId] {
        &self.player.inventory
    }

    pub fn inventory_open(&self) -> bool {
        self.inventory_open
    }

    pub fn selected_slot(&self) -> usize {
        self.selected_slot
    }

    pub fn messages(&self) -> &MessageLog {
        &self.messages
    }

    pub fn screen_size(&self) -> (u32, u32) {
        self.screen_size
    }

    /// Takes every event queued since the last call.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // Action handlers

    fn move_player(&mut self, direction: Direction) -> DelveResult<Resolution> {
        let from = self.player.position;
        let target = from + direction.to_delta();
        let level = self.active_level();

        let kind = match level.grid.kind_at(target) {
            Some(kind) if kind != TileKind::Wall => kind,
            _ => {
                self.emit(GameEvent::PlayerBumped { at: target });
                self.message("You bump into a wall.");
                return Ok(Resolution::Rejected);
            }
        };

        if let Some(index) = monster_at(&level.monsters, target) {
            self.attack_monster(index);
            return Ok(Resolution::Turn);
        }

        match kind {
            TileKind::LockedDoor => {
                self.emit(GameEvent::PlayerBumped { at: target });
                self.message("The door is locked.");
                Ok(Resolution::Rejected)
            }
            TileKind::SpecialDoor => {
                if !self.in_special_room() && self.unlocked_special_doors.contains(&target) {
                    self.enter_special_room(target)?;
                    Ok(Resolution::TurnWithoutMonsters)
                } else {
                    self.emit(GameEvent::PlayerBumped { at: target });
                    self.message("The ornate door is sealed. It needs a Special Key.");
                    Ok(Resolution::Rejected)
                }
            }
            TileKind::Exit => {
                self.descend()?;
                Ok(Resolution::TurnWithoutMonsters)
            }
            TileKind::SpecialExit if self.in_special_room() => {
                self.leave_special_room();
                Ok(Resolution::Turn)
            }
            _ => {
                if let Some(index) = item_at(&self.active_level().items, target) {
                    self.pick_up(index);
                }
                self.player.position = target;
                self.emit(GameEvent::PlayerMoved { from, to: target });
                Ok(Resolution::Turn)
            }
        }
    }

    fn attack_monster(&mut self, index: usize) {
        let damage = player_damage(&self.player, &mut self.rng);
        let level = select_level(&mut self.dungeon, &mut self.location);
        let monster = &mut level.monsters[index];
        monster.hp -= damage;
        let name = monster.name.clone();
        let killed = !monster.is_alive();
        let xp = monster.xp_value;
        if killed {
            level.monsters.remove(index);
        }

        self.emit(GameEvent::PlayerAttacked {
            target: name.clone(),
            damage,
        });
        self.message(format!("You hit the {} for {} damage.", name, damage));

        if killed {
            let gold = kill_gold(self.depth, &mut self.rng);
            self.player.gold += gold;
            self.emit(GameEvent::MonsterKilled {
                name: name.clone(),
                xp,
                gold,
            });
            self.message(format!(
                "The {} dies! You gain {} XP and {} gold.",
                name, xp, gold
            ));
            for reached in award_experience(&mut self.player, xp) {
                self.emit(GameEvent::LevelUp { level: reached });
                self.message(format!("You reach level {}!", reached));
            }
        }
    }

    fn pick_up(&mut self, index: usize) {
        let level = select_level(&mut self.dungeon, &mut self.location);
        let ground = level.items.remove(index);
        if ground.item == ItemId::Gold {
            let amount = self.rng.gen_range(1..=10) * self.depth.max(1);
            self.player.gold += amount;
            self.emit(GameEvent::GoldPickedUp { amount });
            self.message(format!("You pick up {} gold.", amount));
        } else {
            self.player.inventory.push(ground.item);
            self.emit(GameEvent::ItemPickedUp { item: ground.item });
            self.message(format!("You pick up the {}.", ground.item));
        }
    }

    fn rest(&mut self) -> Resolution {
        let amount = self.rng.gen_range(1..=3);
        let healed = self.player.heal(amount);
        self.message(format!("You rest and recover {} HP.", healed));
        Resolution::Turn
    }

    fn select_item(&mut self, slot: usize) -> Resolution {
        if slot < self.player.inventory.len() {
            self.selected_slot = slot;
            Resolution::Free
        } else {
            self.message("There is nothing in that slot.");
            Resolution::Rejected
        }
    }

    fn use_selected_item(&mut self) -> Resolution {
        if self.player.inventory.is_empty() {
            self.message("Your inventory is empty.");
            return Resolution::Rejected;
        }
        let slot = self.selected_slot.min(self.player.inventory.len() - 1);
        let item = self.player.inventory[slot];

        let mut ctx = EffectContext {
            player: &mut self.player,
            level: select_level(&mut self.dungeon, &mut self.location),
            effects: &mut self.effects,
            rng: &mut self.rng,
            turn: self.turn,
        };
        match use_item(item, &mut ctx) {
            ItemUse::Applied(text) => {
                self.player.inventory.remove(slot);
                self.selected_slot = slot.min(self.player.inventory.len().saturating_sub(1));
                self.emit(GameEvent::ItemUsed { item });
                self.message(text);
                Resolution::Turn
            }
            ItemUse::NotUsable(text) => {
                self.message(text);
                Resolution::Rejected
            }
        }
    }

    /// Tries the four orthogonal neighbours for a door to open. Always free.
    fn open_door(&mut self) -> DelveResult<Resolution> {
        let mut blocked_by: Option<&'static str> = None;

        for pos in self.player.position.cardinal_adjacent_positions() {
            match self.active_level().grid.kind_at(pos) {
                Some(TileKind::LockedDoor) => {
                    if self.player.take_item(ItemId::Key) {
                        self.active_level_mut().grid.set_kind(pos, TileKind::Exit)?;
                        self.emit(GameEvent::DoorUnlocked { at: pos });
                        self.message("You unlock the door. Stairs lead down.");
                        return Ok(Resolution::Free);
                    }
                    blocked_by = Some("The door is locked. You need a Key.");
                }
                Some(TileKind::SpecialDoor) if !self.in_special_room() => {
                    if self.unlocked_special_doors.contains(&pos) {
                        self.enter_special_room(pos)?;
                        return Ok(Resolution::Free);
                    }
                    if self.player.has_item(ItemId::SpecialKey) {
                        let room = self.prepare_special_room(pos)?;
                        self.player.take_item(ItemId::SpecialKey);
                        self.unlocked_special_doors.insert(pos);
                        self.emit(GameEvent::DoorUnlocked { at: pos });
                        self.message("The Special Key turns. The ornate door swings open.");
                        self.arrive_in_special_room(pos, room);
                        return Ok(Resolution::Free);
                    }
                    blocked_by = Some("The ornate door is sealed. It needs a Special Key.");
                }
                _ => {}
            }
        }

        self.message(blocked_by.unwrap_or("There is no door here."));
        Ok(Resolution::Rejected)
    }

    // Transitions

    /// Loads the room behind `door` from the cache or generates it. The
    /// cache is only read, so a failure leaves the state untouched.
    fn prepare_special_room(&mut self, door: Position) -> DelveResult<SpecialRoomState> {
        if let Some(cached) = self.special_cache.remove(&door) {
            return Ok(cached);
        }
        let plan = self
            .special_plans
            .iter()
            .find(|plan| plan.door == door)
            .copied()
            .ok_or_else(|| {
                DelveError::InvalidState(format!("no special room behind the door at {}", door))
            })?;
        let generated = SpecialRoomGenerator::new(plan, self.depth, self.difficulty)
            .generate(&self.config.generation, &mut self.rng)?;
        Ok(generated.into())
    }

    fn enter_special_room(&mut self, door: Position) -> DelveResult<()> {
        let room = self.prepare_special_room(door)?;
        self.arrive_in_special_room(door, room);
        Ok(())
    }

    fn arrive_in_special_room(&mut self, door: Position, mut room: SpecialRoomState) {
        let return_to = self.player.position;

        let arrival = if is_blocked(
            &room.level.grid,
            &room.level.monsters,
            return_to,
            room.entry,
            None,
        ) {
            nearest_free_cell(&room, return_to).unwrap_or(room.entry)
        } else {
            room.entry
        };

        room.level.fov = FieldOfView::new(room.level.grid.width(), room.level.grid.height());
        let area = room.room;
        self.location = Location::SpecialRoom(Box::new(SpecialRoomVisit {
            door,
            return_to,
            room,
        }));
        self.player.position = arrival;

        self.refresh_fov();
        self.active_level_mut()
            .fov
            .reveal_area(area.top_left, area.bottom_right());

        self.emit(GameEvent::EnteredSpecialRoom { door });
        self.message("You step into a hidden vault.");
    }

    fn leave_special_room(&mut self) {
        let location = std::mem::replace(&mut self.location, Location::MainDungeon);
        if let Location::SpecialRoom(visit) = location {
            let SpecialRoomVisit {
                door,
                return_to,
                room,
            } = *visit;
            self.special_cache.insert(door, room);
            self.player.position = return_to;
            self.emit(GameEvent::LeftSpecialRoom { door });
            self.message("You return to the dungeon.");
        }
    }

    fn descend(&mut self) -> DelveResult<()> {
        if self.depth >= self.config.final_depth {
            self.run_state = RunState::GameOver {
                outcome: Outcome::Won,
            };
            self.emit(GameEvent::Victory);
            self.message("You find the way out of the dungeon. You win!");
            log::info!("run won after {} turns", self.turn);
            return Ok(());
        }

        self.depth += 1;
        let generated = match self.generate_dungeon() {
            Ok(generated) => generated,
            Err(err) => {
                self.depth -= 1;
                return Err(err);
            }
        };
        self.player.position = generated.spawn;
        self.install_level(generated);

        self.emit(GameEvent::Descended { depth: self.depth });
        self.message(format!("You descend to depth {}.", self.depth));
        log::debug!("descended to depth {}", self.depth);
        Ok(())
    }

    /// Generates the main level for the current depth, retrying on failure.
    fn generate_dungeon(&mut self) -> DelveResult<GeneratedLevel> {
        let generator = RoomCorridorGenerator::new(self.depth, self.difficulty);
        let mut last_error = None;
        for attempt in 1..=GENERATION_ATTEMPTS {
            match generator.generate(&self.config.generation, &mut self.rng) {
                Ok(level) => return Ok(level),
                Err(err) => {
                    log::warn!(
                        "{} attempt {} failed: {}",
                        generator.generator_type(),
                        attempt,
                        err
                    );
                    last_error = Some(err);
                }
            }
        }
        Err(last_error.unwrap_or_else(|| {
            DelveError::GenerationFailed("no generation attempt was made".to_string())
        }))
    }

    /// Makes a generated level the main dungeon and drops everything tied to
    /// the previous one.
    fn install_level(&mut self, generated: GeneratedLevel) {
        self.dungeon = LevelState::new(generated.grid, generated.monsters, generated.items);
        self.special_plans = generated.special_rooms;
        self.special_cache.clear();
        self.unlocked_special_doors.clear();
        self.location = Location::MainDungeon;
        self.refresh_fov();
    }

    // Turn plumbing

    fn run_monsters(&mut self) {
        let level = select_level(&mut self.dungeon, &mut self.location);
        let attacks = run_monster_turns(level, &mut self.player, &mut self.rng);
        for attack in attacks {
            self.message(format!(
                "The {} hits you for {} damage.",
                attack.attacker, attack.damage
            ));
            self.emit(GameEvent::PlayerHit {
                attacker: attack.attacker,
                damage: attack.damage,
            });
        }

        if !self.player.is_alive() {
            self.run_state = RunState::GameOver {
                outcome: Outcome::Lost,
            };
            self.emit(GameEvent::PlayerDied);
            self.message("You die...");
            log::info!("run lost at depth {} after {} turns", self.depth, self.turn);
        }
    }

    fn end_turn(&mut self) {
        self.turn += 1;
        for item in self.effects.update(&mut self.player, self.turn) {
            self.emit(GameEvent::EffectExpired { item });
            self.message(format!("The {} wears off.", item));
        }
    }

    fn refresh_fov(&mut self) {
        let center = self.player.position;
        let radius = self.config.fov_radius;
        self.active_level_mut().fov.update(center, radius);
    }

    fn emit(&mut self, event: GameEvent) {
        if let Some(sound) = event.sound() {
            self.sound.play(sound);
        }
        self.events.push(event);
    }

    fn message(&mut self, text: impl Into<String>) {
        self.messages.push(text);
    }
}

/// Picks the active map without borrowing the rest of the state.
fn select_level<'a>(dungeon: &'a mut LevelState, location: &'a mut Location) -> &'a mut LevelState {
    match location {
        Location::MainDungeon => dungeon,
        Location::SpecialRoom(visit) => &mut visit.room.level,
    }
}

/// Closest unoccupied interior floor cell to the room's entry.
fn nearest_free_cell(room: &SpecialRoomState, player: Position) -> Option<Position> {
    room.room
        .floor_positions()
        .into_iter()
        .filter(|&pos| {
            room.level.grid.kind_at(pos) == Some(TileKind::Floor)
                && !is_blocked(&room.level.grid, &room.level.monsters, player, pos, None)
        })
        .min_by_key(|&pos| (pos.chebyshev_distance(room.entry), pos))
}
