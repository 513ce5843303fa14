//! # Item/Effect Registry
//!
//! Maps every [`ItemId`] to a descriptor (kind, effect, optional duration),
//! applies item effects, and tracks timed buffs until they expire.

use crate::{is_blocked, LevelState, Player, Position, TileKind};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Every item the dungeon can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ItemId {
    Gold,
    Food,
    Dagger,
    LeatherArmor,
    HealingPotion,
    ScrollOfTeleport,
    Key,
    SpecialKey,
    LongSword,
    ChainMail,
    GreaterHealingPotion,
    PotionOfStrength,
    PotionOfIronskin,
    ScrollOfMapping,
    ScrollOfConfusion,
}

/// Category tag of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    Weapon,
    Armor,
    Potion,
    Scroll,
    Food,
    Key,
    Currency,
}

/// What using an item does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemEffect {
    /// Not usable from the inventory.
    None,
    Heal(i32),
    RaiseAttack(i32),
    RaiseDefense(i32),
    /// Temporary stat bonus; the descriptor's `duration` says for how long.
    Boost { attack: i32, defense: i32 },
    Teleport,
    RevealMap,
    ConfuseMonsters,
}

/// Static description of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemDescriptor {
    pub name: &'static str,
    pub kind: ItemKind,
    pub effect: ItemEffect,
    /// Turns a timed effect lasts
    pub duration: Option<u64>,
}

impl ItemId {
    /// Looks up the registry entry for this item.
    pub fn descriptor(self) -> ItemDescriptor {
        use ItemEffect::*;
        let (name, kind, effect, duration) = match self {
            ItemId::Gold => ("Gold", ItemKind::Currency, None, Option::None),
            ItemId::Food => ("Food", ItemKind::Food, Heal(5), Option::None),
            ItemId::Dagger => ("Dagger", ItemKind::Weapon, RaiseAttack(2), Option::None),
            ItemId::LeatherArmor => ("Leather Armor", ItemKind::Armor, RaiseDefense(1), Option::None),
            ItemId::HealingPotion => ("Healing Potion", ItemKind::Potion, Heal(10), Option::None),
            ItemId::ScrollOfTeleport => ("Scroll of Teleport", ItemKind::Scroll, Teleport, Option::None),
            ItemId::Key => ("Key", ItemKind::Key, None, Option::None),
            ItemId::SpecialKey => ("Special Key", ItemKind::Key, None, Option::None),
            ItemId::LongSword => ("Long Sword", ItemKind::Weapon, RaiseAttack(4), Option::None),
            ItemId::ChainMail => ("Chain Mail", ItemKind::Armor, RaiseDefense(3), Option::None),
            ItemId::GreaterHealingPotion => {
                ("Greater Healing Potion", ItemKind::Potion, Heal(25), Option::None)
            }
            ItemId::PotionOfStrength => (
                "Potion of Strength",
                ItemKind::Potion,
                Boost { attack: 3, defense: 0 },
                Some(20),
            ),
            ItemId::PotionOfIronskin => (
                "Potion of Ironskin",
                ItemKind::Potion,
                Boost { attack: 0, defense: 3 },
                Some(20),
            ),
            ItemId::ScrollOfMapping => ("Scroll of Mapping", ItemKind::Scroll, RevealMap, Option::None),
            ItemId::ScrollOfConfusion => {
                ("Scroll of Confusion", ItemKind::Scroll, ConfuseMonsters, Option::None)
            }
        };
        ItemDescriptor {
            name,
            kind,
            effect,
            duration,
        }
    }

    pub fn name(self) -> &'static str {
        self.descriptor().name
    }

    /// All items, in declaration order.
    pub fn all() -> [ItemId; 15] {
        [
            ItemId::Gold,
            ItemId::Food,
            ItemId::Dagger,
            ItemId::LeatherArmor,
            ItemId::HealingPotion,
            ItemId::ScrollOfTeleport,
            ItemId::Key,
            ItemId::SpecialKey,
            ItemId::LongSword,
            ItemId::ChainMail,
            ItemId::GreaterHealingPotion,
            ItemId::PotionOfStrength,
            ItemId::PotionOfIronskin,
            ItemId::ScrollOfMapping,
            ItemId::ScrollOfConfusion,
        ]
    }

    /// Case-insensitive lookup by display name.
    pub fn from_name(name: &str) -> Option<ItemId> {
        ItemId::all()
            .into_iter()
            .find(|item| item.name().eq_ignore_ascii_case(name.trim()))
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A timed stat bonus that is still running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveEffect {
    pub item: ItemId,
    pub attack_bonus: i32,
    pub defense_bonus: i32,
    pub expires_at: u64,
}

/// Running timed effects, at most one per item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveEffects {
    effects: BTreeMap<ItemId, ActiveEffect>,
}

impl ActiveEffects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a timed bonus from `item` starting at `turn`.
    ///
    /// Reapplying an item that is still active replaces its record rather
    /// than stacking: the old bonus is removed before the new one is added.
    pub fn apply(
        &mut self,
        player: &mut Player,
        item: ItemId,
        attack_bonus: i32,
        defense_bonus: i32,
        duration: u64,
        turn: u64,
    ) {
        if let Some(previous) = self.effects.remove(&item) {
            revert(player, &previous);
        }
        player.attack += attack_bonus;
        player.defense += defense_bonus;
        self.effects.insert(
            item,
            ActiveEffect {
                item,
                attack_bonus,
                defense_bonus,
                expires_at: turn + duration,
            },
        );
    }

    /// Expires every effect with `turn >= expires_at`, returning the items
    /// whose effects ended.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{ActiveEffects, CharacterClass, Difficulty, ItemId, Player, Position};
    ///
    /// let mut player = Player::new(CharacterClass::Warrior, Difficulty::Normal, Position::new(1, 1));
    /// let base = player.attack;
    /// let mut effects = ActiveEffects::new();
    /// effects.apply(&mut player, ItemId::PotionOfStrength, 3, 0, 20, 10);
    ///
    /// assert!(effects.update(&mut player, 29).is_empty());
    /// assert_eq!(player.attack, base + 3);
    /// assert_eq!(effects.update(&mut player, 30), vec![ItemId::PotionOfStrength]);
    /// assert_eq!(player.attack, base);
    /// ```
    pub fn update(&mut self, player: &mut Player, turn: u64) -> Vec<ItemId> {
        let expired: Vec<ItemId> = self
            .effects
            .values()
            .filter(|effect| turn >= effect.expires_at)
            .map(|effect| effect.item)
            .collect();

        for item in &expired {
            if let Some(effect) = self.effects.remove(item) {
                revert(player, &effect);
            }
        }
        expired
    }

    pub fn get(&self, item: ItemId) -> Option<&ActiveEffect> {
        self.effects.get(&item)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActiveEffect> {
        self.effects.values()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }
}

fn revert(player: &mut Player, effect: &ActiveEffect) {
    player.attack -= effect.attack_bonus;
    player.defense -= effect.defense_bonus;
}

/// Everything an item effect may touch.
pub struct EffectContext<'a> {
    pub player: &'a mut Player,
    pub level: &'a mut LevelState,
    pub effects: &'a mut ActiveEffects,
    pub rng: &'a mut StdRng,
    pub turn: u64,
}

/// Result of trying to use an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemUse {
    /// The effect happened; the item is spent and the turn is used.
    Applied(String),
    /// Nothing happened; the item stays and no turn passes.
    NotUsable(String),
}

/// Probability that each monster is displaced by a Scroll of Confusion.
const CONFUSE_CHANCE: f64 = 0.5;

/// Applies `item`'s effect.
pub fn use_item(item: ItemId, ctx: &mut EffectContext<'_>) -> ItemUse {
    let descriptor = item.descriptor();
    match descriptor.effect {
        ItemEffect::None => match descriptor.kind {
            ItemKind::Currency => {
                ItemUse::NotUsable("Gold goes straight into your purse.".to_string())
            }
            ItemKind::Key => ItemUse::NotUsable(format!(
                "The {} is used by opening a door next to you.",
                descriptor.name
            )),
            _ => ItemUse::NotUsable(format!("You can't use the {} right now.", descriptor.name)),
        },
        ItemEffect::Heal(amount) => {
            let healed = ctx.player.heal(amount);
            ItemUse::Applied(format!(
                "You use the {} and recover {} HP.",
                descriptor.name, healed
            ))
        }
        ItemEffect::RaiseAttack(amount) => {
            ctx.player.attack += amount;
            ItemUse::Applied(format!(
                "You wield the {}. Attack +{}.",
                descriptor.name, amount
            ))
        }
        ItemEffect::RaiseDefense(amount) => {
            ctx.player.defense += amount;
            ItemUse::Applied(format!(
                "You put on the {}. Defense +{}.",
                descriptor.name, amount
            ))
        }
        ItemEffect::Boost { attack, defense } => {
            let duration = descriptor.duration.unwrap_or(1);
            ctx.effects
                .apply(ctx.player, item, attack, defense, duration, ctx.turn);
            ItemUse::Applied(format!(
                "You drink the {}. You feel stronger for {} turns.",
                descriptor.name, duration
            ))
        }
        ItemEffect::Teleport => match teleport_target(ctx) {
            Some(target) => {
                ctx.player.position = target;
                ItemUse::Applied(format!("The {} whisks you away!", descriptor.name))
            }
            None => ItemUse::NotUsable(format!("You can't use the {} right now.", descriptor.name)),
        },
        ItemEffect::RevealMap => {
            ctx.level.fov.reveal_all();
            ItemUse::Applied("The layout of the level is revealed!".to_string())
        }
        ItemEffect::ConfuseMonsters => {
            let moved = confuse_monsters(ctx, CONFUSE_CHANCE);
            ItemUse::Applied(format!(
                "A wave of confusion washes over the level. {} monsters stagger.",
                moved
            ))
        }
    }
}

/// A random floor tile nothing stands or lies on.
fn teleport_target(ctx: &mut EffectContext<'_>) -> Option<Position> {
    let level = &*ctx.level;
    let player = ctx.player.position;
    let candidates: Vec<Position> = level
        .grid
        .positions_of(TileKind::Floor)
        .filter(|&pos| {
            !is_blocked(&level.grid, &level.monsters, player, pos, Some(&level.items))
        })
        .collect();
    candidates.choose(ctx.rng).copied()
}

/// Nudges each monster, with probability `chance`, onto a random free neighbour.
fn confuse_monsters(ctx: &mut EffectContext<'_>, chance: f64) -> usize {
    let player = ctx.player.position;
    let mut moved = 0;
    for index in 0..ctx.level.monsters.len() {
        if !ctx.rng.gen_bool(chance) {
            continue;
        }
        let level = &*ctx.level;
        let from = level.monsters[index].position;
        let options: Vec<Position> = from
            .adjacent_positions()
            .into_iter()
            .filter(|&pos| !is_blocked(&level.grid, &level.monsters, player, pos, None))
            .collect();
        if let Some(&to) = options.choose(ctx.rng) {
            ctx.level.monsters[index].position = to;
            moved += 1;
        }
    }
    moved
}
