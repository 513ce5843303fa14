//! # Combat
//!
//! Damage rolls, kill rewards and level-ups.

use crate::{config, Monster, Player};
use rand::Rng;

/// Largest random reduction applied to the player's blows. Monsters have no
/// defense stat, so this stands in for one.
pub const MONSTER_MITIGATION: i32 = 2;

/// Rolls damage as `max(1, power - random(0..=mitigation))`.
///
/// # Examples
///
/// ```
/// use delve::roll_damage;
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let mut rng = StdRng::seed_from_u64(1);
/// let damage = roll_damage(1, 10, &mut rng);
/// assert_eq!(damage, 1);
/// ```
pub fn roll_damage<R: Rng + ?Sized>(power: i32, mitigation: i32, rng: &mut R) -> i32 {
    let reduction = rng.gen_range(0..=mitigation.max(0));
    (power - reduction).max(1)
}

/// Damage the player deals to a monster.
pub fn player_damage<R: Rng + ?Sized>(player: &Player, rng: &mut R) -> i32 {
    roll_damage(player.attack, MONSTER_MITIGATION, rng)
}

/// Damage a monster deals to the player, mitigated by the player's defense.
pub fn monster_damage<R: Rng + ?Sized>(monster: &Monster, player: &Player, rng: &mut R) -> i32 {
    roll_damage(monster.attack, player.defense, rng)
}

/// Gold dropped by a slain monster.
pub fn kill_gold<R: Rng + ?Sized>(depth: u32, rng: &mut R) -> u32 {
    rng.gen_range(1..=5) * depth.max(1)
}

/// Adds experience and applies every level-up it pays for.
///
/// Returns the levels reached, in order. Each level costs `level * 10`
/// experience and grants +5 max HP (with a full heal), +2 attack and
/// +1 defense.
///
/// # Examples
///
/// ```
/// use delve::{award_experience, CharacterClass, Difficulty, Player, Position};
///
/// let mut player = Player::new(CharacterClass::Warrior, Difficulty::Normal, Position::new(0, 0));
/// player.xp = 9;
/// assert_eq!(award_experience(&mut player, 5), vec![2]);
/// assert_eq!(player.xp, 14);
/// ```
pub fn award_experience(player: &mut Player, xp: u32) -> Vec<u32> {
    player.xp += xp;
    let mut reached = Vec::new();
    while player.xp >= player.xp_to_next_level() {
        player.level += 1;
        player.max_hp += config::LEVEL_UP_HP;
        player.hp = player.max_hp;
        player.attack += config::LEVEL_UP_ATTACK;
        player.defense += config::LEVEL_UP_DEFENSE;
        reached.push(player.level);
    }
    reached
}
