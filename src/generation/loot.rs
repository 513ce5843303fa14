//! # Item Generation
//!
//! Item pools that entity placement draws floor loot from.

use crate::ItemId;
use rand::seq::SliceRandom;
use rand::Rng;

/// Items found lying around ordinary rooms.
pub const BASIC_ITEM_POOL: [ItemId; 7] = [
    ItemId::Gold,
    ItemId::Food,
    ItemId::Dagger,
    ItemId::LeatherArmor,
    ItemId::HealingPotion,
    ItemId::ScrollOfTeleport,
    ItemId::Key,
];

/// Items reserved for special rooms.
pub const ENHANCED_ITEM_POOL: [ItemId; 7] = [
    ItemId::LongSword,
    ItemId::ChainMail,
    ItemId::GreaterHealingPotion,
    ItemId::PotionOfStrength,
    ItemId::PotionOfIronskin,
    ItemId::ScrollOfMapping,
    ItemId::ScrollOfConfusion,
];

/// Which pool a room draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemPool {
    Basic,
    Enhanced,
}

impl ItemPool {
    pub fn items(self) -> &'static [ItemId] {
        match self {
            ItemPool::Basic => &BASIC_ITEM_POOL,
            ItemPool::Enhanced => &ENHANCED_ITEM_POOL,
        }
    }

    /// Draws one item uniformly from the pool.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{ItemPool, ENHANCED_ITEM_POOL};
    /// use rand::{rngs::StdRng, SeedableRng};
    ///
    /// let mut rng = StdRng::seed_from_u64(3);
    /// let item = ItemPool::Enhanced.roll(&mut rng);
    /// assert!(ENHANCED_ITEM_POOL.contains(&item));
    /// ```
    pub fn roll<R: Rng + ?Sized>(self, rng: &mut R) -> ItemId {
        // Both pools are non-empty constants.
        *self.items().choose(rng).unwrap_or(&ItemId::Gold)
    }
}
