//! Experience accrual, leveling, gold, healing, and revival.

use tracing::info;

use crate::character::Character;
use crate::constants::{
    LEVEL_UP_HEALTH_GAIN, LEVEL_UP_MAGIC_GAIN, LEVEL_UP_STRENGTH_GAIN, XP_PER_LEVEL,
};
use crate::error::{GameError, GameResult};

/// Experience required to advance past `level`.
pub fn xp_for_next_level(level: u32) -> u64 {
    u64::from(level) * XP_PER_LEVEL
}

/// Awards experience and applies any level-ups it triggers.
///
/// A single large award may trigger several level-ups; the loop terminates
/// because the threshold grows with each level while the award is finite.
/// Each level-up grants +10 max health, +2 strength, +2 magic and restores
/// health to the new maximum.
///
/// Returns the number of levels gained.
pub fn gain_experience(character: &mut Character, amount: u64) -> GameResult<u32> {
    if character.is_dead() {
        return Err(GameError::CharacterDead(character.name.clone()));
    }

    character.experience += amount;

    let mut levels_gained = 0;
    while character.experience >= xp_for_next_level(character.level) {
        character.level += 1;
        character.max_health += LEVEL_UP_HEALTH_GAIN;
        character.strength += LEVEL_UP_STRENGTH_GAIN;
        character.magic += LEVEL_UP_MAGIC_GAIN;
        character.health = character.max_health;
        levels_gained += 1;
        info!(
            name = character.name.as_str(),
            level = character.level,
            "level up"
        );
    }

    Ok(levels_gained)
}

/// Credits or debits gold. A debit past zero fails with no mutation.
///
/// Returns the new gold total.
pub fn add_gold(character: &mut Character, delta: i64) -> GameResult<u32> {
    let next = i64::from(character.gold) + delta;
    if next < 0 {
        return Err(GameError::InsufficientGold {
            needed: delta.unsigned_abs().min(u64::from(u32::MAX)) as u32,
            held: character.gold,
        });
    }
    character.gold = next.min(i64::from(u32::MAX)) as u32;
    Ok(character.gold)
}

/// Heals up to `amount`, never past max health.
///
/// A negative amount is a no-op; damage is not modeled through this entry
/// point. Returns the amount actually applied.
pub fn heal(character: &mut Character, amount: i32) -> u32 {
    if amount <= 0 {
        return 0;
    }
    let missing = character.max_health - character.health;
    let applied = missing.min(amount as u32);
    character.health += applied;
    applied
}

/// Revives a dead character at half max health, rounded up.
///
/// Returns false (no mutation) if the character is still alive.
pub fn revive(character: &mut Character) -> bool {
    if !character.is_dead() {
        return false;
    }
    // Ceiling keeps revival non-zero even at max_health == 1.
    character.health = (character.max_health + 1) / 2;
    info!(
        name = character.name.as_str(),
        health = character.health,
        "revived"
    );
    true
}
