//! Turn-based combat: enemies, damage math, class abilities, and the battle
//! state machine.
//!
//! Damage math is pure; everything stochastic (Rogue crits, escape rolls)
//! takes `&mut impl Rng` so callers and tests control the dice.

use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::character::{Character, CharacterClass};
use crate::constants::{
    CLERIC_HEAL_AMOUNT, DEFENSE_DIVISOR, ESCAPE_CHANCE, MAGE_FIREBALL_MULTIPLIER,
    MIN_ATTACK_DAMAGE, ROGUE_CRIT_CHANCE, ROGUE_CRIT_MULTIPLIER, WARRIOR_STRIKE_MULTIPLIER,
};
use crate::error::{GameError, GameResult};
use crate::progression;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    Goblin,
    Orc,
    Dragon,
}

impl EnemyKind {
    pub fn name(&self) -> &'static str {
        match self {
            EnemyKind::Goblin => "Goblin",
            EnemyKind::Orc => "Orc",
            EnemyKind::Dragon => "Dragon",
        }
    }

    /// Base (health, strength, magic, xp reward, gold reward).
    fn base_stats(&self) -> (u32, u32, u32, u64, u32) {
        match self {
            EnemyKind::Goblin => (50, 8, 2, 25, 10),
            EnemyKind::Orc => (80, 12, 5, 50, 25),
            EnemyKind::Dragon => (200, 25, 15, 200, 100),
        }
    }

    /// The enemy tier matched to a character level.
    ///
    /// Levels 1-2 meet goblins, 3-5 orcs, 6+ dragons.
    pub fn for_level(level: u32) -> EnemyKind {
        match level {
            0..=2 => EnemyKind::Goblin,
            3..=5 => EnemyKind::Orc,
            _ => EnemyKind::Dragon,
        }
    }
}

impl FromStr for EnemyKind {
    type Err = GameError;

    fn from_str(s: &str) -> GameResult<Self> {
        match s.to_lowercase().as_str() {
            "goblin" => Ok(EnemyKind::Goblin),
            "orc" => Ok(EnemyKind::Orc),
            "dragon" => Ok(EnemyKind::Dragon),
            other => Err(GameError::InvalidTarget(other.to_string())),
        }
    }
}

/// A transient combat opponent. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enemy {
    pub name: String,
    pub kind: EnemyKind,
    pub health: u32,
    pub max_health: u32,
    pub strength: u32,
    pub magic: u32,
    pub xp_reward: u64,
    pub gold_reward: u32,
}

impl Enemy {
    pub fn spawn(kind: EnemyKind) -> Self {
        let (health, strength, magic, xp_reward, gold_reward) = kind.base_stats();
        Self {
            name: kind.name().to_string(),
            kind,
            health,
            max_health: health,
            strength,
            magic,
            xp_reward,
            gold_reward,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn take_damage(&mut self, amount: u32) {
        self.health = self.health.saturating_sub(amount);
    }
}

/// Basic-attack damage: `max(1, attacker_strength - defender_strength / 4)`.
pub fn attack_damage(attacker_strength: u32, defender_strength: u32) -> u32 {
    let defense = defender_strength / DEFENSE_DIVISOR;
    attacker_strength
        .saturating_sub(defense)
        .max(MIN_ATTACK_DAMAGE)
}

/// What a class special ability did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbilityOutcome {
    /// Physical or magical damage dealt to the enemy.
    Damage { amount: u32, magical: bool },
    /// The Rogue's gamble came up empty.
    Miss,
    /// The Cleric's self-heal, reporting the health actually restored.
    Heal { amount: u32 },
}

/// Executes the character's class-specific special ability.
///
/// Warrior: 2x strength physical damage. Mage: 2x magic magical damage.
/// Rogue: 50% chance of 3x strength damage, otherwise a miss. Cleric:
/// restores 30 health to self, clamped to max health.
pub fn use_special_ability(
    character: &mut Character,
    enemy: &mut Enemy,
    rng: &mut impl Rng,
) -> AbilityOutcome {
    match character.class {
        CharacterClass::Warrior => {
            let amount = character.strength * WARRIOR_STRIKE_MULTIPLIER;
            enemy.take_damage(amount);
            AbilityOutcome::Damage {
                amount,
                magical: false,
            }
        }
        CharacterClass::Mage => {
            let amount = character.magic * MAGE_FIREBALL_MULTIPLIER;
            enemy.take_damage(amount);
            AbilityOutcome::Damage {
                amount,
                magical: true,
            }
        }
        CharacterClass::Rogue => {
            if rng.gen_bool(ROGUE_CRIT_CHANCE) {
                let amount = character.strength * ROGUE_CRIT_MULTIPLIER;
                enemy.take_damage(amount);
                AbilityOutcome::Damage {
                    amount,
                    magical: false,
                }
            } else {
                AbilityOutcome::Miss
            }
        }
        CharacterClass::Cleric => {
            let amount = progression::heal(character, CLERIC_HEAL_AMOUNT as i32);
            AbilityOutcome::Heal { amount }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    Player,
    Enemy,
    /// The battle ended by a successful escape; nobody won.
    Escaped,
}

/// The result of one finished battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleOutcome {
    pub winner: Winner,
    pub xp_gained: u64,
    pub gold_gained: u32,
    pub turns: u32,
}

/// One combat encounter binding a character and an enemy.
///
/// Turn order is fixed: the character always acts before the enemy within a
/// round. The active flag is advisory; re-entrant use during a battle is the
/// caller's responsibility to prevent.
pub struct Battle<'a> {
    character: &'a mut Character,
    enemy: Enemy,
    turn: u32,
    active: bool,
}

impl<'a> Battle<'a> {
    pub fn new(character: &'a mut Character, enemy: Enemy) -> Self {
        Self {
            character,
            enemy,
            turn: 0,
            active: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn enemy(&self) -> &Enemy {
        &self.enemy
    }

    pub fn character(&self) -> &Character {
        self.character
    }

    /// Runs the battle to completion with basic attacks on both sides.
    ///
    /// Fails `CharacterDead` if the character is already dead. On player
    /// victory the enemy's rewards are granted through the progression
    /// paths.
    pub fn start(&mut self) -> GameResult<BattleOutcome> {
        self.begin()?;
        loop {
            if let Some(outcome) = self.round()? {
                return Ok(outcome);
            }
        }
    }

    /// Marks the battle active without running any turns, for callers that
    /// drive combat one action at a time.
    pub fn begin(&mut self) -> GameResult<()> {
        if self.character.is_dead() {
            return Err(GameError::CharacterDead(self.character.name.clone()));
        }
        self.active = true;
        debug!(
            character = self.character.name.as_str(),
            enemy = self.enemy.name.as_str(),
            "battle started"
        );
        Ok(())
    }

    /// One full round: character attacks, then (if still standing) the
    /// enemy answers. Returns the outcome when the battle ends.
    pub fn round(&mut self) -> GameResult<Option<BattleOutcome>> {
        self.ensure_active()?;
        self.turn += 1;

        if let Some(outcome) = self.player_attack()? {
            return Ok(Some(outcome));
        }
        self.enemy_attack()
    }

    /// The character lands a basic attack. Ends the battle if the enemy
    /// falls.
    pub fn player_attack(&mut self) -> GameResult<Option<BattleOutcome>> {
        self.ensure_active()?;
        let damage = attack_damage(self.character.strength, self.enemy.strength);
        self.enemy.take_damage(damage);
        if !self.enemy.is_alive() {
            return Ok(Some(self.finish(Winner::Player)?));
        }
        Ok(None)
    }

    /// The character uses their class ability. Ends the battle if the enemy
    /// falls.
    pub fn player_special(&mut self, rng: &mut impl Rng) -> GameResult<Option<BattleOutcome>> {
        self.ensure_active()?;
        use_special_ability(self.character, &mut self.enemy, rng);
        if !self.enemy.is_alive() {
            return Ok(Some(self.finish(Winner::Player)?));
        }
        Ok(None)
    }

    /// The enemy answers with a basic attack. Ends the battle if the
    /// character falls.
    pub fn enemy_attack(&mut self) -> GameResult<Option<BattleOutcome>> {
        self.ensure_active()?;
        let damage = attack_damage(self.enemy.strength, self.character.strength);
        self.character.health = self.character.health.saturating_sub(damage);
        if self.character.is_dead() {
            return Ok(Some(self.finish(Winner::Enemy)?));
        }
        Ok(None)
    }

    /// Attempts to flee: 50% per attempt, independent. Success ends the
    /// battle immediately with no winner and no reward.
    pub fn attempt_escape(&mut self, rng: &mut impl Rng) -> GameResult<Option<BattleOutcome>> {
        self.ensure_active()?;
        if rng.gen_bool(ESCAPE_CHANCE) {
            return Ok(Some(self.finish(Winner::Escaped)?));
        }
        Ok(None)
    }

    fn ensure_active(&self) -> GameResult<()> {
        if self.active {
            Ok(())
        } else {
            Err(GameError::CombatNotActive)
        }
    }

    fn finish(&mut self, winner: Winner) -> GameResult<BattleOutcome> {
        self.active = false;
        let (xp_gained, gold_gained) = match winner {
            Winner::Player => (self.enemy.xp_reward, self.enemy.gold_reward),
            Winner::Enemy | Winner::Escaped => (0, 0),
        };
        if winner == Winner::Player {
            progression::gain_experience(self.character, xp_gained)?;
            progression::add_gold(self.character, i64::from(gold_gained))?;
        }
        info!(
            character = self.character.name.as_str(),
            enemy = self.enemy.name.as_str(),
            ?winner,
            turns = self.turn,
            "battle ended"
        );
        Ok(BattleOutcome {
            winner,
            xp_gained,
            gold_gained,
            turns: self.turn,
        })
    }
}
