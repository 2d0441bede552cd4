//! The player character model: classes, stats, and invariants.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{MAX_INVENTORY_SIZE, STARTING_GOLD, STARTING_LEVEL};
use crate::error::{GameError, GameResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CharacterClass {
    Warrior,
    Mage,
    Rogue,
    Cleric,
}

impl CharacterClass {
    pub fn all() -> [CharacterClass; 4] {
        [
            CharacterClass::Warrior,
            CharacterClass::Mage,
            CharacterClass::Rogue,
            CharacterClass::Cleric,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            CharacterClass::Warrior => "Warrior",
            CharacterClass::Mage => "Mage",
            CharacterClass::Rogue => "Rogue",
            CharacterClass::Cleric => "Cleric",
        }
    }

    /// Base (health, strength, magic) granted at creation.
    pub fn base_stats(&self) -> (u32, u32, u32) {
        match self {
            CharacterClass::Warrior => (120, 15, 5),
            CharacterClass::Mage => (80, 8, 20),
            CharacterClass::Rogue => (90, 12, 10),
            CharacterClass::Cleric => (100, 10, 15),
        }
    }
}

impl fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CharacterClass {
    type Err = GameError;

    fn from_str(s: &str) -> GameResult<Self> {
        CharacterClass::all()
            .into_iter()
            .find(|class| class.name() == s)
            .ok_or_else(|| GameError::InvalidClass(s.to_string()))
    }
}

/// The closed set of stats that item effects and abilities can touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stat {
    Health,
    MaxHealth,
    Strength,
    Magic,
}

impl Stat {
    pub fn all() -> [Stat; 4] {
        [Stat::Health, Stat::MaxHealth, Stat::Strength, Stat::Magic]
    }

    /// The key this stat uses in content-file effect strings.
    pub fn key(&self) -> &'static str {
        match self {
            Stat::Health => "health",
            Stat::MaxHealth => "max_health",
            Stat::Strength => "strength",
            Stat::Magic => "magic",
        }
    }
}

impl FromStr for Stat {
    type Err = GameError;

    fn from_str(s: &str) -> GameResult<Self> {
        Stat::all()
            .into_iter()
            .find(|stat| stat.key() == s)
            .ok_or_else(|| GameError::InvalidDataFormat(format!("unknown stat '{s}'")))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    pub class: CharacterClass,
    pub level: u32,
    pub health: u32,
    pub max_health: u32,
    pub strength: u32,
    pub magic: u32,
    pub experience: u64,
    pub gold: u32,
    pub inventory: Vec<String>,
    pub active_quests: Vec<String>,
    pub completed_quests: Vec<String>,
    pub equipped_weapon: Option<String>,
    pub equipped_armor: Option<String>,
}

impl Character {
    /// Creates a fresh level-1 character with class-determined base stats.
    pub fn create(name: impl Into<String>, class: CharacterClass) -> Self {
        let (health, strength, magic) = class.base_stats();
        Self {
            name: name.into(),
            class,
            level: STARTING_LEVEL,
            health,
            max_health: health,
            strength,
            magic,
            experience: 0,
            gold: STARTING_GOLD,
            inventory: Vec::new(),
            active_quests: Vec::new(),
            completed_quests: Vec::new(),
            equipped_weapon: None,
            equipped_armor: None,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.health == 0
    }

    pub fn stat(&self, stat: Stat) -> u32 {
        match stat {
            Stat::Health => self.health,
            Stat::MaxHealth => self.max_health,
            Stat::Strength => self.strength,
            Stat::Magic => self.magic,
        }
    }

    /// Applies a signed delta to a stat, maintaining the health invariants.
    ///
    /// `Health` is clamped to `[0, max_health]`. Shrinking `MaxHealth`
    /// re-clamps current health. `Strength` and `Magic` floor at zero.
    pub fn apply_stat(&mut self, stat: Stat, delta: i32) {
        match stat {
            Stat::Health => {
                let next = clamped_add(self.health, delta);
                self.health = next.min(self.max_health);
            }
            Stat::MaxHealth => {
                self.max_health = clamped_add(self.max_health, delta);
                self.health = self.health.min(self.max_health);
            }
            Stat::Strength => self.strength = clamped_add(self.strength, delta),
            Stat::Magic => self.magic = clamped_add(self.magic, delta),
        }
    }

    /// Checks every semantic invariant and reports all offending fields,
    /// first offender leading.
    pub fn validate(&self) -> GameResult<()> {
        let mut offenders: Vec<String> = Vec::new();

        if self.name.trim().is_empty() {
            offenders.push("name (cannot be empty)".to_string());
        }
        if self.level < STARTING_LEVEL {
            offenders.push(format!("level (must be >= 1, got {})", self.level));
        }
        if self.health > self.max_health {
            offenders.push(format!(
                "health (exceeds max_health: {}/{})",
                self.health, self.max_health
            ));
        }
        if self.inventory.len() > MAX_INVENTORY_SIZE {
            offenders.push(format!(
                "inventory (holds {}, capacity {})",
                self.inventory.len(),
                MAX_INVENTORY_SIZE
            ));
        }
        if has_duplicates(&self.active_quests) {
            offenders.push("active_quests (contains duplicates)".to_string());
        }
        if has_duplicates(&self.completed_quests) {
            offenders.push("completed_quests (contains duplicates)".to_string());
        }
        if self
            .active_quests
            .iter()
            .any(|id| self.completed_quests.contains(id))
        {
            offenders.push("active_quests (overlaps completed_quests)".to_string());
        }
        for slot in [&self.equipped_weapon, &self.equipped_armor]
            .into_iter()
            .flatten()
        {
            if self.inventory.contains(slot) {
                offenders.push(format!("inventory (contains equipped item '{slot}')"));
            }
        }

        if offenders.is_empty() {
            Ok(())
        } else {
            Err(GameError::InvalidSaveData(offenders.join("; ")))
        }
    }
}

fn clamped_add(value: u32, delta: i32) -> u32 {
    (i64::from(value) + i64::from(delta)).max(0) as u32
}

fn has_duplicates(ids: &[String]) -> bool {
    ids.iter()
        .enumerate()
        .any(|(i, id)| ids[..i].contains(id))
}
