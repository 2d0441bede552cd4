//! Content catalog: quest and item definitions loaded from text files.
//!
//! Content files hold one record per block, blocks separated by blank lines,
//! each line a `KEY: value` pair. Records are immutable once loaded.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::character::Stat;
use crate::error::{GameError, GameResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    Weapon,
    Armor,
    Consumable,
}

impl ItemKind {
    pub fn name(&self) -> &'static str {
        match self {
            ItemKind::Weapon => "weapon",
            ItemKind::Armor => "armor",
            ItemKind::Consumable => "consumable",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ItemKind {
    type Err = GameError;

    fn from_str(s: &str) -> GameResult<Self> {
        match s {
            "weapon" => Ok(ItemKind::Weapon),
            "armor" => Ok(ItemKind::Armor),
            "consumable" => Ok(ItemKind::Consumable),
            other => Err(GameError::InvalidDataFormat(format!(
                "invalid item TYPE '{other}' (must be weapon, armor, or consumable)"
            ))),
        }
    }
}

/// A `stat:value` effect pair, e.g. `strength:5` or `health:20`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemEffect {
    pub stat: Stat,
    pub amount: i32,
}

impl FromStr for ItemEffect {
    type Err = GameError;

    fn from_str(s: &str) -> GameResult<Self> {
        let (stat, amount) = s.split_once(':').ok_or_else(|| {
            GameError::InvalidDataFormat(format!("EFFECT must be 'stat:value', got '{s}'"))
        })?;
        let stat = stat.trim().parse::<Stat>()?;
        let amount = amount.trim().parse::<i32>().map_err(|_| {
            GameError::InvalidDataFormat(format!(
                "EFFECT value must be an integer, got '{}'",
                amount.trim()
            ))
        })?;
        Ok(ItemEffect { stat, amount })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    pub reward_xp: u64,
    pub reward_gold: u32,
    pub required_level: u32,
    /// `None` when the content file says `PREREQUISITE: NONE`.
    pub prerequisite: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub id: String,
    pub name: String,
    pub kind: ItemKind,
    pub effect: ItemEffect,
    pub cost: u32,
    pub description: String,
}

pub type QuestCatalog = BTreeMap<String, QuestRecord>;
pub type ItemCatalog = BTreeMap<String, ItemRecord>;

/// Loads the quest catalog from `path`.
///
/// Rejects duplicate ids and cyclic prerequisite chains. A prerequisite that
/// names an unknown quest is allowed (the quest stays locked) but logged.
pub fn load_quests(path: impl AsRef<Path>) -> GameResult<QuestCatalog> {
    let raw = read_data_file(path.as_ref())?;
    let mut quests = QuestCatalog::new();

    for block in split_blocks(&raw) {
        let quest = parse_quest_block(&block)?;
        if quests.contains_key(&quest.id) {
            return Err(GameError::InvalidDataFormat(format!(
                "duplicate QUEST_ID '{}'",
                quest.id
            )));
        }
        quests.insert(quest.id.clone(), quest);
    }

    validate_prerequisite_graph(&quests)?;
    debug!(count = quests.len(), "quest catalog loaded");
    Ok(quests)
}

/// Loads the item catalog from `path`.
pub fn load_items(path: impl AsRef<Path>) -> GameResult<ItemCatalog> {
    let raw = read_data_file(path.as_ref())?;
    let mut items = ItemCatalog::new();

    for block in split_blocks(&raw) {
        let item = parse_item_block(&block)?;
        if items.contains_key(&item.id) {
            return Err(GameError::InvalidDataFormat(format!(
                "duplicate ITEM_ID '{}'",
                item.id
            )));
        }
        items.insert(item.id.clone(), item);
    }

    debug!(count = items.len(), "item catalog loaded");
    Ok(items)
}

fn read_data_file(path: &Path) -> GameResult<String> {
    if !path.exists() {
        return Err(GameError::MissingDataFile(path.display().to_string()));
    }
    fs::read_to_string(path).map_err(|e| GameError::CorruptedData {
        path: path.display().to_string(),
        detail: e.to_string(),
    })
}

/// Splits raw file content into record blocks on blank lines.
fn split_blocks(raw: &str) -> Vec<Vec<String>> {
    let mut blocks = Vec::new();
    let mut current: Vec<String> = Vec::new();

    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line.to_string());
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}

/// Splits a raw block line into an upper-case key and trimmed value.
fn split_field(line: &str) -> GameResult<(String, String)> {
    let (key, value) = line.split_once(':').ok_or_else(|| {
        GameError::InvalidDataFormat(format!("line missing colon separator: '{line}'"))
    })?;
    Ok((key.trim().to_uppercase(), value.trim().to_string()))
}

fn parse_int_field(key: &str, value: &str) -> GameResult<u64> {
    value.parse::<u64>().map_err(|_| {
        GameError::InvalidDataFormat(format!(
            "{key} must be a non-negative integer, got '{value}'"
        ))
    })
}

fn parse_quest_block(lines: &[String]) -> GameResult<QuestRecord> {
    let mut id = None;
    let mut title = None;
    let mut description = None;
    let mut reward_xp = None;
    let mut reward_gold = None;
    let mut required_level = None;
    let mut prerequisite = None;

    for raw in lines {
        let (key, value) = split_field(raw)?;
        match key.as_str() {
            "QUEST_ID" => id = Some(value),
            "TITLE" => title = Some(value),
            "DESCRIPTION" => description = Some(value),
            "REWARD_XP" => reward_xp = Some(parse_int_field("REWARD_XP", &value)?),
            "REWARD_GOLD" => reward_gold = Some(parse_int_field("REWARD_GOLD", &value)? as u32),
            "REQUIRED_LEVEL" => {
                required_level = Some(parse_int_field("REQUIRED_LEVEL", &value)? as u32)
            }
            "PREREQUISITE" => {
                prerequisite = Some(if value.eq_ignore_ascii_case("none") {
                    None
                } else {
                    Some(value)
                })
            }
            other => {
                warn!(key = other, "ignoring unknown quest field");
            }
        }
    }

    let id = require_field(id, "QUEST_ID")?;
    Ok(QuestRecord {
        title: require_field(title, "TITLE")?,
        description: require_field(description, "DESCRIPTION")?,
        reward_xp: require_field(reward_xp, "REWARD_XP")?,
        reward_gold: require_field(reward_gold, "REWARD_GOLD")?,
        required_level: require_field(required_level, "REQUIRED_LEVEL")?,
        prerequisite: require_field(prerequisite, "PREREQUISITE")?,
        id,
    })
}

fn parse_item_block(lines: &[String]) -> GameResult<ItemRecord> {
    let mut id = None;
    let mut name = None;
    let mut kind = None;
    let mut effect = None;
    let mut cost = None;
    let mut description = None;

    for raw in lines {
        let (key, value) = split_field(raw)?;
        match key.as_str() {
            "ITEM_ID" => id = Some(value),
            "NAME" => name = Some(value),
            "TYPE" => kind = Some(value.to_lowercase().parse::<ItemKind>()?),
            "EFFECT" => effect = Some(value.parse::<ItemEffect>()?),
            "COST" => cost = Some(parse_int_field("COST", &value)? as u32),
            "DESCRIPTION" => description = Some(value),
            other => {
                warn!(key = other, "ignoring unknown item field");
            }
        }
    }

    let id = require_field(id, "ITEM_ID")?;
    Ok(ItemRecord {
        name: require_field(name, "NAME")?,
        kind: require_field(kind, "TYPE")?,
        effect: require_field(effect, "EFFECT")?,
        cost: require_field(cost, "COST")?,
        description: require_field(description, "DESCRIPTION")?,
        id,
    })
}

fn require_field<T>(value: Option<T>, key: &str) -> GameResult<T> {
    value.ok_or_else(|| GameError::InvalidDataFormat(format!("record missing required field {key}")))
}

/// Walks each quest's prerequisite chain, rejecting cycles.
///
/// A chain can be at most `quests.len()` hops long; a longer walk has
/// revisited a node.
fn validate_prerequisite_graph(quests: &QuestCatalog) -> GameResult<()> {
    for quest in quests.values() {
        let mut hops = 0;
        let mut cursor = quest.prerequisite.as_deref();
        while let Some(prereq_id) = cursor {
            let Some(prereq) = quests.get(prereq_id) else {
                warn!(
                    quest = quest.id.as_str(),
                    prerequisite = prereq_id,
                    "prerequisite names an unknown quest; quest stays locked"
                );
                break;
            };
            hops += 1;
            if hops > quests.len() {
                return Err(GameError::InvalidDataFormat(format!(
                    "cyclic prerequisite chain involving quest '{}'",
                    quest.id
                )));
            }
            cursor = prereq.prerequisite.as_deref();
        }
    }
    Ok(())
}
