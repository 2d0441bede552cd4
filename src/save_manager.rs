//! Character persistence: the `KEY: value` save-file codec and the on-disk
//! save directory.
//!
//! One file per character, named `<name>_save.txt`. List fields are
//! comma-joined with no escaping, so identifiers containing commas corrupt
//! the save; the format carries that limitation deliberately.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use directories::ProjectDirs;
use tracing::debug;

use crate::character::{Character, CharacterClass};
use crate::constants::SAVE_FILE_SUFFIX;
use crate::error::{GameError, GameResult};

const FIELD_ORDER: [&str; 12] = [
    "name",
    "class",
    "level",
    "health",
    "max_health",
    "strength",
    "magic",
    "experience",
    "gold",
    "inventory",
    "active_quests",
    "completed_quests",
];

/// Renders a character in the save-file text format.
///
/// Equipped slots are not part of the save schema and are not written.
pub fn encode_character(character: &Character) -> String {
    let fields = [
        ("NAME", character.name.clone()),
        ("CLASS", character.class.name().to_string()),
        ("LEVEL", character.level.to_string()),
        ("HEALTH", character.health.to_string()),
        ("MAX_HEALTH", character.max_health.to_string()),
        ("STRENGTH", character.strength.to_string()),
        ("MAGIC", character.magic.to_string()),
        ("EXPERIENCE", character.experience.to_string()),
        ("GOLD", character.gold.to_string()),
        ("INVENTORY", character.inventory.join(",")),
        ("ACTIVE_QUESTS", character.active_quests.join(",")),
        ("COMPLETED_QUESTS", character.completed_quests.join(",")),
    ];
    fields
        .iter()
        .map(|(key, value)| format!("{key}: {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parses the save-file text format back into a character.
///
/// Lines split on the first colon; keys are case-insensitive; blank lines
/// are skipped. An empty list value decodes to an empty collection. All
/// twelve schema keys are required.
pub fn decode_character(raw: &str) -> GameResult<Character> {
    let mut fields: Vec<(String, String)> = Vec::new();

    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (key, value) = line.split_once(':').ok_or_else(|| {
            GameError::InvalidSaveData(format!("malformed line (missing colon): '{line}'"))
        })?;
        fields.push((key.trim().to_lowercase(), value.trim().to_string()));
    }

    for key in FIELD_ORDER {
        if !fields.iter().any(|(k, _)| k == key) {
            return Err(GameError::InvalidSaveData(format!(
                "missing required field: {key}"
            )));
        }
    }
    let get = |key: &str| -> &str {
        fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .unwrap_or_default()
    };

    let character = Character {
        name: get("name").to_string(),
        class: CharacterClass::from_str(get("class"))?,
        level: parse_int(get("level"), "level")?,
        health: parse_int(get("health"), "health")?,
        max_health: parse_int(get("max_health"), "max_health")?,
        strength: parse_int(get("strength"), "strength")?,
        magic: parse_int(get("magic"), "magic")?,
        experience: parse_int(get("experience"), "experience")?,
        gold: parse_int(get("gold"), "gold")?,
        inventory: parse_list(get("inventory")),
        active_quests: parse_list(get("active_quests")),
        completed_quests: parse_list(get("completed_quests")),
        equipped_weapon: None,
        equipped_armor: None,
    };
    character.validate()?;
    Ok(character)
}

fn parse_int<T: FromStr>(value: &str, key: &str) -> GameResult<T> {
    value.parse::<T>().map_err(|_| {
        GameError::InvalidSaveData(format!("{key} must be an integer, got '{value}'"))
    })
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

/// Owns the save directory and the per-character save files within it.
pub struct SaveManager {
    save_dir: PathBuf,
}

impl SaveManager {
    /// Uses the platform config location for this game.
    pub fn new() -> std::io::Result<Self> {
        let project_dirs = ProjectDirs::from("", "", "chronicles").ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "could not determine config directory",
            )
        })?;
        let save_dir = project_dirs.data_dir().join("save_games");
        fs::create_dir_all(&save_dir)?;
        Ok(Self { save_dir })
    }

    /// Uses an explicit save directory (created lazily on first save).
    pub fn with_dir(save_dir: impl Into<PathBuf>) -> Self {
        Self {
            save_dir: save_dir.into(),
        }
    }

    pub fn save_dir(&self) -> &Path {
        &self.save_dir
    }

    fn save_path(&self, name: &str) -> PathBuf {
        self.save_dir.join(format!("{name}{SAVE_FILE_SUFFIX}"))
    }

    /// Writes the character's save file, overwriting any previous save.
    pub fn save_character(&self, character: &Character) -> GameResult<()> {
        fs::create_dir_all(&self.save_dir).map_err(|e| self.corrupted(&self.save_dir, e))?;
        let path = self.save_path(&character.name);
        fs::write(&path, encode_character(character)).map_err(|e| self.corrupted(&path, e))?;
        debug!(path = %path.display(), "character saved");
        Ok(())
    }

    /// Loads a character by name.
    pub fn load_character(&self, name: &str) -> GameResult<Character> {
        let path = self.save_path(name);
        if !path.exists() {
            return Err(GameError::CharacterNotFound(name.to_string()));
        }
        let raw = fs::read_to_string(&path).map_err(|e| self.corrupted(&path, e))?;
        let character = decode_character(&raw)?;
        debug!(path = %path.display(), "character loaded");
        Ok(character)
    }

    /// Lists saved character names, sorted. Empty when the directory does
    /// not exist yet.
    pub fn list_saved_characters(&self) -> Vec<String> {
        let Ok(entries) = fs::read_dir(&self.save_dir) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .flatten()
            .filter_map(|entry| {
                let file_name = entry.file_name();
                let file_name = file_name.to_str()?;
                file_name
                    .strip_suffix(SAVE_FILE_SUFFIX)
                    .map(str::to_string)
            })
            .collect();
        names.sort();
        names
    }

    /// Deletes a character's save file.
    pub fn delete_character(&self, name: &str) -> GameResult<()> {
        let path = self.save_path(name);
        if !path.exists() {
            return Err(GameError::CharacterNotFound(name.to_string()));
        }
        fs::remove_file(&path).map_err(|e| self.corrupted(&path, e))?;
        debug!(path = %path.display(), "character deleted");
        Ok(())
    }

    fn corrupted(&self, path: &Path, err: std::io::Error) -> GameError {
        GameError::CorruptedData {
            path: path.display().to_string(),
            detail: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::CharacterClass;

    fn sample() -> Character {
        let mut c = Character::create("Aria", CharacterClass::Mage);
        c.level = 3;
        c.health = 75;
        c.max_health = 100;
        c.experience = 310;
        c.gold = 240;
        c.inventory = vec!["basic_potion".to_string(), "basic_potion".to_string()];
        c.active_quests = vec!["first_hunt".to_string()];
        c.completed_quests = vec!["tutorial_start".to_string()];
        c
    }

    #[test]
    fn test_encode_fixed_field_order() {
        let encoded = encode_character(&sample());
        let expected = "\
NAME: Aria
CLASS: Mage
LEVEL: 3
HEALTH: 75
MAX_HEALTH: 100
STRENGTH: 8
MAGIC: 20
EXPERIENCE: 310
GOLD: 240
INVENTORY: basic_potion,basic_potion
ACTIVE_QUESTS: first_hunt
COMPLETED_QUESTS: tutorial_start";
        assert_eq!(encoded, expected);
    }

    #[test]
    fn test_round_trip_preserves_every_field() {
        let original = sample();
        let decoded = decode_character(&encode_character(&original)).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_round_trip_with_empty_lists() {
        let original = Character::create("Fresh", CharacterClass::Warrior);
        let decoded = decode_character(&encode_character(&original)).unwrap();
        assert_eq!(decoded, original);
        assert!(decoded.inventory.is_empty());
        assert!(decoded.active_quests.is_empty());
    }

    #[test]
    fn test_empty_list_value_decodes_to_empty_collection() {
        let encoded = encode_character(&Character::create("Fresh", CharacterClass::Rogue));
        assert!(encoded.contains("INVENTORY: \n"), "empty list still written");
        let decoded = decode_character(&encoded).unwrap();
        assert_eq!(decoded.inventory.len(), 0, "not a one-element empty string");
    }

    #[test]
    fn test_decode_missing_colon_fails() {
        let raw = encode_character(&sample()).replace("LEVEL: 3", "LEVEL 3");
        let err = decode_character(&raw).unwrap_err();
        assert!(matches!(err, GameError::InvalidSaveData(_)));
    }

    #[test]
    fn test_decode_non_integer_field_fails() {
        let raw = encode_character(&sample()).replace("GOLD: 240", "GOLD: lots");
        let err = decode_character(&raw).unwrap_err();
        let GameError::InvalidSaveData(msg) = err else {
            panic!("expected InvalidSaveData");
        };
        assert!(msg.contains("gold"));
    }

    #[test]
    fn test_decode_missing_field_names_the_key() {
        let raw = encode_character(&sample())
            .lines()
            .filter(|line| !line.starts_with("MAGIC"))
            .collect::<Vec<_>>()
            .join("\n");
        let err = decode_character(&raw).unwrap_err();
        let GameError::InvalidSaveData(msg) = err else {
            panic!("expected InvalidSaveData");
        };
        assert!(msg.contains("magic"));
    }

    #[test]
    fn test_decode_unknown_class_fails() {
        let raw = encode_character(&sample()).replace("CLASS: Mage", "CLASS: Bard");
        let err = decode_character(&raw).unwrap_err();
        assert_eq!(err, GameError::InvalidClass("Bard".to_string()));
    }

    #[test]
    fn test_decode_rejects_semantically_invalid_character() {
        let raw = encode_character(&sample()).replace("HEALTH: 75", "HEALTH: 9000");
        let err = decode_character(&raw).unwrap_err();
        assert!(matches!(err, GameError::InvalidSaveData(_)));
    }

    #[test]
    fn test_save_load_list_delete_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let manager = SaveManager::with_dir(dir.path());

        assert!(manager.list_saved_characters().is_empty());

        let aria = sample();
        let bren = Character::create("Bren", CharacterClass::Cleric);
        manager.save_character(&aria).unwrap();
        manager.save_character(&bren).unwrap();

        assert_eq!(manager.list_saved_characters(), vec!["Aria", "Bren"]);

        let loaded = manager.load_character("Aria").unwrap();
        assert_eq!(loaded, aria);

        manager.delete_character("Aria").unwrap();
        assert_eq!(manager.list_saved_characters(), vec!["Bren"]);

        let err = manager.load_character("Aria").unwrap_err();
        assert_eq!(err, GameError::CharacterNotFound("Aria".to_string()));
    }

    #[test]
    fn test_delete_unknown_character_fails() {
        let dir = tempfile::tempdir().unwrap();
        let manager = SaveManager::with_dir(dir.path());
        let err = manager.delete_character("Nobody").unwrap_err();
        assert_eq!(err, GameError::CharacterNotFound("Nobody".to_string()));
    }

    #[test]
    fn test_save_overwrites_previous_save() {
        let dir = tempfile::tempdir().unwrap();
        let manager = SaveManager::with_dir(dir.path());

        let mut c = sample();
        manager.save_character(&c).unwrap();
        c.gold = 999;
        manager.save_character(&c).unwrap();

        assert_eq!(manager.load_character("Aria").unwrap().gold, 999);
        assert_eq!(manager.list_saved_characters().len(), 1);
    }
}
