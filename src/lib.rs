//! Chronicles - Turn-Based RPG Rules Engine
//!
//! The progression and combat rules for a single-character, turn-based RPG:
//! the character model and its invariants, inventory and equipment
//! arithmetic, leveling, the quest prerequisite graph, battle resolution,
//! and the text save/content formats.
//!
//! The interactive menu loop and terminal presentation live outside this
//! crate; every operation here returns typed results and never prints.

pub mod character;
pub mod combat;
pub mod constants;
pub mod error;
pub mod game_data;
pub mod inventory;
pub mod progression;
pub mod quests;
pub mod save_manager;

pub use character::{Character, CharacterClass, Stat};
pub use combat::{AbilityOutcome, Battle, BattleOutcome, Enemy, EnemyKind, Winner};
pub use error::{GameError, GameResult};
pub use game_data::{ItemCatalog, ItemEffect, ItemKind, ItemRecord, QuestCatalog, QuestRecord};
pub use inventory::EquipSlot;
pub use quests::{QuestReward, QuestStatus};
pub use save_manager::SaveManager;
