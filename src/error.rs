//! Engine error catalog.
//!
//! Every fallible engine operation returns one of these kinds. Errors are
//! recoverable values for the caller to present; the engine itself never
//! prints.

use thiserror::Error;

use crate::game_data::ItemKind;

/// Result type used throughout the engine.
pub type GameResult<T> = Result<T, GameError>;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GameError {
    // Character
    #[error("invalid character class '{0}' (must be Warrior, Mage, Rogue, or Cleric)")]
    InvalidClass(String),

    #[error("character '{0}' could not be found")]
    CharacterNotFound(String),

    #[error("'{0}' is defeated and cannot act")]
    CharacterDead(String),

    #[error("invalid character data: {0}")]
    InvalidSaveData(String),

    // Inventory
    #[error("inventory is full")]
    InventoryFull,

    #[error("item '{0}' not found")]
    ItemNotFound(String),

    #[error("not enough gold: need {needed}, have {held}")]
    InsufficientGold { needed: u32, held: u32 },

    #[error("item '{id}' is of type {actual:?}, expected {expected:?}")]
    WrongItemType {
        id: String,
        expected: ItemKind,
        actual: ItemKind,
    },

    // Quests
    #[error("quest '{0}' could not be found")]
    QuestNotFound(String),

    #[error("cannot accept quest '{id}': {reason}")]
    RequirementsNotMet { id: String, reason: String },

    #[error("quest '{0}' is already completed")]
    AlreadyCompleted(String),

    #[error("quest '{0}' is not currently active")]
    QuestNotActive(String),

    // Combat
    #[error("invalid target '{0}'")]
    InvalidTarget(String),

    #[error("combat is not currently active")]
    CombatNotActive,

    // Data files and persistence
    #[error("required data file '{0}' not found")]
    MissingDataFile(String),

    #[error("invalid data format: {0}")]
    InvalidDataFormat(String),

    #[error("'{path}' is corrupted or unreadable: {detail}")]
    CorruptedData { path: String, detail: String },
}
