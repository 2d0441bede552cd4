// Inventory constants
pub const MAX_INVENTORY_SIZE: usize = 20;

// Character creation constants
pub const STARTING_GOLD: u32 = 100;
pub const STARTING_LEVEL: u32 = 1;

// Experience and progression constants
pub const XP_PER_LEVEL: u64 = 100;
pub const LEVEL_UP_HEALTH_GAIN: u32 = 10;
pub const LEVEL_UP_STRENGTH_GAIN: u32 = 2;
pub const LEVEL_UP_MAGIC_GAIN: u32 = 2;

// Combat constants
pub const MIN_ATTACK_DAMAGE: u32 = 1;
pub const DEFENSE_DIVISOR: u32 = 4;
pub const WARRIOR_STRIKE_MULTIPLIER: u32 = 2;
pub const MAGE_FIREBALL_MULTIPLIER: u32 = 2;
pub const ROGUE_CRIT_MULTIPLIER: u32 = 3;
pub const ROGUE_CRIT_CHANCE: f64 = 0.5;
pub const CLERIC_HEAL_AMOUNT: u32 = 30;
pub const ESCAPE_CHANCE: f64 = 0.5;

// Shop constants
pub const SELL_PRICE_DIVISOR: u32 = 2;

// Save system constants
pub const SAVE_FILE_SUFFIX: &str = "_save.txt";
