//! Inventory management, item usage, equipment, and the shop.
//!
//! The inventory is an ordered multiset of item identifiers with a fixed
//! capacity. Equipped items live outside the inventory collection; equip and
//! unequip are exact inverses over the character's stats.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::character::Character;
use crate::constants::{MAX_INVENTORY_SIZE, SELL_PRICE_DIVISOR};
use crate::error::{GameError, GameResult};
use crate::game_data::{ItemCatalog, ItemKind, ItemRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EquipSlot {
    Weapon,
    Armor,
}

impl EquipSlot {
    /// The item category this slot accepts.
    pub fn expected_kind(&self) -> ItemKind {
        match self {
            EquipSlot::Weapon => ItemKind::Weapon,
            EquipSlot::Armor => ItemKind::Armor,
        }
    }
}

fn equipped(character: &Character, slot: EquipSlot) -> Option<String> {
    match slot {
        EquipSlot::Weapon => character.equipped_weapon.clone(),
        EquipSlot::Armor => character.equipped_armor.clone(),
    }
}

fn set_equipped(character: &mut Character, slot: EquipSlot, item_id: Option<String>) {
    match slot {
        EquipSlot::Weapon => character.equipped_weapon = item_id,
        EquipSlot::Armor => character.equipped_armor = item_id,
    }
}

/// Appends an item, failing when the inventory is at capacity.
pub fn add_item(character: &mut Character, item_id: &str) -> GameResult<()> {
    if character.inventory.len() >= MAX_INVENTORY_SIZE {
        return Err(GameError::InventoryFull);
    }
    character.inventory.push(item_id.to_string());
    Ok(())
}

/// Removes one occurrence of an item.
pub fn remove_item(character: &mut Character, item_id: &str) -> GameResult<()> {
    let position = character
        .inventory
        .iter()
        .position(|id| id == item_id)
        .ok_or_else(|| GameError::ItemNotFound(item_id.to_string()))?;
    character.inventory.remove(position);
    Ok(())
}

pub fn has_item(character: &Character, item_id: &str) -> bool {
    character.inventory.iter().any(|id| id == item_id)
}

pub fn count_item(character: &Character, item_id: &str) -> usize {
    character.inventory.iter().filter(|id| *id == item_id).count()
}

pub fn space_remaining(character: &Character) -> usize {
    MAX_INVENTORY_SIZE.saturating_sub(character.inventory.len())
}

/// Drains the inventory, returning the removed items in order.
pub fn clear_inventory(character: &mut Character) -> Vec<String> {
    std::mem::take(&mut character.inventory)
}

/// Consumes an item, applying its stat effect and removing it.
///
/// Health effects clamp to `[0, max_health]`; other stats take the raw
/// delta. Returns the delta actually applied.
pub fn use_item(character: &mut Character, item: &ItemRecord) -> GameResult<i32> {
    if !has_item(character, &item.id) {
        return Err(GameError::ItemNotFound(item.id.clone()));
    }
    if item.kind != ItemKind::Consumable {
        return Err(GameError::WrongItemType {
            id: item.id.clone(),
            expected: ItemKind::Consumable,
            actual: item.kind,
        });
    }

    let before = character.stat(item.effect.stat);
    character.apply_stat(item.effect.stat, item.effect.amount);
    let applied = character.stat(item.effect.stat) as i32 - before as i32;

    remove_item(character, &item.id)?;
    Ok(applied)
}

/// Equips an item into a slot, displacing any current occupant.
///
/// The displaced item has its bonus reversed and returns to the inventory
/// before the new bonus is applied. When returning the displaced item would
/// overflow the inventory, nothing changes and `InventoryFull` is returned.
///
/// Returns the displaced item id, if any.
pub fn equip(
    character: &mut Character,
    item_id: &str,
    items: &ItemCatalog,
    slot: EquipSlot,
) -> GameResult<Option<String>> {
    let record = items
        .get(item_id)
        .ok_or_else(|| GameError::ItemNotFound(item_id.to_string()))?;
    if !has_item(character, item_id) {
        return Err(GameError::ItemNotFound(item_id.to_string()));
    }
    if record.kind != slot.expected_kind() {
        return Err(GameError::WrongItemType {
            id: item_id.to_string(),
            expected: slot.expected_kind(),
            actual: record.kind,
        });
    }

    let displaced = equipped(character, slot);
    // Resolve the displaced record and check capacity before touching any
    // state, so a failed equip leaves the character untouched.
    let displaced_record = match &displaced {
        Some(old_id) => {
            let old = items
                .get(old_id)
                .ok_or_else(|| GameError::ItemNotFound(old_id.clone()))?;
            if character.inventory.len() >= MAX_INVENTORY_SIZE {
                return Err(GameError::InventoryFull);
            }
            Some(old)
        }
        None => None,
    };

    remove_item(character, item_id)?;
    if let (Some(old_id), Some(old)) = (&displaced, displaced_record) {
        character.inventory.push(old_id.clone());
        character.apply_stat(old.effect.stat, -old.effect.amount);
    }
    character.apply_stat(record.effect.stat, record.effect.amount);
    set_equipped(character, slot, Some(item_id.to_string()));

    debug!(item = item_id, ?slot, "equipped");
    Ok(displaced)
}

/// Removes the equipped item from a slot, reversing its bonus and returning
/// it to the inventory.
///
/// Unequipping max-health armor re-clamps current health to the reduced
/// maximum. Returns the unequipped item id, or `None` for an empty slot.
pub fn unequip(
    character: &mut Character,
    slot: EquipSlot,
    items: &ItemCatalog,
) -> GameResult<Option<String>> {
    let Some(item_id) = equipped(character, slot) else {
        return Ok(None);
    };
    let record = items
        .get(&item_id)
        .ok_or_else(|| GameError::ItemNotFound(item_id.clone()))?;
    if character.inventory.len() >= MAX_INVENTORY_SIZE {
        return Err(GameError::InventoryFull);
    }

    character.inventory.push(item_id.clone());
    character.apply_stat(record.effect.stat, -record.effect.amount);
    set_equipped(character, slot, None);

    debug!(item = item_id.as_str(), ?slot, "unequipped");
    Ok(Some(item_id))
}

/// Buys an item: debits its cost and adds it to the inventory.
///
/// On failure no gold is debited.
pub fn purchase(character: &mut Character, item: &ItemRecord) -> GameResult<()> {
    if character.gold < item.cost {
        return Err(GameError::InsufficientGold {
            needed: item.cost,
            held: character.gold,
        });
    }
    if character.inventory.len() >= MAX_INVENTORY_SIZE {
        return Err(GameError::InventoryFull);
    }
    character.gold -= item.cost;
    character.inventory.push(item.id.clone());
    Ok(())
}

/// Sells one occurrence of an item for half its cost.
///
/// Returns the gold received.
pub fn sell(character: &mut Character, item: &ItemRecord) -> GameResult<u32> {
    remove_item(character, &item.id)?;
    let price = item.cost / SELL_PRICE_DIVISOR;
    character.gold = character.gold.saturating_add(price);
    Ok(price)
}
