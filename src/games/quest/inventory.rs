//! Per-slot inventory, worn equipment and derived equipment stats.
//!
//! Invariants kept by every mutator:
//! - each slot list is sorted best rarity first; equal rarity keeps
//!   acquisition order,
//! - an equipment instance is either worn or in its slot list, never both,
//! - `stats` always equals the sum over the worn set,
//! - a failed operation leaves everything unchanged.

use thiserror::Error;

use super::defs::{Catalog, EquipSlot, ItemRef, Rarity, Slot, Stats};

/// Distinct entries per slot (instances for gear, stacks for the rest).
pub const MAX_ENTRIES_PER_SLOT: usize = 99;
/// Units per material/item stack.
pub const MAX_STACK: u32 = 999;

/// One equipment instance. `serial` is its acquisition number, used to
/// break rarity ties so an unequipped piece returns to its old place.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Gear {
    pub id: u32,
    pub rarity: Rarity,
    serial: u64,
}

impl Gear {
    fn rank(&self) -> (usize, u64) {
        (self.rarity.sort_index(), self.serial)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Stack {
    pub id: u32,
    pub rarity: Rarity,
    pub count: u32,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InventoryError {
    #[error("unknown item id {0}")]
    UnknownId(u32),

    #[error("{0} slot is full")]
    SlotFull(Slot),

    #[error("stack of {0} is full")]
    StackFull(u32),

    #[error("item {0} cannot be equipped")]
    NotEquipment(u32),

    #[error("nothing equipped in {0} slot")]
    NothingEquipped(EquipSlot),

    #[error("no room in {0} slot")]
    NoRoom(EquipSlot),

    #[error("item {id} not found in {slot} slot")]
    NotOwned { id: u32, slot: Slot },
}

#[derive(Clone, Debug, Default)]
pub struct Inventory {
    gear: [Vec<Gear>; 4],
    stacks: [Vec<Stack>; 2],
    worn: [Option<Gear>; 4],
    stats: Stats,
    next_serial: u64,
}

fn stack_index(slot: Slot) -> Option<usize> {
    match slot {
        Slot::Material => Some(0),
        Slot::Item => Some(1),
        _ => None,
    }
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ────────────────────────────────────────────────

    pub fn gear(&self, slot: EquipSlot) -> &[Gear] {
        &self.gear[slot.index()]
    }

    /// Stacks in a material/item slot; empty for equipment slots.
    pub fn stacks(&self, slot: Slot) -> &[Stack] {
        match stack_index(slot) {
            Some(i) => &self.stacks[i],
            None => &[],
        }
    }

    /// `(id, count)` pairs in display order.
    pub fn entries(&self, slot: Slot) -> Vec<(u32, u32)> {
        match slot.equip_slot() {
            Some(es) => self.gear(es).iter().map(|g| (g.id, 1)).collect(),
            None => self.stacks(slot).iter().map(|s| (s.id, s.count)).collect(),
        }
    }

    /// Number of distinct entries in a slot.
    pub fn len(&self, slot: Slot) -> usize {
        match slot.equip_slot() {
            Some(es) => self.gear(es).len(),
            None => self.stacks(slot).len(),
        }
    }

    pub fn worn(&self, slot: EquipSlot) -> Option<u32> {
        self.worn[slot.index()].map(|g| g.id)
    }

    /// Sum of stat bonuses over the worn set.
    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Units of `id` held in slot lists (worn pieces excluded).
    pub fn count_of(&self, id: u32) -> u32 {
        let gear = self
            .gear
            .iter()
            .flatten()
            .filter(|g| g.id == id)
            .count() as u32;
        let stacked: u32 = self
            .stacks
            .iter()
            .flatten()
            .filter(|s| s.id == id)
            .map(|s| s.count)
            .sum();
        gear + stacked
    }

    // ── Mutators ───────────────────────────────────────────────

    /// Add one unit of `id`. Returns the slot it landed in.
    pub fn add(&mut self, catalog: &Catalog, id: u32) -> Result<Slot, InventoryError> {
        let item = catalog.item(id).ok_or(InventoryError::UnknownId(id))?;
        let slot = item.slot();

        if let Some(si) = stack_index(slot) {
            let stack_max = match item {
                ItemRef::Material(d) => d.stack_max,
                ItemRef::Consumable(d) => d.stack_max,
                ItemRef::Equipment(_) => MAX_STACK,
            }
            .min(MAX_STACK);
            let list = &mut self.stacks[si];
            if let Some(stack) = list.iter_mut().find(|s| s.id == id) {
                if stack.count >= stack_max {
                    return Err(InventoryError::StackFull(id));
                }
                stack.count += 1;
                return Ok(slot);
            }
            if list.len() >= MAX_ENTRIES_PER_SLOT {
                return Err(InventoryError::SlotFull(slot));
            }
            let rarity = item.rarity();
            let at = list
                .iter()
                .position(|s| s.rarity.sort_index() > rarity.sort_index())
                .unwrap_or(list.len());
            list.insert(at, Stack { id, rarity, count: 1 });
            return Ok(slot);
        }

        let es = slot.equip_slot().ok_or(InventoryError::NotEquipment(id))?;
        if self.gear[es.index()].len() >= MAX_ENTRIES_PER_SLOT {
            return Err(InventoryError::SlotFull(slot));
        }
        let gear = self.fresh_gear(id, item.rarity());
        self.insert_gear(es, gear);
        Ok(slot)
    }

    /// Wear `id`. A piece already in the slot list is taken from there;
    /// whatever was worn goes back into the list by rarity.
    pub fn equip(&mut self, catalog: &Catalog, id: u32) -> Result<EquipSlot, InventoryError> {
        let def = match catalog.item(id) {
            Some(ItemRef::Equipment(d)) => d,
            Some(_) => return Err(InventoryError::NotEquipment(id)),
            None => return Err(InventoryError::UnknownId(id)),
        };
        let es = def.slot;
        let i = es.index();
        let pos = self.gear[i].iter().position(|g| g.id == id);

        if pos.is_none() && self.worn[i].is_some() && self.gear[i].len() >= MAX_ENTRIES_PER_SLOT {
            return Err(InventoryError::NoRoom(es));
        }

        let incoming = match pos {
            Some(p) => self.gear[i].remove(p),
            None => self.fresh_gear(id, def.rarity),
        };
        if let Some(prev) = self.worn[i].take() {
            self.insert_gear(es, prev);
        }
        self.worn[i] = Some(incoming);
        self.recompute_stats(catalog);
        Ok(es)
    }

    /// Take off whatever is worn in `slot`. Refused when the slot list has
    /// no room to take the piece back.
    pub fn unequip(&mut self, catalog: &Catalog, slot: EquipSlot) -> Result<u32, InventoryError> {
        let i = slot.index();
        if self.worn[i].is_none() {
            return Err(InventoryError::NothingEquipped(slot));
        }
        if self.gear[i].len() >= MAX_ENTRIES_PER_SLOT {
            return Err(InventoryError::NoRoom(slot));
        }
        let Some(gear) = self.worn[i].take() else {
            return Err(InventoryError::NothingEquipped(slot));
        };
        self.insert_gear(slot, gear);
        self.recompute_stats(catalog);
        Ok(gear.id)
    }

    /// Remove one unit of `id` from `slot` and return its sell value.
    pub fn sell(&mut self, catalog: &Catalog, id: u32, slot: Slot) -> Result<u64, InventoryError> {
        let value = catalog
            .item(id)
            .ok_or(InventoryError::UnknownId(id))?
            .return_gold_value();

        if let Some(si) = stack_index(slot) {
            let list = &mut self.stacks[si];
            let pos = list
                .iter()
                .position(|s| s.id == id)
                .ok_or(InventoryError::NotOwned { id, slot })?;
            list[pos].count -= 1;
            if list[pos].count == 0 {
                list.remove(pos);
            }
            return Ok(value);
        }

        let es = slot
            .equip_slot()
            .ok_or(InventoryError::NotOwned { id, slot })?;
        let list = &mut self.gear[es.index()];
        let pos = list
            .iter()
            .position(|g| g.id == id)
            .ok_or(InventoryError::NotOwned { id, slot })?;
        list.remove(pos);
        Ok(value)
    }

    fn fresh_gear(&mut self, id: u32, rarity: Rarity) -> Gear {
        let serial = self.next_serial;
        self.next_serial += 1;
        Gear { id, rarity, serial }
    }

    fn insert_gear(&mut self, slot: EquipSlot, gear: Gear) {
        let list = &mut self.gear[slot.index()];
        let at = list
            .iter()
            .position(|g| g.rank() > gear.rank())
            .unwrap_or(list.len());
        list.insert(at, gear);
    }

    fn recompute_stats(&mut self, catalog: &Catalog) {
        let mut stats = Stats::default();
        for gear in self.worn.iter().flatten() {
            if let Some(def) = catalog.equipment(gear.id) {
                stats += def.stats;
            }
        }
        self.stats = stats;
    }
}
