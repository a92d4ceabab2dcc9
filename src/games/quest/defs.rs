//! Static definition tables: equipment, materials, consumables, currencies
//! and monsters.
//!
//! Tables are authored as JSON under `data/` and embedded at compile time.
//! Every table keeps its authored order, which is also the iteration order
//! the loot roller walks.

use std::collections::HashMap;
use std::fmt;
use std::ops::AddAssign;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::loot::LootEntry;

const EQUIPMENT_JSON: &str = include_str!("../../../data/equipment.json");
const MATERIALS_JSON: &str = include_str!("../../../data/materials.json");
const CONSUMABLES_JSON: &str = include_str!("../../../data/consumables.json");
const CURRENCIES_JSON: &str = include_str!("../../../data/currencies.json");
const MONSTERS_JSON: &str = include_str!("../../../data/monsters.json");

// ── Rarity ─────────────────────────────────────────────────────

/// Quality grade. Declaration order is best-first, so the derived `Ord`
/// sorts better grades before worse ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rarity {
    #[serde(rename = "SU")]
    Su,
    #[serde(rename = "SR")]
    Sr,
    #[serde(rename = "SS")]
    Ss,
    S,
    A,
    B,
    C,
    D,
}

impl Rarity {
    /// Best-first. Index in this array is the inventory sort key.
    pub const ALL: [Rarity; 8] = [
        Rarity::Su,
        Rarity::Sr,
        Rarity::Ss,
        Rarity::S,
        Rarity::A,
        Rarity::B,
        Rarity::C,
        Rarity::D,
    ];

    /// Inventory sort index: 0 = SU (best) … 7 = D (worst).
    pub fn sort_index(self) -> usize {
        self as usize
    }

    /// Drop grade: 0 = D (worst) … 7 = SU (best). A drop ceiling admits
    /// every definition whose grade is at or below its own.
    pub fn grade(self) -> usize {
        7 - self.sort_index()
    }

    pub fn label(self) -> &'static str {
        match self {
            Rarity::Su => "SU",
            Rarity::Sr => "SR",
            Rarity::Ss => "SS",
            Rarity::S => "S",
            Rarity::A => "A",
            Rarity::B => "B",
            Rarity::C => "C",
            Rarity::D => "D",
        }
    }

    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            Rarity::D => (0x9e, 0x9e, 0x9e),
            Rarity::C => (0xff, 0xff, 0xff),
            Rarity::B => (0x4c, 0xaf, 0x50),
            Rarity::A => (0x21, 0x96, 0xf3),
            Rarity::S => (0x9c, 0x27, 0xb0),
            Rarity::Ss => (0xff, 0x98, 0x00),
            Rarity::Sr => (0xff, 0x44, 0x66),
            Rarity::Su => (0xff, 0xd7, 0x00),
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ── Slots ──────────────────────────────────────────────────────

/// The four wearable slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EquipSlot {
    Weapon,
    Helmet,
    Armor,
    Boots,
}

impl EquipSlot {
    pub const ALL: [EquipSlot; 4] = [
        EquipSlot::Weapon,
        EquipSlot::Helmet,
        EquipSlot::Armor,
        EquipSlot::Boots,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn slot(self) -> Slot {
        match self {
            EquipSlot::Weapon => Slot::Weapon,
            EquipSlot::Helmet => Slot::Helmet,
            EquipSlot::Armor => Slot::Armor,
            EquipSlot::Boots => Slot::Boots,
        }
    }
}

impl fmt::Display for EquipSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.slot().fmt(f)
    }
}

/// Inventory partitions, in inventory-tab order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Slot {
    Weapon,
    Helmet,
    Armor,
    Boots,
    Material,
    Item,
}

impl Slot {
    pub const ALL: [Slot; 6] = [
        Slot::Weapon,
        Slot::Helmet,
        Slot::Armor,
        Slot::Boots,
        Slot::Material,
        Slot::Item,
    ];

    pub fn equip_slot(self) -> Option<EquipSlot> {
        match self {
            Slot::Weapon => Some(EquipSlot::Weapon),
            Slot::Helmet => Some(EquipSlot::Helmet),
            Slot::Armor => Some(EquipSlot::Armor),
            Slot::Boots => Some(EquipSlot::Boots),
            Slot::Material | Slot::Item => None,
        }
    }

    pub fn is_stackable(self) -> bool {
        self.equip_slot().is_none()
    }

    pub fn label(self) -> &'static str {
        match self {
            Slot::Weapon => "武器",
            Slot::Helmet => "兜",
            Slot::Armor => "鎧",
            Slot::Boots => "靴",
            Slot::Material => "素材",
            Slot::Item => "アイテム",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ── Stats ──────────────────────────────────────────────────────

/// Stat bonuses carried by a piece of equipment (and their sum over the
/// worn set).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Stats {
    pub attack_damage: i32,
    pub defense: i32,
    pub max_hp: i32,
    pub speed: f64,
    pub extra_jump: u32,
}

impl AddAssign for Stats {
    fn add_assign(&mut self, rhs: Self) {
        self.attack_damage += rhs.attack_damage;
        self.defense += rhs.defense;
        self.max_hp += rhs.max_hp;
        self.speed += rhs.speed;
        self.extra_jump += rhs.extra_jump;
    }
}

// ── Item definitions ───────────────────────────────────────────

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentDef {
    pub id: u32,
    pub slot: EquipSlot,
    pub name: String,
    pub rarity: Rarity,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub drop_weight: u32,
    #[serde(default)]
    pub stats: Stats,
    #[serde(default)]
    pub return_gold_value: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialKind {
    Ore,
    Herb,
    Leather,
    Wood,
    Gem,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialDef {
    pub id: u32,
    pub kind: MaterialKind,
    pub name: String,
    pub rarity: Rarity,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_stack_max")]
    pub stack_max: u32,
    #[serde(default)]
    pub drop_weight: u32,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub return_gold_value: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsumableKind {
    Potion,
    Scroll,
    Food,
    Bomb,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumableDef {
    pub id: u32,
    pub kind: ConsumableKind,
    pub name: String,
    pub rarity: Rarity,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_stack_max")]
    pub stack_max: u32,
    #[serde(default)]
    pub drop_weight: u32,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub return_gold_value: u64,
}

/// Currencies are display-only; gold is tracked on the player directly.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyDef {
    pub id: u32,
    pub kind: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub max_amount: u64,
    #[serde(default)]
    pub color: String,
}

fn default_stack_max() -> u32 {
    999
}

macro_rules! impl_loot_entry {
    ($($t:ty),*) => {$(
        impl LootEntry for $t {
            fn loot_id(&self) -> u32 { self.id }
            fn loot_rarity(&self) -> Rarity { self.rarity }
            fn loot_weight(&self) -> u32 { self.drop_weight }
        }
    )*};
}

impl_loot_entry!(EquipmentDef, MaterialDef, ConsumableDef);

/// A resolved definition, tagged with its category.
#[derive(Clone, Copy, Debug)]
pub enum ItemRef<'a> {
    Equipment(&'a EquipmentDef),
    Material(&'a MaterialDef),
    Consumable(&'a ConsumableDef),
}

impl<'a> ItemRef<'a> {
    pub fn id(&self) -> u32 {
        match self {
            ItemRef::Equipment(d) => d.id,
            ItemRef::Material(d) => d.id,
            ItemRef::Consumable(d) => d.id,
        }
    }

    pub fn name(&self) -> &'a str {
        match self {
            ItemRef::Equipment(d) => &d.name,
            ItemRef::Material(d) => &d.name,
            ItemRef::Consumable(d) => &d.name,
        }
    }

    pub fn rarity(&self) -> Rarity {
        match self {
            ItemRef::Equipment(d) => d.rarity,
            ItemRef::Material(d) => d.rarity,
            ItemRef::Consumable(d) => d.rarity,
        }
    }

    pub fn color(&self) -> &'a str {
        match self {
            ItemRef::Equipment(d) => &d.color,
            ItemRef::Material(d) => &d.color,
            ItemRef::Consumable(d) => &d.color,
        }
    }

    pub fn return_gold_value(&self) -> u64 {
        match self {
            ItemRef::Equipment(d) => d.return_gold_value,
            ItemRef::Material(d) => d.return_gold_value,
            ItemRef::Consumable(d) => d.return_gold_value,
        }
    }

    /// The inventory partition this definition lives in.
    pub fn slot(&self) -> Slot {
        match self {
            ItemRef::Equipment(d) => d.slot.slot(),
            ItemRef::Material(_) => Slot::Material,
            ItemRef::Consumable(_) => Slot::Item,
        }
    }

    pub fn description(&self) -> &'a str {
        match self {
            ItemRef::Equipment(_) => "",
            ItemRef::Material(d) => &d.description,
            ItemRef::Consumable(d) => &d.description,
        }
    }
}

// ── Monsters ───────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MonsterKind {
    Slime,
    Mushroom,
    Ghost,
    GhostBoss,
    GhostSlave,
}

impl MonsterKind {
    /// Ghost types ignore gravity and platforms.
    pub fn floats(self) -> bool {
        matches!(
            self,
            MonsterKind::Ghost | MonsterKind::GhostBoss | MonsterKind::GhostSlave
        )
    }
}

/// Probability gate plus rarity ceiling for one loot category.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropRule {
    pub chance: f64,
    pub max_rarity: Rarity,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MonsterDef {
    pub id: u32,
    pub kind: MonsterKind,
    pub name: String,
    pub width: f64,
    pub height: f64,
    pub hp: i32,
    pub damage: i32,
    pub speed: f64,
    pub coin_count: u32,
    pub gold_per_coin: u64,
    pub exp_gain: u64,
    pub equip_drop: DropRule,
    pub material_drop: DropRule,
    pub item_drop: DropRule,
    pub big_hp_bar: bool,
}

impl Default for MonsterDef {
    /// Plain slime. Used for every field a table entry omits and for ids
    /// missing from the table.
    fn default() -> Self {
        Self {
            id: 100001,
            kind: MonsterKind::Slime,
            name: "スライム".into(),
            width: 40.0,
            height: 36.0,
            hp: 50,
            damage: 10,
            speed: 1.5,
            coin_count: 2,
            gold_per_coin: 10,
            exp_gain: 20,
            equip_drop: DropRule { chance: 0.08, max_rarity: Rarity::C },
            material_drop: DropRule { chance: 0.1, max_rarity: Rarity::C },
            item_drop: DropRule { chance: 0.05, max_rarity: Rarity::C },
            big_hp_bar: false,
        }
    }
}

// ── Catalog ────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum DataError {
    #[error("Parse error in '{table}' table: {details}")]
    Parse { table: &'static str, details: String },

    #[error("Duplicate definition id {0}")]
    DuplicateId(u32),
}

#[derive(Clone, Copy, Debug)]
enum ItemKey {
    Equipment(usize),
    Material(usize),
    Consumable(usize),
}

/// All definition tables, loaded once and read-only afterwards.
#[derive(Debug, Default)]
pub struct Catalog {
    equipment: Vec<EquipmentDef>,
    materials: Vec<MaterialDef>,
    consumables: Vec<ConsumableDef>,
    currencies: Vec<CurrencyDef>,
    monsters: Vec<MonsterDef>,
    index: HashMap<u32, ItemKey>,
}

fn parse_table<T: for<'de> Deserialize<'de>>(
    table: &'static str,
    json: &str,
) -> Result<Vec<T>, DataError> {
    serde_json::from_str(json).map_err(|e| DataError::Parse {
        table,
        details: e.to_string(),
    })
}

impl Catalog {
    /// Catalog built from the embedded tables. A table that fails to parse
    /// is logged and left empty so the session can still run.
    pub fn builtin() -> Self {
        let equipment = parse_table("equipment", EQUIPMENT_JSON);
        let materials = parse_table("materials", MATERIALS_JSON);
        let consumables = parse_table("consumables", CONSUMABLES_JSON);
        let currencies = parse_table("currencies", CURRENCIES_JSON);
        let monsters = parse_table("monsters", MONSTERS_JSON);

        fn or_empty<T>(r: Result<Vec<T>, DataError>) -> Vec<T> {
            r.unwrap_or_else(|e| {
                crate::console::warn(&e.to_string());
                Vec::new()
            })
        }

        let mut catalog = Catalog {
            equipment: or_empty(equipment),
            materials: or_empty(materials),
            consumables: or_empty(consumables),
            currencies: or_empty(currencies),
            monsters: or_empty(monsters),
            index: HashMap::new(),
        };
        if let Err(e) = catalog.rebuild_index() {
            crate::console::warn(&e.to_string());
        }
        catalog
    }

    /// Build a catalog from in-memory tables. Item ids must be unique
    /// across the three item tables.
    pub fn from_tables(
        equipment: Vec<EquipmentDef>,
        materials: Vec<MaterialDef>,
        consumables: Vec<ConsumableDef>,
        monsters: Vec<MonsterDef>,
    ) -> Result<Self, DataError> {
        let mut catalog = Catalog {
            equipment,
            materials,
            consumables,
            currencies: Vec::new(),
            monsters,
            index: HashMap::new(),
        };
        catalog.rebuild_index()?;
        Ok(catalog)
    }

    /// Populate the id index. On a duplicate id the first table wins and
    /// the error is still reported.
    fn rebuild_index(&mut self) -> Result<(), DataError> {
        self.index.clear();
        let mut duplicate = None;
        let keys = self
            .equipment
            .iter()
            .enumerate()
            .map(|(i, d)| (d.id, ItemKey::Equipment(i)))
            .chain(
                self.materials
                    .iter()
                    .enumerate()
                    .map(|(i, d)| (d.id, ItemKey::Material(i))),
            )
            .chain(
                self.consumables
                    .iter()
                    .enumerate()
                    .map(|(i, d)| (d.id, ItemKey::Consumable(i))),
            );
        for (id, key) in keys {
            if self.index.contains_key(&id) {
                duplicate.get_or_insert(id);
                continue;
            }
            self.index.insert(id, key);
        }
        match duplicate {
            Some(id) => Err(DataError::DuplicateId(id)),
            None => Ok(()),
        }
    }

    /// Look up any item definition by id.
    pub fn item(&self, id: u32) -> Option<ItemRef<'_>> {
        Some(match *self.index.get(&id)? {
            ItemKey::Equipment(i) => ItemRef::Equipment(&self.equipment[i]),
            ItemKey::Material(i) => ItemRef::Material(&self.materials[i]),
            ItemKey::Consumable(i) => ItemRef::Consumable(&self.consumables[i]),
        })
    }

    pub fn equipment(&self, id: u32) -> Option<&EquipmentDef> {
        match self.item(id)? {
            ItemRef::Equipment(d) => Some(d),
            _ => None,
        }
    }

    pub fn equipment_table(&self) -> &[EquipmentDef] {
        &self.equipment
    }

    pub fn material_table(&self) -> &[MaterialDef] {
        &self.materials
    }

    pub fn consumable_table(&self) -> &[ConsumableDef] {
        &self.consumables
    }

    pub fn currencies(&self) -> &[CurrencyDef] {
        &self.currencies
    }

    /// Monster stats by id, falling back to the default slime.
    pub fn monster(&self, id: u32) -> MonsterDef {
        self.monsters
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .unwrap_or_else(|| MonsterDef {
                id,
                ..MonsterDef::default()
            })
    }

    pub fn has_monster(&self, id: u32) -> bool {
        self.monsters.iter().any(|m| m.id == id)
    }
}

/// Parse `#RRGGBB` into an RGB triple.
pub fn hex_rgb(s: &str) -> Option<(u8, u8, u8)> {
    let hex = s.strip_prefix('#')?.as_bytes();
    if hex.len() != 6 {
        return None;
    }
    let mut channels = hex.chunks(2).map(|pair| {
        std::str::from_utf8(pair)
            .ok()
            .and_then(|p| u8::from_str_radix(p, 16).ok())
    });
    Some((channels.next()??, channels.next()??, channels.next()??))
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn equip(id: u32, slot: EquipSlot, rarity: Rarity, stats: Stats) -> EquipmentDef {
        EquipmentDef {
            id,
            slot,
            name: format!("equip-{id}"),
            rarity,
            color: String::new(),
            drop_weight: 100,
            stats,
            return_gold_value: 10,
        }
    }

    pub fn material(id: u32, rarity: Rarity) -> MaterialDef {
        MaterialDef {
            id,
            kind: MaterialKind::Ore,
            name: format!("mat-{id}"),
            rarity,
            description: String::new(),
            stack_max: 999,
            drop_weight: 100,
            color: String::new(),
            return_gold_value: 3,
        }
    }

    pub fn consumable(id: u32, rarity: Rarity) -> ConsumableDef {
        ConsumableDef {
            id,
            kind: ConsumableKind::Potion,
            name: format!("item-{id}"),
            rarity,
            description: String::new(),
            stack_max: 999,
            drop_weight: 100,
            color: String::new(),
            return_gold_value: 0,
        }
    }

    /// One weapon, helmet, armor and boots per rarity (ids 1000 + slot*100
    /// + rarity sort index), plus materials 5000.. and consumables 6000..
    pub fn full_catalog() -> Catalog {
        let mut equipment = Vec::new();
        for slot in EquipSlot::ALL {
            for r in Rarity::ALL {
                let id = 1000 + slot.index() as u32 * 100 + r.sort_index() as u32;
                equipment.push(equip(id, slot, r, Stats::default()));
            }
        }
        let materials = Rarity::ALL
            .iter()
            .map(|&r| material(5000 + r.sort_index() as u32, r))
            .collect();
        let consumables = Rarity::ALL
            .iter()
            .map(|&r| consumable(6000 + r.sort_index() as u32, r))
            .collect();
        Catalog::from_tables(equipment, materials, consumables, Vec::new())
            .expect("fixture ids are unique")
    }

    pub fn gear_id(slot: EquipSlot, r: Rarity) -> u32 {
        1000 + slot.index() as u32 * 100 + r.sort_index() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rarity_orders_best_first() {
        assert!(Rarity::Su < Rarity::D);
        assert_eq!(Rarity::Su.sort_index(), 0);
        assert_eq!(Rarity::D.sort_index(), 7);
        assert_eq!(Rarity::D.grade(), 0);
        assert_eq!(Rarity::Su.grade(), 7);
    }

    #[test]
    fn rarity_deserializes_from_grade_label() {
        let r: Rarity = serde_json::from_str("\"SR\"").unwrap();
        assert_eq!(r, Rarity::Sr);
        let r: Rarity = serde_json::from_str("\"B\"").unwrap();
        assert_eq!(r, Rarity::B);
    }

    #[test]
    fn builtin_tables_parse() {
        let c = Catalog::builtin();
        assert_eq!(c.equipment_table().len(), 32);
        assert_eq!(c.material_table().len(), 40);
        assert!(!c.consumable_table().is_empty());
        assert!(!c.currencies().is_empty());
        assert!(c.has_monster(100004));
    }

    #[test]
    fn lookup_is_tagged_by_category() {
        let c = Catalog::builtin();
        assert!(matches!(c.item(200201), Some(ItemRef::Equipment(_))));
        assert!(matches!(c.item(300001), Some(ItemRef::Material(_))));
        assert!(matches!(c.item(400001), Some(ItemRef::Consumable(_))));
        assert!(c.item(999_999).is_none());
        assert_eq!(c.item(300001).map(|i| i.slot()), Some(Slot::Material));
        assert_eq!(c.item(200305).map(|i| i.slot()), Some(Slot::Boots));
    }

    #[test]
    fn builtin_boots_grant_extra_jumps() {
        let c = Catalog::builtin();
        let su = c.equipment(200308).unwrap();
        assert_eq!(su.stats.extra_jump, 3);
        assert!((su.stats.speed - 3.0).abs() < 1e-9);
    }

    #[test]
    fn unknown_monster_falls_back_to_slime_stats() {
        let c = Catalog::builtin();
        let m = c.monster(123);
        assert_eq!(m.id, 123);
        assert_eq!(m.kind, MonsterKind::Slime);
        assert_eq!(m.hp, 50);
        assert_eq!(m.equip_drop.max_rarity, Rarity::C);
    }

    #[test]
    fn monster_entry_fills_missing_fields_from_defaults() {
        let defs: Vec<MonsterDef> =
            serde_json::from_str(r#"[{"id": 7, "kind": "ghost", "hp": 99}]"#).unwrap();
        assert_eq!(defs[0].kind, MonsterKind::Ghost);
        assert_eq!(defs[0].hp, 99);
        assert_eq!(defs[0].damage, 10);
        assert_eq!(defs[0].coin_count, 2);
    }

    #[test]
    fn duplicate_ids_across_tables_are_rejected() {
        let e = fixtures::equip(1, EquipSlot::Weapon, Rarity::D, Stats::default());
        let m = fixtures::material(1, Rarity::D);
        let err = Catalog::from_tables(vec![e], vec![m], vec![], vec![]).unwrap_err();
        assert!(matches!(err, DataError::DuplicateId(1)));
    }

    #[test]
    fn stats_accumulate() {
        let mut s = Stats::default();
        s += Stats { attack_damage: 3, max_hp: 5, ..Stats::default() };
        s += Stats { defense: 2, extra_jump: 1, speed: 0.5, ..Stats::default() };
        assert_eq!(s.attack_damage, 3);
        assert_eq!(s.defense, 2);
        assert_eq!(s.max_hp, 5);
        assert_eq!(s.extra_jump, 1);
    }

    #[test]
    fn hex_colors() {
        assert_eq!(hex_rgb("#FF4466"), Some((0xff, 0x44, 0x66)));
        assert_eq!(hex_rgb("FF4466"), None);
        assert_eq!(hex_rgb("#FFF"), None);
        // six bytes, but not six hex digits
        assert_eq!(hex_rgb("#ffé12"), None);
        assert_eq!(hex_rgb("#日本"), None);
    }
}
