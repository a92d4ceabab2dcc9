//! Session aggregate: everything one play-through owns.

use std::collections::BTreeSet;

use rand::rngs::SmallRng;
use rand::SeedableRng;

use super::camera::Camera;
use super::defs::{Catalog, Slot};
use super::monster::{Monster, Origin, Spawner};
use super::pickup::{Coin, LootDrop, Pickup, PickupKind};
use super::player::Player;
use super::projectile::{Bolt, Boomerang};
use super::scheduler::Scheduler;
use super::stage::{
    Background, Ladder, MonsterSpawn, Platform, Portal, StageData, StageTable, WorldMap,
    FALLBACK_START,
};
use super::text::{FloatingText, Notification, TextKind};

pub const MAX_LOG: usize = 50;

/// Live entities of the current stage. Rebuilt wholesale on every load.
#[derive(Clone, Debug, Default)]
pub struct World {
    pub stage: String,
    pub display_name: String,
    pub start: (f64, f64),
    pub background: Background,
    pub platforms: Vec<Platform>,
    pub portals: Vec<Portal>,
    pub ladders: Vec<Ladder>,
    pub pickups: Vec<Pickup>,
    pub drops: Vec<LootDrop>,
    pub coins: Vec<Coin>,
    pub spawners: Vec<Spawner>,
    pub monsters: Vec<Monster>,
    /// The stage's monster table, kept for refills.
    pub monster_spawns: Vec<MonsterSpawn>,
    pub boomerangs: Vec<Boomerang>,
    pub bolts: Vec<Bolt>,
    pub texts: Vec<FloatingText>,
}

impl World {
    pub fn text(&mut self, kind: TextKind, x: f64, y: f64) {
        self.texts.push(FloatingText::new(kind, x, y));
    }

    /// Living stage-table monsters (not spawner children or summons).
    pub fn placed_count(&self) -> usize {
        self.monsters
            .iter()
            .filter(|m| m.origin == Origin::Placed)
            .count()
    }

    pub fn alive_with_origin(&self, origin: Origin) -> usize {
        self.monsters
            .iter()
            .filter(|m| m.origin == origin && m.is_alive())
            .count()
    }
}

/// Which modal panel is open over the stage.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum Overlay {
    #[default]
    None,
    Inventory(InventoryView),
    WorldMap,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InventoryView {
    pub tab: Slot,
    /// Index into the tab's listing; `None` shows the list.
    pub selected: Option<usize>,
    /// Units to sell at once from a stack.
    pub sell_quantity: u32,
}

impl Default for InventoryView {
    fn default() -> Self {
        Self {
            tab: Slot::Weapon,
            selected: None,
            sell_quantity: 1,
        }
    }
}

/// A line in the message log.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogEntry {
    pub text: String,
    pub important: bool,
}

pub struct Session {
    pub catalog: Catalog,
    pub stages: StageTable,
    pub world_map: WorldMap,
    pub player: Player,
    pub world: World,
    pub camera: Camera,
    pub scheduler: Scheduler,
    /// Stages visited this session. Only ever grows.
    pub unlocked: BTreeSet<String>,
    /// Editor preview: portals are disabled.
    pub preview: bool,
    pub rng: SmallRng,
    pub notifications: Vec<Notification>,
    pub log: Vec<LogEntry>,
    pub overlay: Overlay,
    pub frame: u64,
    /// Bumped on every successful stage load; the renderer keys its
    /// transition effect off this.
    pub stage_loads: u32,
    next_uid: u64,
}

impl Session {
    pub fn new(catalog: Catalog, stages: StageTable, world_map: WorldMap, seed: u64) -> Self {
        let (x, y) = FALLBACK_START;
        Self {
            catalog,
            stages,
            world_map,
            player: Player::new(x, y),
            world: World::default(),
            camera: Camera::default(),
            scheduler: Scheduler::default(),
            unlocked: BTreeSet::new(),
            preview: false,
            rng: SmallRng::seed_from_u64(seed),
            notifications: Vec::new(),
            log: Vec::new(),
            overlay: Overlay::None,
            frame: 0,
            stage_loads: 0,
            next_uid: 1,
        }
    }

    pub fn next_uid(&mut self) -> u64 {
        let uid = self.next_uid;
        self.next_uid += 1;
        uid
    }

    /// Build a monster from the catalog with a fresh uid.
    pub fn make_monster(&mut self, monster_id: u32, x: f64, y: f64, origin: Origin) -> Monster {
        let uid = self.next_uid();
        Monster::new(uid, self.catalog.monster(monster_id), x, y, origin)
    }

    pub fn add_log(&mut self, text: &str, important: bool) {
        self.log.push(LogEntry {
            text: text.to_string(),
            important,
        });
        if self.log.len() > MAX_LOG {
            self.log.remove(0);
        }
    }

    pub fn notify(&mut self, text: &str, rgb: (u8, u8, u8)) {
        self.notifications.push(Notification::new(text, rgb));
    }

    /// Replace the live world with fresh entities built from `data`.
    pub fn populate(&mut self, name: &str, data: &StageData) {
        let mut world = World {
            stage: name.to_string(),
            display_name: if data.display_name.is_empty() {
                name.to_string()
            } else {
                data.display_name.clone()
            },
            start: data.start(),
            background: data.background.clone(),
            platforms: data.platforms.clone(),
            portals: data.portals.clone(),
            ladders: data.ladders.clone(),
            pickups: data
                .items
                .iter()
                .filter(|i| i.kind != PickupKind::Unknown)
                .map(|i| Pickup { x: i.x, y: i.y, kind: i.kind })
                .collect(),
            drops: data
                .equipment
                .iter()
                .map(|e| LootDrop::placed(e.x, e.y, e.equipment_id))
                .collect(),
            spawners: data.spawners.iter().map(Spawner::from_data).collect(),
            monster_spawns: data.monsters.clone(),
            ..World::default()
        };
        for m in &data.monsters {
            if !self.catalog.has_monster(m.monster_id) {
                crate::console::warn(&format!(
                    "{name}: unknown monster id {}, using defaults",
                    m.monster_id
                ));
            }
        }
        world.monsters = data
            .monsters
            .iter()
            .map(|m| self.make_monster(m.monster_id, m.x, m.y, Origin::Placed))
            .collect();
        self.world = world;
    }
}
