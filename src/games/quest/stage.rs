//! Stage layouts and the world map.
//!
//! Stages are authored in `data/stages.json` keyed by name; the editor
//! preview hands over one more stage in the same shape. Nothing here is
//! mutated after load: `logic::load_stage` hands a record to
//! `Session::populate`, which builds the live entities from it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::geometry::Aabb;
use super::pickup::PickupKind;

const STAGES_JSON: &str = include_str!("../../../data/stages.json");
const WORLD_MAP_JSON: &str = include_str!("../../../data/world_map.json");

pub const WORLD_WIDTH: f64 = 1920.0;
pub const WORLD_HEIGHT: f64 = 810.0;
/// Top of the ground strip.
pub const FLOOR_Y: f64 = 760.0;

/// The hub. Entering it clears buffs and heals.
pub const HUB_STAGE: &str = "Lobby";
/// Name under which an editor preview stage is registered.
pub const PREVIEW_STAGE: &str = "Preview";
/// Start point for stages that omit one.
pub const FALLBACK_START: (f64, f64) = (100.0, 300.0);

pub const PORTAL_WIDTH: f64 = 50.0;
pub const PORTAL_HEIGHT: f64 = 70.0;
pub const LADDER_WIDTH: f64 = 32.0;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StageError {
    #[error("unknown stage '{0}'")]
    UnknownStage(String),

    #[error("stage data parse error: {0}")]
    Parse(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Platform {
    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.x, self.y, self.width, self.height)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Portal {
    pub x: f64,
    pub y: f64,
    pub target_stage: String,
    #[serde(default)]
    pub label: String,
}

impl Portal {
    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.x, self.y, PORTAL_WIDTH, PORTAL_HEIGHT)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ladder {
    pub x: f64,
    pub y: f64,
    pub height: f64,
}

impl Ladder {
    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.x, self.y, LADDER_WIDTH, self.height)
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlacedItem {
    pub x: f64,
    pub y: f64,
    #[serde(rename = "type")]
    pub kind: PickupKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedEquipment {
    pub x: f64,
    pub y: f64,
    pub equipment_id: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonsterSpawn {
    pub x: f64,
    pub y: f64,
    pub monster_id: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpawnerData {
    pub x: f64,
    pub y: f64,
    pub monster_id: u32,
    #[serde(default)]
    pub spawn_interval: Option<u32>,
    #[serde(default)]
    pub max_monsters: Option<usize>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Background {
    pub sky_top: String,
    pub sky_bottom: String,
}

/// One authored stage.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StageData {
    pub number: u32,
    pub display_name: String,
    pub player_start: Option<Point>,
    pub platforms: Vec<Platform>,
    pub portals: Vec<Portal>,
    pub items: Vec<PlacedItem>,
    pub equipment: Vec<PlacedEquipment>,
    pub monsters: Vec<MonsterSpawn>,
    pub spawners: Vec<SpawnerData>,
    pub ladders: Vec<Ladder>,
    pub background: Background,
}

impl StageData {
    pub fn from_json(json: &str) -> Result<Self, StageError> {
        serde_json::from_str(json).map_err(|e| StageError::Parse(e.to_string()))
    }

    pub fn start(&self) -> (f64, f64) {
        self.player_start
            .map(|p| (p.x, p.y))
            .unwrap_or(FALLBACK_START)
    }
}

/// All stages by name.
#[derive(Clone, Debug, Default)]
pub struct StageTable {
    stages: HashMap<String, StageData>,
}

impl StageTable {
    /// Embedded stage table. A parse failure is logged and leaves the table
    /// empty; every load then fails as an unknown stage.
    pub fn builtin() -> Self {
        Self::from_json(STAGES_JSON).unwrap_or_else(|e| {
            crate::console::warn(&e.to_string());
            Self::default()
        })
    }

    pub fn from_json(json: &str) -> Result<Self, StageError> {
        let stages = serde_json::from_str(json).map_err(|e| StageError::Parse(e.to_string()))?;
        Ok(Self { stages })
    }

    pub fn get(&self, name: &str) -> Result<&StageData, StageError> {
        self.stages
            .get(name)
            .ok_or_else(|| StageError::UnknownStage(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.stages.contains_key(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, data: StageData) {
        self.stages.insert(name.into(), data);
    }

    /// Display name, falling back to the key.
    pub fn display_name<'a>(&'a self, name: &'a str) -> &'a str {
        match self.stages.get(name) {
            Some(s) if !s.display_name.is_empty() => &s.display_name,
            _ => name,
        }
    }
}

// ── World map ──────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Lobby,
    Stage,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapNode {
    /// Equal to the stage name it warps to.
    pub id: String,
    pub label: String,
    pub kind: NodeKind,
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldMap {
    pub nodes: Vec<MapNode>,
    pub edges: Vec<(String, String)>,
}

impl WorldMap {
    pub fn builtin() -> Self {
        serde_json::from_str(WORLD_MAP_JSON).unwrap_or_else(|e| {
            crate::console::warn(&format!("world map parse error: {e}"));
            Self::default()
        })
    }

    pub fn node(&self, id: &str) -> Option<&MapNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Bounding box of all node positions as (min_x, min_y, max_x, max_y).
    pub fn extent(&self) -> Option<(f64, f64, f64, f64)> {
        let first = self.nodes.first()?;
        Some(self.nodes.iter().fold(
            (first.x, first.y, first.x, first.y),
            |(x0, y0, x1, y1), n| (x0.min(n.x), y0.min(n.y), x1.max(n.x), y1.max(n.y)),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_stages_parse() {
        let table = StageTable::builtin();
        let lobby = table.get(HUB_STAGE).unwrap();
        assert_eq!(lobby.number, 0);
        assert!(!lobby.portals.is_empty());
        assert_eq!(lobby.equipment.len(), 1);
        for n in 1..=6 {
            assert!(table.contains(&format!("Stage{n:03}")));
        }
    }

    #[test]
    fn every_portal_targets_a_known_stage() {
        let table = StageTable::builtin();
        for name in ["Lobby", "Stage001", "Stage002", "Stage003", "Stage004", "Stage005", "Stage006"] {
            for portal in &table.get(name).unwrap().portals {
                assert!(
                    table.contains(&portal.target_stage),
                    "{name} portal -> {}",
                    portal.target_stage
                );
            }
        }
    }

    #[test]
    fn unknown_stage_is_an_error() {
        let table = StageTable::builtin();
        assert_eq!(
            table.get("Nowhere"),
            Err(StageError::UnknownStage("Nowhere".into()))
        );
    }

    #[test]
    fn minimal_stage_uses_defaults() {
        let s = StageData::from_json(r#"{"platforms":[{"x":0,"y":700,"width":100,"height":20}]}"#)
            .unwrap();
        assert_eq!(s.start(), FALLBACK_START);
        assert_eq!(s.platforms.len(), 1);
        assert!(s.monsters.is_empty());
    }

    #[test]
    fn spawner_optionals() {
        let s = StageData::from_json(
            r#"{"spawners":[{"x":1,"y":2,"monsterId":100003},
                            {"x":1,"y":2,"monsterId":100003,"spawnInterval":60,"maxMonsters":4}]}"#,
        )
        .unwrap();
        assert_eq!(s.spawners[0].spawn_interval, None);
        assert_eq!(s.spawners[1].spawn_interval, Some(60));
        assert_eq!(s.spawners[1].max_monsters, Some(4));
    }

    #[test]
    fn malformed_stage_reports_parse_error() {
        assert!(matches!(
            StageData::from_json("{not json"),
            Err(StageError::Parse(_))
        ));
    }

    #[test]
    fn world_map_nodes_are_stages() {
        let map = WorldMap::builtin();
        let table = StageTable::builtin();
        assert!(!map.nodes.is_empty());
        for node in &map.nodes {
            assert!(table.contains(&node.id), "node {}", node.id);
        }
        for (a, b) in &map.edges {
            assert!(map.node(a).is_some() && map.node(b).is_some());
        }
        assert_eq!(map.node(HUB_STAGE).map(|n| n.kind), Some(NodeKind::Lobby));
    }
}
