/// Leaf Village Quest game logic: stage loading, the per-frame tick and
/// the menu operations the panels call.

use rand::Rng;

use crate::config::LaunchConfig;
use crate::console;

use super::combat::{self, item_label};
use super::defs::{EquipSlot, Slot};
use super::inventory::InventoryError;
use super::monster::Origin;
use super::pickup::{PickupKind, PICKUP_REACH, POTION_HEAL};
use super::player::{Intent, PLAYER_WIDTH};
use super::projectile::Boomerang;
use super::scheduler::Event;
use super::stage::{StageData, StageError, HUB_STAGE, PREVIEW_STAGE};
use super::state::{Overlay, Session};
use super::text::TextKind;

/// Ticks between a monster fading out and the stage topping up.
pub const REFILL_DELAY: u64 = 180;

const RED: (u8, u8, u8) = (255, 68, 68);
const PURPLE: (u8, u8, u8) = (147, 51, 234);
const INVENTORY_FULL: &str = "インベントリがいっぱい!";

// ── Stage flow ─────────────────────────────────────────────────

/// Pick and load the first stage. A preview payload wins, then the
/// `stage=` override, then the hub. Anything that fails to load falls back
/// to the hub.
pub fn boot(s: &mut Session, config: &LaunchConfig, preview_stage: Option<StageData>) {
    s.preview = config.preview;

    let first = match preview_stage {
        Some(data) if config.preview => {
            s.stages.insert(PREVIEW_STAGE, data);
            PREVIEW_STAGE.to_string()
        }
        _ => config.stage.clone().unwrap_or_else(|| HUB_STAGE.to_string()),
    };

    if load_stage(s, &first).is_err() && first != HUB_STAGE {
        // The hub missing too leaves an empty world at the fallback start.
        let _ = load_stage(s, HUB_STAGE);
    }
}

/// Replace the live world with `name`. An unknown stage is logged and
/// leaves everything as it was.
pub fn load_stage(s: &mut Session, name: &str) -> Result<(), StageError> {
    let data = match s.stages.get(name) {
        Ok(data) => data.clone(),
        Err(e) => {
            console::warn(&e.to_string());
            s.add_log(&format!("ステージ「{name}」が見つからない"), true);
            return Err(e);
        }
    };

    let previous = s.world.stage.clone();
    s.populate(name, &data);
    s.unlocked.insert(name.to_string());
    s.player.place(s.world.start);

    if name == HUB_STAGE {
        s.player.rest();
        if !previous.is_empty() && previous != HUB_STAGE {
            let (px, py) = (s.player.center().0, s.player.y);
            s.world.text(TextKind::LobbyHeal, px, py - 30.0);
        }
    }

    s.scheduler.advance_epoch();
    let (cx, cy) = s.player.center();
    s.camera.snap(cx, cy);
    s.stage_loads += 1;

    s.add_log(&format!("{}に到着", s.world.display_name), false);
    console::log(&format!("stage loaded: {name}"));
    Ok(())
}

/// Warp via the world map. Only unlocked stages other than the current
/// one are reachable; returns whether a load happened.
pub fn travel(s: &mut Session, node_id: &str) -> bool {
    if node_id == s.world.stage {
        return false;
    }
    if !s.unlocked.contains(node_id) {
        let label = s
            .world_map
            .node(node_id)
            .map(|n| n.label.clone())
            .unwrap_or_else(|| node_id.to_string());
        s.notify(&format!("{label}はまだ解放されていない"), RED);
        return false;
    }
    match load_stage(s, node_id) {
        Ok(()) => {
            s.overlay = Overlay::None;
            true
        }
        Err(e) => {
            s.notify(&e.to_string(), RED);
            false
        }
    }
}

/// Enter the portal the player stands in, if any. Returns true when a
/// portal was touched, even if traversal was refused.
fn use_portal(s: &mut Session) -> bool {
    let body = s.player.aabb();
    let Some(target) = s
        .world
        .portals
        .iter()
        .find(|p| p.aabb().overlaps(&body))
        .map(|p| p.target_stage.clone())
    else {
        return false;
    };

    if s.preview {
        let (px, py) = (s.player.center().0, s.player.y);
        s.world.text(TextKind::PreviewMode, px, py - 20.0);
        s.notify("プレビュー中はポータルを使えない", PURPLE);
    } else if let Err(e) = load_stage(s, &target) {
        s.notify(&e.to_string(), RED);
    }
    true
}

// ── Tick ───────────────────────────────────────────────────────

/// Advance the session one frame. `intent` is what is held; `pressed`
/// holds the controls whose key went down since the last frame, and only
/// those fire jumps, swings, drops and portals.
pub fn step(s: &mut Session, intent: Intent, pressed: Intent) {
    s.frame += 1;

    if pressed.up && !use_portal(s) && !s.player.is_climbing() {
        s.player.jump();
    }
    if pressed.jump {
        s.player.jump();
    }
    if pressed.down {
        s.player.drop_down();
    }
    if pressed.attack && s.player.attack() {
        throw_shuriken(s);
    }

    let expired = s.player.update(&intent, &s.world.platforms, &s.world.ladders);
    let (px, py) = (s.player.center().0, s.player.y);
    if expired.lightning {
        s.world.text(TextKind::BuffEndLightning, px, py - 20.0);
    }
    if expired.fireball {
        s.world.text(TextKind::BuffEndFire, px, py - 20.0);
    }
    let (cx, cy) = s.player.center();
    s.camera.follow(cx, cy);

    collect_pickups(s);
    collect_coins(s);
    collect_drops(s);
    update_spawners(s);
    update_monsters(s);
    update_effects(s);

    combat::resolve(s);
    sweep_dead(s);

    for event in s.scheduler.tick() {
        match event {
            Event::RefillMonsters => refill_monsters(s),
        }
    }
    s.notifications.retain_mut(|n| n.update());
}

/// Hold `intent` for `n` frames; it counts as pressed on the first.
#[cfg(test)]
pub fn tick_n(s: &mut Session, intent: Intent, n: u32) {
    let mut prev = Intent::default();
    for _ in 0..n {
        step(s, intent, intent.pressed_since(&prev));
        prev = intent;
    }
}

fn throw_shuriken(s: &mut Session) {
    let p = &s.player;
    let volley = Boomerang::volley(
        p.x + PLAYER_WIDTH / 2.0 + p.facing * 20.0,
        p.y + 24.0,
        p.facing,
        p.total_attack(),
        1 + p.buffs.shurikens,
    );
    s.world.boomerangs.extend(volley);
}

fn collect_pickups(s: &mut Session) {
    let reach = s.player.aabb().expand(PICKUP_REACH);
    let (taken, kept) = std::mem::take(&mut s.world.pickups)
        .into_iter()
        .partition::<Vec<_>, _>(|p| p.aabb().overlaps(&reach));
    s.world.pickups = kept;

    for pickup in taken {
        let (px, py) = (s.player.center().0, s.player.y);
        match pickup.kind {
            PickupKind::Potion => {
                let healed = s.player.heal(POTION_HEAL);
                s.world.text(TextKind::PotionHeal(healed), px, py);
            }
            PickupKind::Lightning => {
                s.player.activate_lightning();
                s.world.text(TextKind::BuffLightning, px, py - 30.0);
            }
            PickupKind::Fireball => {
                s.player.activate_fireball();
                s.world.text(TextKind::BuffFireball, px, py - 30.0);
            }
            PickupKind::Shuriken => {
                if s.player.add_shuriken() {
                    let total = 1 + s.player.buffs.shurikens;
                    s.world.text(TextKind::ShurikenAdd(total), px, py - 30.0);
                } else {
                    s.world.text(TextKind::ShurikenMax, px, py - 30.0);
                }
            }
            PickupKind::Unknown => {}
        }
    }
}

fn collect_coins(s: &mut Session) {
    s.world.coins.retain_mut(|c| c.update());
    let body = s.player.aabb();
    let mut gained = 0;
    s.world.coins.retain(|c| {
        if c.aabb().overlaps(&body) {
            gained += c.value;
            return false;
        }
        true
    });
    if gained > 0 {
        s.player.gold += gained;
        let (px, py) = (s.player.center().0, s.player.y);
        s.world.text(TextKind::CoinGet(gained), px, py - 10.0);
    }
}

fn collect_drops(s: &mut Session) {
    let platforms = &s.world.platforms;
    s.world.drops.retain_mut(|d| d.update(platforms));

    let body = s.player.aabb();
    let mut i = 0;
    while i < s.world.drops.len() {
        if !s.world.drops[i].aabb().overlaps(&body) {
            i += 1;
            continue;
        }
        let id = s.world.drops[i].item_id;
        match s.player.inventory.add(&s.catalog, id) {
            Ok(_) => {
                s.world.drops.remove(i);
                let (name, rgb) = item_label(&s.catalog, id);
                let (px, py) = (s.player.center().0, s.player.y);
                s.world.text(TextKind::EquipGet { name: name.clone(), rgb }, px, py - 20.0);
                s.add_log(&format!("{name}を手に入れた"), false);
            }
            Err(InventoryError::UnknownId(_)) => {
                s.world.drops.remove(i);
            }
            Err(_) => {
                // Standing on a drop with a full bag would repeat every frame.
                if !s.notifications.iter().any(|n| n.text == INVENTORY_FULL) {
                    s.notify(INVENTORY_FULL, RED);
                }
                i += 1;
            }
        }
    }
}

fn update_spawners(s: &mut Session) {
    for i in 0..s.world.spawners.len() {
        let alive = s.world.alive_with_origin(Origin::Spawner(i));
        if let Some((x, y)) = s.world.spawners[i].update(alive) {
            let id = s.world.spawners[i].monster_id;
            let monster = s.make_monster(id, x, y, Origin::Spawner(i));
            s.world.monsters.push(monster);
        }
    }
}

fn update_monsters(s: &mut Session) {
    let target = s.player.center();
    let mut summons = Vec::new();
    for i in 0..s.world.monsters.len() {
        let world = &mut s.world;
        world.monsters[i].update(&world.platforms, target);

        if world.monsters[i].boss.is_none() {
            continue;
        }
        let uid = world.monsters[i].uid;
        let alive = world.alive_with_origin(Origin::Summon { boss: uid });
        let turn = world.monsters[i].boss_turn(alive);
        let (cx, y) = (world.monsters[i].center().0, world.monsters[i].y);
        if !turn.summons.is_empty() {
            world.text(TextKind::BossSummon, cx, y - 20.0);
        }
        if let Some(amount) = turn.regen {
            world.text(TextKind::BossRegen(amount), cx, y - 20.0);
        }
        summons.extend(turn.summons.into_iter().map(|at| (uid, at)));
    }

    for (boss, (x, y)) in summons {
        let monster = s.make_monster(super::monster::SUMMON_ID, x, y, Origin::Summon { boss });
        s.world.monsters.push(monster);
    }
}

fn update_effects(s: &mut Session) {
    let (cx, cy) = s.player.center();
    s.world.boomerangs.retain_mut(|b| b.update(cx, cy));
    s.world.bolts.retain_mut(|b| b.update());
    s.world.texts.retain_mut(|t| t.update());
}

/// Drop faded corpses. Losing a stage-table monster queues a refill.
fn sweep_dead(s: &mut Session) {
    let before = s.world.placed_count();
    s.world.monsters.retain(|m| !m.is_expired());
    if s.world.placed_count() < before {
        s.scheduler.schedule(REFILL_DELAY, Event::RefillMonsters);
    }
}

/// Top the stage-table monsters back up, picking spawn entries at random.
fn refill_monsters(s: &mut Session) {
    let table = s.world.monster_spawns.clone();
    if table.is_empty() {
        return;
    }
    while s.world.placed_count() < table.len() {
        let spawn = &table[s.rng.gen_range(0..table.len())];
        let monster = s.make_monster(spawn.monster_id, spawn.x, spawn.y, Origin::Placed);
        s.world.monsters.push(monster);
    }
}

// ── Inventory panel operations ─────────────────────────────────

/// One row of the inventory panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ListEntry {
    pub id: u32,
    pub count: u32,
    pub worn: bool,
}

/// What the panel lists under `tab`: worn gear first, then the bag.
pub fn listing(s: &Session, tab: Slot) -> Vec<ListEntry> {
    let inv = &s.player.inventory;
    let worn = tab
        .equip_slot()
        .and_then(|es| inv.worn(es))
        .map(|id| ListEntry { id, count: 1, worn: true });
    worn.into_iter()
        .chain(
            inv.entries(tab)
                .into_iter()
                .map(|(id, count)| ListEntry { id, count, worn: false }),
        )
        .collect()
}

pub fn equip(s: &mut Session, id: u32) -> Result<EquipSlot, InventoryError> {
    let result = s.player.equip(&s.catalog, id);
    let (name, _) = item_label(&s.catalog, id);
    match &result {
        Ok(_) => s.add_log(&format!("{name}を装備した"), false),
        Err(e) => refused(s, e),
    }
    result
}

pub fn unequip(s: &mut Session, slot: EquipSlot) -> Result<u32, InventoryError> {
    let result = s.player.unequip(&s.catalog, slot);
    match &result {
        Ok(id) => {
            let (name, _) = item_label(&s.catalog, *id);
            s.add_log(&format!("{name}を外した"), false);
        }
        Err(e) => refused(s, e),
    }
    result
}

/// Sell up to `quantity` units, stopping at the first failure. Returns
/// the units sold and the gold earned.
pub fn sell_quantity(s: &mut Session, id: u32, slot: Slot, quantity: u32) -> (u32, u64) {
    let mut sold = 0;
    let mut gold = 0;
    for _ in 0..quantity {
        match s.player.sell(&s.catalog, id, slot) {
            Ok(value) => {
                sold += 1;
                gold += value;
            }
            Err(e) => {
                if sold == 0 {
                    refused(s, &e);
                }
                break;
            }
        }
    }
    if sold > 0 {
        let (name, _) = item_label(&s.catalog, id);
        s.add_log(&format!("{name} ×{sold} を売った (+{gold} G)"), false);
    }
    (sold, gold)
}

fn refused(s: &mut Session, e: &InventoryError) {
    let text = match e {
        InventoryError::SlotFull(_) | InventoryError::StackFull(_) => INVENTORY_FULL.to_string(),
        InventoryError::NoRoom(slot) => format!("{}枠に空きがない", slot.slot().label()),
        other => other.to_string(),
    };
    s.add_log(&text, false);
    s.notify(&text, RED);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::quest::defs::{fixtures, Rarity};
    use crate::games::quest::inventory::MAX_ENTRIES_PER_SLOT;
    use crate::games::quest::pickup::{Coin, LootDrop, Pickup};
    use crate::games::quest::player::{PLAYER_HEIGHT, MAX_SHURIKENS};
    use crate::games::quest::stage::{StageTable, WorldMap, FALLBACK_START, FLOOR_Y};

    const STAGES: &str = r#"{
        "Lobby": {"displayName":"ロビー","playerStart":{"x":100,"y":600},
                  "portals":[{"x":300,"y":690,"targetStage":"Field","label":"草原"}]},
        "Field": {"displayName":"草原","playerStart":{"x":200,"y":600},
                  "portals":[{"x":100,"y":690,"targetStage":"Lobby","label":"ロビー"}],
                  "monsters":[{"x":900,"y":700,"monsterId":100001},
                              {"x":1200,"y":700,"monsterId":100001}]}
    }"#;

    fn session() -> Session {
        let stages = StageTable::from_json(STAGES).unwrap();
        let mut s = Session::new(fixtures::full_catalog(), stages, WorldMap::builtin(), 9);
        boot(&mut s, &LaunchConfig::default(), None);
        s
    }

    fn stand_at(s: &mut Session, x: f64) {
        s.player.x = x;
        s.player.y = FLOOR_Y - PLAYER_HEIGHT;
        s.player.vy = 0.0;
    }

    fn up() -> Intent {
        Intent { up: true, ..Intent::default() }
    }

    /// One frame where `intent` is held and was just pressed.
    fn press(s: &mut Session, intent: Intent) {
        step(s, intent, intent);
    }

    fn idle(s: &mut Session) {
        step(s, Intent::default(), Intent::default());
    }

    #[test]
    fn boot_loads_the_hub() {
        let s = session();
        assert_eq!(s.world.stage, HUB_STAGE);
        assert_eq!(s.world.display_name, "ロビー");
        assert_eq!((s.player.x, s.player.y), (100.0, 600.0));
        assert!(s.unlocked.contains(HUB_STAGE));
        assert_eq!(s.stage_loads, 1);
    }

    #[test]
    fn boot_with_unknown_override_falls_back() {
        let stages = StageTable::from_json(STAGES).unwrap();
        let mut s = Session::new(fixtures::full_catalog(), stages, WorldMap::default(), 1);
        let config = LaunchConfig { stage: Some("Nowhere".into()), ..LaunchConfig::default() };
        boot(&mut s, &config, None);
        assert_eq!(s.world.stage, HUB_STAGE);
        assert!(s.log.iter().any(|l| l.text.contains("Nowhere")));
    }

    #[test]
    fn preview_boot_uses_payload() {
        let stages = StageTable::from_json(STAGES).unwrap();
        let mut s = Session::new(fixtures::full_catalog(), stages, WorldMap::default(), 1);
        let data = StageData::from_json(r#"{"displayName":"試作","playerStart":{"x":50,"y":60}}"#)
            .unwrap();
        let config = LaunchConfig { preview: true, ..LaunchConfig::default() };
        boot(&mut s, &config, Some(data));
        assert!(s.preview);
        assert_eq!(s.world.stage, PREVIEW_STAGE);
        assert_eq!(s.world.start, (50.0, 60.0));
    }

    #[test]
    fn unknown_stage_keeps_state() {
        let mut s = session();
        let before = (s.world.stage.clone(), s.stage_loads, s.unlocked.len());
        assert!(load_stage(&mut s, "Nowhere").is_err());
        assert_eq!((s.world.stage.clone(), s.stage_loads, s.unlocked.len()), before);
    }

    #[test]
    fn portal_loads_target_and_unlocks() {
        let mut s = session();
        stand_at(&mut s, 305.0);
        press(&mut s, up());
        assert_eq!(s.world.stage, "Field");
        assert!(s.unlocked.contains("Field"));
        assert_eq!(s.world.monsters.len(), 2);
    }

    #[test]
    fn holding_up_does_not_chain_portals() {
        let mut s = session();
        stand_at(&mut s, 305.0);
        press(&mut s, up());
        stand_at(&mut s, 105.0);
        step(&mut s, up(), Intent::default());
        assert_eq!(s.world.stage, "Field", "no new press, no second portal");
    }

    #[test]
    fn preview_refuses_portals() {
        let mut s = session();
        s.preview = true;
        stand_at(&mut s, 305.0);
        press(&mut s, up());
        assert_eq!(s.world.stage, HUB_STAGE);
        assert!(s.world.texts.iter().any(|t| t.text == TextKind::PreviewMode.label()));
        assert_eq!(s.notifications.len(), 1);
    }

    #[test]
    fn hub_entry_heals_and_clears_buffs() {
        let mut s = session();
        load_stage(&mut s, "Field").unwrap();
        s.player.hp = 5;
        s.player.activate_lightning();
        s.player.activate_fireball();
        s.player.add_shuriken();
        load_stage(&mut s, HUB_STAGE).unwrap();
        assert_eq!(s.player.hp, s.player.total_max_hp());
        assert!(s.player.buffs.lightning.is_none());
        assert!(s.player.buffs.fireball.is_none());
        assert_eq!(s.player.buffs.shurikens, 0);
        assert!(s.world.texts.iter().any(|t| t.text == TextKind::LobbyHeal.label()));
    }

    #[test]
    fn stage_load_replaces_transients() {
        let mut s = session();
        s.world.coins.push(Coin::spawn(0.0, 0.0, 10, &mut s.rng));
        s.world.boomerangs.push(Boomerang::new(0.0, 0.0, 1.0, 5, 0, 0.0));
        load_stage(&mut s, "Field").unwrap();
        assert!(s.world.coins.is_empty());
        assert!(s.world.boomerangs.is_empty());
        assert_eq!((s.player.x, s.player.y), (200.0, 600.0));
        assert_eq!((s.player.vx, s.player.vy), (0.0, 0.0));
    }

    #[test]
    fn travel_rules() {
        let mut s = session();
        assert!(!travel(&mut s, HUB_STAGE), "already here");
        assert!(!travel(&mut s, "Field"), "locked");
        assert_eq!(s.notifications.len(), 1);
        load_stage(&mut s, "Field").unwrap();
        s.overlay = Overlay::WorldMap;
        assert!(travel(&mut s, HUB_STAGE));
        assert_eq!(s.world.stage, HUB_STAGE);
        assert_eq!(s.overlay, Overlay::None);
    }

    #[test]
    fn attack_throws_one_plus_stack() {
        let mut s = session();
        s.player.add_shuriken();
        s.player.add_shuriken();
        let attack = Intent { attack: true, ..Intent::default() };
        press(&mut s, attack);
        assert_eq!(s.world.boomerangs.len(), 3);
        // Held attack is not a new press.
        for _ in 0..20 {
            step(&mut s, attack, Intent::default());
        }
        assert!(s.world.boomerangs.len() <= 3);
    }

    #[test]
    fn potion_heals_up_to_max() {
        let mut s = session();
        s.player.hp = s.player.total_max_hp() - 10;
        let (x, y) = (s.player.x, s.player.y);
        s.world.pickups.push(Pickup { x, y, kind: PickupKind::Potion });
        idle(&mut s);
        assert_eq!(s.player.hp, s.player.total_max_hp());
        assert!(s.world.pickups.is_empty());
        assert!(s.world.texts.iter().any(|t| t.text == "+10"));
    }

    #[test]
    fn shuriken_pickup_caps() {
        let mut s = session();
        s.player.buffs.shurikens = MAX_SHURIKENS;
        let (x, y) = (s.player.x, s.player.y);
        s.world.pickups.push(Pickup { x, y, kind: PickupKind::Shuriken });
        idle(&mut s);
        assert_eq!(s.player.buffs.shurikens, MAX_SHURIKENS);
        assert!(s.world.texts.iter().any(|t| t.text == TextKind::ShurikenMax.label()));
    }

    #[test]
    fn coins_credit_gold() {
        let mut s = session();
        let (x, y) = (s.player.x, s.player.y + 10.0);
        let mut coin = Coin::spawn(x, y, 10, &mut s.rng);
        coin.vx = 0.0;
        coin.vy = 0.0;
        s.world.coins.push(coin);
        idle(&mut s);
        assert_eq!(s.player.gold, 10);
        assert!(s.world.coins.is_empty());
    }

    #[test]
    fn full_bag_leaves_drop_and_notifies_once() {
        let mut s = session();
        let id = fixtures::gear_id(EquipSlot::Boots, Rarity::D);
        for _ in 0..MAX_ENTRIES_PER_SLOT {
            s.player.inventory.add(&s.catalog, id).unwrap();
        }
        let (x, y) = (s.player.x, s.player.y);
        s.world.drops.push(LootDrop::placed(x, y, id));
        idle(&mut s);
        idle(&mut s);
        assert_eq!(s.world.drops.len(), 1);
        let full = s.notifications.iter().filter(|n| n.text == INVENTORY_FULL).count();
        assert_eq!(full, 1);
    }

    #[test]
    fn drop_pickup_adds_to_inventory() {
        let mut s = session();
        let id = fixtures::gear_id(EquipSlot::Weapon, Rarity::B);
        let (x, y) = (s.player.x, s.player.y);
        s.world.drops.push(LootDrop::placed(x, y, id));
        idle(&mut s);
        assert!(s.world.drops.is_empty());
        assert_eq!(s.player.inventory.count_of(id), 1);
    }

    #[test]
    fn faded_monsters_refill_after_delay() {
        let mut s = session();
        load_stage(&mut s, "Field").unwrap();
        s.player.place(FALLBACK_START);
        s.world.monsters[0].kill();
        tick_n(&mut s, Intent::default(), 40);
        assert_eq!(s.world.placed_count(), 1);
        assert_eq!(s.scheduler.pending(), 1);
        tick_n(&mut s, Intent::default(), REFILL_DELAY as u32);
        assert_eq!(s.world.placed_count(), 2);
    }

    #[test]
    fn refill_is_dropped_on_stage_change() {
        let mut s = session();
        load_stage(&mut s, "Field").unwrap();
        s.player.place(FALLBACK_START);
        s.world.monsters[0].kill();
        tick_n(&mut s, Intent::default(), 40);
        load_stage(&mut s, HUB_STAGE).unwrap();
        tick_n(&mut s, Intent::default(), REFILL_DELAY as u32);
        assert!(s.world.monsters.is_empty());
    }

    #[test]
    fn sell_quantity_stops_at_first_failure() {
        let mut s = session();
        let id = 5000;
        for _ in 0..3 {
            s.player.inventory.add(&s.catalog, id).unwrap();
        }
        let (sold, gold) = sell_quantity(&mut s, id, Slot::Material, 5);
        assert_eq!(sold, 3);
        assert_eq!(gold, 9);
        assert_eq!(s.player.gold, 9);
        assert_eq!(s.player.inventory.count_of(id), 0);
        assert_eq!(sell_quantity(&mut s, id, Slot::Material, 1), (0, 0));
        assert_eq!(s.notifications.len(), 1);
    }

    #[test]
    fn listing_puts_worn_first() {
        let mut s = session();
        let a = fixtures::gear_id(EquipSlot::Weapon, Rarity::A);
        let d = fixtures::gear_id(EquipSlot::Weapon, Rarity::D);
        s.player.inventory.add(&s.catalog, d).unwrap();
        s.player.inventory.add(&s.catalog, a).unwrap();
        equip(&mut s, d).unwrap();
        let rows = listing(&s, Slot::Weapon);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], ListEntry { id: d, count: 1, worn: true });
        assert_eq!(rows[1], ListEntry { id: a, count: 1, worn: false });
        assert!(listing(&s, Slot::Material).is_empty());
    }

    #[test]
    fn unequip_without_room_notifies() {
        let mut s = session();
        let id = fixtures::gear_id(EquipSlot::Boots, Rarity::A);
        s.player.inventory.add(&s.catalog, id).unwrap();
        equip(&mut s, id).unwrap();
        let filler = fixtures::gear_id(EquipSlot::Boots, Rarity::D);
        for _ in 0..MAX_ENTRIES_PER_SLOT {
            s.player.inventory.add(&s.catalog, filler).unwrap();
        }
        assert_eq!(unequip(&mut s, EquipSlot::Boots), Err(InventoryError::NoRoom(EquipSlot::Boots)));
        assert_eq!(s.player.inventory.worn(EquipSlot::Boots), Some(id));
        assert_eq!(s.notifications.len(), 1);
    }
}
