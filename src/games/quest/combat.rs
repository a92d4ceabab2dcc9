//! Per-frame hit resolution between the player, projectiles and monsters,
//! plus kill rewards.

use rand::Rng;

use super::defs::{hex_rgb, Catalog, MonsterDef};
use super::loot::roll_category;
use super::monster::{Monster, Origin};
use super::pickup::{Coin, LootDrop};
use super::player::{Hurt, PLAYER_WIDTH};
use super::projectile::{Bolt, FIREBALL_DAMAGE};
use super::state::Session;
use super::text::{FloatingText, TextKind};

pub const CRIT_CHANCE: f64 = 0.1;
pub const CRIT_MULTIPLIER: i32 = 5;
pub const STOMP_MULTIPLIER: f64 = 1.5;
pub const STOMP_BOUNCE: f64 = -10.0;
pub const STOMP_INVINCIBILITY: u32 = 30;
/// Feet may be this far above a monster's head and still stomp.
const STOMP_ABOVE: f64 = 5.0;
/// ...or this far below it.
const STOMP_BELOW: f64 = 20.0;
pub const CHAIN_FACTOR: f64 = 0.5;
const DROP_JITTER: f64 = 10.0;

/// How a hit was delivered. Decides text offsets and chain lightning.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Source {
    Melee,
    Stomp,
    Boomerang,
    Fireball,
    Chain,
}

impl Source {
    fn chains(self) -> bool {
        matches!(self, Source::Melee | Source::Stomp | Source::Boomerang)
    }

    fn crit_text_offset(self) -> f64 {
        match self {
            Source::Stomp => 50.0,
            _ => 40.0,
        }
    }
}

/// Roll the critical multiplier for one hit.
pub fn roll_crit<R: Rng + ?Sized>(damage: i32, rng: &mut R) -> (i32, bool) {
    if rng.gen::<f64>() < CRIT_CHANCE {
        (damage * CRIT_MULTIPLIER, true)
    } else {
        (damage, false)
    }
}

/// Item ids dropped by a kill, in category order: equipment, material,
/// consumable. Each category is an independent roll. The flag marks drops
/// that scatter sideways.
pub fn roll_loot<R: Rng + ?Sized>(
    def: &MonsterDef,
    catalog: &Catalog,
    rng: &mut R,
) -> Vec<(u32, bool)> {
    let mut out = Vec::new();
    if let Some(id) = roll_category(&def.equip_drop, catalog.equipment_table(), rng) {
        out.push((id, false));
    }
    if let Some(id) = roll_category(&def.material_drop, catalog.material_table(), rng) {
        out.push((id, true));
    }
    if let Some(id) = roll_category(&def.item_drop, catalog.consumable_table(), rng) {
        out.push((id, true));
    }
    out
}

/// Resolve every hit for this frame. Runs after all entities have moved.
pub fn resolve(s: &mut Session) {
    melee(s);
    stomp(s);
    contact(s);
    boomerangs(s);
    fireballs(s);
}

fn melee(s: &mut Session) {
    if !s.player.is_hit_frame() {
        return;
    }
    let hitbox = s.player.attack_hitbox();
    let damage = s.player.total_attack();
    let attacker_x = s.player.x;
    for i in 0..s.world.monsters.len() {
        let m = &s.world.monsters[i];
        if m.is_alive() && hitbox.overlaps(&m.aabb()) {
            strike(s, i, damage, attacker_x, Source::Melee);
        }
    }
}

fn is_stomp_height(feet: f64, head: f64) -> bool {
    feet >= head - STOMP_ABOVE && feet <= head + STOMP_BELOW
}

fn stomp(s: &mut Session) {
    if s.player.vy <= 0.0 {
        return;
    }
    let body = s.player.aabb();
    let feet = s.player.bottom();
    let target = s.world.monsters.iter().position(|m| {
        m.is_alive() && body.overlaps(&m.aabb()) && is_stomp_height(feet, m.y)
    });
    let Some(i) = target else {
        return;
    };

    let damage = (s.player.base_attack as f64 * STOMP_MULTIPLIER).floor() as i32;
    let attacker_x = s.player.x + PLAYER_WIDTH / 2.0;
    let (cx, y) = (s.world.monsters[i].center().0, s.world.monsters[i].y);
    strike(s, i, damage, attacker_x, Source::Stomp);
    s.world.text(TextKind::Stomp, cx, y - 30.0);

    s.player.vy = STOMP_BOUNCE;
    s.player.jump_count = 1;
    s.player.invincible = STOMP_INVINCIBILITY;
}

fn contact(s: &mut Session) {
    let body = s.player.aabb();
    let feet = s.player.bottom();
    let falling = s.player.vy > 0.0;
    let respawn_at = s.world.start;

    let hits: Vec<i32> = s
        .world
        .monsters
        .iter()
        .filter(|m| m.is_alive() && body.overlaps(&m.aabb()))
        .filter(|m| !(falling && feet <= m.y + STOMP_BELOW))
        .map(Monster::damage)
        .collect();

    for damage in hits {
        let (px, py) = (s.player.center().0, s.player.y);
        match s.player.take_damage(damage, respawn_at) {
            Hurt::Ignored => {}
            Hurt::Damaged(n) => s.world.text(TextKind::PlayerDamage(n), px, py - 10.0),
            Hurt::Died(n) => {
                s.world.text(TextKind::PlayerDamage(n), px, py - 10.0);
                s.add_log("力尽きた… スタート地点に戻された", true);
                s.notify("力尽きた…", (255, 68, 68));
            }
        }
    }
}

fn boomerangs(s: &mut Session) {
    for b in 0..s.world.boomerangs.len() {
        if !s.world.boomerangs[b].is_launched() {
            continue;
        }
        for i in 0..s.world.monsters.len() {
            let m = &s.world.monsters[i];
            if !m.is_alive() || !s.world.boomerangs[b].aabb().overlaps(&m.aabb()) {
                continue;
            }
            let uid = m.uid;
            let boomerang = &mut s.world.boomerangs[b];
            if boomerang.try_hit(uid) {
                let (damage, x) = (boomerang.damage, boomerang.x);
                strike(s, i, damage, x, Source::Boomerang);
            }
        }
    }
}

fn fireballs(s: &mut Session) {
    let Some(orbit) = s.player.buffs.fireball.as_mut() else {
        return;
    };
    let mut hits = Vec::new();
    for ball in &mut orbit.balls {
        for (i, m) in s.world.monsters.iter().enumerate() {
            if m.is_alive() && ball.try_hit(m.uid, &m.aabb()) {
                hits.push((i, ball.x));
            }
        }
    }
    for (i, x) in hits {
        if !s.world.monsters[i].is_alive() {
            continue;
        }
        let (cx, y) = (s.world.monsters[i].center().0, s.world.monsters[i].y);
        strike(s, i, FIREBALL_DAMAGE, x, Source::Fireball);
        s.world.text(TextKind::FireHit, cx, y - 10.0);
    }
}

/// Player-dealt damage to monster `i`, with crit roll, texts, chain
/// lightning and kill rewards.
fn strike(s: &mut Session, i: usize, base: i32, attacker_x: f64, source: Source) {
    let (damage, crit) = roll_crit(base, &mut s.rng);
    let m = &mut s.world.monsters[i];
    let (cx, y) = (m.center().0, m.y);
    let died = m.take_damage(damage, attacker_x);

    if crit {
        s.world.text(TextKind::Critical, cx, y - source.crit_text_offset());
    }
    s.world.text(TextKind::MonsterDamage(damage), cx, y);
    if died {
        reward_kill(s, i);
        return;
    }

    if source.chains() && s.player.buffs.lightning.is_some() {
        let bolt = (s.player.total_attack() as f64 * CHAIN_FACTOR).floor() as i32;
        let (cx, cy) = s.world.monsters[i].center();
        s.world.bolts.push(Bolt::new(cx, cy, bolt));
        strike(s, i, bolt, cx, Source::Chain);
    }
}

/// Coins, experience and loot for monster `i`, which just died.
fn reward_kill(s: &mut Session, i: usize) {
    let m = s.world.monsters[i].clone();
    let (cx, cy) = m.center();

    if m.boss.is_some() {
        for summon in s.world.monsters.iter_mut() {
            if summon.origin == (Origin::Summon { boss: m.uid }) && summon.is_alive() {
                summon.kill();
                let (sx, sy) = (summon.center().0, summon.y);
                s.world.texts.push(FloatingText::new(TextKind::BossGhostDeath, sx, sy));
            }
        }
    }

    for _ in 0..m.def.coin_count {
        let coin = Coin::spawn(cx - 10.0, cy, m.def.gold_per_coin, &mut s.rng);
        s.world.coins.push(coin);
    }

    let levels = s.player.gain_exp(m.def.exp_gain);
    s.world.text(TextKind::ExpGain(m.def.exp_gain), cx, m.y - 20.0);
    s.add_log(&format!("{}を倒した (+{} EXP)", m.def.name, m.def.exp_gain), false);
    if levels > 0 {
        let (px, py) = (s.player.center().0, s.player.y);
        s.world.text(TextKind::LevelUp, px, py - 40.0);
        s.add_log(&format!("レベルアップ! Lv.{}", s.player.level), true);
    }

    for (id, jitter) in roll_loot(&m.def, &s.catalog, &mut s.rng) {
        let dx = if jitter {
            s.rng.gen_range(-DROP_JITTER..DROP_JITTER)
        } else {
            0.0
        };
        let drop = LootDrop::spawn(cx - 14.0 + dx, cy, id, &mut s.rng);
        s.world.drops.push(drop);
    }
}

/// Name and colour of an item for pickup texts.
pub fn item_label(catalog: &Catalog, id: u32) -> (String, (u8, u8, u8)) {
    match catalog.item(id) {
        Some(item) => {
            let rgb = hex_rgb(item.color()).unwrap_or_else(|| item.rarity().rgb());
            (item.name().to_string(), rgb)
        }
        None => (format!("#{id}"), (255, 255, 255)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::quest::defs::{fixtures, DropRule, Rarity, Stats};
    use crate::games::quest::defs::{EquipSlot, MonsterKind};
    use crate::games::quest::player::{Intent, ATTACK_HIT_FRAME, PLAYER_HEIGHT};
    use crate::games::quest::stage::{StageTable, WorldMap, FLOOR_Y};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn session_with(catalog: Catalog) -> Session {
        let mut s = Session::new(catalog, StageTable::default(), WorldMap::default(), 11);
        s.world.start = (100.0, 300.0);
        s.player.place((100.0, FLOOR_Y - PLAYER_HEIGHT));
        s.player.update(&Intent::default(), &[], &[]);
        s
    }

    fn add_monster(s: &mut Session, def: MonsterDef, x: f64, y: f64) -> usize {
        let uid = s.next_uid();
        s.world.monsters.push(Monster::new(uid, def, x, y, Origin::Placed));
        s.world.monsters.len() - 1
    }

    fn never_drops() -> MonsterDef {
        let none = DropRule { chance: 0.0, max_rarity: Rarity::D };
        MonsterDef {
            equip_drop: none,
            material_drop: none,
            item_drop: none,
            ..MonsterDef::default()
        }
    }

    fn hits_dealt(s: &Session, i: usize) -> i32 {
        let m = &s.world.monsters[i];
        m.max_hp - m.hp
    }

    #[test]
    fn crit_rate_is_about_ten_percent() {
        let mut rng = SmallRng::seed_from_u64(5);
        let crits = (0..100_000).filter(|_| roll_crit(10, &mut rng).1).count();
        assert!((9_000..11_000).contains(&crits), "crits = {crits}");
        let mut rng = SmallRng::seed_from_u64(6);
        for _ in 0..100 {
            let (d, c) = roll_crit(7, &mut rng);
            assert_eq!(d, if c { 35 } else { 7 });
        }
    }

    #[test]
    fn guaranteed_d_equipment_drop() {
        let only = fixtures::equip(42, EquipSlot::Weapon, Rarity::D, Stats::default());
        let catalog = Catalog::from_tables(vec![only], vec![], vec![], vec![]).unwrap();
        let mut def = never_drops();
        def.equip_drop = DropRule { chance: 1.0, max_rarity: Rarity::D };
        def.hp = 1;

        let mut s = session_with(catalog);
        let i = add_monster(&mut s, def, 600.0, 600.0);
        strike(&mut s, i, 5, 0.0, Source::Melee);
        assert!(!s.world.monsters[i].is_alive());
        assert_eq!(s.world.drops.len(), 1);
        assert_eq!(s.world.drops[0].item_id, 42);
    }

    #[test]
    fn loot_categories_roll_independently() {
        let catalog = fixtures::full_catalog();
        let always = DropRule { chance: 1.0, max_rarity: Rarity::Su };
        let def = MonsterDef {
            equip_drop: always,
            material_drop: always,
            item_drop: always,
            ..MonsterDef::default()
        };
        let mut rng = SmallRng::seed_from_u64(3);
        let drops = roll_loot(&def, &catalog, &mut rng);
        assert_eq!(drops.len(), 3);
        assert!(catalog.equipment(drops[0].0).is_some());
        assert!((5000..5100).contains(&drops[1].0));
        assert!((6000..6100).contains(&drops[2].0));
        assert!(roll_loot(&never_drops(), &catalog, &mut rng).is_empty());
    }

    #[test]
    fn kill_pays_coins_and_exp() {
        let mut s = session_with(fixtures::full_catalog());
        let mut def = never_drops();
        def.hp = 1;
        def.coin_count = 3;
        def.exp_gain = 120;
        let i = add_monster(&mut s, def, 600.0, 600.0);
        strike(&mut s, i, 5, 0.0, Source::Melee);
        assert_eq!(s.world.coins.len(), 3);
        assert_eq!(s.player.level, 2);
        assert_eq!(s.player.exp, 20);
        assert!(s.log.iter().any(|l| l.important));
    }

    #[test]
    fn melee_only_on_hit_frame() {
        let mut s = session_with(fixtures::full_catalog());
        let mut def = never_drops();
        def.hp = 10_000;
        let x = s.player.x + PLAYER_WIDTH + 10.0;
        let i = add_monster(&mut s, def, x, FLOOR_Y - 36.0);
        s.player.attack();
        let mut swings = 0;
        for _ in 0..12 {
            s.player.update(&Intent::default(), &[], &[]);
            if s.player.is_hit_frame() {
                swings += 1;
            }
            let before = hits_dealt(&s, i);
            melee(&mut s);
            if !s.player.is_hit_frame() {
                assert_eq!(hits_dealt(&s, i), before);
            }
            s.world.monsters[i].x = x;
        }
        assert_eq!(swings, 1);
        assert!(hits_dealt(&s, i) >= s.player.total_attack());
        assert_eq!(ATTACK_HIT_FRAME, 9);
    }

    #[test]
    fn stomp_beats_contact_damage() {
        let mut s = session_with(fixtures::full_catalog());
        let mut def = never_drops();
        def.hp = 10_000;
        let i = add_monster(&mut s, def, 100.0, 600.0);
        // Feet 10px into the head, falling.
        s.player.x = 104.0;
        s.player.y = 610.0 - PLAYER_HEIGHT;
        s.player.vy = 4.0;
        s.player.invincible = 0;
        let hp = s.player.hp;

        resolve(&mut s);
        assert_eq!(s.player.hp, hp);
        assert_eq!(s.player.vy, STOMP_BOUNCE);
        assert_eq!(s.player.jump_count, 1);
        assert_eq!(s.player.invincible, STOMP_INVINCIBILITY);
        let dealt = hits_dealt(&s, i);
        assert!(dealt == 22 || dealt == 110, "dealt {dealt}");
    }

    #[test]
    fn side_contact_hurts_player() {
        let mut s = session_with(fixtures::full_catalog());
        let mut def = never_drops();
        def.damage = 12;
        let (px, py) = (s.player.x, s.player.y);
        add_monster(&mut s, def, px + 10.0, py + 10.0);
        resolve(&mut s);
        assert_eq!(s.player.hp, 100 - 12);
        resolve(&mut s);
        assert_eq!(s.player.hp, 100 - 12, "invincibility blocks a second hit");
    }

    #[test]
    fn boomerang_hits_once_per_leg() {
        let mut s = session_with(fixtures::full_catalog());
        let mut def = never_drops();
        def.hp = 10_000;
        let i = add_monster(&mut s, def, 800.0, 600.0);
        let (cx, cy) = s.world.monsters[i].center();
        s.world.boomerangs.push(crate::games::quest::projectile::Boomerang::new(cx, cy, 1.0, 10, 0, 0.0));
        boomerangs(&mut s);
        let first = hits_dealt(&s, i);
        assert!(first == 10 || first == 50);
        boomerangs(&mut s);
        assert_eq!(hits_dealt(&s, i), first);
    }

    #[test]
    fn delayed_boomerang_does_not_hit() {
        let mut s = session_with(fixtures::full_catalog());
        let i = add_monster(&mut s, never_drops(), 800.0, 600.0);
        let (cx, cy) = s.world.monsters[i].center();
        s.world.boomerangs.push(crate::games::quest::projectile::Boomerang::new(cx, cy, 1.0, 10, 3, 0.0));
        boomerangs(&mut s);
        assert_eq!(hits_dealt(&s, i), 0);
    }

    #[test]
    fn chain_lightning_follows_melee() {
        let mut s = session_with(fixtures::full_catalog());
        s.player.activate_lightning();
        let mut def = never_drops();
        def.hp = 10_000;
        let i = add_monster(&mut s, def, 600.0, 600.0);
        strike(&mut s, i, 10, 0.0, Source::Melee);
        assert_eq!(s.world.bolts.len(), 1);
        assert_eq!(s.world.bolts[0].damage, 7);
        // Fireball hits never chain.
        strike(&mut s, i, 10, 0.0, Source::Fireball);
        assert_eq!(s.world.bolts.len(), 1);
    }

    #[test]
    fn boss_death_clears_summons() {
        let mut s = session_with(fixtures::full_catalog());
        let mut boss = never_drops();
        boss.kind = MonsterKind::GhostBoss;
        boss.hp = 1;
        let b = add_monster(&mut s, boss, 600.0, 300.0);
        let boss_uid = s.world.monsters[b].uid;
        for x in [500.0, 700.0] {
            let uid = s.next_uid();
            s.world.monsters.push(Monster::new(
                uid,
                MonsterDef { kind: MonsterKind::GhostSlave, ..never_drops() },
                x,
                300.0,
                Origin::Summon { boss: boss_uid },
            ));
        }
        strike(&mut s, b, 5, 0.0, Source::Melee);
        assert!(s.world.monsters.iter().all(|m| !m.is_alive()));
        // Summons give no rewards: only the boss's coins.
        assert_eq!(s.world.coins.len(), 2);
    }

    #[test]
    fn fireball_ring_hits_with_cooldown() {
        let mut s = session_with(fixtures::full_catalog());
        let mut def = never_drops();
        def.hp = 10_000;
        let i = add_monster(&mut s, def, 0.0, 0.0);
        s.player.activate_fireball();
        let (px, py) = s.player.center();
        if let Some(orbit) = s.player.buffs.fireball.as_mut() {
            orbit.advance(px, py);
        }
        let ball = s.player.buffs.fireball.as_ref().unwrap().balls[0].clone();
        s.world.monsters[i].x = ball.x - 20.0;
        s.world.monsters[i].y = ball.y - 18.0;
        fireballs(&mut s);
        let dealt = hits_dealt(&s, i);
        assert!(dealt >= FIREBALL_DAMAGE);
        fireballs(&mut s);
        assert_eq!(hits_dealt(&s, i), dealt);
    }

    #[test]
    fn labels_fall_back_for_unknown_ids() {
        let c = fixtures::full_catalog();
        assert_eq!(item_label(&c, 999_999).0, "#999999");
        assert_eq!(item_label(&c, 1000).0, "equip-1000");
    }
}
