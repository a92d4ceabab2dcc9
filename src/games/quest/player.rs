//! The player: movement state machine, attack timing, buffs, experience and
//! the inventory it carries.

use super::defs::{Catalog, EquipSlot, Slot};
use super::geometry::Aabb;
use super::inventory::{Inventory, InventoryError};
use super::projectile::FireballOrbit;
use super::stage::{Ladder, Platform, FLOOR_Y, WORLD_WIDTH};

// ── Tunables ───────────────────────────────────────────────────

pub const PLAYER_WIDTH: f64 = 32.0;
pub const PLAYER_HEIGHT: f64 = 48.0;

pub const GRAVITY: f64 = 0.6;
pub const FRICTION: f64 = 0.85;
pub const MAX_SPEED: f64 = 6.0;
pub const JUMP_FORCE: f64 = -14.0;
pub const ACCELERATION: f64 = 0.8;
const STOP_SPEED: f64 = 0.1;
pub const BASE_JUMPS: u32 = 2;

const CLIMB_SPEED: f64 = 4.0;
const LADDER_SIDESTEP: f64 = 3.0;
const LADDER_JUMP_FACTOR: f64 = 0.7;
/// Slack for stepping off the top rung.
const LADDER_TOP_SLACK: f64 = 10.0;

const DROP_THROUGH_FRAMES: u32 = 15;
const DROP_NUDGE: f64 = 5.0;

pub const ATTACK_FRAMES: u32 = 10;
/// The one frame of a swing on which the melee hitbox is evaluated.
pub const ATTACK_HIT_FRAME: u32 = 9;
pub const ATTACK_COOLDOWN: u32 = 12;
pub const ATTACK_WIDTH: f64 = 68.0;
pub const ATTACK_HEIGHT: f64 = 40.0;

pub const HIT_INVINCIBILITY: u32 = 60;
pub const RESPAWN_INVINCIBILITY: u32 = 120;
const HIT_KNOCKBACK: f64 = 5.0;

pub const BASE_HP: i32 = 100;
pub const BASE_ATTACK: i32 = 15;
const LEVEL_HP: i32 = 20;
const LEVEL_ATTACK: i32 = 5;

pub const LIGHTNING_BUFF_FRAMES: u32 = 3600;
pub const FIREBALL_BUFF_FRAMES: u32 = 600;
pub const MAX_SHURIKENS: u32 = 9;

const LEVEL_UP_FLASH: u32 = 120;
const SPAWN_FLASH: u32 = 30;

/// Experience needed to go from `level` to the next.
pub fn exp_to_next(level: u32) -> u64 {
    (100.0 * 1.5f64.powi(level as i32 - 1)).floor() as u64
}

// ── State ──────────────────────────────────────────────────────

/// Per-frame control intent. Level-held, not edges.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Intent {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub jump: bool,
    pub attack: bool,
}

impl Intent {
    /// Buttons held now that were not held in `prev`.
    pub fn pressed_since(&self, prev: &Intent) -> Intent {
        Intent {
            left: self.left && !prev.left,
            right: self.right && !prev.right,
            up: self.up && !prev.up,
            down: self.down && !prev.down,
            jump: self.jump && !prev.jump,
            attack: self.attack && !prev.attack,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Motion {
    Grounded,
    Airborne,
    /// On the ladder at this index of the stage's ladder list.
    Climbing { ladder: usize },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttackPhase {
    Idle,
    Swinging { remaining: u32 },
}

/// Timed modifiers. Cleared on entering the hub.
#[derive(Clone, Debug, Default)]
pub struct Buffs {
    /// Frames left on the chain-lightning buff.
    pub lightning: Option<u32>,
    pub fireball: Option<FireballOrbit>,
    /// Extra shuriken per throw. Reset on death.
    pub shurikens: u32,
}

/// Buff expirations that happened during one update.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Expired {
    pub lightning: bool,
    pub fireball: bool,
}

/// Outcome of a hit on the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hurt {
    Ignored,
    Damaged(i32),
    /// Took this much and respawned.
    Died(i32),
}

#[derive(Clone, Debug)]
pub struct Player {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    /// +1 right, -1 left.
    pub facing: f64,
    pub motion: Motion,
    pub jump_count: u32,
    drop_timer: u32,
    pub attack: AttackPhase,
    attack_cooldown: u32,
    /// Frames of invincibility left.
    pub invincible: u32,

    pub hp: i32,
    pub base_max_hp: i32,
    pub base_attack: i32,
    pub level: u32,
    pub exp: u64,
    pub exp_to_next: u64,
    pub gold: u64,

    pub inventory: Inventory,
    pub buffs: Buffs,

    pub level_up_flash: u32,
    pub spawn_flash: u32,
}

impl Player {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            facing: 1.0,
            motion: Motion::Airborne,
            jump_count: 0,
            drop_timer: 0,
            attack: AttackPhase::Idle,
            attack_cooldown: 0,
            invincible: 0,
            hp: BASE_HP,
            base_max_hp: BASE_HP,
            base_attack: BASE_ATTACK,
            level: 1,
            exp: 0,
            exp_to_next: exp_to_next(1),
            gold: 0,
            inventory: Inventory::new(),
            buffs: Buffs::default(),
            level_up_flash: 0,
            spawn_flash: 0,
        }
    }

    // ── Derived stats ──────────────────────────────────────────

    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.x, self.y, PLAYER_WIDTH, PLAYER_HEIGHT)
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + PLAYER_WIDTH / 2.0, self.y + PLAYER_HEIGHT / 2.0)
    }

    pub fn bottom(&self) -> f64 {
        self.y + PLAYER_HEIGHT
    }

    pub fn total_max_hp(&self) -> i32 {
        self.base_max_hp + self.inventory.stats().max_hp
    }

    pub fn total_attack(&self) -> i32 {
        self.base_attack + self.inventory.stats().attack_damage
    }

    pub fn total_defense(&self) -> i32 {
        self.inventory.stats().defense
    }

    pub fn max_jumps(&self) -> u32 {
        BASE_JUMPS + self.inventory.stats().extra_jump
    }

    pub fn max_speed(&self) -> f64 {
        MAX_SPEED + self.inventory.stats().speed
    }

    pub fn is_climbing(&self) -> bool {
        matches!(self.motion, Motion::Climbing { .. })
    }

    pub fn is_attacking(&self) -> bool {
        matches!(self.attack, AttackPhase::Swinging { .. })
    }

    /// True on exactly one frame of each swing.
    pub fn is_hit_frame(&self) -> bool {
        self.attack == AttackPhase::Swinging { remaining: ATTACK_HIT_FRAME }
    }

    /// Melee box in front of the player.
    pub fn attack_hitbox(&self) -> Aabb {
        let x = if self.facing > 0.0 {
            self.x + PLAYER_WIDTH
        } else {
            self.x - ATTACK_WIDTH
        };
        Aabb::new(x, self.y + 5.0, ATTACK_WIDTH, ATTACK_HEIGHT)
    }

    // ── Actions ────────────────────────────────────────────────

    /// Jump, or leap off a ladder. Returns false when out of jumps.
    pub fn jump(&mut self) -> bool {
        if self.is_climbing() {
            self.motion = Motion::Airborne;
            self.vy = JUMP_FORCE * LADDER_JUMP_FACTOR;
            return true;
        }
        if self.jump_count >= self.max_jumps() {
            return false;
        }
        self.vy = JUMP_FORCE;
        self.jump_count += 1;
        self.motion = Motion::Airborne;
        true
    }

    /// Fall through the platform underfoot. Not possible on the floor.
    pub fn drop_down(&mut self) -> bool {
        if self.motion != Motion::Grounded || self.bottom() >= FLOOR_Y {
            return false;
        }
        self.drop_timer = DROP_THROUGH_FRAMES;
        self.y += DROP_NUDGE;
        true
    }

    /// Start a swing if off cooldown. The caller launches shuriken.
    pub fn attack(&mut self) -> bool {
        if self.attack_cooldown > 0 {
            return false;
        }
        self.attack = AttackPhase::Swinging { remaining: ATTACK_FRAMES };
        self.attack_cooldown = ATTACK_COOLDOWN;
        true
    }

    /// Apply monster damage after defense. Ignored while invincible.
    /// At zero hp the player respawns at `respawn_at`.
    pub fn take_damage(&mut self, damage: i32, respawn_at: (f64, f64)) -> Hurt {
        if self.invincible > 0 {
            return Hurt::Ignored;
        }
        let actual = (damage - self.total_defense()).max(1);
        self.hp -= actual;
        self.invincible = HIT_INVINCIBILITY;
        self.vx = -self.facing * HIT_KNOCKBACK;
        self.vy = -HIT_KNOCKBACK;
        if self.hp <= 0 {
            self.hp = 0;
            self.respawn(respawn_at);
            return Hurt::Died(actual);
        }
        Hurt::Damaged(actual)
    }

    /// Back to `at` at full health. The shuriken stack is always lost.
    pub fn respawn(&mut self, at: (f64, f64)) {
        self.place(at);
        self.hp = self.total_max_hp();
        self.invincible = RESPAWN_INVINCIBILITY;
        self.buffs.shurikens = 0;
    }

    /// Teleport with zero velocity (stage load, respawn).
    pub fn place(&mut self, at: (f64, f64)) {
        self.x = at.0;
        self.y = at.1;
        self.vx = 0.0;
        self.vy = 0.0;
        self.motion = Motion::Airborne;
        self.drop_timer = 0;
        self.spawn_flash = SPAWN_FLASH;
    }

    /// Heal up to total max hp. Returns the amount restored.
    pub fn heal(&mut self, amount: i32) -> i32 {
        let before = self.hp;
        self.hp = (self.hp + amount).min(self.total_max_hp()).max(self.hp);
        self.hp - before
    }

    /// Add experience. Returns how many levels were gained.
    pub fn gain_exp(&mut self, amount: u64) -> u32 {
        self.exp += amount;
        let mut gained = 0;
        while self.exp >= self.exp_to_next {
            self.exp -= self.exp_to_next;
            self.level_up();
            gained += 1;
        }
        gained
    }

    fn level_up(&mut self) {
        self.level += 1;
        self.exp_to_next = exp_to_next(self.level);
        self.base_max_hp += LEVEL_HP;
        self.base_attack += LEVEL_ATTACK;
        self.hp = self.total_max_hp();
        self.level_up_flash = LEVEL_UP_FLASH;
    }

    pub fn activate_lightning(&mut self) {
        self.buffs.lightning = Some(LIGHTNING_BUFF_FRAMES);
    }

    pub fn activate_fireball(&mut self) {
        self.buffs.fireball = Some(FireballOrbit::new(FIREBALL_BUFF_FRAMES));
    }

    /// One more shuriken per throw. False when already at the cap.
    pub fn add_shuriken(&mut self) -> bool {
        if self.buffs.shurikens >= MAX_SHURIKENS {
            return false;
        }
        self.buffs.shurikens += 1;
        true
    }

    /// Hub entry: drop every buff and heal fully.
    pub fn rest(&mut self) {
        self.buffs = Buffs::default();
        self.hp = self.total_max_hp();
    }

    // ── Inventory passthroughs ─────────────────────────────────

    pub fn equip(&mut self, catalog: &Catalog, id: u32) -> Result<EquipSlot, InventoryError> {
        let slot = self.inventory.equip(catalog, id)?;
        self.clamp_hp();
        Ok(slot)
    }

    pub fn unequip(&mut self, catalog: &Catalog, slot: EquipSlot) -> Result<u32, InventoryError> {
        let id = self.inventory.unequip(catalog, slot)?;
        self.clamp_hp();
        Ok(id)
    }

    /// Sell one unit and credit its value.
    pub fn sell(&mut self, catalog: &Catalog, id: u32, slot: Slot) -> Result<u64, InventoryError> {
        let gold = self.inventory.sell(catalog, id, slot)?;
        self.gold += gold;
        Ok(gold)
    }

    fn clamp_hp(&mut self) {
        self.hp = self.hp.min(self.total_max_hp());
    }

    // ── Per-frame update ───────────────────────────────────────

    /// Advance one frame with the held `intent`.
    pub fn update(&mut self, intent: &Intent, platforms: &[Platform], ladders: &[Ladder]) -> Expired {
        let on_ladder = ladders.iter().position(|l| self.on_ladder(l));

        match (on_ladder, self.motion) {
            (Some(i), m) if (intent.up || intent.down) && !matches!(m, Motion::Climbing { .. }) => {
                self.motion = Motion::Climbing { ladder: i };
                self.vx = 0.0;
                self.vy = 0.0;
                self.x = ladders[i].x + ladders[i].aabb().width() / 2.0 - PLAYER_WIDTH / 2.0;
            }
            (None, Motion::Climbing { .. }) => self.motion = Motion::Airborne,
            _ => {}
        }

        match (self.motion, on_ladder) {
            (Motion::Climbing { .. }, Some(i)) => self.climb(intent, &ladders[i]),
            _ => self.walk(intent, platforms),
        }

        self.tick_timers()
    }

    fn on_ladder(&self, ladder: &Ladder) -> bool {
        let cx = self.x + PLAYER_WIDTH / 2.0;
        let band = ladder.aabb();
        cx > band.min_x && cx < band.max_x && self.bottom() > band.min_y && self.y < band.max_y
    }

    fn climb(&mut self, intent: &Intent, ladder: &Ladder) {
        if intent.up {
            self.y -= CLIMB_SPEED;
            if self.y < ladder.y - PLAYER_HEIGHT + LADDER_TOP_SLACK {
                self.y = ladder.y - PLAYER_HEIGHT;
                self.motion = Motion::Grounded;
                self.jump_count = 0;
            }
        }
        if intent.down {
            self.y += CLIMB_SPEED;
            if self.bottom() > ladder.bottom() {
                self.motion = Motion::Airborne;
            }
        }
        if intent.left || intent.right {
            self.facing = if intent.left { -1.0 } else { 1.0 };
            self.x += self.facing * LADDER_SIDESTEP;
            if !self.on_ladder(ladder) {
                self.motion = Motion::Airborne;
            }
        }
        if self.is_climbing() {
            self.vy = 0.0;
        }
    }

    fn walk(&mut self, intent: &Intent, platforms: &[Platform]) {
        if intent.left {
            self.vx -= ACCELERATION;
            self.facing = -1.0;
        }
        if intent.right {
            self.vx += ACCELERATION;
            self.facing = 1.0;
        }
        self.vx *= FRICTION;
        let cap = self.max_speed();
        self.vx = self.vx.clamp(-cap, cap);
        if self.vx.abs() < STOP_SPEED {
            self.vx = 0.0;
        }

        self.vy += GRAVITY;
        self.x += self.vx;
        self.y += self.vy;

        let mut grounded = false;
        self.drop_timer = self.drop_timer.saturating_sub(1);

        if self.drop_timer == 0 && self.vy > 0.0 {
            let body = self.aabb();
            for p in platforms {
                let was_above = self.bottom() - self.vy <= p.y;
                if body.overlaps(&p.aabb()) && was_above {
                    self.land(p.y);
                    grounded = true;
                }
            }
        }

        self.x = self.x.clamp(0.0, WORLD_WIDTH - PLAYER_WIDTH);

        if self.bottom() > FLOOR_Y {
            self.land(FLOOR_Y);
            grounded = true;
        }

        self.motion = if grounded { Motion::Grounded } else { Motion::Airborne };
    }

    fn land(&mut self, top: f64) {
        self.y = top - PLAYER_HEIGHT;
        self.vy = 0.0;
        self.jump_count = 0;
    }

    fn tick_timers(&mut self) -> Expired {
        let mut expired = Expired::default();

        if let AttackPhase::Swinging { remaining } = self.attack {
            self.attack = match remaining.saturating_sub(1) {
                0 => AttackPhase::Idle,
                r => AttackPhase::Swinging { remaining: r },
            };
        }
        self.attack_cooldown = self.attack_cooldown.saturating_sub(1);
        self.invincible = self.invincible.saturating_sub(1);
        self.level_up_flash = self.level_up_flash.saturating_sub(1);
        self.spawn_flash = self.spawn_flash.saturating_sub(1);

        if let Some(left) = self.buffs.lightning {
            self.buffs.lightning = match left.saturating_sub(1) {
                0 => {
                    expired.lightning = true;
                    None
                }
                r => Some(r),
            };
        }

        let (cx, cy) = self.center();
        if let Some(orbit) = self.buffs.fireball.as_mut() {
            if !orbit.advance(cx, cy) {
                self.buffs.fireball = None;
                expired.fireball = true;
            }
        }
        expired
    }
}
