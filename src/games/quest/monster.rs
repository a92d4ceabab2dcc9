//! Monsters and monster spawners.

use super::defs::{MonsterDef, MonsterKind};
use super::geometry::Aabb;
use super::stage::{Platform, SpawnerData, FLOOR_Y, WORLD_WIDTH};

pub const PATROL_RANGE: f64 = 100.0;
/// Patrol resumes once knockback speed drops below this.
const KNOCKBACK_SETTLE: f64 = 0.5;
const KNOCKBACK_FRICTION: f64 = 0.85;
pub const KNOCKBACK_X: f64 = 8.0;
pub const KNOCKBACK_Y: f64 = 5.0;
const GRAVITY: f64 = 0.6;
/// Feet this close to a platform top count as standing on it.
const FOOTING_TOLERANCE: f64 = 5.0;
const TRACK_DEADBAND: f64 = 5.0;
const TRACK_X_FACTOR: f64 = 1.5;

pub const HIT_FLASH: u32 = 10;
/// Frames a dead monster lingers before removal.
pub const DEATH_FADE: u32 = 30;

pub const SUMMON_ID: u32 = 100005;
pub const SUMMON_INTERVAL: u32 = 300;
pub const MAX_SUMMONS: usize = 10;
const SUMMONS_PER_WAVE: usize = 2;
const SUMMON_OFFSET_X: f64 = 80.0;
const SUMMON_OFFSET_Y: f64 = 50.0;
pub const REGEN_INTERVAL: u32 = 300;

pub const SPAWNER_WIDTH: f64 = 60.0;
pub const SPAWNER_HEIGHT: f64 = 80.0;
pub const DEFAULT_SPAWN_INTERVAL: u32 = 300;
pub const DEFAULT_SPAWNER_CAP: usize = 2;
const SPAWN_EFFECT: u32 = 30;

/// Where a monster came from. Decides what refills it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Origin {
    /// From the stage's monster table; refilled after death.
    Placed,
    /// Spawned by the spawner at this index.
    Spawner(usize),
    /// Summoned by the boss with this uid.
    Summon { boss: u64 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Vitality {
    Alive,
    /// Fading out; frames since death.
    Dead { frames: u32 },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BossState {
    summon_timer: u32,
    no_hit_timer: u32,
}

/// What a boss did this frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BossTurn {
    /// Spawn points for new summons.
    pub summons: Vec<(f64, f64)>,
    /// Hp regenerated.
    pub regen: Option<i32>,
}

#[derive(Clone, Debug)]
pub struct Monster {
    pub uid: u64,
    pub def: MonsterDef,
    pub origin: Origin,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub hp: i32,
    pub max_hp: i32,
    /// +1 right, -1 left.
    pub direction: f64,
    start_x: f64,
    pub hit_timer: u32,
    pub vitality: Vitality,
    pub boss: Option<BossState>,
}

impl Monster {
    pub fn new(uid: u64, def: MonsterDef, x: f64, y: f64, origin: Origin) -> Self {
        let boss = (def.kind == MonsterKind::GhostBoss).then(BossState::default);
        Self {
            uid,
            hp: def.hp,
            max_hp: def.hp,
            def,
            origin,
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            direction: 1.0,
            start_x: x,
            hit_timer: 0,
            vitality: Vitality::Alive,
            boss,
        }
    }

    pub fn kind(&self) -> MonsterKind {
        self.def.kind
    }

    pub fn width(&self) -> f64 {
        self.def.width
    }

    pub fn height(&self) -> f64 {
        self.def.height
    }

    pub fn damage(&self) -> i32 {
        self.def.damage
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.x, self.y, self.def.width, self.def.height)
    }

    pub fn center(&self) -> (f64, f64) {
        self.aabb().center()
    }

    pub fn is_alive(&self) -> bool {
        self.vitality == Vitality::Alive
    }

    /// Dead long enough to be removed.
    pub fn is_expired(&self) -> bool {
        matches!(self.vitality, Vitality::Dead { frames } if frames >= DEATH_FADE)
    }

    /// Apply a hit from an attacker at `attacker_x`. Returns true when this
    /// hit killed it. Hits on a dead monster are ignored.
    pub fn take_damage(&mut self, damage: i32, attacker_x: f64) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.hp -= damage;
        self.hit_timer = HIT_FLASH;
        if let Some(boss) = self.boss.as_mut() {
            boss.no_hit_timer = 0;
        }
        let away = if self.x > attacker_x { 1.0 } else { -1.0 };
        self.vx = away * KNOCKBACK_X;
        self.vy = -KNOCKBACK_Y;

        if self.hp <= 0 {
            self.hp = 0;
            self.kill();
            return true;
        }
        false
    }

    /// Dead without rewards (boss summons when the boss falls).
    pub fn kill(&mut self) {
        self.vitality = Vitality::Dead { frames: 0 };
    }

    /// Advance one frame. `target` is the player centre, tracked by
    /// summoned ghosts. Returns false once the corpse has faded.
    pub fn update(&mut self, platforms: &[Platform], target: (f64, f64)) -> bool {
        if let Vitality::Dead { frames } = &mut self.vitality {
            *frames += 1;
            return *frames < DEATH_FADE;
        }

        let footing = self.footing(platforms);
        let floats = self.def.kind.floats();

        if self.vx.abs() < KNOCKBACK_SETTLE {
            if self.def.kind == MonsterKind::GhostSlave {
                self.track(target);
            } else {
                self.x += self.def.speed * self.direction;
            }

            if floats && self.def.kind != MonsterKind::GhostSlave {
                if self.x <= 0.0 {
                    self.x = 0.0;
                    self.direction = 1.0;
                } else if self.x + self.def.width >= WORLD_WIDTH {
                    self.x = WORLD_WIDTH - self.def.width;
                    self.direction = -1.0;
                }
            } else if !floats {
                if let Some((left, right)) = footing {
                    if self.x <= left {
                        self.x = left;
                        self.direction = 1.0;
                    } else if self.x + self.def.width >= right {
                        self.x = right - self.def.width;
                        self.direction = -1.0;
                    }
                }
                if self.x > self.start_x + PATROL_RANGE {
                    self.direction = -1.0;
                } else if self.x < self.start_x - PATROL_RANGE {
                    self.direction = 1.0;
                }
            }
        } else {
            self.x += self.vx;
            self.vx *= KNOCKBACK_FRICTION;
        }

        self.x = self.x.clamp(0.0, WORLD_WIDTH - self.def.width);

        if !floats {
            self.vy += GRAVITY;
            self.y += self.vy;
            for p in platforms {
                let was_above = self.y + self.def.height - self.vy <= p.y;
                if self.aabb().overlaps(&p.aabb()) && self.vy > 0.0 && was_above {
                    self.y = p.y - self.def.height;
                    self.vy = 0.0;
                }
            }
            if self.y + self.def.height > FLOOR_Y {
                self.y = FLOOR_Y - self.def.height;
                self.vy = 0.0;
            }
        }

        self.hit_timer = self.hit_timer.saturating_sub(1);
        true
    }

    /// Horizontal extent of whatever this monster stands on.
    fn footing(&self, platforms: &[Platform]) -> Option<(f64, f64)> {
        let feet = self.y + self.def.height;
        if (feet - FLOOR_Y).abs() <= FOOTING_TOLERANCE {
            return Some((0.0, WORLD_WIDTH));
        }
        platforms
            .iter()
            .find(|p| {
                (feet - p.y).abs() <= FOOTING_TOLERANCE
                    && self.x + self.def.width > p.x
                    && self.x < p.x + p.width
            })
            .map(|p| (p.x, p.x + p.width))
    }

    fn track(&mut self, (tx, ty): (f64, f64)) {
        let (cx, cy) = self.center();
        let speed = self.def.speed;
        if tx < cx - TRACK_DEADBAND {
            self.x -= speed * TRACK_X_FACTOR;
            self.direction = -1.0;
        } else if tx > cx + TRACK_DEADBAND {
            self.x += speed * TRACK_X_FACTOR;
            self.direction = 1.0;
        }
        if ty < cy - TRACK_DEADBAND {
            self.y -= speed;
        } else if ty > cy + TRACK_DEADBAND {
            self.y += speed;
        }
        self.x = self.x.clamp(0.0, WORLD_WIDTH - self.def.width);
        self.y = self.y.clamp(0.0, FLOOR_Y - self.def.height);
    }

    /// Boss timers. `alive_summons` is how many of its summons still live.
    pub fn boss_turn(&mut self, alive_summons: usize) -> BossTurn {
        let mut turn = BossTurn::default();
        if !self.is_alive() {
            return turn;
        }
        let (cx, _) = self.center();
        let (hp, max_hp, y) = (self.hp, self.max_hp, self.y);
        let Some(boss) = self.boss.as_mut() else {
            return turn;
        };

        boss.summon_timer += 1;
        if boss.summon_timer >= SUMMON_INTERVAL {
            boss.summon_timer = 0;
            let room = MAX_SUMMONS.saturating_sub(alive_summons).min(SUMMONS_PER_WAVE);
            for i in 0..room {
                let dx = if i == 0 { -SUMMON_OFFSET_X } else { SUMMON_OFFSET_X };
                turn.summons.push((cx + dx, y + SUMMON_OFFSET_Y));
            }
        }

        boss.no_hit_timer += 1;
        if boss.no_hit_timer >= REGEN_INTERVAL && hp < max_hp {
            boss.no_hit_timer = 0;
            let amount = max_hp / 10;
            self.hp = (hp + amount).min(max_hp);
            turn.regen = Some(amount);
        }
        turn
    }
}

// ── Spawner ────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Spawner {
    pub x: f64,
    pub y: f64,
    pub monster_id: u32,
    pub interval: u32,
    pub cap: usize,
    timer: u32,
    /// Frames left on the spawn flash.
    pub effect: u32,
}

impl Spawner {
    pub fn from_data(data: &SpawnerData) -> Self {
        Self {
            x: data.x,
            y: data.y,
            monster_id: data.monster_id,
            interval: data.spawn_interval.unwrap_or(DEFAULT_SPAWN_INTERVAL),
            cap: data.max_monsters.unwrap_or(DEFAULT_SPAWNER_CAP),
            timer: 0,
            effect: 0,
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.x, self.y, SPAWNER_WIDTH, SPAWNER_HEIGHT)
    }

    /// Advance one frame. Returns a spawn point when a monster should
    /// appear. `alive_children` counts this spawner's living monsters.
    pub fn update(&mut self, alive_children: usize) -> Option<(f64, f64)> {
        self.effect = self.effect.saturating_sub(1);
        self.timer += 1;
        if self.timer >= self.interval && alive_children < self.cap {
            self.timer = 0;
            self.effect = SPAWN_EFFECT;
            return Some((self.x + SPAWNER_WIDTH / 2.0 - 20.0, self.y + 20.0));
        }
        None
    }
}
