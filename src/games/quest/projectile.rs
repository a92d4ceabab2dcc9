//! Player-side projectiles: returning shuriken, chain-lightning bolts and
//! the orbiting fireball ring.

use std::collections::{HashMap, HashSet};
use std::f64::consts::TAU;

use super::geometry::Aabb;
use super::stage::WORLD_WIDTH;

pub const BOOMERANG_SPEED: f64 = 12.0;
pub const BOOMERANG_RANGE: f64 = 250.0;
/// Extra range per additional shuriken in a volley.
pub const BOOMERANG_RANGE_STEP: f64 = 50.0;
/// Launch stagger between shuriken in a volley.
pub const BOOMERANG_STAGGER: u32 = 6;
pub const BOOMERANG_RADIUS: f64 = 15.0;
const BOOMERANG_CATCH: f64 = 20.0;

pub const BOLT_LIFE: u32 = 20;

pub const FIREBALL_COUNT: usize = 8;
pub const FIREBALL_ORBIT_RADIUS: f64 = 60.0;
pub const FIREBALL_SPIN: f64 = 0.05;
pub const FIREBALL_SIZE: f64 = 16.0;
pub const FIREBALL_DAMAGE: i32 = 8;
pub const FIREBALL_HIT_COOLDOWN: u32 = 30;

// ── Boomerang ──────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Boomerang {
    pub x: f64,
    pub y: f64,
    facing: f64,
    pub damage: i32,
    max_distance: f64,
    traveled: f64,
    pub returning: bool,
    /// Frames before launch.
    pub delay: u32,
    /// Monsters already hit on the current leg.
    hit: HashSet<u64>,
    pub spin: f64,
}

impl Boomerang {
    pub fn new(x: f64, y: f64, facing: f64, damage: i32, delay: u32, extra_range: f64) -> Self {
        Self {
            x,
            y,
            facing,
            damage,
            max_distance: BOOMERANG_RANGE + extra_range,
            traveled: 0.0,
            returning: false,
            delay,
            hit: HashSet::new(),
            spin: 0.0,
        }
    }

    /// `count` shuriken on the same line, each leaving a little later and
    /// flying a little further than the one before.
    pub fn volley(x: f64, y: f64, facing: f64, damage: i32, count: u32) -> Vec<Self> {
        (0..count)
            .map(|i| {
                Self::new(
                    x,
                    y,
                    facing,
                    damage,
                    i * BOOMERANG_STAGGER,
                    i as f64 * BOOMERANG_RANGE_STEP,
                )
            })
            .collect()
    }

    pub fn is_launched(&self) -> bool {
        self.delay == 0
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_center(self.x, self.y, BOOMERANG_RADIUS * 2.0, BOOMERANG_RADIUS * 2.0)
    }

    /// Whether this leg may still hit `uid`; records the hit if so.
    pub fn try_hit(&mut self, uid: u64) -> bool {
        self.hit.insert(uid)
    }

    /// Advance one frame toward/away from the player centre. Returns false
    /// once caught or out of the world.
    pub fn update(&mut self, player_cx: f64, player_cy: f64) -> bool {
        if self.delay > 0 {
            self.delay -= 1;
            return true;
        }
        self.spin += 0.15;

        if !self.returning {
            self.x += BOOMERANG_SPEED * self.facing;
            self.traveled += BOOMERANG_SPEED;
            if self.traveled >= self.max_distance {
                self.returning = true;
                self.hit.clear();
            }
        } else {
            let dx = player_cx - self.x;
            let dy = player_cy - self.y;
            let dist = dx.hypot(dy);
            if dist < BOOMERANG_CATCH {
                return false;
            }
            self.x += dx / dist * BOOMERANG_SPEED;
            self.y += dy / dist * BOOMERANG_SPEED;
        }

        self.x >= -50.0 && self.x <= WORLD_WIDTH + 50.0
    }
}

// ── Lightning ──────────────────────────────────────────────────

/// A chain-lightning strike. Damage is applied when it is created; the
/// bolt itself is only shown for a few frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bolt {
    pub x: f64,
    pub y: f64,
    pub damage: i32,
    pub life: u32,
}

impl Bolt {
    pub fn new(x: f64, y: f64, damage: i32) -> Self {
        Self { x, y, damage, life: BOLT_LIFE }
    }

    pub fn update(&mut self) -> bool {
        self.life = self.life.saturating_sub(1);
        self.life > 0
    }
}

// ── Fireball orbit ─────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Fireball {
    pub angle: f64,
    pub x: f64,
    pub y: f64,
    /// Per-monster frames until this ball may hit it again.
    cooldowns: HashMap<u64, u32>,
}

impl Fireball {
    /// Hit `uid` if it overlaps and is off cooldown.
    pub fn try_hit(&mut self, uid: u64, target: &Aabb) -> bool {
        if !target.touches_circle(self.x, self.y, FIREBALL_SIZE) {
            return false;
        }
        if self.cooldowns.get(&uid).copied().unwrap_or(0) > 0 {
            return false;
        }
        self.cooldowns.insert(uid, FIREBALL_HIT_COOLDOWN);
        true
    }
}

/// The ring of fireballs granted by the fireball buff.
#[derive(Clone, Debug)]
pub struct FireballOrbit {
    pub remaining: u32,
    pub balls: Vec<Fireball>,
}

impl FireballOrbit {
    pub fn new(duration: u32) -> Self {
        let balls = (0..FIREBALL_COUNT)
            .map(|i| Fireball {
                angle: i as f64 / FIREBALL_COUNT as f64 * TAU,
                x: 0.0,
                y: 0.0,
                cooldowns: HashMap::new(),
            })
            .collect();
        Self { remaining: duration, balls }
    }

    /// Spin around (cx, cy) and cool down. Returns false when the buff ends.
    pub fn advance(&mut self, cx: f64, cy: f64) -> bool {
        for ball in &mut self.balls {
            ball.angle += FIREBALL_SPIN;
            ball.x = cx + ball.angle.cos() * FIREBALL_ORBIT_RADIUS;
            ball.y = cy + ball.angle.sin() * FIREBALL_ORBIT_RADIUS;
            for cd in ball.cooldowns.values_mut() {
                *cd = cd.saturating_sub(1);
            }
        }
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::quest::geometry::distance;

    #[test]
    fn volley_staggers_delay_and_range() {
        let v = Boomerang::volley(0.0, 0.0, 1.0, 10, 3);
        assert_eq!(v.len(), 3);
        assert_eq!(v.iter().map(|b| b.delay).collect::<Vec<_>>(), vec![0, 6, 12]);
        assert_eq!(v[2].max_distance, 350.0);
    }

    #[test]
    fn boomerang_goes_out_and_comes_back() {
        let mut b = Boomerang::new(100.0, 100.0, 1.0, 10, 0, 0.0);
        let mut frames = 0;
        while !b.returning {
            assert!(b.update(100.0, 100.0));
            frames += 1;
        }
        assert_eq!(frames, 21); // ceil(250 / 12)
        assert!(b.x > 340.0);
        let mut alive = true;
        for _ in 0..40 {
            alive = b.update(100.0, 100.0);
            if !alive {
                break;
            }
        }
        assert!(!alive, "boomerang should be caught");
    }

    #[test]
    fn boomerang_hit_set_clears_on_turnaround() {
        let mut b = Boomerang::new(0.0, 0.0, 1.0, 10, 0, 0.0);
        assert!(b.try_hit(7));
        assert!(!b.try_hit(7));
        while !b.returning {
            b.update(-1000.0, 0.0);
        }
        assert!(b.try_hit(7));
    }

    #[test]
    fn delayed_boomerang_holds_position() {
        let mut b = Boomerang::new(50.0, 50.0, -1.0, 10, 2, 0.0);
        assert!(!b.is_launched());
        b.update(0.0, 0.0);
        b.update(0.0, 0.0);
        assert_eq!(b.x, 50.0);
        assert!(b.is_launched());
        b.update(0.0, 0.0);
        assert_eq!(b.x, 50.0 - BOOMERANG_SPEED);
    }

    #[test]
    fn boomerang_dies_outside_world() {
        let mut b = Boomerang::new(WORLD_WIDTH + 45.0, 0.0, 1.0, 10, 0, 0.0);
        assert!(!b.update(0.0, 0.0));
    }

    #[test]
    fn orbit_keeps_radius_and_expires() {
        let mut orbit = FireballOrbit::new(3);
        assert_eq!(orbit.balls.len(), FIREBALL_COUNT);
        assert!(orbit.advance(200.0, 200.0));
        for ball in &orbit.balls {
            let d = distance(ball.x, ball.y, 200.0, 200.0);
            assert!((d - FIREBALL_ORBIT_RADIUS).abs() < 1e-9);
        }
        assert!(orbit.advance(200.0, 200.0));
        assert!(!orbit.advance(200.0, 200.0));
    }

    #[test]
    fn fireball_cooldown_per_target() {
        let mut orbit = FireballOrbit::new(100);
        orbit.advance(0.0, 0.0);
        let (bx, by) = (orbit.balls[0].x, orbit.balls[0].y);
        let target = Aabb::from_center(bx, by, 20.0, 20.0);
        let ball = &mut orbit.balls[0];
        assert!(ball.try_hit(1, &target));
        assert!(!ball.try_hit(1, &target));
        assert!(ball.try_hit(2, &target));
        for _ in 0..FIREBALL_HIT_COOLDOWN {
            for cd in ball.cooldowns.values_mut() {
                *cd = cd.saturating_sub(1);
            }
        }
        assert!(ball.try_hit(1, &target));
    }

    #[test]
    fn bolt_lives_twenty_frames() {
        let mut bolt = Bolt::new(0.0, 0.0, 5);
        let alive = (0..BOLT_LIFE).filter(|_| bolt.update()).count();
        assert_eq!(alive as u32, BOLT_LIFE - 1);
    }
}
