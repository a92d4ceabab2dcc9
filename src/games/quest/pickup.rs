//! Things the player walks over: placed power-ups, gold coins and item drops.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::geometry::Aabb;
use super::stage::{Platform, FLOOR_Y};

pub const PICKUP_WIDTH: f64 = 24.0;
pub const PICKUP_HEIGHT: f64 = 28.0;
/// Pickups are collected a little before the boxes touch.
pub const PICKUP_REACH: f64 = 10.0;
pub const POTION_HEAL: i32 = 30;

pub const COIN_SIZE: f64 = 20.0;
pub const COIN_LIFE: u32 = 600;
pub const DROP_SIZE: f64 = 28.0;
pub const DROP_LIFE: u32 = 1200;
const LOOSE_GRAVITY: f64 = 0.4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PickupKind {
    Potion,
    Lightning,
    Fireball,
    Shuriken,
    /// Any type this build does not know; ignored on load.
    #[serde(other)]
    Unknown,
}

/// A stage-placed power-up. Stays until collected.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pickup {
    pub x: f64,
    pub y: f64,
    pub kind: PickupKind,
}

impl Pickup {
    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.x, self.y, PICKUP_WIDTH, PICKUP_HEIGHT)
    }
}

/// Gold popped out of a dead monster.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coin {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub value: u64,
    pub life: u32,
    pub grounded: bool,
}

impl Coin {
    pub fn spawn<R: Rng + ?Sized>(x: f64, y: f64, value: u64, rng: &mut R) -> Self {
        Self {
            x,
            y,
            vx: rng.gen_range(-2.0..2.0),
            vy: -8.0,
            value,
            life: COIN_LIFE,
            grounded: false,
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.x, self.y, COIN_SIZE, COIN_SIZE)
    }

    /// Returns false once expired.
    pub fn update(&mut self) -> bool {
        self.life = self.life.saturating_sub(1);
        if self.life == 0 {
            return false;
        }
        if !self.grounded {
            self.vy += LOOSE_GRAVITY;
            self.y += self.vy;
            self.x += self.vx;
            if self.y > FLOOR_Y - COIN_SIZE {
                self.y = FLOOR_Y - COIN_SIZE;
                self.settle();
            }
        }
        true
    }

    fn settle(&mut self) {
        self.vx = 0.0;
        self.vy = 0.0;
        self.grounded = true;
    }
}

/// An item lying in the world: monster loot or stage-placed equipment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LootDrop {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub item_id: u32,
    /// `None` for placed items, which never expire.
    pub life: Option<u32>,
    pub grounded: bool,
}

impl LootDrop {
    pub fn spawn<R: Rng + ?Sized>(x: f64, y: f64, item_id: u32, rng: &mut R) -> Self {
        Self {
            x,
            y,
            vx: rng.gen_range(-1.5..1.5),
            vy: -6.0,
            item_id,
            life: Some(DROP_LIFE),
            grounded: false,
        }
    }

    pub fn placed(x: f64, y: f64, item_id: u32) -> Self {
        Self {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            item_id,
            life: None,
            grounded: true,
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.x, self.y, DROP_SIZE, DROP_SIZE)
    }

    /// Returns false once expired.
    pub fn update(&mut self, platforms: &[Platform]) -> bool {
        if let Some(life) = self.life.as_mut() {
            *life = life.saturating_sub(1);
            if *life == 0 {
                return false;
            }
        }
        if self.grounded {
            return true;
        }

        self.vy += LOOSE_GRAVITY;
        self.y += self.vy;
        self.x += self.vx;

        if self.y > FLOOR_Y - DROP_SIZE {
            self.y = FLOOR_Y - DROP_SIZE;
            self.settle();
        }
        for p in platforms {
            let bottom = self.y + DROP_SIZE;
            let was_above = bottom - self.vy <= p.y;
            let within_x = self.x + DROP_SIZE > p.x && self.x < p.x + p.width;
            if bottom > p.y && was_above && within_x {
                self.y = p.y - DROP_SIZE;
                self.settle();
            }
        }
        true
    }

    fn settle(&mut self) {
        self.vx = 0.0;
        self.vy = 0.0;
        self.grounded = true;
    }
}
