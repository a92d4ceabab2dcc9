//! Floating combat texts and screen notifications.

pub const TEXT_LIFE: u32 = 60;
const SHORT_TEXT_LIFE: u32 = 30;
const TEXT_RISE: f64 = -3.0;
const TEXT_DRAG: f64 = 0.05;

pub const NOTIFICATION_LIFE: u32 = 120;
/// Notifications fade over their last this-many frames.
const NOTIFICATION_FADE: u32 = 30;

/// Every kind of world-space text the game pops up.
#[derive(Clone, Debug, PartialEq)]
pub enum TextKind {
    LevelUp,
    BuffEndFire,
    BuffEndLightning,
    BuffLightning,
    BuffFireball,
    ShurikenMax,
    ShurikenAdd(u32),
    PlayerDamage(i32),
    BossSummon,
    BossRegen(i32),
    MonsterDamage(i32),
    BossGhostDeath,
    ExpGain(u64),
    FireHit,
    PotionHeal(i32),
    EquipGet { name: String, rgb: (u8, u8, u8) },
    Critical,
    Stomp,
    CoinGet(u64),
    LobbyHeal,
    PreviewMode,
}

impl TextKind {
    pub fn label(&self) -> String {
        match self {
            TextKind::LevelUp => "LEVEL UP!".into(),
            TextKind::BuffEndFire => "火炎球 終了".into(),
            TextKind::BuffEndLightning => "雷撃 終了".into(),
            TextKind::BuffLightning => "⚡ 雷撃バフ! (60秒)".into(),
            TextKind::BuffFireball => "🔥 火炎球! (10秒)".into(),
            TextKind::ShurikenMax => "✦ 手裏剣 最大!".into(),
            TextKind::ShurikenAdd(n) => format!("✦ 手裏剣 +1 (計{n}個)"),
            TextKind::PlayerDamage(n) | TextKind::MonsterDamage(n) => n.to_string(),
            TextKind::BossSummon => "召喚!".into(),
            TextKind::BossRegen(n) | TextKind::PotionHeal(n) => format!("+{n}"),
            TextKind::BossGhostDeath => "消滅".into(),
            TextKind::ExpGain(n) => format!("+{n} EXP"),
            TextKind::FireHit => "🔥".into(),
            TextKind::EquipGet { name, .. } => format!("{name} 獲得!"),
            TextKind::Critical => "CRITICAL!".into(),
            TextKind::Stomp => "STOMP!".into(),
            TextKind::CoinGet(n) => format!("+{n} G"),
            TextKind::LobbyHeal => "体力回復!".into(),
            TextKind::PreviewMode => "プレビューモード".into(),
        }
    }

    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            TextKind::LevelUp => (255, 255, 0),
            TextKind::BuffEndFire | TextKind::BuffEndLightning | TextKind::ShurikenMax => {
                (136, 136, 136)
            }
            TextKind::BuffLightning => (0, 255, 255),
            TextKind::BuffFireball => (255, 102, 0),
            TextKind::ShurikenAdd(_) => (106, 106, 106),
            TextKind::PlayerDamage(_) => (255, 68, 68),
            TextKind::BossSummon | TextKind::BossGhostDeath => (138, 43, 226),
            TextKind::BossRegen(_) | TextKind::LobbyHeal => (0, 255, 0),
            TextKind::MonsterDamage(_) => (255, 255, 0),
            TextKind::ExpGain(_) => (0, 255, 255),
            TextKind::FireHit => (255, 68, 0),
            TextKind::PotionHeal(_) => (68, 255, 68),
            TextKind::EquipGet { rgb, .. } => *rgb,
            TextKind::Critical => (255, 0, 0),
            TextKind::Stomp => (255, 136, 0),
            TextKind::CoinGet(_) => (255, 215, 0),
            TextKind::PreviewMode => (147, 51, 234),
        }
    }

    pub fn life(&self) -> u32 {
        match self {
            TextKind::FireHit => SHORT_TEXT_LIFE,
            _ => TEXT_LIFE,
        }
    }
}

/// A text drifting up from a point in the world.
#[derive(Clone, Debug, PartialEq)]
pub struct FloatingText {
    pub x: f64,
    pub y: f64,
    vy: f64,
    pub text: String,
    pub rgb: (u8, u8, u8),
    pub life: u32,
    max_life: u32,
}

impl FloatingText {
    pub fn new(kind: TextKind, x: f64, y: f64) -> Self {
        let life = kind.life();
        Self {
            x,
            y,
            vy: TEXT_RISE,
            text: kind.label(),
            rgb: kind.rgb(),
            life,
            max_life: life,
        }
    }

    pub fn update(&mut self) -> bool {
        self.y += self.vy;
        self.vy += TEXT_DRAG;
        self.life = self.life.saturating_sub(1);
        self.life > 0
    }

    /// 1.0 when fresh, 0.0 when gone.
    pub fn alpha(&self) -> f64 {
        self.life as f64 / self.max_life.max(1) as f64
    }
}

/// Screen-fixed message, e.g. "inventory full".
#[derive(Clone, Debug, PartialEq)]
pub struct Notification {
    pub text: String,
    pub rgb: (u8, u8, u8),
    pub life: u32,
}

impl Notification {
    pub fn new(text: impl Into<String>, rgb: (u8, u8, u8)) -> Self {
        Self {
            text: text.into(),
            rgb,
            life: NOTIFICATION_LIFE,
        }
    }

    pub fn update(&mut self) -> bool {
        self.life = self.life.saturating_sub(1);
        self.life > 0
    }

    pub fn alpha(&self) -> f64 {
        (self.life as f64 / NOTIFICATION_FADE as f64).min(1.0)
    }
}
