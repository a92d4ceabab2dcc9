//! Semantic action IDs for Leaf Village Quest click targets.

// ── Help bar ───────────────────────────────────────────────────
pub const OPEN_INVENTORY: u16 = 1;
pub const OPEN_MAP: u16 = 2;
pub const CLOSE_OVERLAY: u16 = 3;

// ── Inventory ──────────────────────────────────────────────────
/// Tabs, offset by `Slot::ALL` index.
pub const TAB_BASE: u16 = 10;
pub const EQUIP: u16 = 20;
pub const UNEQUIP: u16 = 21;
pub const SELL: u16 = 22;
pub const QTY_DOWN: u16 = 23;
pub const QTY_UP: u16 = 24;
pub const QTY_ALL: u16 = 25;
pub const BACK_TO_LIST: u16 = 26;
/// Listing rows, offset by entry index.
pub const ENTRY_BASE: u16 = 100;
pub const ENTRY_MAX: u16 = 199;

// ── World map ──────────────────────────────────────────────────
/// Map nodes, offset by node index.
pub const MAP_NODE_BASE: u16 = 300;
pub const MAP_NODE_MAX: u16 = 399;
