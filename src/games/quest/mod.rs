/// Leaf Village Quest: a side-scrolling action platformer.

pub mod actions;
pub mod camera;
pub mod combat;
pub mod defs;
pub mod geometry;
pub mod inventory;
pub mod logic;
pub mod loot;
pub mod monster;
pub mod pickup;
pub mod player;
pub mod preview;
pub mod projectile;
pub mod render;
pub mod scheduler;
pub mod stage;
pub mod state;
pub mod text;

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::Frame;

use crate::config::LaunchConfig;
use crate::games::Game;
use crate::input::{ClickState, Control, HeldKeys, InputEvent};

use actions::*;
use defs::{Catalog, Slot};
use logic::ListEntry;
use player::Intent;
use stage::{StageData, StageTable, WorldMap};
use state::{InventoryView, Overlay, Session};

/// Simulation rate. Physics constants are tuned per tick at this rate.
pub const TICKS_PER_SEC: u32 = 60;

pub struct QuestGame {
    pub state: Session,
    pub held: HeldKeys,
    fade: RefCell<render::StageFade>,
}

impl QuestGame {
    pub fn new(config: &LaunchConfig, preview: Option<StageData>, seed: u64) -> Self {
        let mut state = Session::new(
            Catalog::builtin(),
            StageTable::builtin(),
            WorldMap::builtin(),
            seed,
        );
        logic::boot(&mut state, config, preview);
        Self {
            state,
            held: HeldKeys::new(),
            fade: RefCell::new(render::StageFade::new()),
        }
    }

    fn intent(&self) -> Intent {
        if self.state.overlay != Overlay::None {
            return Intent::default();
        }
        Intent {
            left: self.held.is_held(Control::Left),
            right: self.held.is_held(Control::Right),
            up: self.held.is_held(Control::Up),
            down: self.held.is_held(Control::Down),
            jump: self.held.is_held(Control::Jump),
            attack: self.held.is_held(Control::Attack),
        }
    }

    /// Drain the presses queued since the last tick.
    fn taps(&mut self) -> Intent {
        if self.state.overlay != Overlay::None {
            return Intent::default();
        }
        Intent {
            up: self.held.take_tap(Control::Up),
            down: self.held.take_tap(Control::Down),
            jump: self.held.take_tap(Control::Jump),
            attack: self.held.take_tap(Control::Attack),
            ..Intent::default()
        }
    }

    fn set_overlay(&mut self, overlay: Overlay) {
        self.held.release_all();
        self.state.overlay = overlay;
    }

    fn toggle_inventory(&mut self) {
        let next = match self.state.overlay {
            Overlay::Inventory(_) => Overlay::None,
            _ => Overlay::Inventory(InventoryView::default()),
        };
        self.set_overlay(next);
    }

    fn toggle_map(&mut self) {
        let next = match self.state.overlay {
            Overlay::WorldMap => Overlay::None,
            _ => Overlay::WorldMap,
        };
        self.set_overlay(next);
    }

    fn view_mut(&mut self) -> Option<&mut InventoryView> {
        match &mut self.state.overlay {
            Overlay::Inventory(view) => Some(view),
            _ => None,
        }
    }

    fn selected_entry(&self) -> Option<(Slot, ListEntry)> {
        let Overlay::Inventory(view) = &self.state.overlay else {
            return None;
        };
        let entry = logic::listing(&self.state, view.tab)
            .get(view.selected?)
            .copied()?;
        Some((view.tab, entry))
    }

    /// Follow `id` to its new row after the listing changed, or fall back
    /// to the list if it is gone.
    fn reselect(&mut self, id: u32, prefer_worn: bool) {
        let Overlay::Inventory(view) = &self.state.overlay else {
            return;
        };
        let entries = logic::listing(&self.state, view.tab);
        let pos = entries
            .iter()
            .position(|e| e.id == id && e.worn == prefer_worn)
            .or_else(|| entries.iter().position(|e| e.id == id));
        if let Some(view) = self.view_mut() {
            view.selected = pos;
            if let Some(i) = pos {
                view.sell_quantity = view.sell_quantity.clamp(1, entries[i].count);
            }
        }
    }

    fn select_tab(&mut self, index: usize) -> bool {
        let Some(&tab) = Slot::ALL.get(index) else {
            return false;
        };
        match self.view_mut() {
            Some(view) => {
                *view = InventoryView { tab, ..InventoryView::default() };
                true
            }
            None => false,
        }
    }

    fn cycle_tab(&mut self, step: isize) -> bool {
        let Some(view) = self.view_mut() else {
            return false;
        };
        let n = Slot::ALL.len() as isize;
        let current = Slot::ALL.iter().position(|&t| t == view.tab).unwrap_or(0) as isize;
        let next = (current + step).rem_euclid(n) as usize;
        self.select_tab(next)
    }

    fn select_entry(&mut self, index: usize) -> bool {
        let Overlay::Inventory(view) = &self.state.overlay else {
            return false;
        };
        if index >= logic::listing(&self.state, view.tab).len() {
            return false;
        }
        match self.view_mut() {
            Some(view) => {
                view.selected = Some(index);
                view.sell_quantity = 1;
                true
            }
            None => false,
        }
    }

    fn equip_selected(&mut self) -> bool {
        let Some((_, entry)) = self.selected_entry() else {
            return false;
        };
        if entry.worn {
            return false;
        }
        if logic::equip(&mut self.state, entry.id).is_ok() {
            self.reselect(entry.id, true);
        }
        true
    }

    fn unequip_selected(&mut self) -> bool {
        let Some((tab, entry)) = self.selected_entry() else {
            return false;
        };
        let Some(slot) = tab.equip_slot().filter(|_| entry.worn) else {
            return false;
        };
        if logic::unequip(&mut self.state, slot).is_ok() {
            self.reselect(entry.id, false);
        }
        true
    }

    fn sell_selected(&mut self) -> bool {
        let Some((tab, entry)) = self.selected_entry() else {
            return false;
        };
        if entry.worn {
            return false;
        }
        let quantity = match &self.state.overlay {
            Overlay::Inventory(view) if tab.is_stackable() => view.sell_quantity.min(entry.count),
            _ => 1,
        };
        logic::sell_quantity(&mut self.state, entry.id, tab, quantity);
        self.reselect(entry.id, false);
        true
    }

    fn adjust_quantity(&mut self, change: i64) -> bool {
        let Some((tab, entry)) = self.selected_entry() else {
            return false;
        };
        if !tab.is_stackable() {
            return false;
        }
        let Some(view) = self.view_mut() else {
            return false;
        };
        view.sell_quantity = match change {
            i64::MAX => entry.count,
            c => (view.sell_quantity as i64 + c).clamp(1, entry.count.max(1) as i64) as u32,
        };
        true
    }

    fn back_to_list(&mut self) -> bool {
        match self.view_mut() {
            Some(view) if view.selected.is_some() => {
                view.selected = None;
                true
            }
            _ => false,
        }
    }

    fn travel_to(&mut self, index: usize) -> bool {
        let Some(id) = self.state.world_map.nodes.get(index).map(|n| n.id.clone()) else {
            return false;
        };
        if logic::travel(&mut self.state, &id) {
            self.held.release_all();
        }
        true
    }

    fn handle_click(&mut self, id: u16) -> bool {
        match id {
            OPEN_INVENTORY => {
                self.toggle_inventory();
                true
            }
            OPEN_MAP => {
                self.toggle_map();
                true
            }
            CLOSE_OVERLAY => {
                self.set_overlay(Overlay::None);
                true
            }
            EQUIP => self.equip_selected(),
            UNEQUIP => self.unequip_selected(),
            SELL => self.sell_selected(),
            QTY_DOWN => self.adjust_quantity(-1),
            QTY_UP => self.adjust_quantity(1),
            QTY_ALL => self.adjust_quantity(i64::MAX),
            BACK_TO_LIST => self.back_to_list(),
            id if (TAB_BASE..TAB_BASE + Slot::ALL.len() as u16).contains(&id) => {
                self.select_tab((id - TAB_BASE) as usize)
            }
            id if (ENTRY_BASE..=ENTRY_MAX).contains(&id) => {
                self.select_entry((id - ENTRY_BASE) as usize)
            }
            id if (MAP_NODE_BASE..=MAP_NODE_MAX).contains(&id)
                && self.state.overlay == Overlay::WorldMap =>
            {
                self.travel_to((id - MAP_NODE_BASE) as usize)
            }
            _ => false,
        }
    }

    fn handle_field_key(&mut self, event: &InputEvent) -> bool {
        let control = match event {
            InputEvent::Press(c) => *c,
            InputEvent::Key('a') => Control::Left,
            InputEvent::Key('d') => Control::Right,
            InputEvent::Key('w') => Control::Up,
            InputEvent::Key('s') => Control::Down,
            InputEvent::Key(' ') => Control::Jump,
            InputEvent::Key('z') | InputEvent::Key('j') => Control::Attack,
            _ => return false,
        };
        self.held.press(control);
        true
    }

    fn handle_inventory_key(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::Press(Control::Left) => self.cycle_tab(-1),
            InputEvent::Press(Control::Right) => self.cycle_tab(1),
            InputEvent::Key('e') => self.equip_selected(),
            InputEvent::Key('u') => self.unequip_selected(),
            InputEvent::Key('s') => self.sell_selected(),
            InputEvent::Key('-') => self.adjust_quantity(-1),
            InputEvent::Key('+') | InputEvent::Key('=') => self.adjust_quantity(1),
            InputEvent::Key('a') => self.adjust_quantity(i64::MAX),
            InputEvent::Key('b') => self.back_to_list(),
            InputEvent::Key(c @ '1'..='9') => self.select_entry((*c as u8 - b'1') as usize),
            _ => false,
        }
    }

    fn handle_map_key(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::Key(c @ '1'..='9') => self.travel_to((*c as u8 - b'1') as usize),
            _ => false,
        }
    }
}

impl Game for QuestGame {
    fn handle_input(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::Key('i') => {
                self.toggle_inventory();
                return true;
            }
            InputEvent::Key('m') => {
                self.toggle_map();
                return true;
            }
            InputEvent::Back => {
                if self.state.overlay == Overlay::None {
                    return false;
                }
                self.set_overlay(Overlay::None);
                return true;
            }
            InputEvent::Click(id) => return self.handle_click(*id),
            _ => {}
        }

        match self.state.overlay {
            Overlay::None => self.handle_field_key(event),
            Overlay::Inventory(_) => self.handle_inventory_key(event),
            Overlay::WorldMap => self.handle_map_key(event),
        }
    }

    fn tick(&mut self, delta_ticks: u32) {
        for _ in 0..delta_ticks {
            let intent = self.intent();
            let pressed = self.taps();
            logic::step(&mut self.state, intent, pressed);
            self.held.tick();
        }
        let ms = (delta_ticks as f64 * 1000.0 / TICKS_PER_SEC as f64).round() as u32;
        self.fade.borrow_mut().advance(ms);
    }

    fn render(&self, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
        render::render(&self.state, f, area, click_state, &self.fade);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::quest::defs::EquipSlot;
    use crate::games::quest::stage::HUB_STAGE;

    const HOOD: u32 = 200001;

    fn game() -> QuestGame {
        QuestGame::new(&LaunchConfig::default(), None, 7)
    }

    #[test]
    fn boots_into_the_hub() {
        let g = game();
        assert_eq!(g.state.world.stage, HUB_STAGE);
        assert_eq!(g.state.stage_loads, 1);
    }

    #[test]
    fn stage_override_from_config() {
        let config = LaunchConfig {
            stage: Some("Stage001".into()),
            ..LaunchConfig::default()
        };
        let g = QuestGame::new(&config, None, 7);
        assert_eq!(g.state.world.stage, "Stage001");
        assert!(!g.state.world.monsters.is_empty());
    }

    #[test]
    fn held_right_walks_right() {
        let mut g = game();
        let x0 = g.state.player.x;
        g.handle_input(&InputEvent::Press(Control::Right));
        g.tick(10);
        assert!(g.state.player.x > x0);
    }

    #[test]
    fn wasd_maps_to_controls() {
        let mut g = game();
        assert!(g.handle_input(&InputEvent::Key('d')));
        assert!(g.held.is_held(Control::Right));
        g.handle_input(&InputEvent::Key('a'));
        assert!(g.held.is_held(Control::Left));
        assert!(!g.held.is_held(Control::Right));
    }

    #[test]
    fn hold_expires_without_repeats() {
        let mut g = game();
        g.handle_input(&InputEvent::Press(Control::Right));
        g.tick(crate::input::HOLD_INITIAL);
        assert!(!g.held.is_held(Control::Right));
    }

    #[test]
    fn second_jump_tap_inside_hold_window_double_jumps() {
        let mut g = game();
        g.tick(30);
        g.handle_input(&InputEvent::Key(' '));
        g.tick(10);
        assert_eq!(g.state.player.jump_count, 1);
        assert!(g.held.is_held(Control::Jump));

        g.handle_input(&InputEvent::Key(' '));
        g.tick(1);
        assert_eq!(g.state.player.jump_count, 2);
    }

    #[test]
    fn each_attack_tap_swings_once() {
        let mut g = game();
        g.tick(30);
        let mut swings = 0;
        for _ in 0..8 {
            g.handle_input(&InputEvent::Key('z'));
            for _ in 0..15 {
                g.tick(1);
                if g.state.player.is_hit_frame() {
                    swings += 1;
                }
            }
        }
        assert_eq!(swings, 8);
    }

    #[test]
    fn taps_are_dropped_while_an_overlay_is_open() {
        let mut g = game();
        g.tick(30);
        let jumps = g.state.player.jump_count;
        g.handle_input(&InputEvent::Key('i'));
        g.handle_input(&InputEvent::Key(' '));
        g.tick(1);
        g.handle_input(&InputEvent::Key('i'));
        g.tick(1);
        assert_eq!(g.state.player.jump_count, jumps);
    }

    #[test]
    fn inventory_toggles_and_drops_held_keys() {
        let mut g = game();
        g.handle_input(&InputEvent::Press(Control::Right));
        assert!(g.handle_input(&InputEvent::Key('i')));
        assert!(matches!(g.state.overlay, Overlay::Inventory(_)));
        assert!(!g.held.is_held(Control::Right));

        g.handle_input(&InputEvent::Key('i'));
        assert_eq!(g.state.overlay, Overlay::None);
    }

    #[test]
    fn open_overlay_freezes_the_player() {
        let mut g = game();
        g.tick(30);
        let x0 = g.state.player.x;
        let frame0 = g.state.frame;
        g.handle_input(&InputEvent::Key('i'));
        g.handle_input(&InputEvent::Key('d'));
        g.tick(10);
        assert_eq!(g.state.player.x, x0);
        assert_eq!(g.state.frame, frame0 + 10);
    }

    #[test]
    fn back_closes_overlay_only_when_open() {
        let mut g = game();
        assert!(!g.handle_input(&InputEvent::Back));
        g.handle_input(&InputEvent::Key('m'));
        assert!(g.handle_input(&InputEvent::Back));
        assert_eq!(g.state.overlay, Overlay::None);
    }

    #[test]
    fn tab_click_and_arrows_switch_tabs() {
        let mut g = game();
        g.handle_input(&InputEvent::Click(OPEN_INVENTORY));
        g.handle_input(&InputEvent::Click(TAB_BASE + 4));
        assert!(matches!(&g.state.overlay, Overlay::Inventory(v) if v.tab == Slot::Material));
        g.handle_input(&InputEvent::Press(Control::Right));
        assert!(matches!(&g.state.overlay, Overlay::Inventory(v) if v.tab == Slot::Item));
        g.handle_input(&InputEvent::Press(Control::Right));
        assert!(matches!(&g.state.overlay, Overlay::Inventory(v) if v.tab == Slot::Weapon));
    }

    #[test]
    fn equip_and_unequip_through_the_panel() {
        let mut g = game();
        g.state.player.inventory.add(&g.state.catalog, HOOD).unwrap();

        g.handle_input(&InputEvent::Key('i'));
        g.handle_input(&InputEvent::Click(TAB_BASE + 1));
        assert!(g.handle_input(&InputEvent::Click(ENTRY_BASE)));
        g.handle_input(&InputEvent::Key('e'));
        assert_eq!(g.state.player.inventory.worn(EquipSlot::Helmet), Some(HOOD));
        assert!(matches!(&g.state.overlay, Overlay::Inventory(v) if v.selected == Some(0)));

        g.handle_input(&InputEvent::Click(UNEQUIP));
        assert_eq!(g.state.player.inventory.worn(EquipSlot::Helmet), None);
        assert_eq!(g.state.player.inventory.count_of(HOOD), 1);
    }

    #[test]
    fn sell_gear_from_the_panel() {
        let mut g = game();
        g.state.player.inventory.add(&g.state.catalog, HOOD).unwrap();
        let gold = g.state.player.gold;

        g.handle_input(&InputEvent::Key('i'));
        g.handle_input(&InputEvent::Click(TAB_BASE + 1));
        g.handle_input(&InputEvent::Key('1'));
        g.handle_input(&InputEvent::Key('s'));
        assert_eq!(g.state.player.inventory.count_of(HOOD), 0);
        assert!(g.state.player.gold > gold);
        assert!(matches!(&g.state.overlay, Overlay::Inventory(v) if v.selected.is_none()));
    }

    #[test]
    fn clicking_a_missing_entry_is_ignored() {
        let mut g = game();
        g.handle_input(&InputEvent::Key('i'));
        assert!(!g.handle_input(&InputEvent::Click(ENTRY_BASE + 3)));
    }

    #[test]
    fn map_travel_needs_an_unlocked_stage() {
        let mut g = game();
        g.handle_input(&InputEvent::Key('m'));
        g.handle_input(&InputEvent::Key('2'));
        assert_eq!(g.state.world.stage, HUB_STAGE);
        assert!(!g.state.notifications.is_empty());

        g.state.unlocked.insert("Stage001".into());
        g.handle_input(&InputEvent::Click(MAP_NODE_BASE + 1));
        assert_eq!(g.state.world.stage, "Stage001");
        assert_eq!(g.state.overlay, Overlay::None);
    }

    #[test]
    fn map_clicks_ignored_while_closed() {
        let mut g = game();
        g.state.unlocked.insert("Stage001".into());
        assert!(!g.handle_input(&InputEvent::Click(MAP_NODE_BASE + 1)));
        assert_eq!(g.state.world.stage, HUB_STAGE);
    }
}
