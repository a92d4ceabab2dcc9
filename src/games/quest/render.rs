//! Leaf Village Quest rendering.
//!
//! The stage is drawn as a grid of terminal cells, each standing for a
//! fixed patch of the camera's view. Panels (HUD, inventory, world map, log)
//! are ordinary ratatui widgets around it.

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratzilla::ratatui::Frame;
use tachyonfx::{fx, Duration, Effect, EffectRenderer, Interpolation};

use crate::input::{is_narrow_layout, ClickState};
use crate::widgets::{ButtonRow, ClickableList, TabBar};

use super::actions::*;
use super::camera::{Camera, VIEW_HEIGHT, VIEW_WIDTH};
use super::combat::item_label;
use super::defs::{hex_rgb, MonsterKind, Slot};
use super::geometry::Aabb;
use super::inventory::MAX_ENTRIES_PER_SLOT;
use super::logic::{listing, ListEntry};
use super::monster::{Monster, HIT_FLASH};
use super::pickup::PickupKind;
use super::player::{MAX_SHURIKENS, PLAYER_HEIGHT};
use super::stage::{NodeKind, FLOOR_Y, WORLD_HEIGHT, WORLD_WIDTH};
use super::state::{InventoryView, Overlay, Session};

const FADE_MS: u32 = 400;
const SIDE_PANEL_WIDTH: u16 = 38;

fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(r, g, b)
}

pub fn render(
    s: &Session,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
    fade: &RefCell<StageFade>,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(8),
            Constraint::Length(3),
        ])
        .split(area);

    render_hud(s, f, chunks[0]);

    let body = chunks[1];
    if is_narrow_layout(area.width) {
        if s.overlay == Overlay::None {
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(6), Constraint::Length(6)])
                .split(body);
            render_viewport(s, f, rows[0], fade);
            render_log(s, f, rows[1]);
        } else {
            render_overlay(s, f, body, click_state);
        }
    } else {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(30), Constraint::Length(SIDE_PANEL_WIDTH)])
            .split(body);
        render_viewport(s, f, cols[0], fade);
        if s.overlay == Overlay::None {
            render_log(s, f, cols[1]);
        } else {
            render_overlay(s, f, cols[1], click_state);
        }
    }

    render_help(s, f, chunks[2], click_state);
}

// ── Stage transition ───────────────────────────────────────────

/// Fade-in played whenever the session loads a stage.
#[derive(Default)]
pub struct StageFade {
    effect: Option<Effect>,
    seen_loads: u32,
    pending_ms: u32,
}

impl StageFade {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bank game time for the next frame's effect step.
    pub fn advance(&mut self, ms: u32) {
        self.pending_ms = self.pending_ms.saturating_add(ms);
    }

    /// Start a fade if a new stage was loaded since the last call.
    pub fn observe(&mut self, stage_loads: u32) {
        if stage_loads != self.seen_loads {
            self.seen_loads = stage_loads;
            self.pending_ms = 0;
            self.effect = Some(fx::fade_from_fg(
                Color::Black,
                (FADE_MS, Interpolation::QuadOut),
            ));
        }
    }

    fn apply(&mut self, f: &mut Frame, area: Rect) {
        let elapsed = std::mem::take(&mut self.pending_ms);
        let Some(effect) = self.effect.as_mut() else {
            return;
        };
        f.render_effect(effect, area, Duration::from_millis(elapsed));
        if effect.done() {
            self.effect = None;
        }
    }
}

// ── HUD ────────────────────────────────────────────────────────

fn gauge(value: i64, max: i64, width: usize, fill: Color) -> Vec<Span<'static>> {
    let filled = if max > 0 {
        ((value.clamp(0, max) as f64 / max as f64) * width as f64).round() as usize
    } else {
        0
    };
    vec![
        Span::styled("█".repeat(filled), Style::default().fg(fill)),
        Span::styled(
            "░".repeat(width - filled.min(width)),
            Style::default().fg(Color::DarkGray),
        ),
    ]
}

fn render_hud(s: &Session, f: &mut Frame, area: Rect) {
    let p = &s.player;
    let narrow = is_narrow_layout(area.width);
    let bar = if narrow { 8 } else { 14 };

    let mut top = vec![Span::styled(
        "HP ",
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    )];
    top.extend(gauge(p.hp as i64, p.total_max_hp() as i64, bar, Color::Red));
    top.extend([
        Span::raw(format!(" {}/{}  ", p.hp, p.total_max_hp())),
        Span::styled("EXP ", Style::default().fg(Color::Cyan)),
    ]);
    top.extend(gauge(p.exp as i64, p.exp_to_next as i64, bar, Color::Cyan));
    top.extend([
        Span::raw(format!(" {}/{}  ", p.exp, p.exp_to_next)),
        Span::styled(format!("{} G", p.gold), Style::default().fg(Color::Yellow)),
    ]);

    let mut status = vec![Span::styled(
        format!("攻{} 防{} ", p.total_attack(), p.total_defense()),
        Style::default().fg(Color::Gray),
    )];
    if let Some(frames) = p.buffs.lightning {
        status.push(Span::styled(
            format!(" ⚡{}s", frames.div_ceil(60)),
            Style::default().fg(Color::Cyan),
        ));
    }
    if let Some(orbit) = &p.buffs.fireball {
        status.push(Span::styled(
            format!(" 🔥{}s", orbit.remaining.div_ceil(60)),
            Style::default().fg(Color::Rgb(255, 102, 0)),
        ));
    }
    if p.buffs.shurikens > 0 {
        status.push(Span::styled(
            format!(" ✦{}/{}", p.buffs.shurikens, MAX_SHURIKENS),
            Style::default().fg(Color::White),
        ));
    }
    if let Some(boss) = s.world.monsters.iter().find(|m| m.def.big_hp_bar && m.is_alive()) {
        status.push(Span::styled(
            format!("  {} ", boss.def.name),
            Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
        ));
        status.extend(gauge(boss.hp as i64, boss.max_hp as i64, bar, Color::Magenta));
    }

    let level_style = if p.level_up_flash > 0 {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Green)
    };
    let widget = Paragraph::new(vec![Line::from(top), Line::from(status)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(Span::styled(format!(" Lv.{} ", p.level), level_style)),
    );
    f.render_widget(widget, area);
}

// ── Viewport ───────────────────────────────────────────────────

#[derive(Clone, Copy, PartialEq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

/// A character grid over the camera's view.
struct Canvas {
    cols: usize,
    rows: usize,
    cells: Vec<Cell>,
    camera: Camera,
    cell_w: f64,
    cell_h: f64,
}

/// Marks the cell covered by the right half of a wide glyph.
const WIDE_TAIL: char = '\0';

fn char_width(ch: char) -> usize {
    Span::raw(ch.to_string()).width()
}

impl Canvas {
    fn new(cols: u16, rows: u16, camera: &Camera, sky: (Color, Color)) -> Self {
        let (cols, rows) = (cols.max(1) as usize, rows.max(1) as usize);
        let mut cells = Vec::with_capacity(cols * rows);
        for row in 0..rows {
            let bg = blend(sky.0, sky.1, row as f64 / rows as f64);
            cells.extend(std::iter::repeat(Cell { ch: ' ', fg: Color::White, bg }).take(cols));
        }
        Self {
            cols,
            rows,
            cells,
            camera: *camera,
            cell_w: VIEW_WIDTH / cols as f64,
            cell_h: VIEW_HEIGHT / rows as f64,
        }
    }

    fn to_cell(&self, wx: f64, wy: f64) -> (f64, f64) {
        ((wx - self.camera.x) / self.cell_w, (wy - self.camera.y) / self.cell_h)
    }

    /// Cell index range covered by a world box, at least one cell thick.
    fn span(lo: f64, hi: f64, n: usize) -> Option<(usize, usize)> {
        let start = lo.floor().max(0.0);
        let end = hi.ceil().min(n as f64).max(start + 1.0);
        (start < n as f64 && hi >= 0.0).then(|| (start as usize, (end as usize).min(n)))
    }

    fn set(&mut self, col: usize, row: usize, ch: char, fg: Color) {
        if col >= self.cols || row >= self.rows {
            return;
        }
        let idx = row * self.cols + col;
        let wide = char_width(ch) > 1;
        if wide && col + 1 >= self.cols {
            return;
        }
        // Never leave half of a wide glyph behind.
        if self.cells[idx].ch == WIDE_TAIL && col > 0 {
            self.cells[idx - 1].ch = ' ';
        }
        let reach = if wide { idx + 1 } else { idx };
        if reach + 1 < (row + 1) * self.cols && self.cells[reach + 1].ch == WIDE_TAIL {
            self.cells[reach + 1].ch = ' ';
        }
        if wide {
            self.cells[idx + 1].ch = WIDE_TAIL;
        }
        self.cells[idx].ch = ch;
        self.cells[idx].fg = fg;
    }

    fn fill(&mut self, b: &Aabb, ch: char, fg: Color) {
        let (x0, y0) = self.to_cell(b.min_x, b.min_y);
        let (x1, y1) = self.to_cell(b.max_x, b.max_y);
        let (Some((c0, c1)), Some((r0, r1))) =
            (Self::span(x0, x1, self.cols), Self::span(y0, y1, self.rows))
        else {
            return;
        };
        for row in r0..r1 {
            for col in c0..c1 {
                self.set(col, row, ch, fg);
            }
        }
    }

    fn put(&mut self, wx: f64, wy: f64, ch: char, fg: Color) {
        if let Some((fx, fy)) = self.camera.project(wx, wy) {
            let col = (fx * self.cols as f64) as usize;
            let row = (fy * self.rows as f64) as usize;
            self.set(col, row, ch, fg);
        }
    }

    /// Text centred on a world point.
    fn label(&mut self, wx: f64, wy: f64, text: &str, fg: Color) {
        let (cx, cy) = self.to_cell(wx, wy);
        let width = Span::raw(text).width() as f64;
        let start = (cx - width / 2.0).round();
        if cy < 0.0 || start + width < 0.0 {
            return;
        }
        let row = cy as usize;
        let mut col = start as i64;
        for ch in text.chars() {
            let w = char_width(ch) as i64;
            if col >= 0 {
                self.set(col as usize, row, ch, fg);
            }
            col += w.max(1);
        }
    }

    fn into_lines(self) -> Vec<Line<'static>> {
        let mut lines = Vec::with_capacity(self.rows);
        for row in self.cells.chunks(self.cols) {
            let mut spans: Vec<Span<'static>> = Vec::new();
            let mut run = String::new();
            let mut style: Option<(Color, Color)> = None;
            for cell in row {
                if cell.ch == WIDE_TAIL {
                    continue;
                }
                if style != Some((cell.fg, cell.bg)) {
                    if let Some((fg, bg)) = style {
                        spans.push(Span::styled(std::mem::take(&mut run), Style::default().fg(fg).bg(bg)));
                    }
                    style = Some((cell.fg, cell.bg));
                }
                run.push(cell.ch);
            }
            if let Some((fg, bg)) = style {
                spans.push(Span::styled(run, Style::default().fg(fg).bg(bg)));
            }
            lines.push(Line::from(spans));
        }
        lines
    }
}

fn blend(a: Color, b: Color, t: f64) -> Color {
    match (a, b) {
        (Color::Rgb(r0, g0, b0), Color::Rgb(r1, g1, b1)) => {
            let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * t).round() as u8;
            Color::Rgb(mix(r0, r1), mix(g0, g1), mix(b0, b1))
        }
        _ => a,
    }
}

fn sky_colors(s: &Session) -> (Color, Color) {
    let bg = &s.world.background;
    let top = hex_rgb(&bg.sky_top).unwrap_or((40, 60, 110));
    let bottom = hex_rgb(&bg.sky_bottom).unwrap_or((90, 130, 180));
    // Darkened so glyphs stay readable.
    let dim = |(r, g, b): (u8, u8, u8)| Color::Rgb(r / 3, g / 3, b / 3);
    (dim(top), dim(bottom))
}

fn monster_glyph(m: &Monster) -> (char, Color) {
    if !m.is_alive() {
        return ('·', Color::DarkGray);
    }
    let (ch, color) = match m.kind() {
        MonsterKind::Slime => ('s', Color::Rgb(100, 220, 100)),
        MonsterKind::Mushroom => ('m', Color::Rgb(230, 130, 60)),
        MonsterKind::Ghost => ('g', Color::Rgb(210, 210, 255)),
        MonsterKind::GhostBoss => ('G', Color::Rgb(170, 80, 255)),
        MonsterKind::GhostSlave => ('g', Color::Rgb(160, 110, 220)),
    };
    if m.hit_timer > HIT_FLASH / 2 {
        (ch, Color::White)
    } else {
        (ch, color)
    }
}

fn pickup_glyph(kind: PickupKind) -> (char, Color) {
    match kind {
        PickupKind::Potion => ('♥', Color::Rgb(255, 80, 80)),
        PickupKind::Lightning => ('↯', Color::Rgb(0, 255, 255)),
        PickupKind::Fireball => ('☼', Color::Rgb(255, 102, 0)),
        PickupKind::Shuriken => ('✦', Color::Rgb(210, 210, 210)),
        PickupKind::Unknown => ('?', Color::Gray),
    }
}

fn paint_world(s: &Session, canvas: &mut Canvas) {
    let w = &s.world;

    canvas.fill(
        &Aabb::new(0.0, FLOOR_Y, WORLD_WIDTH, WORLD_HEIGHT - FLOOR_Y),
        '▒',
        Color::Rgb(90, 160, 70),
    );
    for p in &w.platforms {
        canvas.fill(&p.aabb(), '▀', Color::Rgb(160, 110, 60));
    }
    for l in &w.ladders {
        canvas.fill(&l.aabb(), 'H', Color::Rgb(180, 130, 70));
    }
    for portal in &w.portals {
        let b = portal.aabb();
        canvas.fill(&b, '▓', Color::Rgb(147, 51, 234));
        let (cx, _) = b.center();
        canvas.label(cx, b.min_y - 12.0, &portal.label, Color::Rgb(220, 190, 255));
    }
    for sp in &w.spawners {
        let color = if sp.effect > 0 { Color::Magenta } else { Color::DarkGray };
        canvas.fill(&sp.aabb(), '◎', color);
    }
    for item in &w.pickups {
        let (ch, color) = pickup_glyph(item.kind);
        let (cx, cy) = item.aabb().center();
        canvas.put(cx, cy, ch, color);
    }
    for d in &w.drops {
        let (_, color) = item_label(&s.catalog, d.item_id);
        let (cx, cy) = d.aabb().center();
        canvas.put(cx, cy, '◆', rgb(color));
    }
    for c in &w.coins {
        let (cx, cy) = c.aabb().center();
        canvas.put(cx, cy, '●', Color::Rgb(255, 215, 0));
    }

    for m in &w.monsters {
        let (ch, color) = monster_glyph(m);
        let b = m.aabb();
        canvas.fill(&b, ch, color);
        if m.is_alive() && m.hp < m.max_hp && !m.def.big_hp_bar {
            let (cx, _) = b.center();
            let ratio = m.hp as f64 / m.max_hp.max(1) as f64;
            let bar = if ratio > 0.66 { "━━━" } else if ratio > 0.33 { "━━" } else { "━" };
            canvas.label(cx, b.min_y - 10.0, bar, Color::Red);
        }
    }

    let p = &s.player;
    let blink = p.invincible > 0 && (s.frame / 4) % 2 == 0;
    let color = if p.level_up_flash > 0 || p.spawn_flash > 0 {
        Color::Yellow
    } else if blink {
        Color::DarkGray
    } else {
        Color::White
    };
    let b = p.aabb();
    canvas.fill(&b, '█', color);
    let (cx, _) = b.center();
    let eye = if p.facing > 0.0 { '▶' } else { '◀' };
    canvas.put(cx + p.facing * b.width() / 2.0, b.min_y + PLAYER_HEIGHT / 4.0, eye, color);
    if p.is_attacking() {
        canvas.fill(&p.attack_hitbox(), '─', Color::Rgb(255, 255, 160));
    }

    for b in &w.boomerangs {
        if b.is_launched() {
            let (cx, cy) = b.aabb().center();
            let ch = if (b.spin * 2.0) as i64 % 2 == 0 { '✦' } else { '✧' };
            canvas.put(cx, cy, ch, Color::Rgb(220, 220, 220));
        }
    }
    if let Some(orbit) = &p.buffs.fireball {
        for ball in &orbit.balls {
            canvas.put(ball.x, ball.y, '●', Color::Rgb(255, 102, 0));
        }
    }
    for bolt in &w.bolts {
        canvas.fill(&Aabb::new(bolt.x - 2.0, bolt.y - 80.0, 4.0, 80.0), '│', Color::Yellow);
    }
    for t in &w.texts {
        let color = if t.alpha() > 0.3 { rgb(t.rgb) } else { Color::DarkGray };
        canvas.label(t.x, t.y, &t.text, color);
    }
}

fn render_viewport(s: &Session, f: &mut Frame, area: Rect, fade: &RefCell<StageFade>) {
    let mut title = vec![Span::styled(
        format!(" {} ", s.world.display_name),
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
    )];
    if s.preview {
        title.push(Span::styled(" プレビュー ", Style::default().fg(Color::Magenta)));
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Line::from(title));
    let inner = block.inner(area);
    f.render_widget(block, area);
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let mut canvas = Canvas::new(inner.width, inner.height, &s.camera, sky_colors(s));
    paint_world(s, &mut canvas);
    f.render_widget(Paragraph::new(canvas.into_lines()), inner);

    render_notifications(s, f, inner);

    let mut fade = fade.borrow_mut();
    fade.observe(s.stage_loads);
    fade.apply(f, inner);
}

fn render_notifications(s: &Session, f: &mut Frame, area: Rect) {
    if s.notifications.is_empty() {
        return;
    }
    let lines: Vec<Line> = s
        .notifications
        .iter()
        .rev()
        .take(area.height.saturating_sub(1) as usize)
        .map(|n| {
            let color = if n.alpha() > 0.5 { rgb(n.rgb) } else { Color::DarkGray };
            Line::from(Span::styled(
                n.text.clone(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ))
        })
        .collect();
    let width = lines
        .iter()
        .map(|l| l.width() as u16 + 2)
        .max()
        .unwrap_or(0)
        .min(area.width);
    let rect = Rect::new(
        area.x + (area.width - width) / 2,
        area.y + 1,
        width,
        lines.len() as u16,
    );
    f.render_widget(Clear, rect);
    f.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .style(Style::default().bg(Color::Black)),
        rect,
    );
}

// ── Log ────────────────────────────────────────────────────────

fn render_log(s: &Session, f: &mut Frame, area: Rect) {
    let lines: Vec<Line> = s
        .log
        .iter()
        .map(|entry| {
            let style = if entry.important {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            Line::from(Span::styled(entry.text.clone(), style))
        })
        .collect();

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    let inner_width = area.width.saturating_sub(2);
    let visible = area.height.saturating_sub(2) as usize;
    let total = paragraph.line_count(inner_width);
    let scroll = total.saturating_sub(visible) as u16;

    let widget = paragraph.scroll((scroll, 0)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Blue))
            .title(" ログ "),
    );
    f.render_widget(widget, area);
}

// ── Overlays ───────────────────────────────────────────────────

fn render_overlay(s: &Session, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    f.render_widget(Clear, area);
    match &s.overlay {
        Overlay::Inventory(view) => render_inventory(s, view, f, area, click_state),
        Overlay::WorldMap => render_world_map(s, f, area, click_state),
        Overlay::None => {}
    }
}

fn rarity_span(entry: &ListEntry, s: &Session) -> Vec<Span<'static>> {
    let (name, color) = item_label(&s.catalog, entry.id);
    let rarity = s.catalog.item(entry.id).map(|i| i.rarity());
    let mut spans = vec![Span::styled(
        format!("{:<2} ", rarity.map(|r| r.label()).unwrap_or("?")),
        Style::default().fg(rarity.map(|r| rgb(r.rgb())).unwrap_or(Color::Gray)),
    )];
    spans.push(Span::styled(name, Style::default().fg(rgb(color))));
    if entry.count > 1 {
        spans.push(Span::styled(
            format!(" ×{}", entry.count),
            Style::default().fg(Color::Gray),
        ));
    }
    if entry.worn {
        spans.push(Span::styled(" 装備中", Style::default().fg(Color::Green)));
    }
    spans
}

fn render_inventory(
    s: &Session,
    view: &InventoryView,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta))
        .title(format!(" 持ち物  {} G ", s.player.gold));
    let inner = block.inner(area);
    f.render_widget(block, area);
    if inner.height < 3 {
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(inner);

    let mut cs = click_state.borrow_mut();
    let tab_index = Slot::ALL.iter().position(|&t| t == view.tab).unwrap_or(0);
    let mut bar = TabBar::new("│");
    for (i, slot) in Slot::ALL.iter().enumerate() {
        bar = bar.tab(slot.label(), TAB_BASE + i as u16);
    }
    bar.selected(TAB_BASE + tab_index as u16).render(f, rows[0], &mut cs);

    let entries = listing(s, view.tab);
    match view.selected.and_then(|i| entries.get(i)) {
        Some(entry) => render_item_detail(s, view, entry, f, rows[1], &mut cs),
        None => {
            let mut cl = ClickableList::new();
            let held = s.player.inventory.len(view.tab);
            cl.push(Line::from(Span::styled(
                format!("{}/{}", held, MAX_ENTRIES_PER_SLOT),
                Style::default().fg(Color::DarkGray),
            )));
            if entries.is_empty() {
                cl.push(Line::from(Span::styled("（なし）", Style::default().fg(Color::DarkGray))));
            }
            for (i, entry) in entries.iter().enumerate().take((ENTRY_MAX - ENTRY_BASE + 1) as usize) {
                cl.push_clickable(Line::from(rarity_span(entry, s)), ENTRY_BASE + i as u16);
            }
            cl.register_targets(rows[1], &mut cs, 0, 0, 0, 0);
            f.render_widget(Paragraph::new(cl.into_lines()), rows[1]);
        }
    }
}

fn stat_lines(s: &Session, id: u32) -> Vec<Line<'static>> {
    let Some(def) = s.catalog.equipment(id) else {
        return Vec::new();
    };
    let st = &def.stats;
    let mut parts = Vec::new();
    if st.attack_damage != 0 {
        parts.push(format!("攻撃 {:+}", st.attack_damage));
    }
    if st.defense != 0 {
        parts.push(format!("防御 {:+}", st.defense));
    }
    if st.max_hp != 0 {
        parts.push(format!("最大HP {:+}", st.max_hp));
    }
    if st.speed != 0.0 {
        parts.push(format!("速度 {:+.1}", st.speed));
    }
    if st.extra_jump != 0 {
        parts.push(format!("ジャンプ +{}", st.extra_jump));
    }
    parts
        .into_iter()
        .map(|p| Line::from(Span::styled(p, Style::default().fg(Color::Cyan))))
        .collect()
}

fn render_item_detail(
    s: &Session,
    view: &InventoryView,
    entry: &ListEntry,
    f: &mut Frame,
    area: Rect,
    cs: &mut ClickState,
) {
    let item = s.catalog.item(entry.id);
    let mut lines = vec![Line::from(rarity_span(entry, s))];
    if let Some(item) = item {
        if !item.description().is_empty() {
            lines.push(Line::from(Span::styled(
                item.description().to_string(),
                Style::default().fg(Color::Gray),
            )));
        }
        lines.extend(stat_lines(s, entry.id));
        lines.push(Line::from(format!("売値 {} G", item.return_gold_value())));
    }
    if view.tab.is_stackable() {
        lines.push(Line::from(format!(
            "売る数 {} / {}",
            view.sell_quantity.min(entry.count),
            entry.count
        )));
    }

    let text_rows = (lines.len() as u16).min(area.height.saturating_sub(1));
    f.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: true }),
        Rect::new(area.x, area.y, area.width, text_rows),
    );

    let buttons = if view.tab.is_stackable() {
        let qty = view.sell_quantity.min(entry.count);
        let row = if qty <= 1 {
            ButtonRow::new().button_dim("-", "", QTY_DOWN)
        } else {
            ButtonRow::new().button("-", "", QTY_DOWN)
        };
        let row = if qty >= entry.count {
            row.button_dim("+", "", QTY_UP)
        } else {
            row.button("+", "", QTY_UP)
        };
        row
            .button("A", "全部", QTY_ALL)
            .button("S", "売る", SELL)
    } else if entry.worn {
        ButtonRow::new().button("U", "外す", UNEQUIP)
    } else {
        ButtonRow::new().button("E", "装備", EQUIP).button("S", "売る", SELL)
    };
    let buttons = buttons.button("B", "戻る", BACK_TO_LIST);
    let y = area.y + text_rows;
    if y < area.y + area.height {
        buttons.render(f, Rect::new(area.x, y, area.width, 1), cs);
    }
}

fn render_world_map(s: &Session, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" ワールドマップ ");
    let inner = block.inner(area);
    f.render_widget(block, area);
    let mut cs = click_state.borrow_mut();

    let nodes = &s.world_map.nodes;
    let list_height = (nodes.len() as u16).min(inner.height);
    let chart_height = inner.height.saturating_sub(list_height);
    let chart = Rect::new(inner.x, inner.y, inner.width, chart_height);
    let list = Rect::new(inner.x, inner.y + chart_height, inner.width, list_height);

    let node_style = |id: &str| {
        if id == s.world.stage {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else if s.unlocked.contains(id) {
            Style::default().fg(Color::White)
        } else {
            Style::default().fg(Color::DarkGray)
        }
    };

    if chart_height >= 3 {
        if let Some((x0, y0, x1, y1)) = s.world_map.extent() {
            let mut grid = vec![vec![(' ', Style::default()); chart.width as usize]; chart.height as usize];
            let place = |x: f64, y: f64| -> (usize, usize) {
                let fx = if x1 > x0 { (x - x0) / (x1 - x0) } else { 0.5 };
                let fy = if y1 > y0 { (y - y0) / (y1 - y0) } else { 0.5 };
                let col = (fx * (chart.width.saturating_sub(8)) as f64).round() as usize;
                let row = (fy * (chart.height.saturating_sub(1)) as f64).round() as usize;
                (col, row)
            };
            for (a, b) in &s.world_map.edges {
                let (Some(na), Some(nb)) = (s.world_map.node(a), s.world_map.node(b)) else {
                    continue;
                };
                let (ca, ra) = place(na.x, na.y);
                let (cb, rb) = place(nb.x, nb.y);
                let steps = ca.abs_diff(cb).max(ra.abs_diff(rb)).max(1);
                for step in 0..=steps {
                    let t = step as f64 / steps as f64;
                    let col = (ca as f64 + (cb as f64 - ca as f64) * t).round() as usize;
                    let row = (ra as f64 + (rb as f64 - ra as f64) * t).round() as usize;
                    if let Some(cell) = grid.get_mut(row).and_then(|r| r.get_mut(col)) {
                        *cell = ('·', Style::default().fg(Color::DarkGray));
                    }
                }
            }
            for (i, node) in nodes.iter().enumerate() {
                let (col, row) = place(node.x, node.y);
                let mark = match node.kind {
                    NodeKind::Lobby => '⌂',
                    NodeKind::Stage => '●',
                };
                if let Some(cell) = grid.get_mut(row).and_then(|r| r.get_mut(col)) {
                    *cell = (mark, node_style(node.id.as_str()));
                }
                let w = (chart.width as usize).saturating_sub(col).min(3) as u16;
                if w > 0 && (row as u16) < chart.height {
                    cs.add_click_target(
                        Rect::new(chart.x + col as u16, chart.y + row as u16, w, 1),
                        MAP_NODE_BASE + i as u16,
                    );
                }
            }
            let lines: Vec<Line> = grid
                .into_iter()
                .map(|row| {
                    Line::from(
                        row.into_iter()
                            .map(|(ch, style)| Span::styled(ch.to_string(), style))
                            .collect::<Vec<_>>(),
                    )
                })
                .collect();
            f.render_widget(Paragraph::new(lines), chart);
        }
    }

    let mut cl = ClickableList::new();
    for (i, node) in nodes.iter().enumerate().take((MAP_NODE_MAX - MAP_NODE_BASE + 1) as usize) {
        let key = if i < 9 { format!("[{}] ", i + 1) } else { "    ".to_string() };
        let suffix = if node.id == s.world.stage {
            " 現在地"
        } else if s.unlocked.contains(&node.id) {
            ""
        } else {
            " 未解放"
        };
        let line = Line::from(vec![
            Span::styled(key, Style::default().fg(Color::Yellow)),
            Span::styled(node.label.clone(), node_style(node.id.as_str())),
            Span::styled(suffix, Style::default().fg(Color::DarkGray)),
        ]);
        cl.push_clickable(line, MAP_NODE_BASE + i as u16);
    }
    cl.register_targets(list, &mut cs, 0, 0, 0, 0);
    f.render_widget(Paragraph::new(cl.into_lines()), list);
}

// ── Help bar ───────────────────────────────────────────────────

fn render_help(s: &Session, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut row = ButtonRow::new()
        .button("I", "持ち物", OPEN_INVENTORY)
        .button("M", "地図", OPEN_MAP);
    if s.overlay != Overlay::None {
        row = row.button("Esc", "閉じる", CLOSE_OVERLAY);
    }
    let mut cs = click_state.borrow_mut();
    let mut line = row.into_line(inner.x, inner.y, inner.width, &mut cs);
    if !is_narrow_layout(area.width) && s.overlay == Overlay::None {
        line.spans.push(Span::styled(
            "   ←→ 移動  Space ジャンプ  Z 攻撃  ↑ 扉/はしご  ↓ 降りる",
            Style::default().fg(Color::DarkGray),
        ));
    }
    f.render_widget(Paragraph::new(line), inner);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera_at(x: f64, y: f64) -> Camera {
        Camera { x, y }
    }

    #[test]
    fn span_is_at_least_one_cell() {
        assert_eq!(Canvas::span(2.2, 2.4, 10), Some((2, 3)));
        assert_eq!(Canvas::span(-3.0, -1.0, 10), None);
        assert_eq!(Canvas::span(12.0, 14.0, 10), None);
        assert_eq!(Canvas::span(-2.0, 3.5, 10), Some((0, 4)));
        assert_eq!(Canvas::span(8.5, 20.0, 10), Some((8, 10)));
    }

    #[test]
    fn fill_maps_world_to_cells() {
        // 96x54 cells: one cell per 10x10 world pixels
        let sky = (Color::Rgb(0, 0, 0), Color::Rgb(0, 0, 0));
        let mut canvas = Canvas::new(96, 54, &camera_at(100.0, 0.0), sky);
        canvas.fill(&Aabb::new(120.0, 50.0, 20.0, 10.0), '#', Color::Red);
        let lines = canvas.into_lines();
        let row: String = lines[5].spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(row.starts_with("  ## "));
        assert_eq!(row.chars().filter(|&c| c == '#').count(), 2);
    }

    #[test]
    fn wide_glyphs_keep_row_width() {
        let sky = (Color::Rgb(0, 0, 0), Color::Rgb(0, 0, 0));
        let mut canvas = Canvas::new(20, 4, &camera_at(0.0, 0.0), sky);
        canvas.label(480.0, 10.0, "体力回復!", Color::Green);
        for line in canvas.into_lines() {
            assert_eq!(line.width(), 20);
        }
    }

    #[test]
    fn sky_is_a_vertical_gradient() {
        let mut canvas = Canvas::new(4, 3, &camera_at(0.0, 0.0), (Color::Rgb(0, 0, 0), Color::Rgb(90, 90, 90)));
        canvas.put(0.0, 0.0, 'x', Color::White);
        assert_eq!(canvas.cells[0].bg, Color::Rgb(0, 0, 0));
        assert_eq!(canvas.cells[8].bg, Color::Rgb(60, 60, 60));
        assert_eq!(canvas.cells[0].ch, 'x');
    }

    #[test]
    fn fade_starts_on_each_stage_load() {
        let mut fade = StageFade::new();
        fade.observe(1);
        assert!(fade.effect.is_some());
        fade.effect = None;
        fade.observe(1);
        assert!(fade.effect.is_none());
        fade.advance(16);
        fade.observe(2);
        assert!(fade.effect.is_some());
        assert_eq!(fade.pending_ms, 0);
    }
}
