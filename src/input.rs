//! Shared input handling: coordinate conversion, click targets, held-key
//! tracking and event types.
//!
//! This module is game-agnostic. Each game implements its own input dispatch.

use ratzilla::ratatui::layout::Rect;

/// All possible input events, normalized from keyboard, mouse, and touch sources.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A key press from keyboard.
    Key(char),
    /// A click/tap on a registered target, identified by a semantic action ID.
    /// Each game defines its own action ID constants.
    Click(u16),
    /// A press (or auto-repeat) of a movement/action key.
    Press(Control),
    /// Escape: close whatever is open.
    Back,
}

/// Keys that are read as held state rather than as one-shot commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Left,
    Right,
    Up,
    Down,
    Jump,
    Attack,
}

impl Control {
    pub const ALL: [Control; 6] = [
        Control::Left,
        Control::Right,
        Control::Up,
        Control::Down,
        Control::Jump,
        Control::Attack,
    ];

    fn index(self) -> usize {
        self as usize
    }

    fn opposite(self) -> Option<Control> {
        match self {
            Control::Left => Some(Control::Right),
            Control::Right => Some(Control::Left),
            Control::Up => Some(Control::Down),
            Control::Down => Some(Control::Up),
            _ => None,
        }
    }
}

/// Ticks a fresh press stays held. Long enough to bridge the delay before
/// the browser starts auto-repeating.
pub const HOLD_INITIAL: u32 = 32;
/// Ticks an auto-repeat press keeps an already held key alive.
pub const HOLD_REPEAT: u32 = 6;

/// Turns keydown events into level-held controls.
///
/// The DOM backend only reports presses (plus auto-repeat), never releases,
/// so each press holds its control for a short window that repeats keep
/// refreshing. Once the key is let go the hold runs out within
/// [`HOLD_REPEAT`] ticks.
///
/// Every press is also queued as a one-shot tap, so actions that fire once
/// per keydown see each press even while the hold is still running.
#[derive(Debug, Clone, Default)]
pub struct HeldKeys {
    remaining: [u32; 6],
    tapped: [bool; 6],
}

impl HeldKeys {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, control: Control) {
        if let Some(other) = control.opposite() {
            self.remaining[other.index()] = 0;
        }
        let r = &mut self.remaining[control.index()];
        *r = if *r == 0 { HOLD_INITIAL } else { (*r).max(HOLD_REPEAT) };
        self.tapped[control.index()] = true;
    }

    /// Consume the queued tap for `control`, if any.
    pub fn take_tap(&mut self, control: Control) -> bool {
        std::mem::take(&mut self.tapped[control.index()])
    }

    pub fn is_held(&self, control: Control) -> bool {
        self.remaining[control.index()] > 0
    }

    /// Age every hold by one tick.
    pub fn tick(&mut self) {
        for r in &mut self.remaining {
            *r = r.saturating_sub(1);
        }
    }

    pub fn release_all(&mut self) {
        self.remaining = [0; 6];
        self.tapped = [false; 6];
    }
}

/// A region on screen that can be tapped/clicked to trigger an action.
#[derive(Debug, Clone)]
pub struct ClickTarget {
    /// The rectangular region (in terminal cell coordinates) for hit testing.
    pub rect: Rect,
    /// Semantic action ID. Each game defines its own constants.
    pub action_id: u16,
}

/// Shared state between the render loop and click handler.
pub struct ClickState {
    pub targets: Vec<ClickTarget>,
    pub terminal_cols: u16,
    pub terminal_rows: u16,
}

impl ClickState {
    pub fn new() -> Self {
        Self {
            targets: Vec::new(),
            terminal_cols: 0,
            terminal_rows: 0,
        }
    }

    pub fn clear_targets(&mut self) {
        self.targets.clear();
    }

    /// Register a click target with a rectangular hit region and a semantic action ID.
    pub fn add_click_target(&mut self, rect: Rect, action_id: u16) {
        self.targets.push(ClickTarget { rect, action_id });
    }

    /// Convenience: register a full-row click target at the given row within an area.
    pub fn add_row_target(&mut self, area: Rect, row: u16, action_id: u16) {
        if row >= area.y && row < area.y + area.height {
            self.targets.push(ClickTarget {
                rect: Rect::new(area.x, row, area.width, 1),
                action_id,
            });
        }
    }

    /// Register click targets for a horizontal tab bar based on actual text widths.
    ///
    /// Each entry in `tab_widths` is `(display_width, action_id)` for the **padded**
    /// label text of that tab (e.g. `" 生産 "` → display_width = 6).
    /// `separator_width` is the display width of the separator string between tabs.
    ///
    /// Click targets are computed from the actual text positions so each target
    /// covers its label plus half of the adjacent separator(s).  The first tab
    /// extends to the left edge and the last tab extends to the right edge of
    /// the area, ensuring full coverage with no gaps.
    pub fn register_tab_targets(
        &mut self,
        tab_widths: &[(u16, u16)],
        separator_width: u16,
        x: u16,
        y: u16,
        total_width: u16,
        height: u16,
    ) {
        let n = tab_widths.len();
        if n == 0 || total_width == 0 {
            return;
        }

        // Compute the starting column of each tab label
        let mut starts: Vec<u16> = Vec::with_capacity(n);
        let mut cursor: u16 = 0;
        for (i, &(w, _)) in tab_widths.iter().enumerate() {
            if i > 0 {
                cursor += separator_width;
            }
            starts.push(cursor);
            cursor += w;
        }

        for i in 0..n {
            let (_, action_id) = tab_widths[i];

            // Left boundary: first tab from 0, others from midpoint of left separator
            let left = if i == 0 {
                0
            } else {
                let prev_end = starts[i - 1] + tab_widths[i - 1].0;
                prev_end + (starts[i] - prev_end) / 2
            };

            // Right boundary: last tab to total_width, others to midpoint of right sep
            let right = if i == n - 1 {
                total_width
            } else {
                let cur_end = starts[i] + tab_widths[i].0;
                let next_start = starts[i + 1];
                cur_end + (next_start - cur_end) / 2
            };

            let w = right.saturating_sub(left);
            if w > 0 {
                self.add_click_target(Rect::new(x + left, y, w, height), action_id);
            }
        }
    }

    /// Hit-test a terminal cell coordinate against all registered targets.
    /// Returns the action ID of the first matching target (last registered takes priority
    /// when targets overlap, matching typical UI layering where later elements are on top).
    pub fn hit_test(&self, col: u16, row: u16) -> Option<u16> {
        // Iterate in reverse so later-registered (topmost) targets win.
        self.targets.iter().rev().find_map(|t| {
            let r = &t.rect;
            if col >= r.x && col < r.x + r.width && row >= r.y && row < r.y + r.height {
                Some(t.action_id)
            } else {
                None
            }
        })
    }
}

/// Determine whether a screen width (in columns) should use narrow layout.
pub fn is_narrow_layout(width: u16) -> bool {
    width < 60
}

/// Convert a pixel Y coordinate to a terminal row index.
///
/// `click_y` is relative to the grid container's top edge.
/// `grid_height` is the total pixel height of the grid container.
/// `terminal_rows` is the number of rows in the terminal.
///
/// Returns `None` if the click is outside the grid or inputs are invalid.
pub fn pixel_y_to_row(click_y: f64, grid_height: f64, terminal_rows: u16) -> Option<u16> {
    if grid_height <= 0.0 || terminal_rows == 0 || click_y < 0.0 {
        return None;
    }

    let cell_height = grid_height / terminal_rows as f64;
    let row = (click_y / cell_height) as u16;

    if row >= terminal_rows {
        return None;
    }

    Some(row)
}

/// Convert a pixel X coordinate to a terminal column index.
pub fn pixel_x_to_col(click_x: f64, grid_width: f64, terminal_cols: u16) -> Option<u16> {
    if grid_width <= 0.0 || terminal_cols == 0 || click_x < 0.0 {
        return None;
    }
    let cell_width = grid_width / terminal_cols as f64;
    let col = (click_x / cell_width) as u16;
    if col >= terminal_cols { None } else { Some(col) }
}
