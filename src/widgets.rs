//! Reusable clickable UI components.
//!
//! Each component renders itself and registers its own click targets, so a
//! panel never has to compute row or column offsets by hand.
//!
//! - [`TabBar`]: one-row tab strip with a highlighted tab.
//! - [`ButtonRow`]: `[K] label` buttons side by side on one row.
//! - [`ClickableList`]: vertical list with per-row click targets.

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Paragraph};
use ratzilla::ratatui::Frame;

use crate::input::ClickState;

fn text_width(s: &str) -> u16 {
    Line::from(s).width() as u16
}

// ── TabBar ─────────────────────────────────────────────────────

/// A horizontal tab strip.
///
/// ```ignore
/// TabBar::new("│")
///     .tab("武器", TAB_WEAPON)
///     .tab("素材", TAB_MATERIAL)
///     .selected(TAB_WEAPON)
///     .render(f, area, &mut cs);
/// ```
pub struct TabBar<'a> {
    tabs: Vec<(String, u16)>,
    separator: &'a str,
    selected: Option<u16>,
    block: Option<Block<'a>>,
}

impl<'a> TabBar<'a> {
    pub fn new(separator: &'a str) -> Self {
        Self {
            tabs: Vec::new(),
            separator,
            selected: None,
            block: None,
        }
    }

    pub fn tab(mut self, label: impl Into<String>, action_id: u16) -> Self {
        self.tabs.push((label.into(), action_id));
        self
    }

    /// Highlight the tab with this action ID.
    pub fn selected(mut self, action_id: u16) -> Self {
        self.selected = Some(action_id);
        self
    }

    /// Wrap the bar in a [`Block`]. Targets follow `Block::inner()`.
    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    /// Styled spans plus `(display_width, action_id)` per padded label.
    fn layout(&self) -> (Vec<Span<'static>>, Vec<(u16, u16)>) {
        let mut spans = Vec::new();
        let mut widths = Vec::new();
        for (i, (label, id)) in self.tabs.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(
                    self.separator.to_string(),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            let style = if self.selected == Some(*id) {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            let padded = format!(" {} ", label);
            widths.push((text_width(&padded), *id));
            spans.push(Span::styled(padded, style));
        }
        (spans, widths)
    }

    pub fn render(self, f: &mut Frame, area: Rect, cs: &mut ClickState) {
        let (spans, widths) = self.layout();
        let sep_width = text_width(self.separator);
        let inner = match &self.block {
            Some(block) => block.inner(area),
            None => area,
        };

        let paragraph = match self.block {
            Some(block) => Paragraph::new(Line::from(spans)).block(block),
            None => Paragraph::new(Line::from(spans)),
        };
        f.render_widget(paragraph, area);

        // Inner x/width for column accuracy, outer y/height for tap tolerance.
        cs.register_tab_targets(&widths, sep_width, inner.x, area.y, inner.width, area.height.max(1));
    }
}

// ── ButtonRow ──────────────────────────────────────────────────

/// Key-hint buttons on a single row: `[E] 装備  [S] 売る`.
///
/// Each button is clickable over exactly the columns it occupies.
#[derive(Default)]
pub struct ButtonRow {
    buttons: Vec<(String, String, u16, bool)>,
}

const BUTTON_GAP: u16 = 2;

impl ButtonRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn button(mut self, key: &str, label: impl Into<String>, action_id: u16) -> Self {
        self.buttons.push((key.to_string(), label.into(), action_id, true));
        self
    }

    /// A greyed-out button. Still clickable; the handler decides.
    pub fn button_dim(mut self, key: &str, label: impl Into<String>, action_id: u16) -> Self {
        self.buttons.push((key.to_string(), label.into(), action_id, false));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty()
    }

    /// Spans plus `(start_col, width, action_id)` relative to the row start.
    fn layout(&self) -> (Vec<Span<'static>>, Vec<(u16, u16, u16)>) {
        let mut spans = Vec::new();
        let mut hits = Vec::new();
        let mut col = 0u16;
        for (i, (key, label, id, enabled)) in self.buttons.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" ".repeat(BUTTON_GAP as usize)));
                col += BUTTON_GAP;
            }
            let (key_style, label_style) = if *enabled {
                (
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                    Style::default().fg(Color::White),
                )
            } else {
                (
                    Style::default().fg(Color::DarkGray),
                    Style::default().fg(Color::DarkGray),
                )
            };
            let key_text = format!("[{}]", key);
            let label_text = format!(" {}", label);
            let width = text_width(&key_text) + text_width(&label_text);
            hits.push((col, width, *id));
            col += width;
            spans.push(Span::styled(key_text, key_style));
            spans.push(Span::styled(label_text, label_style));
        }
        (spans, hits)
    }

    /// Register targets for a row drawn at (x, y) and return its line, for
    /// embedding in a larger paragraph.
    pub fn into_line(self, x: u16, y: u16, max_width: u16, cs: &mut ClickState) -> Line<'static> {
        let (spans, hits) = self.layout();
        for (start, width, id) in hits {
            if start >= max_width {
                break;
            }
            let w = width.min(max_width - start);
            cs.add_click_target(Rect::new(x + start, y, w, 1), id);
        }
        Line::from(spans)
    }

    pub fn render(self, f: &mut Frame, area: Rect, cs: &mut ClickState) {
        if area.height == 0 {
            return;
        }
        let line = self.into_line(area.x, area.y, area.width, cs);
        f.render_widget(Paragraph::new(line), area);
    }
}

// ── ClickableList ──────────────────────────────────────────────

/// Pairs rendered [`Line`]s with click actions, so targets follow lines
/// when lines are added or removed above them.
///
/// ```ignore
/// let mut cl = ClickableList::new();
/// cl.push(Line::from("所持品"));
/// cl.push_clickable(Line::from("木の剣"), ITEM_BASE);
/// cl.register_targets(area, &mut cs, 1, 1, 0, 0);
/// f.render_widget(Paragraph::new(cl.into_lines()).block(block), area);
/// ```
pub struct ClickableList<'a> {
    lines: Vec<Line<'a>>,
    /// `(line_index, action_id)`.
    actions: Vec<(u16, u16)>,
}

impl<'a> ClickableList<'a> {
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            actions: Vec::new(),
        }
    }

    pub fn push(&mut self, line: Line<'a>) {
        self.lines.push(line);
    }

    pub fn push_clickable(&mut self, line: Line<'a>, action_id: u16) {
        let idx = self.lines.len() as u16;
        self.actions.push((idx, action_id));
        self.lines.push(line);
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn into_lines(self) -> Vec<Line<'a>> {
        self.lines
    }

    /// Register click targets for all clickable lines.
    ///
    /// * `top_offset` / `bottom_offset`: rows of border before and after
    ///   the content.
    /// * `scroll`: vertical scroll in visual rows.
    /// * `inner_width`: content width when the paragraph wraps; `0` means
    ///   one logical line per row.
    pub fn register_targets(
        &self,
        area: Rect,
        cs: &mut ClickState,
        top_offset: u16,
        bottom_offset: u16,
        scroll: u16,
        inner_width: u16,
    ) {
        let content_y = area.y + top_offset;
        let content_end = area.y + area.height.saturating_sub(bottom_offset);

        // Visual row span of every logical line.
        let mut starts = Vec::with_capacity(self.lines.len());
        let mut heights = Vec::with_capacity(self.lines.len());
        let mut cumulative: u16 = 0;
        for line in &self.lines {
            starts.push(cumulative);
            let h = match inner_width as usize {
                0 => 1,
                w => line.width().max(1).div_ceil(w) as u16,
            };
            heights.push(h);
            cumulative += h;
        }

        for &(idx, action_id) in &self.actions {
            let li = idx as usize;
            if li >= self.lines.len() {
                continue;
            }
            for r in 0..heights[li] {
                let vr = starts[li] + r;
                if vr < scroll {
                    continue;
                }
                let row = content_y + (vr - scroll);
                if row >= content_end {
                    break;
                }
                cs.add_row_target(area, row, action_id);
            }
        }
    }
}
