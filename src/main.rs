mod config;
mod console;
mod games;
mod input;
mod time;
mod widgets;

use std::{cell::RefCell, io, rc::Rc};

use config::LaunchConfig;
use games::quest::{preview, QuestGame, TICKS_PER_SEC};
use games::Game;
use input::{pixel_x_to_col, pixel_y_to_row, ClickState, Control, InputEvent};
use ratzilla::event::{KeyCode, MouseButton, MouseEventKind};
use ratzilla::ratatui::Terminal;
use ratzilla::{DomBackend, WebRenderer};
use time::GameTime;

/// Query the grid container's bounding rect and convert pixel coordinates
/// to a terminal cell.
fn dom_pixel_to_cell(mouse_x: u32, mouse_y: u32, cs: &ClickState) -> Option<(u16, u16)> {
    let window = web_sys::window()?;
    let document = window.document()?;

    // DomBackend creates a <div> as the grid container inside <body>.
    let grid = document.query_selector("body > div").ok()??;
    let rect = grid.get_bounding_client_rect();

    let click_x = mouse_x as f64 - rect.left();
    let click_y = mouse_y as f64 - rect.top();

    let col = pixel_x_to_col(click_x, rect.width(), cs.terminal_cols)?;
    let row = pixel_y_to_row(click_y, rect.height(), cs.terminal_rows)?;
    Some((col, row))
}

fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

fn key_to_event(code: KeyCode) -> Option<InputEvent> {
    match code {
        KeyCode::Left => Some(InputEvent::Press(Control::Left)),
        KeyCode::Right => Some(InputEvent::Press(Control::Right)),
        KeyCode::Up => Some(InputEvent::Press(Control::Up)),
        KeyCode::Down => Some(InputEvent::Press(Control::Down)),
        KeyCode::Esc => Some(InputEvent::Back),
        KeyCode::Char(c) => Some(InputEvent::Key(c.to_ascii_lowercase())),
        _ => None,
    }
}

fn main() -> io::Result<()> {
    console_error_panic_hook::set_once();

    let config = LaunchConfig::from_location();
    let preview_stage = if config.preview { preview::load() } else { None };
    let seed = config.seed.unwrap_or_else(|| js_sys::Date::now() as u64);
    console::log(&format!("boot: {config:?} seed={seed}"));

    let game: Rc<RefCell<Box<dyn Game>>> = Rc::new(RefCell::new(Box::new(QuestGame::new(
        &config,
        preview_stage,
        seed,
    ))));
    let click_state = Rc::new(RefCell::new(ClickState::new()));
    let game_time = Rc::new(RefCell::new(GameTime::new(TICKS_PER_SEC)));

    let backend = DomBackend::new()?;
    let terminal = Terminal::new(backend)?;

    // Mouse/touch click handler
    terminal.on_mouse_event({
        let game = game.clone();
        let click_state = click_state.clone();
        move |mouse_event| {
            if mouse_event.event != MouseEventKind::Pressed
                || mouse_event.button != MouseButton::Left
            {
                return;
            }

            let cs = click_state.borrow();
            if cs.terminal_rows == 0 || cs.terminal_cols == 0 {
                return;
            }
            let Some((col, row)) = dom_pixel_to_cell(mouse_event.x, mouse_event.y, &cs) else {
                return;
            };
            let action = cs.hit_test(col, row);
            drop(cs);

            if let Some(id) = action {
                game.borrow_mut().handle_input(&InputEvent::Click(id));
            }
        }
    });

    // Keyboard handler
    terminal.on_key_event({
        let game = game.clone();
        move |key_event| {
            if let Some(event) = key_to_event(key_event.code) {
                game.borrow_mut().handle_input(&event);
            }
        }
    });

    terminal.draw_web({
        let click_state = click_state.clone();
        move |f| {
            let ticks = game_time.borrow_mut().update(now_ms());
            if ticks > 0 {
                game.borrow_mut().tick(ticks);
            }

            let size = f.area();
            {
                let mut cs = click_state.borrow_mut();
                cs.terminal_cols = size.width;
                cs.terminal_rows = size.height;
                cs.clear_targets();
            }

            game.borrow().render(f, size, &click_state);
        }
    });

    Ok(())
}
