//! Fixed-timestep clock for the platformer.
//!
//! `draw_web()` fires at whatever rate the display refreshes. Everything in
//! the quest is counted in 60 Hz ticks: gravity and friction per step,
//! attack and invincibility frames, spawner intervals and the scheduler's
//! delayed refills. GameTime turns wall-clock deltas into that tick count
//! so a jump arcs the same on a 60 Hz and a 144 Hz screen.

/// Longest frame gap fed to the simulation. A backgrounded tab resumes
/// with at most this much catch-up instead of a burst of physics steps.
const MAX_FRAME_GAP_MS: f64 = 500.0;

pub struct GameTime {
    ms_per_tick: f64,
    /// Milliseconds not yet consumed as ticks.
    accumulator: f64,
    pub total_ticks: u64,
    last_timestamp: Option<f64>,
}

impl GameTime {
    /// `ticks_per_sec` is the simulation rate, `TICKS_PER_SEC` for the quest.
    pub fn new(ticks_per_sec: u32) -> Self {
        Self {
            ms_per_tick: 1000.0 / ticks_per_sec as f64,
            accumulator: 0.0,
            total_ticks: 0,
            last_timestamp: None,
        }
    }

    /// Feed the frame's `performance.now()` timestamp and get back how many
    /// simulation steps `Game::tick` should run before this frame draws.
    pub fn update(&mut self, now_ms: f64) -> u32 {
        let delta = match self.last_timestamp {
            Some(prev) => (now_ms - prev).clamp(0.0, MAX_FRAME_GAP_MS),
            None => 0.0,
        };
        self.last_timestamp = Some(now_ms);

        self.accumulator += delta;
        let ticks = (self.accumulator / self.ms_per_tick) as u32;
        self.accumulator -= ticks as f64 * self.ms_per_tick;
        self.total_ticks += ticks as u64;
        ticks
    }
}
