//! Panel Rush entry point
//!
//! Native builds run a headless demo of the simulation; browser builds
//! expose the engine to the host page, which owns canvas, input and audio.

#[cfg(target_arch = "wasm32")]
mod wasm_embed {
    use wasm_bindgen::prelude::*;

    use panel_rush::sim::{Cell, GameState};

    /// Engine handle for the JS host. The page drives `update` from its
    /// requestAnimationFrame loop, feeds pointer/keyboard input through the
    /// mutators, and renders from the JSON snapshot.
    #[wasm_bindgen]
    pub struct WebGame {
        state: GameState,
    }

    #[wasm_bindgen]
    impl WebGame {
        #[wasm_bindgen(constructor)]
        pub fn new(width: usize, height: usize, num_colors: u8, seed: u64) -> WebGame {
            WebGame {
                state: GameState::new(width, height, num_colors, seed),
            }
        }

        pub fn update(&mut self, dt_ms: f32) {
            self.state.update(dt_ms);
        }

        pub fn swap(&mut self) {
            self.state.swap();
        }

        pub fn move_cursor(&mut self, dx: i32, dy: i32) {
            self.state.move_cursor(dx, dy);
        }

        pub fn set_cursor(&mut self, x: i32, y: i32) {
            self.state.set_cursor(x, y);
        }

        pub fn set_starting_lines(&mut self, n: usize) {
            self.state.set_starting_lines(n);
        }

        /// Level rows as a flat array of color indices, -1 for empty,
        /// width entries per row
        pub fn set_level_queue(&mut self, flat: &[i16], visible_count: usize) {
            let width = self.state.width;
            let rows = flat
                .chunks(width)
                .map(|chunk| {
                    chunk
                        .iter()
                        .map(|&v| {
                            if v < 0 {
                                Cell::Empty
                            } else {
                                Cell::Color(v as u8)
                            }
                        })
                        .collect()
                })
                .collect();
            self.state.set_level_queue(rows, visible_count);
        }

        pub fn set_mask(&mut self, mask: Vec<f32>) {
            self.state.set_mask(mask);
        }

        pub fn set_scroll_speed(&mut self, px_per_sec: f32) {
            self.state.scroll_speed_px_per_sec = px_per_sec;
        }

        pub fn set_target_lines(&mut self, lines: u32) {
            self.state.target_lines = lines;
        }

        /// Full state snapshot for the renderer/HUD
        pub fn snapshot_json(&self) -> String {
            serde_json::to_string(&self.state).unwrap_or_else(|_| "{}".into())
        }

        /// Drain pending events for the audio/UI layers
        pub fn drain_events_json(&mut self) -> String {
            serde_json::to_string(&self.state.drain_events()).unwrap_or_else(|_| "[]".into())
        }

        pub fn has_won(&self) -> bool {
            self.state.has_won
        }

        pub fn has_lost(&self) -> bool {
            self.state.has_lost
        }

        pub fn score(&self) -> f64 {
            self.state.score as f64
        }
    }

    #[wasm_bindgen(start)]
    pub fn start() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);
        log::info!("Panel Rush engine loaded");
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Panel Rush (native) starting...");
    demo_run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is the wasm_bindgen start hook; this satisfies the compiler
}

/// Headless demo: generate a level, let a naive pilot play it, and log the
/// outcome. Useful for eyeballing pacing without a browser.
#[cfg(not(target_arch = "wasm32"))]
fn demo_run() {
    use panel_rush::sim::{Cell, GameEvent, GameState};
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    let seed = 0xC0FFEE;
    let mut state = GameState::new(6, 12, 5, seed);
    state.set_starting_lines(4);

    let mut rng = Pcg32::seed_from_u64(seed);
    let rows: Vec<Vec<Cell>> = (0..30)
        .map(|_| {
            (0..6)
                .map(|_| Cell::Color(rng.random_range(0..5)))
                .collect()
        })
        .collect();
    state.set_level_queue(rows, 0);
    state.scroll_speed_px_per_sec = 48.0;
    state.target_lines = 10;

    let dt_ms = 1000.0 / 60.0;
    let mut elapsed_ms = 0.0f32;

    while !state.has_won && !state.has_lost && elapsed_ms < 120_000.0 {
        // Naive pilot: wander the cursor and swap whatever is under it
        if state.time_ticks % 7 == 0 {
            let dx = rng.random_range(-1..=1);
            let dy = rng.random_range(-1..=1);
            state.move_cursor(dx, dy);
        }
        if state.time_ticks % 11 == 0 {
            state.swap();
        }

        state.update(dt_ms);
        elapsed_ms += dt_ms;

        for event in state.drain_events() {
            match event {
                GameEvent::Match { chain } => log::info!("match (chain {})", chain),
                GameEvent::Win => log::info!("win!"),
                GameEvent::GameOver => log::info!("game over"),
                GameEvent::TopContact => log::debug!("top contact"),
                GameEvent::Swap => log::debug!("swap"),
            }
        }
    }

    log::info!(
        "demo finished after {:.1}s: score {}, lines {}, rows risen {}/{}, won {}, lost {}",
        elapsed_ms / 1000.0,
        state.score,
        state.lines_cleared,
        state.rows_inserted,
        state.total_level_lines,
        state.has_won,
        state.has_lost
    );
}
