//! Per-tick simulation update
//!
//! One `update` call per host frame advances everything: timers, rise,
//! gravity and phase transitions. Player mutators (`swap`, cursor moves)
//! are separate synchronous calls made between ticks. Intra-tick order is
//! fixed: rise-pause countdown, particle integration, scroll/rise, breach
//! checks, then phase-specific logic.

use glam::Vec2;

use super::matches::{apply_clear, scan_matches};
use super::state::{Cell, FallPiece, GameEvent, GamePhase, GameState, Particle};
use crate::chain_multiplier;
use crate::consts::*;

impl GameState {
    /// Advance the simulation by `dt_ms` milliseconds.
    /// Once a terminal flag is set only cosmetic particles keep decaying.
    pub fn update(&mut self, dt_ms: f32) {
        let dt_ms = dt_ms.max(0.0);
        let dt_s = dt_ms / 1000.0;

        if self.has_won || self.has_lost {
            self.update_particles(dt_s);
            return;
        }

        self.time_ticks += 1;

        if self.rise_pause_ms > 0.0 {
            self.rise_pause_ms = (self.rise_pause_ms - dt_ms).max(0.0);
            if self.rise_pause_ms == 0.0 {
                self.rise_pause_max_ms = 0.0;
            }
        }

        self.update_particles(dt_s);

        if self.phase == GamePhase::Idle {
            self.advance_scroll(dt_s);
            if self.has_lost {
                return;
            }
        }

        self.check_top_breach();
        if self.has_lost {
            return;
        }
        self.check_mask_contact();

        match self.phase {
            GamePhase::Idle => {}
            GamePhase::Clearing => self.tick_clearing(dt_ms),
            GamePhase::Settling => self.tick_settling(dt_s),
        }
    }

    /// Exchange the two cells under the cursor. Legal only while `Idle`
    /// and non-terminal; a both-empty pair is a no-op. The swap listener
    /// event fires once per actual exchange regardless of what follows.
    pub fn swap(&mut self) {
        if self.has_won || self.has_lost || self.phase != GamePhase::Idle {
            return;
        }
        let (x, y) = (self.cursor.x, self.cursor.y);
        let left = self.grid[y][x];
        let right = self.grid[y][x + 1];
        if left.is_empty() && right.is_empty() {
            return;
        }

        self.grid[y][x] = right;
        self.grid[y][x + 1] = left;
        self.events.push(GameEvent::Swap);

        let (mask, any) = scan_matches(&self.grid);
        self.match_mask = mask;
        if any {
            // A swap-triggered match is always at least a first hit
            self.chain_depth = self.chain_depth.max(1);
            self.enter_clearing(CLEAR_DURATION_SWAP_MS);
        } else if left.is_empty() || right.is_empty() {
            // A tile moved into a gap; let it fall at full speed
            self.begin_settle(false);
        }
    }

    fn enter_clearing(&mut self, duration_ms: f32) {
        self.phase = GamePhase::Clearing;
        self.clear_timer_ms = duration_ms;
        self.match_count += 1;
        self.events.push(GameEvent::Match {
            chain: self.chain_depth,
        });
        log::debug!("match at chain depth {}", self.chain_depth);
    }

    /// Accumulate upward motion and consume whole-cell crossings, each one
    /// inserting a queue row at the bottom. Loss condition A lives here:
    /// an occupied top row aborts the shift.
    fn advance_scroll(&mut self, dt_s: f32) {
        if self.rise_pause_ms > 0.0 || self.scroll_speed_px_per_sec <= 0.0 {
            return;
        }
        self.scroll_offset_px += self.scroll_speed_px_per_sec * dt_s;

        while self.scroll_offset_px >= self.cell_size_px {
            if self.top_row_occupied() {
                self.signal_loss();
                return;
            }
            self.scroll_offset_px -= self.cell_size_px;
            let row = self
                .level_queue
                .pop_front()
                .unwrap_or_else(|| vec![Cell::Empty; self.width]);
            self.shift_up(row);
            self.rows_inserted += 1;
            // Cursor rides the rising stack
            self.cursor.y = self.cursor.y.saturating_sub(1);
        }
    }

    /// Loss condition B: an occupied cell's top edge crossed the visible
    /// top boundary mid-cell. Checked every tick.
    fn check_top_breach(&mut self) {
        if self.scroll_offset_px > 0.0 && self.top_row_occupied() {
            self.signal_loss();
        }
    }

    fn signal_loss(&mut self) {
        self.has_lost = true;
        self.events.push(GameEvent::GameOver);
        log::info!("stack breached the top boundary: game over");
    }

    /// Advisory mask contact: sample fractional x positions per occupied
    /// cell against the host-supplied height mask. Fires `TopContact` on
    /// the rising edge only; never loss-triggering.
    fn check_mask_contact(&mut self) {
        let Some(mask) = &self.contact_mask else {
            return;
        };
        let grid_width_px = self.width as f32 * self.cell_size_px;
        let mut contact = false;

        'cells: for y in 0..self.height {
            let top = self.row_top_px(y);
            for x in 0..self.width {
                if self.grid[y][x].is_empty() {
                    continue;
                }
                for s in 0..MASK_SAMPLES_PER_CELL {
                    let fx = (x as f32
                        + (s as f32 + 0.5) / MASK_SAMPLES_PER_CELL as f32)
                        * self.cell_size_px;
                    let idx = ((fx / grid_width_px) * mask.len() as f32) as usize;
                    if top <= mask[idx.min(mask.len() - 1)] {
                        contact = true;
                        break 'cells;
                    }
                }
            }
        }

        if contact && !self.mask_contact {
            self.events.push(GameEvent::TopContact);
        }
        self.mask_contact = contact;
    }

    /// Count down the clear flash; at expiry remove masked cells, score
    /// them, grant the rise pause and hand off to gravity.
    fn tick_clearing(&mut self, dt_ms: f32) {
        self.clear_timer_ms -= dt_ms;
        if self.clear_timer_ms > 0.0 {
            return;
        }

        let outcome = apply_clear(&mut self.grid, &self.match_mask, self.clear_line_row);
        for row in &mut self.match_mask {
            row.fill(false);
        }
        self.cleared_below_line = outcome.below_line;

        if outcome.tiles > 0 {
            let depth = self.chain_depth.max(1);
            self.score += outcome.tiles as u64 * chain_multiplier(depth) as u64;
            // Partial rows never round up
            self.lines_cleared += outcome.tiles / self.width as u32;
            if self.target_lines > 0 && self.lines_cleared >= self.target_lines {
                self.show_clear_line = true;
            }

            let added = RISE_PAUSE_BASE_MS * (1u64 << (depth - 1).min(30)) as f32;
            self.rise_pause_ms += added;
            self.rise_pause_max_ms = self.rise_pause_ms;

            self.spawn_clear_particles(&outcome.cells);
            log::debug!(
                "cleared {} tiles at depth {} (+{}ms rise pause)",
                outcome.tiles,
                depth,
                added
            );
        }

        // Settling entered from a clear paces slower so chains read
        self.begin_settle(true);
    }

    /// Plan per-column gravity: stable bottom-anchored compaction, one
    /// fall piece per cell that actually moves.
    fn begin_settle(&mut self, cascade: bool) {
        let speed = self.fall_speed_rows_per_sec
            * if cascade {
                self.cascade_fall_multiplier
            } else {
                1.0
            };

        self.fall_pieces.clear();
        for col in 0..self.width {
            let mut write = self.height as i32 - 1;
            for row in (0..self.height).rev() {
                if self.grid[row][col].is_empty() {
                    continue;
                }
                let target = write as usize;
                if target != row {
                    self.fall_pieces.push(FallPiece {
                        column: col,
                        from_row: row,
                        to_row: target,
                        current_row: row as f32,
                        value: self.grid[row][col],
                        fall_speed: speed,
                    });
                    self.grid[row][col] = Cell::Empty;
                }
                write -= 1;
            }
        }
        self.phase = GamePhase::Settling;
    }

    /// Advance fall pieces; once all have landed, rescan for cascades or
    /// return to idle and run the win check.
    fn tick_settling(&mut self, dt_s: f32) {
        let pieces = std::mem::take(&mut self.fall_pieces);
        for mut piece in pieces {
            piece.current_row += piece.fall_speed * dt_s;
            if piece.current_row >= piece.to_row as f32 {
                self.grid[piece.to_row][piece.column] = piece.value;
            } else {
                self.fall_pieces.push(piece);
            }
        }
        if !self.fall_pieces.is_empty() {
            return;
        }

        let (mask, any) = scan_matches(&self.grid);
        self.match_mask = mask;
        if any {
            self.chain_depth += 1;
            self.enter_clearing(CLEAR_DURATION_CASCADE_MS);
        } else {
            self.phase = GamePhase::Idle;
            self.chain_depth = 0;
            self.check_win();
        }
    }

    /// Rising-win-line policy: the level's rows have all been inserted and
    /// the settled stack ends below the win line.
    fn check_win(&mut self) {
        if self.total_level_lines == 0 || self.rows_inserted < self.total_level_lines {
            return;
        }
        let win_line = self.win_line_px();
        for y in 0..self.height {
            let bottom = self.row_top_px(y) + self.cell_size_px;
            if bottom >= win_line {
                break;
            }
            if self.grid[y].iter().any(|c| !c.is_empty()) {
                return;
            }
        }
        self.has_won = true;
        self.events.push(GameEvent::Win);
        log::info!("level clear: score {}", self.score);
    }

    /// Deterministic cosmetic burst per cleared tile. Uses an integer hash
    /// rather than the sim RNG so cosmetics never perturb gameplay.
    fn spawn_clear_particles(&mut self, cells: &[(usize, usize)]) {
        let seed = self.time_ticks as u32;
        for (i, &(x, y)) in cells.iter().enumerate() {
            let cx = (x as f32 + 0.5) * self.cell_size_px;
            let cy = (y as f32 + 0.5) * self.cell_size_px - self.scroll_offset_px;
            for j in 0..PARTICLES_PER_TILE {
                if self.particles.len() >= MAX_PARTICLES {
                    self.particles.remove(0);
                }
                let hash = seed
                    .wrapping_mul(2654435761)
                    .wrapping_add((i * PARTICLES_PER_TILE + j) as u32 * 7919);
                let r1 = (hash % 1000) as f32 / 1000.0;
                let r2 = ((hash >> 10) % 1000) as f32 / 1000.0;
                let r3 = ((hash >> 20) % 1000) as f32 / 1000.0;

                self.particles.push(Particle {
                    pos: Vec2::new(cx, cy),
                    vel: Vec2::new((r1 - 0.5) * 220.0, -(60.0 + r2 * 180.0)),
                    hue: r3 * 360.0,
                    size: 3.0 + r1 * 3.0,
                    life: PARTICLE_LIFE_S * (0.7 + r2 * 0.6),
                });
            }
        }
    }

    /// Ballistic particle integration; expired particles are discarded
    fn update_particles(&mut self, dt_s: f32) {
        for p in &mut self.particles {
            p.vel.y += PARTICLE_GRAVITY * dt_s;
            p.pos += p.vel * dt_s;
            p.life -= dt_s;
        }
        self.particles.retain(|p| p.life > 0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const STEP_MS: f32 = 10.0;

    fn color(c: u8) -> Cell {
        Cell::Color(c)
    }

    /// Run updates until the machine is idle again (or panic on runaway)
    fn settle_out(state: &mut GameState) {
        for _ in 0..5000 {
            state.update(STEP_MS);
            if state.phase == GamePhase::Idle || state.has_won || state.has_lost {
                return;
            }
        }
        panic!("state machine did not return to idle");
    }

    #[test]
    fn test_swap_on_empty_grid_is_noop() {
        let mut state = GameState::new(6, 12, 5, 42);
        state.set_starting_lines(0);
        state.swap();
        assert_eq!(state.phase, GamePhase::Idle);
        assert!(state.drain_events().is_empty());
        assert!(state
            .grid()
            .iter()
            .all(|row| row.iter().all(|c| c.is_empty())));
    }

    #[test]
    fn test_swap_exchanges_cells_and_fires_listener_once() {
        let mut state = GameState::new(6, 12, 5, 42);
        state.set_cell(0, 11, color(1));
        state.set_cell(1, 11, color(2));
        state.set_cursor(0, 11);
        state.swap();

        assert_eq!(state.cell(0, 11), color(2));
        assert_eq!(state.cell(1, 11), color(1));
        assert_eq!(state.phase, GamePhase::Idle);
        let events = state.drain_events();
        assert_eq!(events, vec![GameEvent::Swap]);
    }

    #[test]
    fn test_swap_into_gap_settles_the_tile() {
        let mut state = GameState::new(6, 12, 5, 42);
        state.scroll_speed_px_per_sec = 0.0;
        state.set_cell(0, 5, color(3));
        state.set_cursor(0, 5);
        state.swap();

        assert_eq!(state.phase, GamePhase::Settling);
        assert_eq!(state.fall_pieces.len(), 1);
        assert_eq!(state.fall_pieces[0].column, 1);
        assert_eq!(state.fall_pieces[0].to_row, 11);

        settle_out(&mut state);
        assert_eq!(state.cell(1, 11), color(3));
        assert!(state.cell(1, 5).is_empty());
    }

    #[test]
    fn test_swap_triggered_match_clears_and_scores() {
        let mut state = GameState::new(6, 12, 5, 42);
        state.scroll_speed_px_per_sec = 0.0;
        state.set_cell(0, 11, color(2));
        state.set_cell(1, 11, color(2));
        state.set_cell(2, 11, color(4));
        state.set_cell(3, 11, color(2));
        state.set_cursor(2, 11);
        state.swap();

        assert_eq!(state.phase, GamePhase::Clearing);
        assert_eq!(state.chain_depth, 1);
        assert_eq!(state.match_count, 1);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::Swap));
        assert!(events.contains(&GameEvent::Match { chain: 1 }));
        assert!(state.match_mask[11][0] && state.match_mask[11][1] && state.match_mask[11][2]);

        settle_out(&mut state);
        assert_eq!(state.score, 3);
        assert_eq!(state.chain_depth, 0);
        assert!(state.cell(0, 11).is_empty());
        assert!(!state.particles.is_empty());
    }

    #[test]
    fn test_swap_rejected_outside_idle() {
        let mut state = GameState::new(6, 12, 5, 42);
        state.scroll_speed_px_per_sec = 0.0;
        state.set_cell(0, 11, color(2));
        state.set_cell(1, 11, color(2));
        state.set_cell(2, 11, color(4));
        state.set_cell(3, 11, color(2));
        state.set_cursor(2, 11);
        state.swap();
        assert_eq!(state.phase, GamePhase::Clearing);
        state.drain_events();

        // A second swap while clearing must not touch the grid
        let before = state.grid().to_vec();
        state.swap();
        assert_eq!(state.grid(), &before[..]);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_partial_row_clear_does_not_count_a_line() {
        // 5 tiles (L shape) on a 6-wide grid: no line credit
        let mut state = GameState::new(6, 12, 5, 42);
        state.scroll_speed_px_per_sec = 0.0;
        state.set_cell(0, 9, color(2));
        state.set_cell(0, 10, color(2));
        state.set_cell(0, 11, color(2));
        state.set_cell(1, 11, color(2));
        state.set_cell(2, 11, color(4));
        state.set_cell(3, 11, color(2));
        state.set_cursor(2, 11);
        state.swap();

        settle_out(&mut state);
        assert_eq!(state.score, 5);
        assert_eq!(state.lines_cleared, 0);
    }

    #[test]
    fn test_full_width_clear_counts_one_line() {
        // Two runs of three in one swap: 6 tiles == width
        let mut state = GameState::new(6, 12, 5, 42);
        state.scroll_speed_px_per_sec = 0.0;
        state.set_cell(0, 11, color(2));
        state.set_cell(1, 11, color(2));
        state.set_cell(2, 11, color(3));
        state.set_cell(3, 11, color(2));
        state.set_cell(4, 11, color(3));
        state.set_cell(5, 11, color(3));
        state.set_cursor(2, 11);
        state.swap();

        settle_out(&mut state);
        assert_eq!(state.lines_cleared, 1);
        assert_eq!(state.score, 6);
    }

    #[test]
    fn test_one_cell_crossing_inserts_exactly_one_row() {
        // One full cell crossed in a single update
        let mut state = GameState::new(6, 12, 5, 42);
        state.cell_size_px = 32.0;
        state.scroll_speed_px_per_sec = 32.0;
        state.set_level_queue(
            vec![vec![
                color(0),
                color(1),
                color(0),
                color(1),
                color(0),
                color(1),
            ]],
            0,
        );
        let queued = state.next_row_preview().unwrap().to_vec();
        let cursor_y = state.cursor.y;

        state.update(1000.0);

        assert_eq!(state.rows_inserted, 1);
        assert_eq!(state.queue_len(), 0);
        assert!(state.scroll_offset_px.abs() < 0.001);
        assert_eq!(state.grid()[11], queued);
        assert_eq!(state.cursor.y, cursor_y - 1);
    }

    #[test]
    fn test_exhausted_queue_synthesizes_empty_rows() {
        let mut state = GameState::new(6, 12, 5, 42);
        state.cell_size_px = 32.0;
        state.scroll_speed_px_per_sec = 64.0;
        state.update(1000.0);
        assert_eq!(state.rows_inserted, 2);
        assert!(state.grid()[11].iter().all(|c| c.is_empty()));
        assert!(!state.has_lost);
    }

    #[test]
    fn test_loss_on_insertion_with_occupied_top_row() {
        // An occupied top row aborts the shift and freezes state
        let mut state = GameState::new(6, 12, 5, 42);
        state.cell_size_px = 32.0;
        state.scroll_speed_px_per_sec = 32.0;
        state.set_cell(3, 0, color(1));

        state.update(1000.0);
        assert!(state.has_lost);
        assert!(state.drain_events().contains(&GameEvent::GameOver));

        let frozen = state.grid().to_vec();
        let score = state.score;
        for _ in 0..5 {
            state.update(1000.0);
        }
        assert_eq!(state.grid(), &frozen[..]);
        assert_eq!(state.score, score);
    }

    #[test]
    fn test_loss_on_mid_cell_breach() {
        // Loss condition B: no whole-cell crossing needed
        let mut state = GameState::new(6, 12, 5, 42);
        state.cell_size_px = 32.0;
        state.scroll_speed_px_per_sec = 16.0;
        state.set_cell(0, 0, color(0));

        state.update(1000.0);
        assert!(state.scroll_offset_px < state.cell_size_px);
        assert!(state.has_lost);
    }

    #[test]
    fn test_rise_pause_suspends_scroll() {
        let mut state = GameState::new(6, 12, 5, 42);
        state.cell_size_px = 32.0;
        state.scroll_speed_px_per_sec = 32.0;
        state.rise_pause_ms = 500.0;
        state.rise_pause_max_ms = 500.0;

        state.update(400.0);
        assert!(state.scroll_offset_px.abs() < 0.001);
        assert!((state.rise_pause_ms - 100.0).abs() < 0.001);

        // Pause expires at the top of this tick, then scroll resumes
        state.update(400.0);
        assert!(state.scroll_offset_px > 0.0);
        assert_eq!(state.rise_pause_max_ms, 0.0);
    }

    #[test]
    fn test_chain_of_three_multiplies_and_pauses() {
        // Three sequential clears at depths 1, 2, 3
        let mut state = GameState::new(6, 12, 5, 42);
        state.scroll_speed_px_per_sec = 0.0;
        state.set_cell(2, 9, color(3));
        state.set_cell(0, 10, color(3));
        state.set_cell(1, 10, color(3));
        state.set_cell(2, 10, color(0));
        state.set_cell(0, 11, color(2));
        state.set_cell(1, 11, color(2));
        state.set_cell(2, 11, color(0));
        state.set_cell(3, 11, color(2));
        state.set_cell(4, 11, color(0));
        state.set_cell(5, 11, color(1));

        state.set_cursor(2, 11);
        state.swap();
        assert_eq!(state.phase, GamePhase::Clearing);

        let mut score_gains = Vec::new();
        let mut pause_adds = Vec::new();
        let mut prev_phase = state.phase;
        let mut prev_score = state.score;
        for _ in 0..5000 {
            let pause_before = state.rise_pause_ms;
            state.update(STEP_MS);
            if prev_phase == GamePhase::Clearing && state.phase == GamePhase::Settling {
                score_gains.push(state.score - prev_score);
                let decayed = (pause_before - STEP_MS).max(0.0);
                pause_adds.push(state.rise_pause_ms - decayed);
                prev_score = state.score;
            }
            prev_phase = state.phase;
            if state.phase == GamePhase::Idle && score_gains.len() == 3 {
                break;
            }
        }

        // 3 tiles per clear at multipliers x1, x2, x4
        assert_eq!(score_gains, vec![3, 6, 12]);
        assert_eq!(state.score, 21);
        assert_eq!(state.chain_depth, 0);

        assert_eq!(pause_adds.len(), 3);
        assert!((pause_adds[0] - 1000.0).abs() < 0.01);
        assert!((pause_adds[1] - 2000.0).abs() < 0.01);
        assert!((pause_adds[2] - 4000.0).abs() < 0.01);
    }

    #[test]
    fn test_win_when_stack_ends_below_line_after_level() {
        let mut state = GameState::new(6, 12, 5, 42);
        state.scroll_speed_px_per_sec = 0.0;
        state.rows_inserted = 4;
        state.total_level_lines = 4;
        for x in 0..6 {
            state.set_cell(x, 11, color((x % 2) as u8));
            state.set_cell(x, 10, color(((x + 1) % 2) as u8));
        }
        // A gap swap forces a settle, whose completion runs the win check
        state.set_cell(0, 9, color(4));
        state.set_cursor(0, 9);
        state.swap();
        settle_out(&mut state);

        assert!(state.has_won);
        assert!(state.drain_events().contains(&GameEvent::Win));
    }

    #[test]
    fn test_no_win_while_stack_reaches_above_line() {
        let mut state = GameState::new(6, 12, 5, 42);
        state.scroll_speed_px_per_sec = 0.0;
        state.rows_inserted = 4;
        state.total_level_lines = 4;
        state.win_line_row = 2;
        // Column of alternating colors reaching the top row
        for y in 0..12 {
            state.set_cell(5, y, color((y % 2) as u8));
        }
        state.set_cell(0, 9, color(4));
        state.set_cursor(0, 9);
        state.swap();
        settle_out(&mut state);

        assert!(!state.has_won);
    }

    #[test]
    fn test_no_win_before_level_rows_exhausted() {
        let mut state = GameState::new(6, 12, 5, 42);
        state.scroll_speed_px_per_sec = 0.0;
        state.rows_inserted = 2;
        state.total_level_lines = 10;
        state.set_cell(0, 11, color(1));
        state.set_cell(0, 9, color(4));
        state.set_cursor(0, 9);
        state.swap();
        settle_out(&mut state);
        assert!(!state.has_won);
    }

    #[test]
    fn test_mask_contact_fires_on_rising_edge_only() {
        let mut state = GameState::new(6, 12, 5, 42);
        state.scroll_speed_px_per_sec = 0.0;
        state.set_cell(2, 5, color(1));
        state.set_mask(vec![200.0; 8]);

        state.update(STEP_MS);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::TopContact));

        state.update(STEP_MS);
        assert!(!state.drain_events().contains(&GameEvent::TopContact));
    }

    #[test]
    fn test_particles_decay_after_terminal_state() {
        let mut state = GameState::new(6, 12, 5, 42);
        state.scroll_speed_px_per_sec = 0.0;
        state.set_cell(0, 11, color(2));
        state.set_cell(1, 11, color(2));
        state.set_cell(2, 11, color(4));
        state.set_cell(3, 11, color(2));
        state.set_cursor(2, 11);
        state.swap();
        settle_out(&mut state);
        assert!(!state.particles.is_empty());

        state.has_lost = true;
        for _ in 0..300 {
            state.update(STEP_MS);
        }
        assert!(state.particles.is_empty());
    }

    #[test]
    fn test_determinism() {
        // Twin states with the same seed and inputs stay identical
        let mut a = GameState::new(6, 12, 5, 99999);
        let mut b = GameState::new(6, 12, 5, 99999);
        for state in [&mut a, &mut b] {
            state.set_starting_lines(4);
            state.set_cursor(1, 9);
            state.swap();
            for _ in 0..200 {
                state.update(STEP_MS);
            }
        }
        assert_eq!(a.grid(), b.grid());
        assert_eq!(a.score, b.score);
        assert_eq!(a.phase, b.phase);
        assert_eq!(a.scroll_offset_px, b.scroll_offset_px);
    }

    proptest! {
        #[test]
        fn prop_grid_values_and_cursor_stay_in_domain(
            ops in proptest::collection::vec(0u8..4, 1..80),
            seed in 0u64..1000,
        ) {
            let mut state = GameState::new(6, 12, 4, seed);
            state.set_starting_lines(3);
            for op in ops {
                match op {
                    0 => state.move_cursor(1, 0),
                    1 => state.move_cursor(-1, 1),
                    2 => state.swap(),
                    _ => state.update(16.0),
                }
                for row in state.grid() {
                    for cell in row {
                        if let Some(c) = cell.color() {
                            prop_assert!(c < 4);
                        }
                    }
                }
                prop_assert!(state.cursor.x <= 4);
                prop_assert!(state.cursor.y <= 11);
            }
        }
    }
}
