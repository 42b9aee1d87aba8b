//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Host-driven timesteps only (one `update` per frame)
//! - Seeded RNG only
//! - Fixed intra-tick ordering (pause, particles, rise, phase logic)
//! - No rendering or platform dependencies

pub mod matches;
pub mod queue;
pub mod state;
pub mod tick;

pub use matches::{apply_clear, scan_matches};
pub use queue::sanitize_row;
pub use state::{
    Cell, Cursor, FallPiece, GameEvent, GamePhase, GameState, Particle, RngState,
};
