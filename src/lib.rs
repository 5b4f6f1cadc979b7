//! Fringe simulation core
//!
//! Fixed-rate simulation of a 2D space-combat arcade game: speed-capped
//! thrust, enemy steering and fire control, circle collisions with elastic
//! response, a toroidal world seen through a player-centred camera, and a
//! catch-up scheduler decoupled from rendering.
//!
//! Input, audio, messages and drawing are supplied by the host through the
//! traits in [`game::interfaces`].
//!
//! # Features
//!
//! - `parallel_collision` - Run the broad-phase contact search on rayon for
//!   large worlds (enabled by default)

pub mod config;
pub mod game;
pub mod host;
pub mod util;

pub use game::game_loop::{Game, Host};
