pub mod bounds;
pub mod constants;
pub mod entity;
pub mod game_loop;
pub mod interfaces;
pub mod scheduler;
pub mod session;
pub mod setup;
pub mod state;
pub mod systems;

#[cfg(test)]
pub(crate) mod testing;
