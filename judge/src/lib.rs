mod config;
mod game;
mod player;
mod recording;
mod simulation;
pub use config::*;
pub use game::*;
pub use player::*;
pub use recording::*;
pub use simulation::*;
