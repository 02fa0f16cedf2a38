pub use board::*;
pub use errors::*;
pub use selector::*;
pub use status::*;
pub use turn::*;
pub use visualization::*;

#[cfg(test)]
mod arbitrary;
mod board;
mod errors;
mod selector;
mod status;
mod turn;
mod visualization;
