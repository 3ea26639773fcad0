pub mod cli;
pub mod server;
pub mod state;

pub use cli::*;
pub use server::*;
pub use state::*;
