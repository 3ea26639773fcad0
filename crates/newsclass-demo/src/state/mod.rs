pub mod app_state;
pub mod logo;

pub use app_state::*;
pub use logo::*;
