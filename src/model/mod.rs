pub mod account;
pub mod course;
pub mod database;
pub mod player;
pub mod round;
pub mod schema;
pub mod score;
pub mod types;

pub use database::*;
pub use player::{PlayerFormErrors, validate_new_player};
pub use score::*;
pub use types::*;
