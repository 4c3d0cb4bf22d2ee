pub mod args;
pub mod cache;
pub mod capture;
pub mod error;
pub mod model;
pub mod paths;
pub mod session;
pub mod storage;
pub mod telemetry;
pub mod controller {
    pub mod auth;
    pub mod capture;
    pub mod catalog_prefill;
    pub mod player;
    pub mod response;
    pub mod round;
    pub mod stats;
}
pub mod view {
    pub mod layout;
    pub mod login;
    pub mod players;
    pub mod round_form;
    pub mod rounds;
    pub mod score;
}

pub mod mvu {
    pub mod round_form;
    pub mod round_form_effects;
    pub mod runtime;
}

pub const HTMX_PATH: &str = "https://cdn.jsdelivr.net/npm/htmx.org@2.0.8/dist/htmx.min.js";
pub const APP_TITLE: &str = "Golf Rounds";

pub use storage::{SqlStorage, Storage, StorageError};
