// Library entry so integration tests can drive the dispatcher without a Discord connection.
pub mod commands;
pub mod config;
pub mod constants;
pub mod database;
pub mod dispatcher;
pub mod flows;
pub mod handler;
pub mod model;
pub mod notify;
pub mod session;
pub mod util;
pub mod validation;

pub use model::AppState;
