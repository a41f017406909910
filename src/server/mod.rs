//! HTTP server
//!
//! Actix-web surface exposing the import pipeline and script CRUD.

pub mod routes;
mod server;
mod state;

pub use server::{HttpServer, run_server};
pub use state::AppState;
