use wasm_bindgen::prelude::*;
use orrery_engine::*;

pub mod bodies;
pub mod config;
pub mod controls;
pub mod error;
pub mod game;
pub mod picking;
pub mod simulation;
pub mod state;

pub use error::OrreryError;
pub use game::SolarSystem;

orrery_web::export_game!(SolarSystem, "solar-system");
