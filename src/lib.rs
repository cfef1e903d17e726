pub mod config;
pub mod engine;
pub mod geo;
pub mod geolocation;
pub mod locations;
pub mod rng;
pub mod state;
pub mod view;
pub mod web;

pub use config::Config;
pub use engine::{Engine, EngineBuilder, EngineSettings};
pub use geo::{haversine_distance, Coordinate};
pub use geolocation::{fetch_current_location, GeolocationError, GeolocationProvider};
pub use locations::{generate_locations, sort_by_proximity, Location};
pub use state::{tag_enabled, AppState, Transition};
