pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod services;
pub mod state;

pub use config::ApiConfig;
pub use routes::create_router;
pub use state::AppState;
