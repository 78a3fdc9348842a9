pub mod api;
pub mod app_error;
pub mod app_state;
pub mod bootstrap;
pub mod cart;
pub mod config;
pub mod kitchen;
pub mod menu;
pub mod middleware;
pub mod models;
pub mod normalize;
pub mod routes;
pub mod session;
pub mod tables;
