pub mod menu;
pub mod tables;
