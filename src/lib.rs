// Garden Calendar Library
// Layout and drag interaction core for the garden month calendar

pub mod grid;
pub mod interaction;
pub mod layout;
pub mod models;
pub mod render;
pub mod services;
