pub mod commands;
mod controller;
mod phash;

pub use controller::{DashboardSummary, PhotoController};
