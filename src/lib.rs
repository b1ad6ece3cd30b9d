#[macro_use]
pub mod util;

pub mod announcements;
pub mod api;
pub mod cli;
pub mod config;
pub mod models;
pub mod navigation;
pub mod reservation;
pub mod schedule;
pub mod session;
pub mod storage;
pub mod types;
pub mod views;
