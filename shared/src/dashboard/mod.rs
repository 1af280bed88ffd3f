//! Admin dashboard live protocol

pub mod ws;

pub use ws::{DashboardCommand, DashboardEvent, DashboardMessage, UpdateAction};
