pub mod aggregate;
pub mod chart;
pub mod config;
pub mod context;
pub mod data;
pub mod filter;
pub mod handler;
pub mod layout;
pub mod server;

#[cfg(test)]
mod fixtures;

pub use chart::{ChartPair, FigurePair};
pub use config::{Args, DashboardSettings};
pub use context::DashboardContext;
pub use data::NameTable;
pub use filter::FilterParams;
pub use handler::update_charts;
pub use layout::DashboardLayout;
