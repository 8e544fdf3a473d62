//! Collects the price history of Steam Community Market items.
//!
//! A paginated search enumerates the items matching a query, then the price
//! history of each item is loaded and written to its own CSV file. Every
//! request goes through one shared [`steam::Throttle`] so the market never
//! sees two requests closer together than the configured interval.

pub mod collector;
pub mod config;
mod error;
pub mod steam;
pub mod storage;

pub use collector::{collect, RunSummary};
pub use config::{Args, Config};
pub use error::{Error, Result};
