//! Fleet - a tracking service for small fleets of mobile units.
//!
//! Fleet ingests periodic position/status reports for units (vehicles,
//! carts), stores them in a small append-only time-series store keyed by
//! unit identity, and serves recent-history queries for visualization.
//! Every accepted write is also mirrored, best-effort, to all connected
//! WebSocket subscribers.
//!
//! # Architecture
//!
//! - [`store`]: append-only, tag-indexed point storage with tag-equality
//!   and time-range queries, behind the [`SeriesStore`] trait (in-memory
//!   and JSON-lines file backends).
//! - [`UnitRepository`]: translates [`UnitReport`]s to and from store
//!   points and implements the composite recent-history queries.
//! - [`server`]: axum HTTP API plus the `/ws` live-update channel.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use fleet::{Config, StorageConfig, UnitReport, UnitRepository};
//! use fleet::clock::SystemClock;
//! use fleet::store::create_store;
//!
//! let clock = Arc::new(SystemClock);
//! let store = create_store(&StorageConfig::InMemory, clock.clone()).await?;
//! let repo = UnitRepository::new(store, clock);
//!
//! let report = UnitReport {
//!     latitude: 45.75,
//!     longitude: 3.03,
//!     status: 1,
//!     battery: 80.0,
//!     at_home: 0,
//! };
//! repo.insert("car_1", &report).await?;
//!
//! let recent = repo.get_recent("car_1", 10).await?;
//! assert_eq!(recent[0], report);
//! ```

pub mod clock;
mod config;
mod error;
mod model;
mod repository;
pub mod server;
pub mod store;

pub use config::{Config, FileStorageConfig, StorageConfig};
pub use error::{Error, Result};
pub use model::UnitReport;
pub use repository::UnitRepository;
pub use store::{create_store, SeriesStore};
