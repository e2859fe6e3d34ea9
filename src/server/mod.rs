//! HTTP/WebSocket server for the fleet service.

mod broadcast;
mod config;
mod error;
pub mod handlers;
mod http;
pub mod metrics;
mod request;
mod response;
mod ws;

pub use broadcast::{ReportBroadcaster, SubscriberId};
pub use config::{CliArgs, FleetServerConfig};
pub use http::{FleetServer, router};
pub use request::{ReportMessage, UpsertRequest};
