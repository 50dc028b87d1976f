//! # ScanView Core
//!
//! Library behind the MCP ScanView dashboard: the report data model received
//! from the external MCP security scanner service, the HTTP client that talks
//! to it, the dashboard controller state, and the server-side view rendering.
//!
//! The scanning engine itself is not part of this crate — ScanView is a pure
//! consumer of the service's scan and attack-demo endpoints.

pub mod client;
pub mod config;
pub mod error;
pub mod report;
pub mod state;
pub mod views;

pub use client::ScannerClient;
pub use error::{ScanViewError, ScanViewResult};
pub use report::{AttackReport, AttackStep, RiskLevel, ScanFinding, ScanReport, SeverityCounts, Vulnerability};
pub use state::{DashboardState, RequestKind, RequestTicket, Tab};
