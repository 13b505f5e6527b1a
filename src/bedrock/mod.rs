//! Bedrock Dedicated Server archive discovery and local caching
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────┐     ┌─────────────────┐     ┌─────────────┐
//! │ DownloadCache │────▶│ VersionResolver │────▶│ HttpClient  │
//! │ (local file)  │     │ (page scrape)   │     │ (GET)       │
//! └───────────────┘     └─────────────────┘     └─────────────┘
//!        │
//!        ▼
//! ┌───────────────┐
//! │     local     │
//! │ (versions on  │
//! │  disk, sort)  │
//! └───────────────┘
//! ```
//!
//! # Modules
//!
//! - [`resolver`]: Scrapes the download page for the archive URL and version
//! - [`download`]: Downloads the latest archive into `{root}/downloads` when missing
//! - [`local`]: Lists archive versions already stored locally
//! - [`version`]: Numeric ordering of dotted version strings
//! - [`http`]: HTTP client trait and its reqwest implementation
//! - [`error`]: Error types for fetching, resolving and downloading

pub mod download;
pub mod error;
pub mod http;
pub mod local;
pub mod resolver;
pub mod version;
