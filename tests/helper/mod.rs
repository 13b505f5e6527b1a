//! Shared fixtures for integration tests

pub mod download_site;
