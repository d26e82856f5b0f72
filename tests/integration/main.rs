//! Integration tests for the harvester
//!
//! These tests use wiremock to create mock HTTP servers and run detail
//! fetching and full harvests against them.

mod fetch_tests;
mod harvest_tests;
