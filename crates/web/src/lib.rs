//! Customer records web application.
//!
//! Lists, searches, creates, and edits customer entries stored in
//! `PostgreSQL`, rendering server-side HTML. This crate provides the
//! application as a library so the router can be tested against an
//! in-memory store and reused by the integration tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
