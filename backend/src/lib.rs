//! # Bet Service
//!
//! REST service for bet records (player, game, stake amount) stored in a
//! single relational table. Responses are HAL resources carrying `self`,
//! `update` and `delete` links.
//!
//! ## Architecture
//!
//! - [`api`]: Domain types (`Bet`, `BetId`, `BetPayload`)
//! - [`validation`]: Request body and path validation
//! - [`db`]: Repository pattern, Postgres and in-memory backends, configuration
//! - [`http`]: Axum-based HTTP server and request handlers

pub mod api;

pub mod db;

pub mod validation;

#[cfg(feature = "http-server")]
pub mod http;
