//! Favorite cocktails service
//!
//! Records which cocktails each user marks as favorite and derives three views
//! over that record set: a global popularity ranking, a per-cocktail trend
//! bucketed by day or month, and per-user recommendations from one-hop
//! collaborative filtering.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
