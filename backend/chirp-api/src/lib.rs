//! Chirp API: social-networking backend
//!
//! HTTP handlers validate and enqueue; queue workers perform the deferred
//! writes, notification fan-out and email delivery. PostgreSQL persists,
//! Redis caches hot profiles and brokers the job streams, and websocket
//! rooms push realtime events to connected clients.

pub mod app_state;
pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod openapi;
pub mod queues;
pub mod routes;
pub mod security;
pub mod services;
pub mod websocket;
pub mod workers;
