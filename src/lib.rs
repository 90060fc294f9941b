//! hexpane - Hex/ASCII dump view and byte editor for raw HTTP messages
//!
//! This library provides the conversion pipeline shared by hexpane (TUI viewer)
//! and hxd (CLI tool): raw HTTP text -> bytes -> dump rows, and edited rows ->
//! bytes -> raw text on commit.

pub mod app;
pub mod buffer;
pub mod codec;
pub mod config;
pub mod encoding;
pub mod host;
pub mod http;
pub mod session;
pub mod ui;
