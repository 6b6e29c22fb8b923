//! Browser UI: askama templates served through htmx-aware handlers

pub mod handlers;
