//! HTTP front end: login, product entry, statistics pages.

pub mod app;
pub mod context;
pub mod cookie;
pub mod middleware;
pub mod views;
