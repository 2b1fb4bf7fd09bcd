//! HTTP surface for the influence-graph engine. One actix-web server with
//! permissive CORS exposing the filtered graph views, career analytics,
//! and the throttled backend proxies.

pub mod rest;

pub use rest::RestApi;
