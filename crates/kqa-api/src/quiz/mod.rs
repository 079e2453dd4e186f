//! Quiz sessions over HTTP: the session lifecycle, the quiz screen and its
//! illustrations.

pub mod routes;
pub mod service;
pub mod view;

pub use routes::routes;
