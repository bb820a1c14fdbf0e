#![forbid(unsafe_code)]

pub mod context;
pub mod error;
pub mod routes;
pub mod server;
pub mod views;
pub mod vm;

pub use context::AppContext;
pub use error::WebError;
pub use routes::router;
pub use server::{app, serve};
