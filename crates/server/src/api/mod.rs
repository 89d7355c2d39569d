pub mod admin;
pub mod catalog;
pub mod cors;
pub mod handlers;
pub mod images;
pub mod routes;
pub mod ws;

pub use routes::create_router;
