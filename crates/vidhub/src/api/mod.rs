mod auth;
mod error;
mod helper;
mod request;
mod response;
mod routes;
mod wrapper;

pub use routes::router;
