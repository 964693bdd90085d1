mod config_reloader;
mod http_server;

pub use config_reloader::config_reloader;
pub use http_server::http_server;
