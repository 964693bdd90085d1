use axum::Router;

mod ai;
mod config;
mod danmaku;
mod douban;
mod netdisk;
mod search;
mod youtube;

pub fn router() -> Router {
    Router::new().nest(
        "/api",
        search::router()
            .merge(danmaku::router())
            .merge(douban::router())
            .merge(netdisk::router())
            .merge(youtube::router())
            .merge(ai::router())
            .merge(config::router()),
    )
}
