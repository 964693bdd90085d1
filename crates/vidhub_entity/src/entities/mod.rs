pub mod prelude;

pub mod danmaku;
