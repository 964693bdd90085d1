pub use super::danmaku::Entity as Danmaku;
