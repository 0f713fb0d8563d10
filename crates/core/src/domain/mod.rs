pub mod conversation;
pub mod critique;
pub mod product;
