pub mod list;
pub mod migrate;
