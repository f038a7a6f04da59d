pub mod discovery;
pub mod files;
pub mod layout;
pub mod migration;
