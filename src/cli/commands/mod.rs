pub mod chat;
pub mod config;
pub mod meal;
pub mod plan;
pub mod profile;
pub mod scan;
pub mod shell;
