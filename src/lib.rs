pub mod action;
pub mod browser;
pub mod config;
pub mod engine;
pub mod feed;
pub mod linkedin;
pub mod llm;
