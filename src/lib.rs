//! Medicure - fixes names, languages and track layout of movie and tv show files

pub mod analyzer;
pub mod config;
pub mod error;
pub mod metadata;
pub mod remux;
pub mod scanner;
pub mod tracks;
pub mod treat;
pub mod utils;
