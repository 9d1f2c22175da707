// 模組定義
pub mod config;
pub mod data_provider;
pub mod domain_types;
pub mod forecast;
pub mod monitor;
pub mod pipeline;
pub mod report;
pub mod utils;
