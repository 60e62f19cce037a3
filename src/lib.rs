pub mod app;
pub mod audit;
pub mod config;
pub mod domain;
pub mod error;
pub mod fetcher;
pub mod http;
pub mod integration;
pub mod manifest;
pub mod materializer;
pub mod output;
pub mod planner;
