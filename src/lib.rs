#![allow(async_fn_in_trait)]
pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod policy;
pub mod record;
pub mod selector;
