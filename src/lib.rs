#![forbid(unsafe_code)]

pub mod blocks;
pub mod cli;
pub mod cms;
pub mod config;
pub mod content;
pub mod fetch;
pub mod i18n;
pub mod locale;
pub mod logging;
pub mod render;
pub mod search;
pub mod server;
pub mod site;
pub mod view;
