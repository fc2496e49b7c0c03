//! dsviz: data structure workbench, step-animated sorting and an AI tutor
//!
//! Layers, innermost first: `domain` (pure structures, catalog, sort engine),
//! `application` (services over I/O traits), `infrastructure` (stores, chat
//! client, DI), `cli`.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
