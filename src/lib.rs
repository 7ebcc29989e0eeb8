#![allow(async_fn_in_trait)]

pub mod cli;
pub mod config;
pub mod entities;
pub mod error;
pub mod session;
pub mod storage;
pub mod tags;
pub mod utils;
pub mod visibility;
