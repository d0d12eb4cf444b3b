//! Rules engine for the Guerra de Quintal backyard tower-defense dice game: combat
//! resolution, the turn engine, reference catalogs, Monte Carlo layout evaluation, and a
//! thin HTTP boundary.

pub mod cli;
pub mod combat;
pub mod config;
pub mod data;
pub mod game;
pub mod optimizer;
pub mod parallel;
pub mod server;
