//! BuilderHub: a headless wallet dashboard for the WinSZN, Quorum and
//! ProofOfBuild contracts on Sepolia.
//!
//! The host supplies a [`client::wallet::Wallet`] implementation and renders
//! the view-models in [`screens`]; [`app::BuilderHub`] wires them together.

pub mod app;
pub mod basic_elements;
pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod helpers;
pub mod links;
pub mod logger;
pub mod reader;
pub mod registry;
pub mod screens;
pub mod session;
pub mod submitter;
pub mod types;
pub mod validation;

#[cfg(test)]
mod testing;
