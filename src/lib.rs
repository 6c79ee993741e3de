pub mod analysis;
pub mod backend;
pub mod config;
pub mod entitlement;
pub mod history;
pub mod render;
pub mod request;
pub mod simulation;
pub mod workflow;
