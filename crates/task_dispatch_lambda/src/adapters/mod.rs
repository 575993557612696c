pub mod network;
pub mod orchestrator;
