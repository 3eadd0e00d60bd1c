pub mod authentication;
pub mod configuration;
pub mod domain;
pub mod getresponse;
pub mod hooks;
pub mod routes;
pub mod rpc_client;
pub mod session_state;
pub mod startup;
pub mod store;
pub mod telemetry;
pub mod utils;
