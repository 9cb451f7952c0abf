pub mod api_server;
pub mod cors;
pub mod verifier;
