pub mod rpc_client;
pub mod wallet;
