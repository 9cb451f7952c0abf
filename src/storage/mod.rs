pub mod framer_client;
