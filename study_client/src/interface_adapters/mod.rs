pub mod clients;
pub mod navigator;
pub mod token_store;
