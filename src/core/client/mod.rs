// Fleet backend clients
pub mod interval_client;
