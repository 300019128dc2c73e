pub mod bid;
pub mod response;
pub mod server;
pub mod sync;
pub mod vendor;
