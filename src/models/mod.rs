pub mod client;
pub mod invoice;
pub mod order;
pub mod part;
pub mod user;
pub mod vehicle;
