pub mod client_repository;
pub mod invoice_repository;
pub mod order_repository;
pub mod part_repository;
pub mod user_repository;
pub mod vehicle_repository;
