pub mod auth_dto;
pub mod client_dto;
pub mod invoice_dto;
pub mod order_dto;
pub mod part_dto;
pub mod user_dto;
pub mod vehicle_dto;
