pub mod auth_controller;
pub mod client_controller;
pub mod invoice_controller;
pub mod order_controller;
pub mod part_controller;
pub mod user_controller;
pub mod vehicle_controller;
