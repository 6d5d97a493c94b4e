pub mod auth_routes;
pub mod client_routes;
pub mod invoice_routes;
pub mod order_routes;
pub mod part_routes;
pub mod stats_routes;
pub mod user_routes;
pub mod vehicle_routes;
