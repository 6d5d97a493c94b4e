use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateInvoiceRequest {
    pub id_orden: i32,

    #[validate(length(max = 50))]
    pub metodo_pago: Option<String>,

    pub descuento: Option<Decimal>,

    pub observaciones: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateInvoiceStatusRequest {
    pub estado: String,
}
