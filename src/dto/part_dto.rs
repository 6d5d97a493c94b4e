use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePartRequest {
    #[validate(length(min = 1, max = 50))]
    pub codigo: String,

    #[validate(length(min = 2, max = 100))]
    pub nombre: String,

    pub descripcion: Option<String>,

    #[validate(length(max = 50))]
    pub marca: Option<String>,

    pub precio_unitario: Decimal,

    #[validate(range(min = 0))]
    pub stock_actual: Option<i32>,

    #[validate(range(min = 0))]
    pub stock_minimo: Option<i32>,

    #[validate(length(max = 20))]
    pub unidad_medida: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePartRequest {
    #[validate(length(min = 1, max = 50))]
    pub codigo: String,

    #[validate(length(min = 2, max = 100))]
    pub nombre: String,

    pub descripcion: Option<String>,

    #[validate(length(max = 50))]
    pub marca: Option<String>,

    pub precio_unitario: Decimal,

    #[validate(range(min = 0))]
    pub stock_actual: i32,

    #[validate(range(min = 0))]
    pub stock_minimo: i32,

    #[validate(length(max = 20))]
    pub unidad_medida: String,
}

/// Ajuste administrativo directo del stock (fuera del ledger de órdenes)
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateStockRequest {
    #[validate(range(min = 0, message = "El stock no puede ser negativo"))]
    pub stock_actual: i32,
}
