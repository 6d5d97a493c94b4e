use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateVehicleRequest {
    #[validate(length(min = 3, max = 20))]
    pub placa: String,

    #[validate(length(min = 2, max = 50))]
    pub marca: String,

    #[validate(length(min = 1, max = 50))]
    pub modelo: String,

    #[validate(range(min = 1900, max = 2100))]
    pub anio: i32,

    #[validate(length(max = 30))]
    pub color: Option<String>,

    #[validate(length(max = 30))]
    pub tipo_vehiculo: Option<String>,

    #[validate(range(min = 0))]
    pub kilometraje: Option<i32>,

    pub id_cliente: i32,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateVehicleRequest {
    #[validate(length(min = 3, max = 20))]
    pub placa: String,

    #[validate(length(min = 2, max = 50))]
    pub marca: String,

    #[validate(length(min = 1, max = 50))]
    pub modelo: String,

    #[validate(range(min = 1900, max = 2100))]
    pub anio: i32,

    #[validate(length(max = 30))]
    pub color: Option<String>,

    #[validate(length(max = 30))]
    pub tipo_vehiculo: Option<String>,

    #[validate(range(min = 0))]
    pub kilometraje: Option<i32>,
}
