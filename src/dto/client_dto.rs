use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateClientRequest {
    #[validate(length(min = 2, max = 100))]
    pub nombre: String,

    #[validate(length(min = 7, max = 20))]
    pub telefono: String,

    #[validate(email)]
    pub correo: String,

    #[validate(length(max = 200))]
    pub direccion: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateClientRequest {
    #[validate(length(min = 2, max = 100))]
    pub nombre: String,

    #[validate(length(min = 7, max = 20))]
    pub telefono: String,

    #[validate(email)]
    pub correo: String,

    #[validate(length(max = 200))]
    pub direccion: Option<String>,
}
