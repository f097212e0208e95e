use serde::Deserialize;
use validator::Validate;

// Alta de conductor por un admin
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDriverRequest {
    #[validate(length(min = 2, max = 255))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    #[validate(length(min = 6, max = 50))]
    pub phone: Option<String>,
    #[validate(length(min = 4, max = 100))]
    pub license_number: String,
}
