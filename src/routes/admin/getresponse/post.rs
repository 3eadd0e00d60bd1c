use actix_web::web;
use actix_web::HttpResponse;
use actix_web_flash_messages::FlashMessage;
use serde::Deserialize;

use crate::domain::IntegrationSettings;
use crate::store::SettingsStore;
use crate::utils::error_500;
use crate::utils::redirect;

/// Every field may be missing; a missing field is saved as empty
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct SettingsFormData {
    pub api_key: String,
    pub saved_list: Option<String>,
    pub signup_label: String,
}

impl From<SettingsFormData> for IntegrationSettings {
    fn from(form: SettingsFormData) -> Self {
        IntegrationSettings {
            api_key: form.api_key,
            saved_list: form.saved_list,
            signup_label: form.signup_label,
        }
    }
}

/// `POST /admin/getresponse`
///
/// Values are stored exactly as submitted, including the `no list`
/// placeholder; blank values are interpreted when read back.
#[tracing::instrument(name = "Saving GetResponse settings", skip_all)]
pub async fn save_getresponse_settings(
    form: web::Form<SettingsFormData>,
    settings: web::Data<dyn SettingsStore>,
) -> Result<HttpResponse, actix_web::Error> {
    settings
        .save(form.into_inner().into())
        .await
        .map_err(error_500)?;

    FlashMessage::info("Options saved").send();
    Ok(redirect("/admin/getresponse"))
}
