mod get;
mod post;

pub use get::getresponse_settings_form;
pub use post::save_getresponse_settings;
pub use post::SettingsFormData;
