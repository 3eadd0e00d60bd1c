mod get;
mod post;

pub use get::registration_form;
pub use post::register;
pub use post::RegistrationError;
