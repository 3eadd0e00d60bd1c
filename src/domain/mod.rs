mod api_key;
mod integration_settings;
mod mailing_list;
mod member_email;
mod name_part;
mod new_contact;
// allow external `use` statements to skip `member_email` etc
pub use api_key::ApiKey;
pub use integration_settings::IntegrationSettings;
pub use mailing_list::MailingList;
pub use mailing_list::MailingLists;
pub use member_email::MemberEmail;
pub use name_part::compose_contact_name;
pub use name_part::NamePart;
pub use new_contact::NewContact;
