/// Everything GetResponse needs to know about a new contact, besides the list
/// it goes to. The email is passed through as given: the registration form
/// has already had its say on validity.
#[derive(Debug, Clone)]
pub struct NewContact {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Address of the client that submitted the registration form
    pub source_ip: String,
}
