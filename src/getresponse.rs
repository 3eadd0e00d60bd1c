use std::sync::Arc;

use serde::Serialize;
use serde_json::json;
use serde_json::Value;

use crate::domain::compose_contact_name;
use crate::domain::ApiKey;
use crate::domain::IntegrationSettings;
use crate::domain::MailingLists;
use crate::domain::NewContact;
use crate::routes::error_chain_fmt;
use crate::rpc_client::RpcClient;
use crate::rpc_client::RpcError;

const GET_CAMPAIGNS: &str = "get_campaigns";
const ADD_CONTACT: &str = "add_contact";

#[derive(thiserror::Error)]
pub enum FetchListsError {
    #[error("No API key has been configured")]
    MissingApiKey,
    #[error("Campaign listing failed")]
    Rpc(#[from] RpcError),
    #[error("Malformed campaign listing: {0}")]
    Malformed(String),
}

impl std::fmt::Debug for FetchListsError {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

#[derive(thiserror::Error)]
pub enum SubscribeError {
    #[error("API key or mailing list has not been configured")]
    MissingConfiguration,
    #[error("GetResponse refused the contact")]
    Rejected,
    #[error("Adding contact failed")]
    Rpc(#[from] RpcError),
}

impl std::fmt::Debug for SubscribeError {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

/// Second positional parameter of `add_contact`
#[derive(Serialize)]
struct AddContactParams<'a> {
    campaign: &'a str,
    name: String,
    email: &'a str,
    ip: &'a str,
    /// Position in the autoresponder cycle; 0 means "start right away"
    cycle_day: u32,
}

/// The two GetResponse operations this integration needs, on top of any
/// `RpcClient`.
///
/// Both come in two flavours. `fetch_lists` and `subscribe` never fail: every
/// error collapses to an empty listing or `false`, and is logged. The `try_`
/// variants keep the error for callers that want to tell "no lists" apart
/// from "could not fetch lists".
#[derive(Clone)]
pub struct GetResponse {
    rpc: Arc<dyn RpcClient>,
}

impl GetResponse {
    pub fn new(rpc: Arc<dyn RpcClient>) -> Self { Self { rpc } }

    /// Campaigns available to `api_key`, in GetResponse's order. Empty if the
    /// key is blank (no request is made) or if anything goes wrong.
    pub async fn fetch_lists(
        &self,
        api_key: &str,
    ) -> MailingLists {
        match self.try_fetch_lists(api_key).await {
            Ok(lists) => lists,
            Err(FetchListsError::MissingApiKey) => MailingLists::default(),
            Err(e) => {
                tracing::warn!(
                    error.cause_chain = ?e,
                    error.message = %e,
                    "could not fetch GetResponse campaigns"
                );
                MailingLists::default()
            }
        }
    }

    #[tracing::instrument(name = "Fetching GetResponse campaigns", skip_all)]
    pub async fn try_fetch_lists(
        &self,
        api_key: &str,
    ) -> Result<MailingLists, FetchListsError> {
        let key = ApiKey::parse(api_key).ok_or(FetchListsError::MissingApiKey)?;
        let result = self
            .rpc
            .call(GET_CAMPAIGNS, vec![json!(key.expose())])
            .await?;
        MailingLists::from_campaigns(&result).map_err(FetchListsError::Malformed)
    }

    /// Add `contact` to the list chosen in `settings`. `false` if the
    /// integration isn't configured (no request is made), if GetResponse
    /// answers `false`, or if the call fails.
    pub async fn subscribe(
        &self,
        contact: &NewContact,
        settings: &IntegrationSettings,
    ) -> bool {
        match self.try_subscribe(contact, settings).await {
            Ok(()) => true,
            Err(SubscribeError::MissingConfiguration) => false,
            Err(e) => {
                tracing::warn!(
                    error.cause_chain = ?e,
                    error.message = %e,
                    "could not add contact to GetResponse"
                );
                false
            }
        }
    }

    #[tracing::instrument(
        name = "Adding contact to GetResponse",
        skip_all,
        fields(
            contact_email = %contact.email,
            campaign = tracing::field::Empty,
        )
    )]
    pub async fn try_subscribe(
        &self,
        contact: &NewContact,
        settings: &IntegrationSettings,
    ) -> Result<(), SubscribeError> {
        let (key, campaign) = match (settings.api_key(), settings.saved_list()) {
            (Some(key), Some(campaign)) => (key, campaign),
            _ => return Err(SubscribeError::MissingConfiguration),
        };
        tracing::Span::current().record("campaign", campaign);

        let params = AddContactParams {
            campaign,
            name: compose_contact_name(&contact.first_name, &contact.last_name),
            email: &contact.email,
            ip: &contact.source_ip,
            cycle_day: 0,
        };
        let params = serde_json::to_value(params).map_err(|e| {
            SubscribeError::Rpc(RpcError::Protocol(format!("could not encode params: {e}")))
        })?;

        // only a literal `false` counts as a refusal; the success payload is not inspected
        match self
            .rpc
            .call(ADD_CONTACT, vec![json!(key.expose()), params])
            .await?
        {
            Value::Bool(false) => Err(SubscribeError::Rejected),
            _ => Ok(()),
        }
    }
}
