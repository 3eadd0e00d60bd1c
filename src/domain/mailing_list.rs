use serde_json::Value;

/// A GetResponse campaign, i.e. a list contacts can be added to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailingList {
    pub id: String,
    pub name: String,
}

/// Campaigns in the order GetResponse returned them. Never cached: the
/// settings page asks for a fresh copy on every render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MailingLists(Vec<MailingList>);

impl MailingLists {
    /// Parse the `result` of a `get_campaigns` call.
    ///
    /// GetResponse answers with an object keyed by campaign id:
    ///
    /// ```json
    /// { "pqRt": { "name": "newsletter", "from_email": "...", ... }, ... }
    /// ```
    ///
    /// An array of records is accepted too; each record's `id` is used if it
    /// is a string, its position otherwise. Anything else (or a record
    /// without a string `name`) is malformed.
    pub fn from_campaigns(result: &Value) -> Result<Self, String> {
        let entries: Vec<(String, &Value)> = match result {
            Value::Object(map) => map.iter().map(|(id, record)| (id.clone(), record)).collect(),
            Value::Array(records) => records
                .iter()
                .enumerate()
                .map(|(i, record)| {
                    let id = record
                        .get("id")
                        .and_then(Value::as_str)
                        .map(str::to_string)
                        .unwrap_or_else(|| i.to_string());
                    (id, record)
                })
                .collect(),
            other => return Err(format!("expected a collection of campaigns, got {other}")),
        };

        entries
            .into_iter()
            .map(|(id, record)| {
                let name = record
                    .get("name")
                    .and_then(Value::as_str)
                    .ok_or_else(|| format!("campaign {id:?} has no name"))?;
                Ok(MailingList {
                    id,
                    name: name.to_string(),
                })
            })
            .collect::<Result<Vec<_>, String>>()
            .map(Self)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MailingList> { self.0.iter() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

impl From<Vec<MailingList>> for MailingLists {
    fn from(lists: Vec<MailingList>) -> Self { Self(lists) }
}
