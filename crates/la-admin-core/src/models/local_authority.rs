//! Local authority models.

use serde::{Deserialize, Deserializer, Serialize};

/// A municipal body managed from the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalAuthority {
    #[serde(alias = "_id", deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub no_telephone: String,
    #[serde(default)]
    pub area: String,
    #[serde(default)]
    pub state: String,
    /// Collected income not yet paid out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub income: Option<f64>,
}

/// Body of the create and update endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalAuthorityPayload {
    pub name: String,
    pub nickname: String,
    pub email: String,
    pub no_telephone: String,
    pub area: String,
    pub state: String,
}

impl From<&LocalAuthority> for LocalAuthorityPayload {
    fn from(authority: &LocalAuthority) -> Self {
        Self {
            name: authority.name.clone(),
            nickname: authority.nickname.clone(),
            email: authority.email.clone(),
            no_telephone: authority.no_telephone.clone(),
            area: authority.area.clone(),
            state: authority.state.clone(),
        }
    }
}

/// Accepts ids sent either as strings or as numbers.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}
