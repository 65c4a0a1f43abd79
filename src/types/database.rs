use crate::error::QueryDeskError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Database engines QueryDesk can connect to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DatabaseAdapter {
    Postgres,
    Mysql,
}

impl DatabaseAdapter {
    pub const ALL: [DatabaseAdapter; 2] = [DatabaseAdapter::Postgres, DatabaseAdapter::Mysql];

    pub fn as_str(&self) -> &'static str {
        match self {
            DatabaseAdapter::Postgres => "POSTGRES",
            DatabaseAdapter::Mysql => "MYSQL",
        }
    }
}

impl RemoteDatabase {
    /// Canonical spelling when the adapter is known, the raw value otherwise.
    pub fn adapter_name(&self) -> String {
        self.adapter
            .parse::<DatabaseAdapter>()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| self.adapter.clone())
    }
}

impl fmt::Display for DatabaseAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts the two enum spellings in any ASCII case, nothing else.
impl FromStr for DatabaseAdapter {
    type Err = QueryDeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DatabaseAdapter::ALL
            .into_iter()
            .find(|adapter| adapter.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| QueryDeskError::InvalidAdapter(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDatabaseInput {
    pub name: String,
    pub adapter: DatabaseAdapter,
    pub hostname: String,
    pub database: String,
    pub ssl: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cacertfile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyfile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certfile: Option<String>,
    pub restrict_access: bool,
}

/// Certificate material uses `new*` names: a value rotates it, absence keeps it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDatabaseInput {
    pub name: String,
    pub adapter: DatabaseAdapter,
    pub hostname: String,
    pub database: String,
    pub ssl: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_cacertfile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_keyfile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_certfile: Option<String>,
    pub restrict_access: bool,
}

/// Database node as QueryDesk returns it. Certificates are never sent back.
///
/// `adapter` stays a plain string so an engine this crate does not know yet
/// still reads back instead of failing the whole response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RemoteDatabase {
    pub id: String,
    pub name: String,
    pub adapter: String,
    pub hostname: String,
    pub database: String,
    pub ssl: bool,
    pub restrict_access: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn adapter_accepts_known_spellings_in_any_case() {
        for raw in ["POSTGRES", "postgres", "Postgres"] {
            assert_eq!(raw.parse::<DatabaseAdapter>().ok(), Some(DatabaseAdapter::Postgres));
        }
        assert_eq!("mysql".parse::<DatabaseAdapter>().ok(), Some(DatabaseAdapter::Mysql));
    }

    #[test]
    fn adapter_rejects_everything_else() {
        for raw in ["", "postgresql", "MARIADB", " mysql", "sqlite"] {
            let err = raw.parse::<DatabaseAdapter>().expect_err(raw);
            assert!(matches!(err, QueryDeskError::InvalidAdapter(ref s) if s == raw));
        }
    }

    #[test]
    fn unknown_remote_adapter_still_deserializes() {
        let node: RemoteDatabase = serde_json::from_value(json!({
            "id": "db_1",
            "name": "warehouse",
            "adapter": "MARIADB",
            "restrictAccess": true
        }))
        .expect("deserialize");
        assert_eq!(node.adapter, "MARIADB");
        assert_eq!(node.adapter_name(), "MARIADB");

        let node = RemoteDatabase {
            adapter: "postgres".into(),
            ..RemoteDatabase::default()
        };
        assert_eq!(node.adapter_name(), "POSTGRES");
    }

    #[test]
    fn update_input_omits_unset_certificates() {
        let input = UpdateDatabaseInput {
            name: "two".into(),
            adapter: DatabaseAdapter::Postgres,
            hostname: "localhost".into(),
            database: "mydb".into(),
            ssl: false,
            new_cacertfile: None,
            new_keyfile: Some("KEY".into()),
            new_certfile: None,
            restrict_access: true,
        };
        let value = serde_json::to_value(&input).expect("serialize");
        assert_eq!(value["adapter"], json!("POSTGRES"));
        assert_eq!(value["restrictAccess"], json!(true));
        assert_eq!(value["newKeyfile"], json!("KEY"));
        assert!(value.get("newCacertfile").is_none());
        assert!(value.get("newCertfile").is_none());
    }
}
