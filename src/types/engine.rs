use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error as ThisError;

/// Relational engine a cataloged database runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    Postgresql,
    Mysql,
}

impl Engine {
    pub const ALL: [Engine; 2] = [Engine::Postgresql, Engine::Mysql];

    /// Canonical lowercase token, used on the wire and in storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Engine::Postgresql => "postgresql",
            Engine::Mysql => "mysql",
        }
    }

    fn variant_name(&self) -> &'static str {
        match self {
            Engine::Postgresql => "POSTGRESQL",
            Engine::Mysql => "MYSQL",
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
#[error("Invalid value for engine: {0}")]
pub struct UnknownEngine(pub String);

impl FromStr for Engine {
    type Err = UnknownEngine;

    /// Matches the upper-cased token against the variant names, so
    /// `mysql`, `MySQL` and `MYSQL` all resolve to [`Engine::Mysql`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.to_uppercase();
        Engine::ALL
            .into_iter()
            .find(|engine| engine.variant_name() == wanted)
            .ok_or_else(|| UnknownEngine(s.to_string()))
    }
}
