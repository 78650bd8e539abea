//! Identifiers for work-log entities.
//!
//! Both identifiers are assigned by the backend and treated as opaque. The
//! wire format may carry them as JSON strings or numbers; whichever form the
//! backend used is preserved when the identifier is sent back.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
enum Repr {
    Number(i64),
    Text(String),
}

impl Repr {
    fn parse(s: &str) -> Self {
        let s = s.trim();
        match s.parse::<i64>() {
            Ok(n) => Repr::Number(n),
            Err(_) => Repr::Text(s.to_string()),
        }
    }
}

impl std::fmt::Display for Repr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Repr::Number(n) => n.fmt(f),
            Repr::Text(s) => s.fmt(f),
        }
    }
}

/// Unique identifier for a Task
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(Repr);

impl TaskId {
    /// Wrap a textual identifier. Purely numeric text is kept numeric.
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Repr::parse(id.as_ref()))
    }
}

impl From<i64> for TaskId {
    fn from(n: i64) -> Self {
        Self(Repr::Number(n))
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for TaskId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

/// Unique identifier for a User
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Repr);

impl UserId {
    /// Wrap a textual identifier. Purely numeric text is kept numeric.
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Repr::parse(id.as_ref()))
    }
}

impl From<i64> for UserId {
    fn from(n: i64) -> Self {
        Self(Repr::Number(n))
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
