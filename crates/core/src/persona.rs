//! The fixed set of simulated roles an idea is evaluated against.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A persona-scoped stage name.
///
/// Stored as lowercase text in `stages.persona` and used verbatim in URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Persona {
    Customer,
    Designer,
    Marketer,
    Vc,
}

impl Persona {
    /// Every persona, in the order a user normally works through them.
    pub const ALL: [Persona; 4] = [
        Persona::Customer,
        Persona::Designer,
        Persona::Marketer,
        Persona::Vc,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Persona::Customer => "customer",
            Persona::Designer => "designer",
            Persona::Marketer => "marketer",
            Persona::Vc => "vc",
        }
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Persona {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Persona::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid stage name '{s}'. Valid stages: customer, designer, marketer, vc"
                ))
            })
    }
}
