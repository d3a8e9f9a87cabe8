use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use snafu::Snafu;

use crate::message::ASSISTANT_NAME;

/// Audience a chat page is framed for. Only copy differs between personas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Persona {
    Lawyer,
    #[default]
    User,
}

impl Persona {
    pub const ALL: [Persona; 2] = [Persona::Lawyer, Persona::User];

    pub fn title(self) -> String {
        match self {
            Self::Lawyer => format!("{ASSISTANT_NAME} for Lawyers"),
            Self::User => format!("{ASSISTANT_NAME} for Users"),
        }
    }

    pub fn nav_label(self) -> &'static str {
        match self {
            Self::Lawyer => "Lawyers",
            Self::User => "Users",
        }
    }

    pub fn route(self) -> &'static str {
        match self {
            Self::Lawyer => "/lawyers",
            Self::User => "/users",
        }
    }

    pub fn placeholder(self) -> String {
        let prompt = match self {
            Self::Lawyer => "a professional legal question",
            Self::User => "about your legal rights",
        };
        format!("Ask {ASSISTANT_NAME} {prompt}...")
    }

    pub fn tag(self) -> &'static str {
        match self {
            Self::Lawyer => "lawyer",
            Self::User => "user",
        }
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Snafu)]
#[snafu(display("unknown persona '{raw}', expected lawyer or user"))]
pub struct ParsePersonaError {
    raw: String,
}

impl FromStr for Persona {
    type Err = ParsePersonaError;

    /// Accepts tags, plurals and route paths: `lawyer`, `Lawyers`, `/users`.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().trim_start_matches('/').to_ascii_lowercase();
        match normalized.as_str() {
            "lawyer" | "lawyers" => Ok(Self::Lawyer),
            "user" | "users" => Ok(Self::User),
            _ => ParsePersonaSnafu {
                raw: raw.to_string(),
            }
            .fail(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn titles_and_placeholders_follow_persona() {
        assert_eq!(Persona::Lawyer.title(), "Lawwise for Lawyers");
        assert_eq!(Persona::User.title(), "Lawwise for Users");
        assert_eq!(
            Persona::Lawyer.placeholder(),
            "Ask Lawwise a professional legal question..."
        );
        assert_eq!(
            Persona::User.placeholder(),
            "Ask Lawwise about your legal rights..."
        );
    }

    #[test]
    fn parses_tags_plurals_and_routes() {
        assert_eq!("lawyer".parse::<Persona>().unwrap(), Persona::Lawyer);
        assert_eq!("Lawyers".parse::<Persona>().unwrap(), Persona::Lawyer);
        assert_eq!("/users".parse::<Persona>().unwrap(), Persona::User);
        assert!("judge".parse::<Persona>().is_err());
    }

    #[test]
    fn routes_round_trip_through_parse() {
        for persona in Persona::ALL {
            assert_eq!(persona.route().parse::<Persona>().unwrap(), persona);
        }
    }
}
