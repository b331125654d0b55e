use std::{collections::BTreeSet, fmt, str::FromStr};

/// Equipment value of exercises which need nothing but the athlete.
pub const BODY_ONLY: &str = "body only";

/// Entry of the exercise catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseDefinition {
    pub name: String,
    pub force: Option<Force>,
    pub level: Level,
    pub mechanic: Option<Mechanic>,
    pub equipment: String,
    pub primary_muscles: Vec<String>,
    pub secondary_muscles: Vec<String>,
    pub instructions: Vec<String>,
    pub category: String,
}

impl ExerciseDefinition {
    #[must_use]
    pub fn is_body_only(&self) -> bool {
        self.equipment == BODY_ONLY
    }

    #[must_use]
    pub fn trains_any(&self, muscles: &BTreeSet<String>) -> bool {
        self.primary_muscles.iter().any(|m| muscles.contains(m))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Force {
    Push,
    Pull,
    Static,
}

impl fmt::Display for Force {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Force::Push => write!(f, "push"),
            Force::Pull => write!(f, "pull"),
            Force::Static => write!(f, "static"),
        }
    }
}

impl FromStr for Force {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "push" => Ok(Force::Push),
            "pull" => Ok(Force::Pull),
            "static" => Ok(Force::Static),
            _ => Err(ParseError::Force(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    #[default]
    Beginner,
    Intermediate,
    Expert,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Level::Beginner => write!(f, "beginner"),
            Level::Intermediate => write!(f, "intermediate"),
            Level::Expert => write!(f, "expert"),
        }
    }
}

impl FromStr for Level {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "beginner" => Ok(Level::Beginner),
            "intermediate" => Ok(Level::Intermediate),
            "expert" => Ok(Level::Expert),
            _ => Err(ParseError::Level(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mechanic {
    Compound,
    Isolation,
}

impl fmt::Display for Mechanic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Mechanic::Compound => write!(f, "compound"),
            Mechanic::Isolation => write!(f, "isolation"),
        }
    }
}

impl FromStr for Mechanic {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "compound" => Ok(Mechanic::Compound),
            "isolation" => Ok(Mechanic::Isolation),
            _ => Err(ParseError::Mechanic(s.to_string())),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ParseError {
    #[error("unknown force \"{0}\"")]
    Force(String),
    #[error("unknown level \"{0}\"")]
    Level(String),
    #[error("unknown mechanic \"{0}\"")]
    Mechanic(String),
}
