//! Quality grades (authoring side) and success levels (script side).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// How well a vignette answers the prompt it was authored for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityGrade {
    Perfect,
    Partial,
    Chaotic,
    FunnyFail,
}

impl QualityGrade {
    /// Tie-break rank: perfect(3) > partial(2) > chaotic(1) > funny_fail(0).
    pub fn rank(self) -> u8 {
        match self {
            Self::Perfect => 3,
            Self::Partial => 2,
            Self::Chaotic => 1,
            Self::FunnyFail => 0,
        }
    }

    /// Chaotic and funny-fail scenes use the "fail" visual vocabulary.
    pub fn is_fail(self) -> bool {
        matches!(self, Self::Chaotic | Self::FunnyFail)
    }

    pub fn success_level(self) -> SuccessLevel {
        match self {
            Self::Perfect => SuccessLevel::FullSuccess,
            Self::Partial => SuccessLevel::PartialSuccess,
            Self::Chaotic | Self::FunnyFail => SuccessLevel::FunnyFail,
        }
    }
}

impl fmt::Display for QualityGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Perfect => write!(f, "perfect"),
            Self::Partial => write!(f, "partial"),
            Self::Chaotic => write!(f, "chaotic"),
            Self::FunnyFail => write!(f, "funny_fail"),
        }
    }
}

/// Outcome grade carried by a [`crate::SceneScript`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SuccessLevel {
    FullSuccess,
    PartialSuccess,
    FunnyFail,
}

impl SuccessLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FullSuccess => "FULL_SUCCESS",
            Self::PartialSuccess => "PARTIAL_SUCCESS",
            Self::FunnyFail => "FUNNY_FAIL",
        }
    }
}

impl fmt::Display for SuccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SuccessLevel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "FULL_SUCCESS" => Ok(Self::FullSuccess),
            "PARTIAL_SUCCESS" => Ok(Self::PartialSuccess),
            "FUNNY_FAIL" => Ok(Self::FunnyFail),
            other => Err(DomainError::parse(format!("Unknown success level: {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_orders_grades() {
        assert!(QualityGrade::Perfect.rank() > QualityGrade::Partial.rank());
        assert!(QualityGrade::Partial.rank() > QualityGrade::Chaotic.rank());
        assert!(QualityGrade::Chaotic.rank() > QualityGrade::FunnyFail.rank());
    }

    #[test]
    fn fail_grades_map_to_funny_fail() {
        assert!(QualityGrade::Chaotic.is_fail());
        assert!(QualityGrade::FunnyFail.is_fail());
        assert!(!QualityGrade::Partial.is_fail());
        assert_eq!(
            QualityGrade::Chaotic.success_level(),
            SuccessLevel::FunnyFail
        );
    }

    #[test]
    fn success_level_parses_loosely() {
        assert_eq!(
            " partial_success ".parse::<SuccessLevel>().unwrap(),
            SuccessLevel::PartialSuccess
        );
        assert!("GREAT".parse::<SuccessLevel>().is_err());
    }

    #[test]
    fn grade_uses_snake_case_on_the_wire() {
        let grade: QualityGrade = serde_json::from_str(r#""funny_fail""#).unwrap();
        assert_eq!(grade, QualityGrade::FunnyFail);
        assert_eq!(
            serde_json::to_string(&SuccessLevel::FullSuccess).unwrap(),
            r#""FULL_SUCCESS""#
        );
    }
}
