//! Classifier families the trainer fits and the service can select

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Model kind tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    RandomForest,
    Mlp,
    DecisionTree,
    NaiveBayes,
}

impl ModelKind {
    /// Every kind, in the order they are offered for selection
    pub const ALL: [ModelKind; 4] = [
        ModelKind::RandomForest,
        ModelKind::Mlp,
        ModelKind::NaiveBayes,
        ModelKind::DecisionTree,
    ];

    /// Stable identifier used in requests and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RandomForest => "random_forest",
            Self::Mlp => "mlp",
            Self::DecisionTree => "decision_tree",
            Self::NaiveBayes => "naive_bayes",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::RandomForest => "Random Forest",
            Self::Mlp => "MLP",
            Self::DecisionTree => "Decision Tree",
            Self::NaiveBayes => "Naive Bayes",
        }
    }

    /// File name of the artifact slot this kind is written to and loaded from
    pub fn slot_name(&self) -> &'static str {
        match self {
            Self::RandomForest => "random_forest.bin",
            Self::Mlp => "mlp.bin",
            Self::DecisionTree => "random_tree.bin",
            Self::NaiveBayes => "naive_bayes.bin",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ModelKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "random_forest" | "rf" => Ok(Self::RandomForest),
            "mlp" => Ok(Self::Mlp),
            "decision_tree" | "random_tree" | "dt" => Ok(Self::DecisionTree),
            "naive_bayes" | "nb" => Ok(Self::NaiveBayes),
            other => Err(DomainError::invalid_field(
                "model",
                format!("Unknown model kind '{}'", other),
            )),
        }
    }
}
