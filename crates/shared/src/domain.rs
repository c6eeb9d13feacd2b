use std::fmt;

use serde::{Deserialize, Serialize};

/// Server-assigned recipe identity. Opaque to the client.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeId(pub String);

impl RecipeId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecipeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A recipe as stored by the remote service.
///
/// The service names ingredients `bahan` and steps `langkah`, and keys
/// records by `_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(rename = "_id", alias = "id")]
    pub id: RecipeId,
    pub name: String,
    #[serde(rename = "bahan", alias = "ingredients", default)]
    pub ingredients: String,
    #[serde(rename = "langkah", alias = "steps", default)]
    pub steps: String,
}

impl Recipe {
    pub fn draft(&self) -> RecipeDraft {
        RecipeDraft {
            name: self.name.clone(),
            ingredients: self.ingredients.clone(),
            steps: self.steps.clone(),
        }
    }
}

/// Editable recipe fields, used as the body of create and update requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeDraft {
    pub name: String,
    #[serde(rename = "bahan", alias = "ingredients")]
    pub ingredients: String,
    #[serde(rename = "langkah", alias = "steps")]
    pub steps: String,
}

impl RecipeDraft {
    pub fn new(
        name: impl Into<String>,
        ingredients: impl Into<String>,
        steps: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            ingredients: ingredients.into(),
            steps: steps.into(),
        }
    }

    /// All three fields are required; only emptiness is checked.
    pub fn is_complete(&self) -> bool {
        !self.name.is_empty() && !self.ingredients.is_empty() && !self.steps.is_empty()
    }
}
