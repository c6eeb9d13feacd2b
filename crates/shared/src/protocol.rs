use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Recipe, RecipeDraft, RecipeId};

    #[test]
    fn recipe_decodes_service_field_names() {
        let raw = r#"{"_id":"66a1","name":"Soup","bahan":"water","langkah":"boil","__v":0}"#;
        let recipe: Recipe = serde_json::from_str(raw).expect("decode");
        assert_eq!(recipe.id, RecipeId::new("66a1"));
        assert_eq!(recipe.ingredients, "water");
        assert_eq!(recipe.steps, "boil");
    }

    #[test]
    fn recipe_accepts_plain_field_names() {
        let raw = r#"{"id":"1","name":"Soup","ingredients":"water","steps":"boil"}"#;
        let recipe: Recipe = serde_json::from_str(raw).expect("decode");
        assert_eq!(recipe.id.as_str(), "1");
        assert_eq!(recipe.steps, "boil");
    }

    #[test]
    fn draft_encodes_service_field_names() {
        let value = serde_json::to_value(RecipeDraft::new("Soup", "water", "boil")).expect("encode");
        assert_eq!(
            value,
            serde_json::json!({"name": "Soup", "bahan": "water", "langkah": "boil"})
        );
    }

    #[test]
    fn draft_completeness_checks_every_field() {
        assert!(RecipeDraft::new("a", "b", "c").is_complete());
        assert!(!RecipeDraft::new("", "b", "c").is_complete());
        assert!(!RecipeDraft::new("a", "", "c").is_complete());
        assert!(!RecipeDraft::new("a", "b", "").is_complete());
    }

    #[test]
    fn login_response_reads_token() {
        let body: LoginResponse = serde_json::from_str(r#"{"token":"jwt"}"#).expect("decode");
        assert_eq!(body.token, "jwt");
    }
}
