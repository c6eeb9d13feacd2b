use super::*;
use serde_json::json;

use crate::{
    controller::{RecipeSyncController, SubmitOutcome},
    mock_service::{self, recipe, MockService, TOKEN},
    session::MemorySessionStore,
};

fn authed_service(base_url: &str) -> HttpRecipeService {
    HttpRecipeService::new(base_url, Arc::new(MemorySessionStore::with_token(TOKEN)))
}

#[tokio::test]
async fn list_attaches_bearer_token_and_decodes_records() {
    let mock = MockService::with_recipes(vec![recipe("1", "Soup")]);
    let base_url = mock_service::spawn(mock.clone()).await.expect("spawn");

    let recipes = authed_service(&format!("{base_url}/"))
        .list_recipes()
        .await
        .expect("list");

    assert_eq!(recipes, vec![recipe("1", "Soup")]);
    assert_eq!(mock.requests().await, vec!["GET /reseps"]);
}

#[tokio::test]
async fn missing_token_surfaces_service_message() {
    let mock = MockService::with_recipes(vec![recipe("1", "Soup")]);
    let base_url = mock_service::spawn(mock).await.expect("spawn");
    let service = HttpRecipeService::new(base_url, Arc::new(MemorySessionStore::new()));

    let err = service.list_recipes().await.expect_err("must fail");
    assert_eq!(err.status(), Some(401));
    assert_eq!(err.service_message(), Some("No token provided"));
}

#[tokio::test]
async fn create_sends_service_field_names() {
    let mock = MockService::default();
    let base_url = mock_service::spawn(mock.clone()).await.expect("spawn");

    let created = authed_service(&base_url)
        .create_recipe(&RecipeDraft::new("Bread", "flour", "bake"))
        .await
        .expect("create");

    assert_eq!(created.id.as_str(), "66a1");
    assert_eq!(created.ingredients, "flour");
    assert_eq!(
        mock.bodies.lock().await.clone(),
        vec![json!({ "name": "Bread", "bahan": "flour", "langkah": "bake" })]
    );
}

#[tokio::test]
async fn update_and_delete_address_record_by_id() {
    let mock = MockService::with_recipes(vec![recipe("1", "Soup"), recipe("2", "Tea")]);
    let base_url = mock_service::spawn(mock.clone()).await.expect("spawn");
    let service = authed_service(&base_url);

    service
        .update_recipe(&RecipeId::new("2"), &RecipeDraft::new("Green tea", "leaves", "steep"))
        .await
        .expect("update");
    service
        .delete_recipe(&RecipeId::new("1"))
        .await
        .expect("delete");

    assert_eq!(
        mock.requests().await,
        vec!["PUT /reseps/2", "DELETE /reseps/1"]
    );
    let remaining = mock.recipes.lock().await.clone();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].name, "Green tea");
    assert_eq!(remaining[0].steps, "steep");
}

#[tokio::test]
async fn ids_with_reserved_characters_stay_one_path_segment() {
    let mock = MockService::with_recipes(vec![
        recipe("1", "Soup"),
        recipe("1?x", "Query"),
        recipe("a/b", "Slash"),
        recipe("50%#", "Percent"),
    ]);
    let base_url = mock_service::spawn(mock.clone()).await.expect("spawn");
    let service = authed_service(&base_url);

    service
        .delete_recipe(&RecipeId::new("1?x"))
        .await
        .expect("delete");
    service
        .update_recipe(&RecipeId::new("a/b"), &RecipeDraft::new("Slashed", "x", "y"))
        .await
        .expect("update");
    service
        .delete_recipe(&RecipeId::new("50%#"))
        .await
        .expect("delete");

    assert_eq!(
        mock.requests().await,
        vec!["DELETE /reseps/1?x", "PUT /reseps/a/b", "DELETE /reseps/50%#"]
    );
    let remaining = mock.recipes.lock().await.clone();
    let ids: Vec<&str> = remaining.iter().map(|recipe| recipe.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "a/b"]);
    assert_eq!(remaining[1].name, "Slashed");
}

#[tokio::test]
async fn update_of_unknown_record_reports_service_message() {
    let mock = MockService::default();
    let base_url = mock_service::spawn(mock).await.expect("spawn");

    let err = authed_service(&base_url)
        .update_recipe(&RecipeId::new("missing"), &RecipeDraft::new("a", "b", "c"))
        .await
        .expect_err("must fail");
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.service_message(), Some("Resep not found"));
}

#[tokio::test]
async fn unreachable_service_is_transport_error() {
    let base_url = mock_service::closed_url().await.expect("closed url");

    let err = authed_service(&base_url)
        .list_recipes()
        .await
        .expect_err("must fail");
    assert!(matches!(err, ServiceError::Transport(_)), "unexpected: {err}");
}

#[tokio::test]
async fn controller_round_trip_over_http() {
    let mock = MockService::with_recipes(vec![recipe("1", "Soup")]);
    let base_url = mock_service::spawn(mock.clone()).await.expect("spawn");
    let controller = RecipeSyncController::new(Arc::new(authed_service(&base_url)));

    controller.refresh().await.expect("refresh");
    let outcome = controller
        .submit(RecipeDraft::new("Bread", "flour", "bake"))
        .await
        .expect("create");
    let created = match outcome {
        SubmitOutcome::Created(created) => created,
        other => panic!("unexpected outcome: {other:?}"),
    };

    controller.begin_edit(&RecipeId::new("1")).await.expect("edit");
    controller
        .submit(RecipeDraft::new("New", "water", "boil"))
        .await
        .expect("update");
    controller.remove(&created.id).await.expect("remove");

    let delete_line = format!("DELETE /reseps/{}", created.id);
    let recipes = controller.recipes().await;
    assert_eq!(recipes.len(), 1);
    assert_eq!(recipes[0].name, "New");
    assert_eq!(controller.edit_session().await, None);
    assert_eq!(
        mock.requests().await,
        vec![
            "GET /reseps",
            "POST /reseps",
            "GET /reseps",
            "PUT /reseps/1",
            "GET /reseps",
            delete_line.as_str(),
            "GET /reseps",
        ]
    );
}

#[tokio::test]
async fn controller_refresh_without_login_reports_service_message() {
    let mock = MockService::default();
    let base_url = mock_service::spawn(mock).await.expect("spawn");
    let controller = RecipeSyncController::new(Arc::new(HttpRecipeService::new(
        base_url,
        Arc::new(MemorySessionStore::new()),
    )));

    let err = controller.refresh().await.expect_err("must fail");
    assert_eq!(err.to_string(), "No token provided");
}
