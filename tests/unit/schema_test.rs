//! End-to-end tests of the GraphQL schema against the in-memory store

use serde_json::Value;
use uuid::Uuid;

use crate::support::{self, MapStorage, RecordingQueue};

async fn execute(schema: &avatar_gen_service::api::ServiceSchema, query: &str) -> Value {
    let response = schema.execute(query).await;
    assert!(
        response.errors.is_empty(),
        "unexpected errors: {:?}",
        response.errors
    );
    response.data.into_json().expect("json data")
}

async fn create_user(schema: &avatar_gen_service::api::ServiceSchema, email: &str) -> Value {
    execute(
        schema,
        &format!(r#"mutation {{ createUser(email: "{}") {{ id mail }} }}"#, email),
    )
    .await
}

async fn create_avatar(
    schema: &avatar_gen_service::api::ServiceSchema,
    email: &str,
    model: &str,
    prompt: &str,
) -> Value {
    execute(
        schema,
        &format!(
            r#"mutation {{ createAvatar(email: "{}", aiModel: "{}", prompt: "{}") {{ id uuid name type }} }}"#,
            email, model, prompt
        ),
    )
    .await
}

#[tokio::test]
async fn test_create_user_is_idempotent() {
    let h = support::harness();

    let first = create_user(&h.schema, "a@x.com").await;
    let second = create_user(&h.schema, "a@x.com").await;
    assert_eq!(first["createUser"]["id"], second["createUser"]["id"]);

    let users = execute(&h.schema, r#"{ users(email: "a@x.com") { id mail } }"#).await;
    assert_eq!(users["users"].as_array().unwrap().len(), 1);
    assert_eq!(users["users"][0]["mail"], "a@x.com");
}

#[tokio::test]
async fn test_create_avatar_round_trip() {
    let h = support::harness();
    create_user(&h.schema, "a@x.com").await;

    let created = create_avatar(&h.schema, "a@x.com", "anime", "p1").await;
    let uuid = created["createAvatar"]["uuid"].as_str().unwrap().to_string();

    let listed = execute(
        &h.schema,
        r#"{ avatars(email: "a@x.com") { id uuid name type } }"#,
    )
    .await;
    let avatars = listed["avatars"].as_array().unwrap();
    assert_eq!(avatars.len(), 1);
    assert_eq!(avatars[0]["name"], "p1");
    assert_eq!(avatars[0]["type"], "anime");
    assert_eq!(avatars[0]["uuid"], uuid.as_str());

    // Exactly one job went to the queue, for this avatar
    let jobs = h.queue.published.lock();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].uuid.to_string(), uuid);
    assert_eq!(jobs[0].ai_model, "anime");
    assert_eq!(jobs[0].prompt, "p1");
    assert!(jobs[0].source_url.is_none());
}

#[tokio::test]
async fn test_create_avatar_unknown_model_is_classified() {
    let h = support::harness();
    create_user(&h.schema, "a@x.com").await;

    let response = h
        .schema
        .execute(
            r#"mutation { createAvatar(email: "a@x.com", aiModel: "watercolor", prompt: "p") { id } }"#,
        )
        .await;
    assert_eq!(
        support::error_code(&response).as_deref(),
        Some("UNSUPPORTED_MODEL")
    );

    // No row and no job for a rejected model tag
    let listed = execute(&h.schema, r#"{ avatars(email: "a@x.com") { id } }"#).await;
    assert!(listed["avatars"].as_array().unwrap().is_empty());
    assert!(h.queue.published.lock().is_empty());
}

#[tokio::test]
async fn test_avatars_for_unknown_user_is_not_found() {
    let h = support::harness();

    let response = h
        .schema
        .execute(r#"{ avatars(email: "ghost@x.com") { id } }"#)
        .await;
    assert_eq!(
        support::error_code(&response).as_deref(),
        Some("USER_NOT_FOUND")
    );
    let err = &response.errors[0];
    assert!(err.message.contains("ghost@x.com"));
}

#[tokio::test]
async fn test_delete_by_non_owner_is_forbidden_and_leaves_row() {
    let h = support::harness();
    create_user(&h.schema, "a@x.com").await;
    create_user(&h.schema, "b@x.com").await;
    let created = create_avatar(&h.schema, "a@x.com", "anime", "p1").await;
    let avatar_id = created["createAvatar"]["id"].as_i64().unwrap();

    let response = h
        .schema
        .execute(format!(
            r#"mutation {{ deleteAvatar(email: "b@x.com", avatarId: {}) }}"#,
            avatar_id
        ))
        .await;
    assert_eq!(support::error_code(&response).as_deref(), Some("FORBIDDEN"));

    // The avatar is still listed for its owner
    let listed = execute(&h.schema, r#"{ avatars(email: "a@x.com") { id } }"#).await;
    assert_eq!(listed["avatars"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_delete_distinguishes_missing_from_not_owned() {
    let h = support::harness();
    create_user(&h.schema, "a@x.com").await;

    let response = h
        .schema
        .execute(r#"mutation { deleteAvatar(email: "a@x.com", avatarId: 99) }"#)
        .await;
    assert_eq!(
        support::error_code(&response).as_deref(),
        Some("AVATAR_NOT_FOUND")
    );
}

#[tokio::test]
async fn test_owner_delete_removes_avatar() {
    let h = support::harness();
    create_user(&h.schema, "a@x.com").await;
    let created = create_avatar(&h.schema, "a@x.com", "lego", "p1").await;
    let avatar_id = created["createAvatar"]["id"].as_i64().unwrap();

    let deleted = execute(
        &h.schema,
        &format!(
            r#"mutation {{ deleteAvatar(email: "a@x.com", avatarId: {}) }}"#,
            avatar_id
        ),
    )
    .await;
    assert_eq!(deleted["deleteAvatar"], "Avatar deleted successfully");

    let listed = execute(&h.schema, r#"{ avatars(email: "a@x.com") { id } }"#).await;
    assert!(listed["avatars"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_publish_failure_surfaces_and_row_remains() {
    let h = support::harness_with(RecordingQueue::broken(), MapStorage::default());
    create_user(&h.schema, "a@x.com").await;

    let response = h
        .schema
        .execute(
            r#"mutation { createAvatar(email: "a@x.com", aiModel: "anime", prompt: "p1") { id } }"#,
        )
        .await;
    assert_eq!(
        support::error_code(&response).as_deref(),
        Some("UPSTREAM_FAILURE")
    );

    // The committed row stays visible as the documented inconsistency
    let listed = execute(&h.schema, r#"{ avatars(email: "a@x.com") { name } }"#).await;
    assert_eq!(listed["avatars"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_edit_avatar_queues_ingest_job() {
    let h = support::harness();
    create_user(&h.schema, "a@x.com").await;

    let edited = execute(
        &h.schema,
        r#"mutation { editAvatar(email: "a@x.com", avatarUrls: ["https://cdn.example/ref.jpg"], aiModel: "cartoon", prompt: "p2") { uuid type } }"#,
    )
    .await;
    assert_eq!(edited["editAvatar"]["type"], "cartoon");

    let jobs = h.queue.published.lock();
    assert_eq!(jobs.len(), 1);
    assert_eq!(
        jobs[0].source_url.as_deref(),
        Some("https://cdn.example/asset.jpg")
    );
}

#[tokio::test]
async fn test_download_requires_ownership_or_grant() {
    let h = support::harness();
    create_user(&h.schema, "a@x.com").await;
    create_user(&h.schema, "b@x.com").await;
    let created = create_avatar(&h.schema, "a@x.com", "anime", "p1").await;
    let avatar_id = created["createAvatar"]["id"].as_i64().unwrap();
    let uuid: Uuid = created["createAvatar"]["uuid"]
        .as_str()
        .unwrap()
        .parse()
        .unwrap();

    h.storage
        .objects
        .lock()
        .insert(format!("{}.jpg", uuid), b"jpegbytes".to_vec());

    let download = |email: &str| {
        format!(
            r#"{{ downloadAvatar(email: "{}", avatarUuid: "{}") }}"#,
            email, uuid
        )
    };

    // Owner gets the base64 payload
    let owned = execute(&h.schema, &download("a@x.com")).await;
    assert_eq!(owned["downloadAvatar"], "anBlZ2J5dGVz");

    // A stranger is refused
    let refused = h.schema.execute(download("b@x.com")).await;
    assert_eq!(support::error_code(&refused).as_deref(), Some("FORBIDDEN"));

    // A grant opens the gate
    execute(
        &h.schema,
        &format!(
            r#"mutation {{ shareAvatar(ownerEmail: "a@x.com", granteeEmail: "b@x.com", avatarId: {}) {{ id }} }}"#,
            avatar_id
        ),
    )
    .await;
    let shared = execute(&h.schema, &download("b@x.com")).await;
    assert_eq!(shared["downloadAvatar"], "anBlZ2J5dGVz");

    // Revoking closes it again
    execute(
        &h.schema,
        &format!(
            r#"mutation {{ revokeShare(ownerEmail: "a@x.com", granteeEmail: "b@x.com", avatarId: {}) }}"#,
            avatar_id
        ),
    )
    .await;
    let revoked = h.schema.execute(download("b@x.com")).await;
    assert_eq!(support::error_code(&revoked).as_deref(), Some("FORBIDDEN"));
}

#[tokio::test]
async fn test_shared_avatars_listing_requires_grant() {
    let h = support::harness();
    create_user(&h.schema, "a@x.com").await;
    create_user(&h.schema, "b@x.com").await;
    let created = create_avatar(&h.schema, "a@x.com", "anime", "p1").await;
    let avatar_id = created["createAvatar"]["id"].as_i64().unwrap();

    let shared_query = r#"{ avatars(email: "b@x.com", sharedFromEmail: "a@x.com") { name } }"#;

    // Without a grant the listing is empty
    let before = execute(&h.schema, shared_query).await;
    assert!(before["avatars"].as_array().unwrap().is_empty());

    execute(
        &h.schema,
        &format!(
            r#"mutation {{ shareAvatar(ownerEmail: "a@x.com", granteeEmail: "b@x.com", avatarId: {}) {{ id }} }}"#,
            avatar_id
        ),
    )
    .await;

    let after = execute(&h.schema, shared_query).await;
    let avatars = after["avatars"].as_array().unwrap();
    assert_eq!(avatars.len(), 1);
    assert_eq!(avatars[0]["name"], "p1");
}

#[tokio::test]
async fn test_download_storage_error_is_typed() {
    let h = support::harness();
    create_user(&h.schema, "a@x.com").await;
    let created = create_avatar(&h.schema, "a@x.com", "anime", "p1").await;
    let uuid = created["createAvatar"]["uuid"].as_str().unwrap().to_string();

    // Nothing seeded in object storage: the fetch fails with a typed error
    let response = h
        .schema
        .execute(format!(
            r#"{{ downloadAvatar(email: "a@x.com", avatarUuid: "{}") }}"#,
            uuid
        ))
        .await;
    assert_eq!(
        support::error_code(&response).as_deref(),
        Some("UPSTREAM_FAILURE")
    );
}
