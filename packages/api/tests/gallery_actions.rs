//! Integration tests for the image CRUD actions and the connection handle.
//!
//! These exercise a real MongoDB pointed at by `MONGODB_URI`; run them with
//! `cargo test --features server -- --ignored`. Each test works in its own
//! scratch database and drops it up front.

#![cfg(feature = "server")]

use api::actions;
use api::db::Db;
use api::models::User;
use api::transform::{
    RecolorOptions, TransformationConfig, TransformationType, STARTING_CREDITS, TRANSFORM_FEE,
};
use api::{ApiError, ImageForm};
use mongodb::bson::oid::ObjectId;

async fn scratch_db(name: &str) -> Db {
    let uri = std::env::var("MONGODB_URI").expect("MONGODB_URI must be set for integration tests");
    let db_name = format!("pixellift_test_{name}");

    let db = Db::connect(&uri, &db_name).await.expect("connect");
    db.client()
        .database(&db_name)
        .drop()
        .await
        .expect("drop scratch database");
    db
}

async fn seed_user(db: &Db, email: &str) -> ObjectId {
    let now = chrono::Utc::now();
    let user = User {
        id: None,
        email: email.to_string(),
        username: email.split('@').next().unwrap().to_string(),
        first_name: Some("Ada".to_string()),
        last_name: Some("Lovelace".to_string()),
        photo_url: None,
        provider: "local".to_string(),
        provider_id: email.to_string(),
        password_hash: None,
        credit_balance: STARTING_CREDITS,
        created_at: now,
        updated_at: now,
    };
    let inserted = db.users().insert_one(&user).await.expect("insert user");
    inserted.inserted_id.as_object_id().expect("object id")
}

fn restore_form(title: &str) -> ImageForm {
    ImageForm {
        title: title.to_string(),
        public_id: "pixellift/sample".to_string(),
        transformation_type: TransformationType::Restore.key().to_string(),
        width: 800,
        height: 600,
        config: TransformationConfig::for_type(TransformationType::Restore),
        secure_url: "https://res.cloudinary.com/demo/image/upload/v1/pixellift/sample".to_string(),
        transformation_url:
            "https://res.cloudinary.com/demo/image/upload/e_gen_restore/v1/pixellift/sample"
                .to_string(),
        aspect_ratio: None,
        prompt: None,
        color: None,
    }
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn add_image_creates_exactly_one_owned_record() {
    let db = scratch_db("add_image").await;
    let author = seed_user(&db, "ada@example.com").await;

    let info = actions::add_image(&db, author, restore_form("old photo"), "/")
        .await
        .expect("add image");

    assert_eq!(info.author_id, author.to_hex());

    let stored = actions::get_image_by_id(&db, &info.id)
        .await
        .expect("fetch stored record");
    assert_eq!(stored.image, info);
    assert_eq!(stored.author.first_name.as_deref(), Some("Ada"));

    let count = db
        .images()
        .count_documents(mongodb::bson::doc! {})
        .await
        .expect("count");
    assert_eq!(count, 1);
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn add_image_fails_for_unknown_user() {
    let db = scratch_db("add_image_no_user").await;

    let err = actions::add_image(&db, ObjectId::new(), restore_form("orphan"), "/")
        .await
        .expect_err("author does not exist");
    assert!(matches!(err, ApiError::NotFound("user")));
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn update_image_rejects_non_owner() {
    let db = scratch_db("update_owner").await;
    let owner = seed_user(&db, "owner@example.com").await;
    let intruder = seed_user(&db, "intruder@example.com").await;

    let info = actions::add_image(&db, owner, restore_form("mine"), "/")
        .await
        .expect("add image");

    let err = actions::update_image(&db, intruder, &info.id, restore_form("stolen"), "/")
        .await
        .expect_err("must reject non-owner");
    assert!(matches!(err, ApiError::Unauthorized));

    // The record is untouched.
    let stored = actions::get_image_by_id(&db, &info.id).await.expect("fetch");
    assert_eq!(stored.image.title, "mine");
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn update_image_replaces_fields_for_owner() {
    let db = scratch_db("update_fields").await;
    let owner = seed_user(&db, "owner2@example.com").await;

    let info = actions::add_image(&db, owner, restore_form("before"), "/")
        .await
        .expect("add image");

    let mut form = restore_form("after");
    form.transformation_type = TransformationType::Recolor.key().to_string();
    form.config = TransformationConfig {
        recolor: Some(RecolorOptions {
            prompt: Some("car".to_string()),
            to: Some("red".to_string()),
            multiple: None,
        }),
        ..Default::default()
    };
    form.prompt = Some("car".to_string());
    form.color = Some("red".to_string());

    let updated = actions::update_image(&db, owner, &info.id, form, "/")
        .await
        .expect("update image");
    assert_eq!(updated.title, "after");
    assert_eq!(updated.transformation_type, TransformationType::Recolor);
    assert_eq!(updated.prompt.as_deref(), Some("car"));
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn delete_image_succeeds_for_missing_record() {
    let db = scratch_db("delete_missing").await;

    actions::delete_image(&db, &ObjectId::new().to_hex())
        .await
        .expect("delete of a missing record is not an error");
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn update_credits_debits_and_refuses_overdraft() {
    let db = scratch_db("credits").await;
    let user = seed_user(&db, "credits@example.com").await;

    let mut balance = STARTING_CREDITS;
    while balance > 0 {
        balance = actions::update_credits(&db, user, TRANSFORM_FEE)
            .await
            .expect("debit");
    }

    let err = actions::update_credits(&db, user, TRANSFORM_FEE)
        .await
        .expect_err("balance is exhausted");
    assert!(matches!(err, ApiError::InsufficientCredits));
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn concurrent_connector_callers_share_one_handle() {
    // Both callers race get() before the first connection resolves; the
    // OnceCell must hand the same handle to each.
    let (a, b) = tokio::join!(api::db::get(), api::db::get());
    let a = a.expect("connect");
    let b = b.expect("connect");
    assert!(std::ptr::eq(a, b));
}
