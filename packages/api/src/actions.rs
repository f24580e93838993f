//! CRUD actions over the `users` and `images` collections.
//!
//! Each action takes the database handle explicitly so tests can point it at a
//! scratch database; the server functions in `lib.rs` pass the shared handle,
//! check the session, and log failures. Mutating actions mark the affected page
//! path stale before returning.

use futures::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{doc, DateTime as BsonDateTime, Document};
use mongodb::options::ReturnDocument;

use crate::db::Db;
use crate::error::ApiError;
use crate::models::{Image, ImageAuthor, ImageDetail, ImageInfo};
use crate::revalidate;
use crate::transform::TransformationType;
use crate::{GalleryPage, ImageForm};

/// Images per gallery page.
pub const PAGE_SIZE: u64 = 9;

/// Create an image record owned by `author`.
pub async fn add_image(
    db: &Db,
    author: ObjectId,
    form: ImageForm,
    path: &str,
) -> Result<ImageInfo, ApiError> {
    let user = db
        .users()
        .find_one(doc! { "_id": author })
        .await?
        .ok_or(ApiError::NotFound("user"))?;
    let author = user.id.ok_or(ApiError::NotFound("user"))?;

    let transformation_type = parse_type(&form.transformation_type)?;
    if !form.config.matches(transformation_type) {
        return Err(ApiError::Validation(format!(
            "configuration does not match transformation type {}",
            transformation_type.key()
        )));
    }

    let now = chrono::Utc::now();
    let mut image = Image {
        id: None,
        author,
        title: form.title,
        public_id: form.public_id,
        transformation_type,
        width: form.width,
        height: form.height,
        config: form.config,
        secure_url: form.secure_url,
        transformation_url: form.transformation_url,
        aspect_ratio: form.aspect_ratio,
        prompt: form.prompt,
        color: form.color,
        created_at: now,
        updated_at: now,
    };

    let inserted = db.images().insert_one(&image).await?;
    image.id = inserted.inserted_id.as_object_id();

    revalidate::mark_stale(path);
    Ok(image.to_info())
}

/// Replace the mutable fields of an image owned by `acting_user`.
pub async fn update_image(
    db: &Db,
    acting_user: ObjectId,
    image_id: &str,
    form: ImageForm,
    path: &str,
) -> Result<ImageInfo, ApiError> {
    let id = ObjectId::parse_str(image_id)?;
    let images = db.images();

    let existing = images
        .find_one(doc! { "_id": id })
        .await?
        .ok_or(ApiError::NotFound("image"))?;
    if existing.author != acting_user {
        return Err(ApiError::Unauthorized);
    }

    let transformation_type = parse_type(&form.transformation_type)?;
    if !form.config.matches(transformation_type) {
        return Err(ApiError::Validation(format!(
            "configuration does not match transformation type {}",
            transformation_type.key()
        )));
    }

    let config = mongodb::bson::to_bson(&form.config)?;
    let updated = images
        .find_one_and_update(
            doc! { "_id": id, "author": acting_user },
            doc! { "$set": {
                "title": &form.title,
                "public_id": &form.public_id,
                "transformation_type": transformation_type.key(),
                "width": form.width as i64,
                "height": form.height as i64,
                "config": config,
                "secure_url": &form.secure_url,
                "transformation_url": &form.transformation_url,
                "aspect_ratio": form.aspect_ratio.as_deref(),
                "prompt": form.prompt.as_deref(),
                "color": form.color.as_deref(),
                "updated_at": BsonDateTime::now(),
            }},
        )
        .return_document(ReturnDocument::After)
        .await?
        .ok_or(ApiError::NotFound("image"))?;

    revalidate::mark_stale(path);
    Ok(updated.to_info())
}

/// Delete an image by id. Succeeds whether or not the record existed; the
/// caller redirects home regardless.
pub async fn delete_image(db: &Db, image_id: &str) -> Result<(), ApiError> {
    let id = ObjectId::parse_str(image_id)?;
    db.images().delete_one(doc! { "_id": id }).await?;
    revalidate::mark_stale("/");
    Ok(())
}

/// Load an image with its author's name fields attached.
pub async fn get_image_by_id(db: &Db, image_id: &str) -> Result<ImageDetail, ApiError> {
    let id = ObjectId::parse_str(image_id)?;
    let image = db
        .images()
        .find_one(doc! { "_id": id })
        .await?
        .ok_or(ApiError::NotFound("image"))?;
    let author = db
        .users()
        .find_one(doc! { "_id": image.author })
        .await?
        .ok_or(ApiError::NotFound("user"))?;

    Ok(ImageDetail {
        image: image.to_info(),
        author: ImageAuthor {
            id: image.author.to_hex(),
            first_name: author.first_name,
            last_name: author.last_name,
        },
    })
}

/// Paginated listing of all images, newest first, with an optional
/// case-insensitive title filter.
pub async fn gallery(db: &Db, search: Option<&str>, page: u32) -> Result<GalleryPage, ApiError> {
    let filter = match search.filter(|q| !q.is_empty()) {
        Some(query) => doc! { "title": { "$regex": query, "$options": "i" } },
        None => Document::new(),
    };
    page_of(db, filter, page).await
}

/// Paginated listing of one user's images, newest first.
pub async fn user_images(db: &Db, user: ObjectId, page: u32) -> Result<GalleryPage, ApiError> {
    page_of(db, doc! { "author": user }, page).await
}

/// Debit `fee` credits from the user's balance, atomically, refusing to go
/// negative. Returns the new balance.
pub async fn update_credits(db: &Db, user: ObjectId, fee: i64) -> Result<i64, ApiError> {
    let users = db.users();
    let updated = users
        .find_one_and_update(
            doc! { "_id": user, "credit_balance": { "$gte": fee } },
            doc! { "$inc": { "credit_balance": -fee } },
        )
        .return_document(ReturnDocument::After)
        .await?;

    match updated {
        Some(user) => Ok(user.credit_balance),
        None => {
            if users.find_one(doc! { "_id": user }).await?.is_some() {
                Err(ApiError::InsufficientCredits)
            } else {
                Err(ApiError::NotFound("user"))
            }
        }
    }
}

async fn page_of(db: &Db, filter: Document, page: u32) -> Result<GalleryPage, ApiError> {
    let page = page.max(1) as u64;
    let images = db.images();

    let total = images.count_documents(filter.clone()).await?;
    let records: Vec<Image> = images
        .find(filter)
        .sort(doc! { "created_at": -1 })
        .skip((page - 1) * PAGE_SIZE)
        .limit(PAGE_SIZE as i64)
        .await?
        .try_collect()
        .await?;

    Ok(GalleryPage {
        images: records.iter().map(Image::to_info).collect(),
        total_pages: total.div_ceil(PAGE_SIZE),
    })
}

fn parse_type(key: &str) -> Result<TransformationType, ApiError> {
    TransformationType::from_key(key)
        .ok_or_else(|| ApiError::Validation(format!("unknown transformation type: {key}")))
}
