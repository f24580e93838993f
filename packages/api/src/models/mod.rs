//! Data models for the application.

mod image;
mod user;

#[cfg(feature = "server")]
pub use image::Image;
pub use image::{ImageAuthor, ImageDetail, ImageInfo};
#[cfg(feature = "server")]
pub use user::User;
pub use user::UserInfo;
