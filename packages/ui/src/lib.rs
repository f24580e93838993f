//! This crate contains all shared UI for the workspace.

pub mod components;

mod auth;
pub use auth::{use_auth, AuthProvider, AuthState, LoginButton, LogoutButton};

mod debounce;
pub use debounce::{use_debounce, Debounce, DebounceGate, DEBOUNCE_MS};

mod navbar;
pub use navbar::Navbar;

mod custom_field;
pub use custom_field::CustomField;

mod media_uploader;
pub use media_uploader::MediaUploader;

mod transformed_image;
pub use transformed_image::TransformedImage;

mod insufficient_credits_modal;
pub use insufficient_credits_modal::InsufficientCreditsModal;

mod transformation_form;
pub use transformation_form::{FormAction, TransformationForm};
