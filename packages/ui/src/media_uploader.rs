use api::UploadedAsset;
use dioxus::prelude::*;

use crate::components::Spinner;

/// File picker that forwards the chosen image to the provider's upload
/// endpoint and publishes the resulting asset handle.
#[component]
pub fn MediaUploader(mut asset: Signal<Option<UploadedAsset>>) -> Element {
    let mut uploading = use_signal(|| false);

    let handle_change = move |evt: FormEvent| {
        spawn(async move {
            let Some(file_engine) = evt.files() else {
                return;
            };
            let Some(name) = file_engine.files().into_iter().next() else {
                return;
            };

            uploading.set(true);
            match file_engine.read_file(&name).await {
                Some(bytes) => match api::upload_asset(name.clone(), bytes).await {
                    Ok(uploaded) => asset.set(Some(uploaded)),
                    Err(e) => tracing::error!("upload failed: {e}"),
                },
                None => tracing::error!("could not read picked file {name}"),
            }
            uploading.set(false);
        });
    };

    rsx! {
        div {
            class: "media-uploader",
            h3 { class: "media-uploader-title", "Original" }

            if uploading() {
                Spinner { label: "Uploading..." }
            } else if let Some(uploaded) = asset() {
                img {
                    class: "media-uploader-preview",
                    src: "{uploaded.secure_url}",
                    alt: "uploaded image",
                }
            } else {
                label {
                    class: "media-uploader-cta",
                    r#for: "media-upload-input",
                    div { class: "media-uploader-icon", "+" }
                    p { "Click here to upload an image" }
                }
            }

            input {
                id: "media-upload-input",
                class: "media-uploader-input",
                r#type: "file",
                accept: "image/*",
                onchange: handle_change,
            }
        }
    }
}
