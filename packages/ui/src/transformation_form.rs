//! The transformation form.
//!
//! Field edits build type-specific partial configurations that land in a
//! pending buffer: debounced for text fields, immediate for the aspect-ratio
//! selector. "Apply transformation" deep-merges the pending change into the
//! accumulated configuration, rebuilds the preview URL, and debits the
//! transformation fee. "Save image" persists the record and hands the new id
//! to the caller for navigation.

use api::delivery::delivery_url;
use api::transform::{RecolorOptions, RemoveOptions};
use api::{
    AspectRatio, ImageForm, ImageInfo, TransformationConfig, TransformationType, UploadedAsset,
    HOME_PATH, TRANSFORM_FEE,
};
use dioxus::prelude::*;

use crate::components::{Button, ButtonVariant, Input, Select};
use crate::{
    use_auth, use_debounce, CustomField, InsufficientCreditsModal, MediaUploader,
    TransformedImage, DEBOUNCE_MS,
};

/// Whether the form creates a new record or replaces an existing one.
#[derive(Debug, Clone, PartialEq)]
pub enum FormAction {
    Add,
    Update(ImageInfo),
}

#[component]
pub fn TransformationForm(
    transformation_type: TransformationType,
    action: FormAction,
    /// Called with the saved image's id; navigate to its detail view.
    on_saved: EventHandler<String>,
) -> Element {
    let existing = match &action {
        FormAction::Update(image) => Some(image.clone()),
        FormAction::Add => None,
    };
    let update_target = existing.as_ref().map(|image| image.id.clone());

    let mut auth = use_auth();
    let debounce = use_debounce();

    let mut title = use_signal({
        let initial = existing.as_ref().map(|i| i.title.clone()).unwrap_or_default();
        move || initial
    });
    let mut prompt = use_signal({
        let initial = existing
            .as_ref()
            .and_then(|i| i.prompt.clone())
            .unwrap_or_default();
        move || initial
    });
    let mut color = use_signal({
        let initial = existing
            .as_ref()
            .and_then(|i| i.color.clone())
            .unwrap_or_default();
        move || initial
    });
    let mut aspect = use_signal({
        let initial = existing
            .as_ref()
            .and_then(|i| i.aspect_ratio.as_deref().and_then(AspectRatio::from_key));
        move || initial
    });
    let asset = use_signal({
        let initial = existing.as_ref().map(|i| UploadedAsset {
            public_id: i.public_id.clone(),
            secure_url: i.secure_url.clone(),
            width: i.width,
            height: i.height,
        });
        move || initial
    });
    let mut applied = use_signal({
        let initial = existing
            .as_ref()
            .map(|i| i.config.clone())
            .unwrap_or_default();
        move || initial
    });
    let mut preview_url = use_signal({
        let initial = existing.as_ref().map(|i| i.transformation_url.clone());
        move || initial
    });

    // Flag-only types have nothing to type in; they arrive ready to apply.
    let mut pending = use_signal({
        let seed = if update_target.is_none()
            && !transformation_type.uses_prompt()
            && !transformation_type.uses_aspect_ratio()
        {
            Some(TransformationConfig::for_type(transformation_type))
        } else {
            None
        };
        move || seed
    });

    let mut transforming = use_signal(|| false);
    let mut saving = use_signal(|| false);
    let mut credits_modal_dismissed = use_signal(|| false);

    let provider = use_resource(|| async move { api::provider_config().await.ok() });
    let cloud_name = move || provider().flatten().map(|c| c.cloud_name);

    let target_dims = move || -> (u32, u32) {
        if transformation_type.uses_aspect_ratio() {
            if let Some(ratio) = aspect() {
                return ratio.dimensions();
            }
        }
        asset().map(|a| (a.width, a.height)).unwrap_or((1000, 1000))
    };

    let handle_prompt_input = move |evt: FormEvent| {
        prompt.set(evt.value());
        debounce.trigger(DEBOUNCE_MS, move || {
            if let Some(partial) = prompt_partial(transformation_type, prompt.peek().as_str()) {
                merge_pending(pending, partial);
            }
        });
    };

    let handle_color_input = move |evt: FormEvent| {
        color.set(evt.value());
        debounce.trigger(DEBOUNCE_MS, move || {
            if let Some(partial) = color_partial(transformation_type, color.peek().as_str()) {
                merge_pending(pending, partial);
            }
        });
    };

    // Aspect selection replaces the pending config immediately, no debounce.
    let handle_aspect_change = move |evt: FormEvent| {
        if let Some(ratio) = AspectRatio::from_key(&evt.value()) {
            aspect.set(Some(ratio));
            pending.set(Some(TransformationConfig::for_type(TransformationType::Fill)));
        }
    };

    let handle_apply = move |_| {
        if !apply_enabled(pending.peek().is_some(), *transforming.peek()) {
            return;
        }
        let Some(change) = pending() else { return };

        transforming.set(true);
        pending.set(None);

        let mut config = applied();
        config.merge(&change);
        applied.set(config.clone());

        let (width, height) = target_dims();
        if let (Some(uploaded), Some(cloud)) = (asset(), cloud_name()) {
            preview_url.set(Some(delivery_url(
                &cloud,
                &uploaded.public_id,
                width,
                height,
                &config,
            )));
        }

        spawn(async move {
            match api::update_credits(TRANSFORM_FEE).await {
                Ok(balance) => auth.with_mut(|state| state.set_credit_balance(balance)),
                Err(e) => tracing::error!("credit debit failed: {e}"),
            }
            transforming.set(false);
        });
    };

    let handle_save = move |_| {
        if !save_enabled(*saving.peek()) {
            return;
        }
        let Some(uploaded) = asset() else {
            tracing::warn!("save attempted without an uploaded image");
            return;
        };

        saving.set(true);

        let target = update_target.clone();
        let (width, height) = target_dims();
        let config = applied();
        let transformation_url = cloud_name()
            .map(|cloud| delivery_url(&cloud, &uploaded.public_id, width, height, &config))
            .unwrap_or_else(|| uploaded.secure_url.clone());

        let form = ImageForm {
            title: title(),
            public_id: uploaded.public_id.clone(),
            transformation_type: transformation_type.key().to_string(),
            width,
            height,
            config,
            secure_url: uploaded.secure_url.clone(),
            transformation_url,
            aspect_ratio: aspect().map(|a| a.key().to_string()),
            prompt: Some(prompt()).filter(|p| !p.is_empty()),
            color: Some(color()).filter(|c| !c.is_empty() && transformation_type.uses_color()),
        };

        spawn(async move {
            let result = match target {
                None => api::add_image(form, HOME_PATH.to_string()).await,
                Some(id) => {
                    let path = format!("/transformations/{id}");
                    api::update_image(id, form, path).await
                }
            };
            match result {
                Ok(info) => on_saved.call(info.id),
                // Leave the form in place; the user can retry.
                Err(e) => tracing::error!("save failed: {e}"),
            }
            saving.set(false);
        });
    };

    let insufficient = auth()
        .user
        .as_ref()
        .is_some_and(|u| u.credit_balance < TRANSFORM_FEE);

    rsx! {
        if insufficient && !credits_modal_dismissed() {
            InsufficientCreditsModal {
                on_close: move |_| credits_modal_dismissed.set(true),
            }
        }

        div {
            class: "transformation-form",

            CustomField {
                label: "Image title",
                html_for: "image-title",
                Input {
                    id: "image-title",
                    value: title(),
                    oninput: move |evt: FormEvent| title.set(evt.value()),
                }
            }

            if transformation_type.uses_aspect_ratio() {
                CustomField {
                    label: "Aspect ratio",
                    html_for: "aspect-ratio",
                    Select {
                        id: "aspect-ratio",
                        value: aspect().map(|a| a.key().to_string()).unwrap_or_default(),
                        onchange: handle_aspect_change,
                        option { value: "", disabled: true, "Select size" }
                        for ratio in AspectRatio::ALL {
                            option {
                                key: "{ratio.key()}",
                                value: "{ratio.key()}",
                                "{ratio.label()}"
                            }
                        }
                    }
                }
            }

            if transformation_type.uses_prompt() {
                CustomField {
                    label: transformation_type.prompt_label().to_string(),
                    html_for: "prompt",
                    Input {
                        id: "prompt",
                        value: prompt(),
                        oninput: handle_prompt_input,
                    }
                }
            }

            if transformation_type.uses_color() {
                CustomField {
                    label: "Replacement color",
                    html_for: "color",
                    Input {
                        id: "color",
                        value: color(),
                        oninput: handle_color_input,
                    }
                }
            }

            div {
                class: "transformation-form-media",
                MediaUploader { asset }
                TransformedImage {
                    title: title(),
                    transformation_url: preview_url(),
                    transforming: transforming(),
                }
            }

            div {
                class: "transformation-form-actions",
                Button {
                    variant: ButtonVariant::Outline,
                    disabled: !apply_enabled(pending().is_some(), transforming()),
                    onclick: handle_apply,
                    if transforming() {
                        "Applying..."
                    } else {
                        "Apply transformation"
                    }
                }
                Button {
                    variant: ButtonVariant::Primary,
                    disabled: !save_enabled(saving()),
                    onclick: handle_save,
                    if saving() {
                        "Saving..."
                    } else {
                        "Save image"
                    }
                }
            }
        }
    }
}

fn merge_pending(mut pending: Signal<Option<TransformationConfig>>, partial: TransformationConfig) {
    let mut next = pending.peek().clone().unwrap_or_default();
    next.merge(&partial);
    pending.set(Some(next));
}

/// Partial configuration for an edit of the prompt field.
fn prompt_partial(
    transformation_type: TransformationType,
    prompt: &str,
) -> Option<TransformationConfig> {
    match transformation_type {
        TransformationType::Remove => Some(TransformationConfig {
            remove: Some(RemoveOptions {
                prompt: Some(prompt.to_string()),
                ..Default::default()
            }),
            ..Default::default()
        }),
        TransformationType::Recolor => Some(TransformationConfig {
            recolor: Some(RecolorOptions {
                prompt: Some(prompt.to_string()),
                ..Default::default()
            }),
            ..Default::default()
        }),
        _ => None,
    }
}

/// Partial configuration for an edit of the replacement-color field.
fn color_partial(
    transformation_type: TransformationType,
    color: &str,
) -> Option<TransformationConfig> {
    match transformation_type {
        TransformationType::Recolor => Some(TransformationConfig {
            recolor: Some(RecolorOptions {
                to: Some(color.to_string()),
                ..Default::default()
            }),
            ..Default::default()
        }),
        _ => None,
    }
}

/// "Apply transformation" needs a pending change and no transform in flight.
fn apply_enabled(has_pending: bool, transforming: bool) -> bool {
    has_pending && !transforming
}

/// "Save image" only waits for an earlier save.
fn save_enabled(saving: bool) -> bool {
    !saving
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_requires_pending_and_idle_transform() {
        assert!(apply_enabled(true, false));
        assert!(!apply_enabled(false, false));
        assert!(!apply_enabled(true, true));
        assert!(!apply_enabled(false, true));
    }

    #[test]
    fn save_only_blocks_while_in_flight() {
        assert!(save_enabled(false));
        assert!(!save_enabled(true));
    }

    #[test]
    fn prompt_edits_target_the_declared_type() {
        let partial = prompt_partial(TransformationType::Remove, "fence").unwrap();
        assert_eq!(
            partial.remove.and_then(|r| r.prompt).as_deref(),
            Some("fence")
        );

        let partial = prompt_partial(TransformationType::Recolor, "car").unwrap();
        assert_eq!(
            partial.recolor.and_then(|r| r.prompt).as_deref(),
            Some("car")
        );

        assert!(prompt_partial(TransformationType::Restore, "noise").is_none());
    }

    #[test]
    fn color_edits_only_apply_to_recolor() {
        let partial = color_partial(TransformationType::Recolor, "red").unwrap();
        assert_eq!(partial.recolor.and_then(|r| r.to).as_deref(), Some("red"));

        assert!(color_partial(TransformationType::Remove, "red").is_none());
    }

    #[test]
    fn color_then_prompt_accumulate_in_one_pending_change() {
        let mut pending = color_partial(TransformationType::Recolor, "red").unwrap();
        pending.merge(&prompt_partial(TransformationType::Recolor, "car").unwrap());

        let recolor = pending.recolor.unwrap();
        assert_eq!(recolor.to.as_deref(), Some("red"));
        assert_eq!(recolor.prompt.as_deref(), Some("car"));
    }
}
