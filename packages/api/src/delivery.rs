//! Builds provider delivery URLs that render a transformed image.
//!
//! The provider applies edits at request time: the accumulated
//! [`TransformationConfig`] is encoded into path segments of the delivery URL,
//! so no asset is ever re-uploaded. Pure string construction, shared by the
//! client preview and the persisted `transformation_url`.

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

use crate::transform::TransformationConfig;

/// Delivery URL for `public_id` with all configured transformations applied.
pub fn delivery_url(
    cloud_name: &str,
    public_id: &str,
    width: u32,
    height: u32,
    config: &TransformationConfig,
) -> String {
    let mut segments: Vec<String> = Vec::new();

    if config.restore == Some(true) {
        segments.push("e_gen_restore".to_string());
    }

    if config.fill_background == Some(true) {
        segments.push(format!("b_gen_fill,c_pad,w_{width},h_{height}"));
    }

    if let Some(remove) = &config.remove {
        if let Some(prompt) = remove.prompt.as_deref().filter(|p| !p.is_empty()) {
            let mut effect = format!("e_gen_remove:prompt_{}", encode(prompt));
            if remove.remove_shadow == Some(true) {
                effect.push_str(";remove-shadow_true");
            }
            if remove.multiple == Some(true) {
                effect.push_str(";multiple_true");
            }
            segments.push(effect);
        }
    }

    if let Some(recolor) = &config.recolor {
        if let Some(prompt) = recolor.prompt.as_deref().filter(|p| !p.is_empty()) {
            let mut effect = format!("e_gen_recolor:prompt_{}", encode(prompt));
            if let Some(to) = recolor.to.as_deref().filter(|c| !c.is_empty()) {
                effect.push_str(&format!(";to-color_{}", encode(to)));
            }
            if recolor.multiple == Some(true) {
                effect.push_str(";multiple_true");
            }
            segments.push(effect);
        }
    }

    if config.remove_background == Some(true) {
        segments.push("e_background_removal".to_string());
    }

    let base = format!("https://res.cloudinary.com/{cloud_name}/image/upload");
    if segments.is_empty() {
        format!("{base}/v1/{public_id}")
    } else {
        format!("{base}/{}/v1/{public_id}", segments.join("/"))
    }
}

fn encode(value: &str) -> String {
    utf8_percent_encode(value, NON_ALPHANUMERIC).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::{RecolorOptions, RemoveOptions, TransformationConfig, TransformationType};

    #[test]
    fn untransformed_url_has_no_effect_segment() {
        let url = delivery_url("demo", "sample", 800, 600, &TransformationConfig::default());
        assert_eq!(url, "https://res.cloudinary.com/demo/image/upload/v1/sample");
    }

    #[test]
    fn restore_effect() {
        let config = TransformationConfig::for_type(TransformationType::Restore);
        let url = delivery_url("demo", "sample", 800, 600, &config);
        assert_eq!(
            url,
            "https://res.cloudinary.com/demo/image/upload/e_gen_restore/v1/sample"
        );
    }

    #[test]
    fn fill_carries_target_dimensions() {
        let config = TransformationConfig::for_type(TransformationType::Fill);
        let url = delivery_url("demo", "sample", 1000, 1334, &config);
        assert!(url.contains("/b_gen_fill,c_pad,w_1000,h_1334/"));
    }

    #[test]
    fn remove_encodes_prompt_and_flags() {
        let config = TransformationConfig {
            remove: Some(RemoveOptions {
                prompt: Some("lamp post".to_string()),
                remove_shadow: Some(true),
                multiple: Some(true),
            }),
            ..Default::default()
        };
        let url = delivery_url("demo", "sample", 800, 600, &config);
        assert!(url.contains("e_gen_remove:prompt_lamp%20post;remove-shadow_true;multiple_true"));
    }

    #[test]
    fn recolor_includes_target_color() {
        let config = TransformationConfig {
            recolor: Some(RecolorOptions {
                prompt: Some("car".to_string()),
                to: Some("red".to_string()),
                multiple: None,
            }),
            ..Default::default()
        };
        let url = delivery_url("demo", "sample", 800, 600, &config);
        assert!(url.contains("e_gen_recolor:prompt_car;to-color_red"));
    }

    #[test]
    fn prompt_driven_effect_without_prompt_is_skipped() {
        let config = TransformationConfig {
            remove: Some(RemoveOptions::default()),
            ..Default::default()
        };
        let url = delivery_url("demo", "sample", 800, 600, &config);
        assert_eq!(url, "https://res.cloudinary.com/demo/image/upload/v1/sample");
    }

    #[test]
    fn accumulated_effects_chain_as_segments() {
        let mut config = TransformationConfig::for_type(TransformationType::Restore);
        config.merge(&TransformationConfig {
            recolor: Some(RecolorOptions {
                prompt: Some("sweater".to_string()),
                to: Some("teal".to_string()),
                multiple: None,
            }),
            ..Default::default()
        });
        let url = delivery_url("demo", "sample", 800, 600, &config);
        assert!(url.contains("/e_gen_restore/e_gen_recolor:prompt_sweater;to-color_teal/"));
    }
}
