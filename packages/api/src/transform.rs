//! Transformation types, configuration, and the deep-merge that accumulates
//! successive edits into one configuration object.
//!
//! These types cross the server/client boundary: the form builds and merges
//! configurations on the client, and the finished object is persisted on the
//! image record. Serde renames keep the stored field names aligned with the
//! provider's parameter names (`fillBackground`, `removeShadow`, ...).

use serde::{Deserialize, Serialize};

/// Credits granted to a user record on first sign-in.
pub const STARTING_CREDITS: i64 = 10;

/// Credits debited each time a transformation is applied.
pub const TRANSFORM_FEE: i64 = 1;

/// The fixed set of AI edit operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransformationType {
    Restore,
    Fill,
    Remove,
    Recolor,
    RemoveBackground,
}

impl TransformationType {
    pub const ALL: [TransformationType; 5] = [
        TransformationType::Restore,
        TransformationType::Fill,
        TransformationType::Remove,
        TransformationType::Recolor,
        TransformationType::RemoveBackground,
    ];

    /// Route segment / stored key for this type.
    pub fn key(self) -> &'static str {
        match self {
            TransformationType::Restore => "restore",
            TransformationType::Fill => "fill",
            TransformationType::Remove => "remove",
            TransformationType::Recolor => "recolor",
            TransformationType::RemoveBackground => "removeBackground",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.key() == key)
    }

    pub fn title(self) -> &'static str {
        match self {
            TransformationType::Restore => "Restore Image",
            TransformationType::Fill => "Generative Fill",
            TransformationType::Remove => "Object Remove",
            TransformationType::Recolor => "Object Recolor",
            TransformationType::RemoveBackground => "Background Remove",
        }
    }

    pub fn subtitle(self) -> &'static str {
        match self {
            TransformationType::Restore => "Refine images by removing noise and imperfections",
            TransformationType::Fill => "Enhance an image's dimensions using AI outpainting",
            TransformationType::Remove => "Identify and eliminate objects from images",
            TransformationType::Recolor => "Identify and recolor objects from the image",
            TransformationType::RemoveBackground => "Remove the background of an image with one click",
        }
    }

    /// Whether the form shows the aspect-ratio selector for this type.
    pub fn uses_aspect_ratio(self) -> bool {
        matches!(self, TransformationType::Fill)
    }

    /// Whether the form shows the prompt field for this type.
    pub fn uses_prompt(self) -> bool {
        matches!(self, TransformationType::Remove | TransformationType::Recolor)
    }

    pub fn prompt_label(self) -> &'static str {
        match self {
            TransformationType::Remove => "Object to remove",
            TransformationType::Recolor => "Object to recolor",
            _ => "Prompt",
        }
    }

    /// Whether the form shows the replacement-color field for this type.
    pub fn uses_color(self) -> bool {
        matches!(self, TransformationType::Recolor)
    }
}

/// Aspect-ratio options for the generative fill transformation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    Square,
    Portrait,
    Phone,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 3] = [
        AspectRatio::Square,
        AspectRatio::Portrait,
        AspectRatio::Phone,
    ];

    /// Stored label, e.g. `"1:1"`.
    pub fn key(self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Portrait => "3:4",
            AspectRatio::Phone => "9:16",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.key() == key)
    }

    pub fn label(self) -> &'static str {
        match self {
            AspectRatio::Square => "Square (1:1)",
            AspectRatio::Portrait => "Standard Portrait (3:4)",
            AspectRatio::Phone => "Phone Portrait (9:16)",
        }
    }

    /// Target (width, height) in pixels.
    pub fn dimensions(self) -> (u32, u32) {
        match self {
            AspectRatio::Square => (1000, 1000),
            AspectRatio::Portrait => (1000, 1334),
            AspectRatio::Phone => (1000, 1784),
        }
    }
}

/// Parameters for the object-removal transformation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remove_shadow: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiple: Option<bool>,
}

/// Parameters for the object-recolor transformation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecolorOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiple: Option<bool>,
}

/// Accumulated transformation parameters for one image.
///
/// Keys absent from the object leave the corresponding effect off. Successive
/// form edits produce partial configurations that are merged into this one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restore: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_background: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remove: Option<RemoveOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recolor: Option<RecolorOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remove_background: Option<bool>,
}

impl TransformationConfig {
    /// Base configuration for a transformation type. Flag-only types come back
    /// ready to apply; prompt-driven types start empty and are filled in as the
    /// user edits the form.
    pub fn for_type(transformation: TransformationType) -> Self {
        match transformation {
            TransformationType::Restore => Self {
                restore: Some(true),
                ..Self::default()
            },
            TransformationType::Fill => Self {
                fill_background: Some(true),
                ..Self::default()
            },
            TransformationType::RemoveBackground => Self {
                remove_background: Some(true),
                ..Self::default()
            },
            TransformationType::Remove | TransformationType::Recolor => Self::default(),
        }
    }

    /// Deep-merge `other` onto `self`.
    ///
    /// Present keys of `other` overlay the existing value; nested objects merge
    /// field-wise, so a partial `recolor` update keeps sibling keys. Conflicting
    /// scalars take the newer value.
    pub fn merge(&mut self, other: &TransformationConfig) {
        if let Some(v) = other.restore {
            self.restore = Some(v);
        }
        if let Some(v) = other.fill_background {
            self.fill_background = Some(v);
        }
        if let Some(v) = other.remove_background {
            self.remove_background = Some(v);
        }
        if let Some(remove) = &other.remove {
            let current = self.remove.get_or_insert_with(RemoveOptions::default);
            if let Some(prompt) = &remove.prompt {
                current.prompt = Some(prompt.clone());
            }
            if let Some(v) = remove.remove_shadow {
                current.remove_shadow = Some(v);
            }
            if let Some(v) = remove.multiple {
                current.multiple = Some(v);
            }
        }
        if let Some(recolor) = &other.recolor {
            let current = self.recolor.get_or_insert_with(RecolorOptions::default);
            if let Some(prompt) = &recolor.prompt {
                current.prompt = Some(prompt.clone());
            }
            if let Some(to) = &recolor.to {
                current.to = Some(to.clone());
            }
            if let Some(v) = recolor.multiple {
                current.multiple = Some(v);
            }
        }
    }

    /// Whether the branch matching the declared transformation type is
    /// populated. Add/update reject records that fail this check.
    pub fn matches(&self, transformation: TransformationType) -> bool {
        match transformation {
            TransformationType::Restore => self.restore == Some(true),
            TransformationType::Fill => self.fill_background == Some(true),
            TransformationType::Remove => self
                .remove
                .as_ref()
                .is_some_and(|r| r.prompt.as_deref().is_some_and(|p| !p.is_empty())),
            TransformationType::Recolor => self
                .recolor
                .as_ref()
                .is_some_and(|r| r.prompt.as_deref().is_some_and(|p| !p.is_empty())),
            TransformationType::RemoveBackground => self.remove_background == Some(true),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_keeps_unrelated_keys() {
        let mut config = TransformationConfig {
            fill_background: Some(true),
            ..Default::default()
        };
        config.merge(&TransformationConfig {
            restore: Some(true),
            ..Default::default()
        });

        assert_eq!(config.restore, Some(true));
        assert_eq!(config.fill_background, Some(true));
    }

    #[test]
    fn merge_overlays_nested_scalars_and_preserves_siblings() {
        let mut config = TransformationConfig {
            recolor: Some(RecolorOptions {
                prompt: Some("car".to_string()),
                to: Some("blue".to_string()),
                multiple: None,
            }),
            ..Default::default()
        };
        config.merge(&TransformationConfig {
            recolor: Some(RecolorOptions {
                to: Some("red".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        });

        let recolor = config.recolor.expect("recolor branch");
        assert_eq!(recolor.to.as_deref(), Some("red"));
        assert_eq!(recolor.prompt.as_deref(), Some("car"));
    }

    #[test]
    fn merge_creates_missing_nested_branch() {
        let mut config = TransformationConfig::default();
        config.merge(&TransformationConfig {
            remove: Some(RemoveOptions {
                prompt: Some("lamp post".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        });

        assert_eq!(
            config.remove.and_then(|r| r.prompt).as_deref(),
            Some("lamp post")
        );
    }

    #[test]
    fn successive_merges_accumulate_types() {
        let mut config = TransformationConfig::for_type(TransformationType::Restore);
        config.merge(&TransformationConfig::for_type(TransformationType::Fill));
        config.merge(&TransformationConfig {
            recolor: Some(RecolorOptions {
                prompt: Some("sweater".to_string()),
                to: Some("teal".to_string()),
                multiple: Some(true),
            }),
            ..Default::default()
        });

        assert!(config.matches(TransformationType::Restore));
        assert!(config.matches(TransformationType::Fill));
        assert!(config.matches(TransformationType::Recolor));
        assert!(!config.matches(TransformationType::RemoveBackground));
    }

    #[test]
    fn matches_requires_prompt_for_prompt_driven_types() {
        let empty_remove = TransformationConfig {
            remove: Some(RemoveOptions::default()),
            ..Default::default()
        };
        assert!(!empty_remove.matches(TransformationType::Remove));

        let with_prompt = TransformationConfig {
            remove: Some(RemoveOptions {
                prompt: Some("fence".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(with_prompt.matches(TransformationType::Remove));
    }

    #[test]
    fn flag_types_are_ready_to_apply() {
        for t in [
            TransformationType::Restore,
            TransformationType::Fill,
            TransformationType::RemoveBackground,
        ] {
            assert!(TransformationConfig::for_type(t).matches(t), "{t:?}");
        }
        assert!(TransformationConfig::for_type(TransformationType::Remove).is_empty());
    }

    #[test]
    fn type_keys_round_trip() {
        for t in TransformationType::ALL {
            assert_eq!(TransformationType::from_key(t.key()), Some(t));
        }
        assert_eq!(TransformationType::from_key("sharpen"), None);
    }

    #[test]
    fn aspect_ratio_dimensions() {
        assert_eq!(AspectRatio::Square.dimensions(), (1000, 1000));
        assert_eq!(AspectRatio::Portrait.dimensions(), (1000, 1334));
        assert_eq!(AspectRatio::Phone.dimensions(), (1000, 1784));
        assert_eq!(AspectRatio::from_key("3:4"), Some(AspectRatio::Portrait));
    }
}
