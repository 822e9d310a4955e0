//! Descriptor resolution
//!
//! Turns a raw backend listing row into a stable `ModelDescriptor`. Pure and
//! total: same input, same output, and every input resolves to something.

use crate::model::{EntityHints, ModelDescriptor, RawEntity};

/// Known family tokens, matched case-insensitively as substrings of the base
/// token (the raw name up to the first ':'). First match wins, so tokens that
/// contain other tokens come first: "qwen2" before "qwen", "gemma2" before
/// "gemma".
const FAMILY_TOKENS: &[&str] = &[
    "qwen2",
    "qwen",
    "gemma2",
    "gemma",
    "llama",
    "mistral",
    "phi",
    "codestral",
    "deepseek",
    "granite",
];

/// Parameter-scale markers scanned over the full raw name. "13b" sits before
/// "3b" because of substring overlap.
const SCALE_MARKERS: &[(&str, &str)] = &[
    ("70b", "70B"),
    ("13b", "13B"),
    ("7b", "7B"),
    ("3b", "3B"),
];

/// Quantization markers scanned over the full raw name.
const QUANT_MARKERS: &[(&str, &str)] = &[
    ("q8", "Q8_0"),
    ("q4", "Q4_K_M"),
    ("q5", "Q5_K_M"),
];

const DEFAULT_FORMAT: &str = "gguf";

/// Resolves raw names into descriptor fields. Defaults come from config and
/// fill in whatever the name and the backend hints leave open.
#[derive(Clone, Debug)]
pub struct DescriptorResolver {
    pub default_parameter_scale: String,
    pub default_quantization: String,
}

impl Default for DescriptorResolver {
    fn default() -> Self {
        Self {
            default_parameter_scale: "7B".to_string(),
            default_quantization: "Q4_K_M".to_string(),
        }
    }
}

impl DescriptorResolver {
    pub fn new(default_parameter_scale: String, default_quantization: String) -> Self {
        Self {
            default_parameter_scale,
            default_quantization,
        }
    }

    /// Resolve one listing row. Never fails; unknown names fall back to the
    /// verbatim base token and the configured defaults.
    pub fn resolve(&self, entity: &RawEntity) -> ModelDescriptor {
        let lower = entity.name.to_lowercase();
        let base = entity.name.split(':').next().unwrap_or("");
        let base_lower = lower.split(':').next().unwrap_or("");

        let family = FAMILY_TOKENS
            .iter()
            .find(|token| base_lower.contains(*token))
            .map(|token| token.to_string())
            .unwrap_or_else(|| {
                // Unknown family: keep the base token verbatim
                if base.is_empty() {
                    "unknown".to_string()
                } else {
                    base.to_string()
                }
            });

        let parameter_scale = SCALE_MARKERS
            .iter()
            .find(|(marker, _)| lower.contains(marker))
            .map(|(_, label)| label.to_string())
            .unwrap_or_else(|| self.default_parameter_scale.clone());

        let quantization = QUANT_MARKERS
            .iter()
            .find(|(marker, _)| lower.contains(marker))
            .map(|(_, label)| label.to_string())
            .unwrap_or_else(|| self.default_quantization.clone());

        let mut descriptor = ModelDescriptor {
            id: entity.name.clone(),
            raw_name: entity.name.clone(),
            digest: entity.digest.clone(),
            family,
            parameter_scale,
            quantization,
            format: DEFAULT_FORMAT.to_string(),
            size_bytes: entity.size_bytes,
            modified_at: entity.modified_at.clone(),
        };

        if let Some(hints) = &entity.hints {
            apply_hints(&mut descriptor, hints);
        }

        descriptor
    }

    /// Resolve a whole listing, preserving order.
    pub fn resolve_all(&self, entities: &[RawEntity]) -> Vec<ModelDescriptor> {
        entities.iter().map(|e| self.resolve(e)).collect()
    }
}

/// Backend hints win over parsed fields, one field at a time. Empty strings
/// count as absent.
fn apply_hints(descriptor: &mut ModelDescriptor, hints: &EntityHints) {
    if let Some(family) = hints.family.as_deref().filter(|s| !s.is_empty()) {
        descriptor.family = family.to_string();
    }
    if let Some(scale) = hints.parameter_scale.as_deref().filter(|s| !s.is_empty()) {
        descriptor.parameter_scale = scale.to_string();
    }
    if let Some(quant) = hints.quantization.as_deref().filter(|s| !s.is_empty()) {
        descriptor.quantization = quant.to_string();
    }
    if let Some(format) = hints.format.as_deref().filter(|s| !s.is_empty()) {
        descriptor.format = format.to_string();
    }
}
