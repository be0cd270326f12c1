//! Per-panel prompt material.
//!
//! Each transformation panel sends its own system instruction so the model
//! behaves like that panel's tool rather than a general chat assistant.
//! Requests may override these per call.

use pixshop_core::generation::PanelKind;

const FLUX_INSTRUCTION: &str = "You are an expert photo editor. Apply the requested style or \
     transformation to the provided image, or generate a new image from the \
     prompt when no image is given. Return only the resulting image.";

const FILTERS_INSTRUCTION: &str = "You are a photographic filter engine. Apply the requested filter \
     to the provided image while preserving its subject, composition, and \
     framing. Return only the filtered image.";

const LIGHT_INSTRUCTION: &str = "You are a relighting engine. Change only the lighting of the \
     provided image as requested; keep subject, geometry, and composition \
     unchanged. Return only the relit image.";

const TYPOGRAPHY_INSTRUCTION: &str = "You are a typography compositor. Render the requested text \
     treatment, integrating lettering naturally with the image when one is \
     provided. Return only the resulting image.";

const VECTOR_INSTRUCTION: &str = "You are a vector artist. Produce a clean, flat vector-art \
     rendition per the prompt, using the provided image as reference when \
     one is given. Return only the resulting image.";

/// The default system instruction for a panel.
///
/// `StyleExtractor` has none: it never dispatches a generation call.
pub fn system_instruction(panel: PanelKind) -> Option<&'static str> {
    match panel {
        PanelKind::Flux => Some(FLUX_INSTRUCTION),
        PanelKind::Filters => Some(FILTERS_INSTRUCTION),
        PanelKind::Light => Some(LIGHT_INSTRUCTION),
        PanelKind::Typography => Some(TYPOGRAPHY_INSTRUCTION),
        PanelKind::Vector => Some(VECTOR_INSTRUCTION),
        PanelKind::StyleExtractor => None,
    }
}

/// Folds a negative prompt into the outbound prompt text.
///
/// The generation API takes a single prompt; avoid-directives are appended
/// as an explicit instruction.
pub fn compose_prompt(prompt: &str, negative_prompt: Option<&str>) -> String {
    match negative_prompt {
        Some(negative) if !negative.trim().is_empty() => {
            format!("{prompt}\n\nAvoid the following: {}", negative.trim())
        }
        _ => prompt.to_string(),
    }
}

/// Derives the prompt a style-extraction result carries into the flux panel.
pub fn style_transfer_prompt(extracted_style: &str) -> String {
    format!(
        "Recreate the current image in the following style: {}",
        extracted_style.trim()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_generating_panel_has_an_instruction() {
        for panel in [
            PanelKind::Flux,
            PanelKind::Filters,
            PanelKind::Light,
            PanelKind::Typography,
            PanelKind::Vector,
        ] {
            assert!(system_instruction(panel).is_some(), "{panel} missing");
        }
        assert!(system_instruction(PanelKind::StyleExtractor).is_none());
    }

    #[test]
    fn test_compose_prompt_with_negative() {
        let composed = compose_prompt("make it rainy", Some("umbrellas"));
        assert!(composed.starts_with("make it rainy"));
        assert!(composed.contains("Avoid the following: umbrellas"));
    }

    #[test]
    fn test_compose_prompt_ignores_blank_negative() {
        assert_eq!(compose_prompt("sunny", Some("  ")), "sunny");
        assert_eq!(compose_prompt("sunny", None), "sunny");
    }

    #[test]
    fn test_style_transfer_prompt() {
        let prompt = style_transfer_prompt("  grainy 1970s film  ");
        assert_eq!(
            prompt,
            "Recreate the current image in the following style: grainy 1970s film"
        );
    }
}
