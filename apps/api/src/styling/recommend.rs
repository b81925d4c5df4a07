//! Recommendation assembly: merges the rule tables for a profile's codes.
//! Pure composition, no inference beyond the table lookups.

use serde::Serialize;

use crate::styling::body_shape::{BodyShape, Occasion, SkinTone};
use crate::styling::rules::{
    contrast_or_default, occasion_tips_or_empty, palette_or_neutral, shape_rules_or_neutral,
    ContrastLevel, Rgb,
};

/// The three classification fields a recommendation is keyed on.
/// Any of them may be unknown for profiles stored with legacy values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StyleProfile {
    pub body_shape: Option<BodyShape>,
    pub skin_tone: Option<SkinTone>,
    pub occasion: Option<Occasion>,
}

impl StyleProfile {
    /// Builds a profile from stored strings, dropping anything outside the vocabularies.
    pub fn from_stored(body_shape: &str, skin_tone: Option<&str>, occasion: Option<&str>) -> Self {
        Self {
            body_shape: BodyShape::parse_lenient(body_shape),
            skin_tone: skin_tone.and_then(SkinTone::parse_lenient),
            occasion: occasion.and_then(Occasion::parse_lenient),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationResult {
    pub objective: &'static str,
    pub recommended: &'static [&'static str],
    pub avoid: &'static [&'static str],
    pub palette_colors: &'static [Rgb],
    pub palette_description: &'static str,
    pub occasion_tips: &'static [&'static str],
    pub contrast_level: ContrastLevel,
}

pub fn recommend(profile: &StyleProfile) -> RecommendationResult {
    let shape = shape_rules_or_neutral(profile.body_shape);
    let palette = palette_or_neutral(profile.skin_tone);

    RecommendationResult {
        objective: shape.objective,
        recommended: shape.recommended,
        avoid: shape.avoid,
        palette_colors: palette.colors,
        palette_description: palette.description,
        occasion_tips: occasion_tips_or_empty(profile.occasion),
        contrast_level: contrast_or_default(profile.skin_tone),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::styling::rules::{occasion_tips, palette, shape_rules};

    #[test]
    fn test_full_profile_merges_all_tables() {
        let profile = StyleProfile {
            body_shape: Some(BodyShape::Pera),
            skin_tone: Some(SkinTone::Oscuro),
            occasion: Some(Occasion::Fiesta),
        };
        let r = recommend(&profile);
        assert_eq!(r.objective, shape_rules(BodyShape::Pera).objective);
        assert_eq!(r.recommended, shape_rules(BodyShape::Pera).recommended);
        assert_eq!(r.avoid, shape_rules(BodyShape::Pera).avoid);
        assert_eq!(r.palette_colors, palette(SkinTone::Oscuro).colors);
        assert_eq!(r.palette_description, palette(SkinTone::Oscuro).description);
        assert_eq!(r.occasion_tips, occasion_tips(Occasion::Fiesta));
        assert_eq!(r.contrast_level, ContrastLevel::High);
    }

    #[test]
    fn test_empty_profile_yields_neutral_result() {
        let r = recommend(&StyleProfile::default());
        assert_eq!(r.objective, "");
        assert!(r.recommended.is_empty());
        assert!(r.avoid.is_empty());
        assert!(r.palette_colors.is_empty());
        assert_eq!(r.palette_description, "");
        assert!(r.occasion_tips.is_empty());
        assert_eq!(r.contrast_level, ContrastLevel::Medium);
    }

    #[test]
    fn test_partial_profile_only_defaults_missing_fields() {
        let profile = StyleProfile {
            body_shape: Some(BodyShape::Manzana),
            skin_tone: None,
            occasion: Some(Occasion::Oficina),
        };
        let r = recommend(&profile);
        assert!(!r.recommended.is_empty());
        assert!(r.palette_colors.is_empty());
        assert!(!r.occasion_tips.is_empty());
    }

    #[test]
    fn test_from_stored_tolerates_unknown_and_messy_values() {
        let p = StyleProfile::from_stored(" PERA ", Some("bronceado"), Some("Cita"));
        assert_eq!(p.body_shape, Some(BodyShape::Pera));
        assert_eq!(p.skin_tone, None);
        assert_eq!(p.occasion, Some(Occasion::Cita));
        // unknown tone degrades, never errors
        assert_eq!(recommend(&p).contrast_level, ContrastLevel::Medium);
    }

    #[test]
    fn test_every_code_combination_is_well_formed() {
        for shape in BodyShape::ALL {
            for tone in SkinTone::ALL {
                for occasion in Occasion::ALL {
                    let r = recommend(&StyleProfile {
                        body_shape: Some(*shape),
                        skin_tone: Some(*tone),
                        occasion: Some(*occasion),
                    });
                    assert!(!r.objective.is_empty());
                    assert!(!r.palette_colors.is_empty());
                    assert!(!r.occasion_tips.is_empty());
                }
            }
        }
    }

    #[test]
    fn test_result_serializes_every_field() {
        let json = serde_json::to_value(recommend(&StyleProfile::default())).unwrap();
        for field in [
            "objective",
            "recommended",
            "avoid",
            "palette_colors",
            "palette_description",
            "occasion_tips",
            "contrast_level",
        ] {
            assert!(json.get(field).is_some(), "missing field {field}");
        }
        assert_eq!(json["contrast_level"], "medium");
    }
}
