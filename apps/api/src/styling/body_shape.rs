//! Body-shape classification and the closed code vocabularies shared by the
//! survey, the style rule tables and the catalog filter.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Max absolute chest/hip difference (cm) for a balanced silhouette.
pub const BALANCED_BUST_HIP_CM: f64 = 5.0;
/// Waist must be at most this fraction of the chest for `reloj_arena`.
pub const NARROW_WAIST_RATIO: f64 = 0.75;
/// One measurement "dominates" another when it exceeds it by this factor.
pub const DOMINANCE_RATIO: f64 = 1.1;
/// Waist at or above this fraction of the chest reads as `manzana`.
pub const FULL_WAIST_RATIO: f64 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyShape {
    /// Hourglass.
    RelojArena,
    /// Pear.
    Pera,
    /// Inverted triangle.
    TrianguloInvertido,
    /// Apple.
    Manzana,
    /// Rectangle, the fallback category.
    Rectangulo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkinTone {
    Claro,
    MedioClaro,
    MedioOscuro,
    Oscuro,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Occasion {
    Casual,
    Oficina,
    Cita,
    Fiesta,
    Formal,
}

/// Returned when a stored or submitted code is not part of a vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {vocabulary} code '{value}'; expected one of: {expected}")]
pub struct UnknownCode {
    pub vocabulary: &'static str,
    pub value: String,
    pub expected: String,
}

macro_rules! code_vocabulary {
    ($ty:ident, $vocabulary:literal, { $($variant:ident => $code:literal),+ $(,)? }) => {
        impl $ty {
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $code),+
                }
            }

            /// Lenient parse used on stored values: trims and lower-cases,
            /// returns `None` for anything outside the vocabulary.
            pub fn parse_lenient(value: &str) -> Option<Self> {
                value.trim().to_lowercase().parse().ok()
            }
        }

        impl FromStr for $ty {
            type Err = UnknownCode;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($code => Ok($ty::$variant),)+
                    other => Err(UnknownCode {
                        vocabulary: $vocabulary,
                        value: other.to_string(),
                        expected: Self::ALL
                            .iter()
                            .map(|v| v.as_str())
                            .collect::<Vec<_>>()
                            .join(", "),
                    }),
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

code_vocabulary!(BodyShape, "body shape", {
    RelojArena => "reloj_arena",
    Pera => "pera",
    TrianguloInvertido => "triangulo_invertido",
    Manzana => "manzana",
    Rectangulo => "rectangulo",
});

code_vocabulary!(SkinTone, "skin tone", {
    Claro => "claro",
    MedioClaro => "medio_claro",
    MedioOscuro => "medio_oscuro",
    Oscuro => "oscuro",
});

code_vocabulary!(Occasion, "occasion", {
    Casual => "casual",
    Oficina => "oficina",
    Cita => "cita",
    Fiesta => "fiesta",
    Formal => "formal",
});

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeasurementError {
    #[error("{field} must be a finite number, got {value}")]
    NotFinite { field: &'static str, value: f64 },

    #[error("{field} must be greater than zero, got {value}")]
    NotPositive { field: &'static str, value: f64 },
}

/// Four torso measurements that passed boundary validation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Measurements {
    pub shoulders: f64,
    pub chest: f64,
    pub waist: f64,
    pub hip: f64,
}

impl Measurements {
    pub fn new(shoulders: f64, chest: f64, waist: f64, hip: f64) -> Result<Self, MeasurementError> {
        Ok(Self {
            shoulders: check_measurement("shoulders_cm", shoulders)?,
            chest: check_measurement("chest_cm", chest)?,
            waist: check_measurement("waist_cm", waist)?,
            hip: check_measurement("hip_cm", hip)?,
        })
    }

    pub fn body_shape(&self) -> BodyShape {
        classify(self.shoulders, self.chest, self.waist, self.hip)
    }
}

/// Validates a single measurement (also used for the optional height).
pub fn check_measurement(field: &'static str, value: f64) -> Result<f64, MeasurementError> {
    if !value.is_finite() {
        return Err(MeasurementError::NotFinite { field, value });
    }
    if value <= 0.0 {
        return Err(MeasurementError::NotPositive { field, value });
    }
    Ok(value)
}

/// Classifies a silhouette from four measurements in the same unit.
///
/// Rules are checked in order and the first match wins:
/// 1. bust and hip within 5 units and a waist at most 75% of the chest → `reloj_arena`
/// 2. hip more than 10% wider than shoulders → `pera`
/// 3. shoulders more than 10% wider than hip → `triangulo_invertido`
/// 4. waist at least 90% of the chest → `manzana`
/// 5. anything else → `rectangulo`
///
/// Rule 1 mixes an absolute difference with a ratio. That is kept as-is.
/// Inputs are expected to be validated through [`Measurements::new`].
pub fn classify(shoulders: f64, chest: f64, waist: f64, hip: f64) -> BodyShape {
    if (chest - hip).abs() <= BALANCED_BUST_HIP_CM && waist <= chest * NARROW_WAIST_RATIO {
        BodyShape::RelojArena
    } else if hip > shoulders * DOMINANCE_RATIO {
        BodyShape::Pera
    } else if shoulders > hip * DOMINANCE_RATIO {
        BodyShape::TrianguloInvertido
    } else if waist >= chest * FULL_WAIST_RATIO {
        BodyShape::Manzana
    } else {
        BodyShape::Rectangulo
    }
}
