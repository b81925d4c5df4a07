//! Static style rule tables: silhouette guidance, palettes per skin tone,
//! occasion tips and suggested contrast.
//!
//! Every lookup is total. Absent or unknown codes resolve to a neutral value
//! so recommendation assembly never fails on incomplete profiles.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::styling::body_shape::{BodyShape, Occasion, SkinTone};

/// Guidance for one silhouette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ShapeRules {
    pub objective: &'static str,
    pub recommended: &'static [&'static str],
    pub avoid: &'static [&'static str],
}

impl ShapeRules {
    pub const NEUTRAL: ShapeRules = ShapeRules {
        objective: "",
        recommended: &[],
        avoid: &[],
    };
}

/// An sRGB color. Serialized as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid hex color '{0}', expected #RRGGBB")]
pub struct InvalidHexColor(pub String);

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = InvalidHexColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidHexColor(s.to_string());
        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |range: std::ops::Range<usize>| {
            hex.get(range)
                .and_then(|h| u8::from_str_radix(h, 16).ok())
                .ok_or_else(invalid)
        };
        Ok(Rgb::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// Colors that flatter a skin tone, plus a short explanation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Palette {
    pub name: &'static str,
    pub colors: &'static [Rgb],
    pub description: &'static str,
}

impl Palette {
    pub const NEUTRAL: Palette = Palette {
        name: "",
        colors: &[],
        description: "",
    };
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContrastLevel {
    Low,
    #[default]
    Medium,
    High,
}

// ────────────────────────────────────────────────────────────────────────────
// Silhouettes
// ────────────────────────────────────────────────────────────────────────────

static PERA: ShapeRules = ShapeRules {
    objective: "Equilibrar la parte superior con la cadera.",
    recommended: &[
        "Blusas con hombros estructurados o mangas con volumen",
        "Chaquetas/blazers cortos a la cintura",
        "Pantalones rectos o bootcut",
        "Faldas en A",
    ],
    avoid: &[
        "Pantalones súper ajustados en cadera si no quieres resaltarla",
        "Volantes o bolsillos grandes en cadera",
    ],
};

static MANZANA: ShapeRules = ShapeRules {
    objective: "Crear línea vertical y definir sin apretar la zona media.",
    recommended: &[
        "Escote en V",
        "Vestidos imperio o corte bajo el busto",
        "Chaquetas abiertas (línea vertical)",
        "Pantalones rectos/tiro medio",
    ],
    avoid: &[
        "Prendas muy apretadas en cintura",
        "Cinturones muy marcados al centro",
    ],
};

static RELOJ_ARENA: ShapeRules = ShapeRules {
    objective: "Resaltar proporción natural y cintura.",
    recommended: &[
        "Cintura marcada (cinturón fino o corte entallado)",
        "Vestidos ajustados moderados",
        "Pantalón tiro alto",
        "Blusas entalladas",
    ],
    avoid: &[
        "Ropa muy oversize sin forma",
        "Capas muy gruesas que oculten la cintura",
    ],
};

static RECTANGULO: ShapeRules = ShapeRules {
    objective: "Crear curvas y definición visual.",
    recommended: &[
        "Capas (blazer + top) para volumen",
        "Faldas con vuelo o plisadas",
        "Pantalón tiro alto + cinturón",
        "Blusas con textura/volumen",
    ],
    avoid: &["Looks totalmente rectos sin cortes", "Prendas sin estructura"],
};

static TRIANGULO_INVERTIDO: ShapeRules = ShapeRules {
    objective: "Equilibrar hombros con cadera.",
    recommended: &[
        "Pantalones con volumen (wide leg, palazzo)",
        "Faldas en A",
        "Cuellos simples (evitar hombreras)",
        "Colores oscuros arriba + claros abajo",
    ],
    avoid: &["Hombreras fuertes", "Cuellos muy cargados arriba"],
};

pub fn shape_rules(shape: BodyShape) -> &'static ShapeRules {
    match shape {
        BodyShape::Pera => &PERA,
        BodyShape::Manzana => &MANZANA,
        BodyShape::RelojArena => &RELOJ_ARENA,
        BodyShape::Rectangulo => &RECTANGULO,
        BodyShape::TrianguloInvertido => &TRIANGULO_INVERTIDO,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Palettes
// ────────────────────────────────────────────────────────────────────────────

static CLARO: Palette = Palette {
    name: "Claro",
    colors: &[
        Rgb::new(0x2E, 0x5A, 0xAC),
        Rgb::new(0x7A, 0x2E, 0x7A),
        Rgb::new(0x2E, 0x7A, 0x5E),
        Rgb::new(0xC0, 0x4A, 0x4A),
        Rgb::new(0x2B, 0x2B, 0x2B),
        Rgb::new(0xFF, 0xFF, 0xFF),
    ],
    description: "Te favorecen tonos fríos y contrastes suaves. Evita colores muy amarillos apagados.",
};

static MEDIO_CLARO: Palette = Palette {
    name: "Medio claro",
    colors: &[
        Rgb::new(0xE6, 0x7E, 0x22),
        Rgb::new(0x1F, 0x61, 0x8D),
        Rgb::new(0x11, 0x7A, 0x65),
        Rgb::new(0xB0, 0x3A, 0x2E),
        Rgb::new(0x6C, 0x34, 0x83),
        Rgb::new(0xF4, 0xF1, 0xDE),
    ],
    description: "Te favorecen tonos cálidos moderados y colores vivos sin exagerar. Prueba terracota, verde, azul.",
};

static MEDIO_OSCURO: Palette = Palette {
    name: "Medio oscuro",
    colors: &[
        Rgb::new(0xD3, 0x54, 0x00),
        Rgb::new(0x19, 0x6F, 0x3D),
        Rgb::new(0x1A, 0x52, 0x76),
        Rgb::new(0x92, 0x2B, 0x21),
        Rgb::new(0x7D, 0x3C, 0x98),
        Rgb::new(0xFD, 0xEB, 0xD0),
    ],
    description: "Te favorecen tonos cálidos profundos y colores intensos. Prueba mostaza, esmeralda, vino.",
};

static OSCURO: Palette = Palette {
    name: "Oscuro",
    colors: &[
        Rgb::new(0xF4, 0xD0, 0x3F),
        Rgb::new(0xE7, 0x4C, 0x3C),
        Rgb::new(0x5D, 0xAD, 0xE2),
        Rgb::new(0x58, 0xD6, 0x8D),
        Rgb::new(0xAF, 0x7A, 0xC5),
        Rgb::new(0xFF, 0xFF, 0xFF),
    ],
    description: "Te favorecen colores brillantes y contrastes altos. Prueba amarillo, blanco, rojo, turquesa.",
};

pub fn palette(tone: SkinTone) -> &'static Palette {
    match tone {
        SkinTone::Claro => &CLARO,
        SkinTone::MedioClaro => &MEDIO_CLARO,
        SkinTone::MedioOscuro => &MEDIO_OSCURO,
        SkinTone::Oscuro => &OSCURO,
    }
}

/// Light skin reads best with soft contrast, dark skin with strong contrast.
pub fn contrast(tone: SkinTone) -> ContrastLevel {
    match tone {
        SkinTone::Claro => ContrastLevel::Low,
        SkinTone::MedioClaro | SkinTone::MedioOscuro => ContrastLevel::Medium,
        SkinTone::Oscuro => ContrastLevel::High,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Occasions
// ────────────────────────────────────────────────────────────────────────────

pub fn occasion_tips(occasion: Occasion) -> &'static [&'static str] {
    match occasion {
        Occasion::Oficina => &[
            "Colores neutros + 1 color protagonista",
            "Blazer, pantalón recto, blusa simple",
            "Zapatos limpios, accesorios discretos",
        ],
        Occasion::Cita => &[
            "Un punto focal: labios, collar o prenda protagonista",
            "Colores que iluminen (según paleta)",
            "Prenda que te haga sentir cómoda y segura",
        ],
        Occasion::Casual => &[
            "Básicos: jeans recto + camiseta + chaqueta",
            "Capas ligeras y zapatillas limpias",
            "Colores neutros + toques",
        ],
        Occasion::Fiesta => &[
            "Brillos controlados o telas satinadas",
            "Accesorios más protagonistas",
            "Un solo elemento fuerte para no sobrecargar",
        ],
        Occasion::Formal => &[
            "Monocromático o tonos oscuros elegantes",
            "Cortes limpios, telas estructuradas",
            "Accesorios minimalistas",
        ],
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Lookups over possibly-unknown codes
// ────────────────────────────────────────────────────────────────────────────

pub fn shape_rules_or_neutral(shape: Option<BodyShape>) -> &'static ShapeRules {
    shape.map_or(&ShapeRules::NEUTRAL, shape_rules)
}

pub fn palette_or_neutral(tone: Option<SkinTone>) -> &'static Palette {
    tone.map_or(&Palette::NEUTRAL, palette)
}

pub fn occasion_tips_or_empty(occasion: Option<Occasion>) -> &'static [&'static str] {
    match occasion {
        Some(occasion) => occasion_tips(occasion),
        None => &[],
    }
}

pub fn contrast_or_default(tone: Option<SkinTone>) -> ContrastLevel {
    tone.map(contrast).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_shape_has_rules() {
        for shape in BodyShape::ALL {
            let rules = shape_rules(*shape);
            assert!(!rules.objective.is_empty(), "{shape} has no objective");
            assert!(!rules.recommended.is_empty(), "{shape} has no recommendations");
            assert!(!rules.avoid.is_empty(), "{shape} has nothing to avoid");
        }
    }

    #[test]
    fn test_every_tone_has_palette() {
        for tone in SkinTone::ALL {
            let p = palette(*tone);
            assert_eq!(p.colors.len(), 6, "{tone} palette should list six colors");
            assert!(!p.description.is_empty());
            assert!(!p.name.is_empty());
        }
    }

    #[test]
    fn test_every_occasion_has_tips() {
        for occasion in Occasion::ALL {
            assert!(!occasion_tips(*occasion).is_empty(), "{occasion} has no tips");
        }
    }

    #[test]
    fn test_contrast_grows_with_darker_tones() {
        assert_eq!(contrast(SkinTone::Claro), ContrastLevel::Low);
        assert_eq!(contrast(SkinTone::MedioClaro), ContrastLevel::Medium);
        assert_eq!(contrast(SkinTone::MedioOscuro), ContrastLevel::Medium);
        assert_eq!(contrast(SkinTone::Oscuro), ContrastLevel::High);
    }

    #[test]
    fn test_unknown_codes_resolve_to_neutral_values() {
        assert_eq!(*shape_rules_or_neutral(None), ShapeRules::NEUTRAL);
        assert_eq!(*palette_or_neutral(None), Palette::NEUTRAL);
        assert!(occasion_tips_or_empty(None).is_empty());
        assert_eq!(contrast_or_default(None), ContrastLevel::Medium);
    }

    #[test]
    fn test_rgb_hex_round_trip() {
        for tone in SkinTone::ALL {
            for color in palette(*tone).colors {
                assert_eq!(color.to_hex().parse::<Rgb>().unwrap(), *color);
            }
        }
    }

    #[test]
    fn test_rgb_parse_accepts_lowercase() {
        assert_eq!("#2e5aac".parse::<Rgb>().unwrap(), Rgb::new(0x2E, 0x5A, 0xAC));
    }

    #[test]
    fn test_rgb_parse_rejects_malformed() {
        assert!("2E5AAC".parse::<Rgb>().is_err());
        assert!("#2E5AA".parse::<Rgb>().is_err());
        assert!("#GG0000".parse::<Rgb>().is_err());
        assert!("#ééé".parse::<Rgb>().is_err());
    }

    #[test]
    fn test_palette_serializes_colors_as_hex() {
        let json = serde_json::to_value(palette(SkinTone::Claro)).unwrap();
        assert_eq!(json["colors"][0], "#2E5AAC");
        assert_eq!(json["colors"][5], "#FFFFFF");
    }

    #[test]
    fn test_contrast_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&ContrastLevel::High).unwrap(), "\"high\"");
    }
}
