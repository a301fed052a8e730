use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;

// ============================================================================
// METADATA STRUCT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiseaseMetadata {
    pub slug: String,
    pub label: String,
    /// Chart color (hex)
    pub color: String,
    /// Icon key understood by the dashboard
    pub icon: String,
}

pub const FALLBACK_COLOR: &str = "#607d8b";
pub const FALLBACK_ICON: &str = "health";

const CASES_SUFFIX: &str = "_cases";
const PREVALENCE_SUFFIX: &str = "_prevalence_pct";

macro_rules! disease {
    ($slug:expr, $label:expr, $color:expr, $icon:expr) => {
        DiseaseMetadata {
            slug: $slug.to_string(),
            label: $label.to_string(),
            color: $color.to_string(),
            icon: $icon.to_string(),
        }
    };
}

// ============================================================================
// STATIC DISEASE CATALOG (Lazy initialization, O(1) lookup)
// ============================================================================

static DISEASES: Lazy<Vec<DiseaseMetadata>> = Lazy::new(|| {
    vec![
        // Vector / water borne
        disease!("dengue_cases", "Dengue", "#e53935", "mosquito"),
        disease!("diarrhea_cases", "Diarrhea", "#8d6e63", "water"),
        disease!("typhoid_cases", "Typhoid Fever", "#fb8c00", "thermometer"),
        disease!("leptospirosis_cases", "Leptospirosis", "#6d4c41", "flood"),

        // Respiratory
        disease!("respiratory_cases", "Respiratory Infections", "#1e88e5", "lungs"),
        disease!("influenza_cases", "Influenza", "#039be5", "virus"),
        disease!("pneumonia_cases", "Pneumonia", "#3949ab", "lungs"),
        disease!("tuberculosis_cases", "Tuberculosis", "#5e35b1", "lungs"),

        // Non-communicable (prevalence columns)
        disease!("hypertension_prevalence_pct", "Hypertension %", "#d81b60", "heart"),
        disease!("diabetes_prevalence_pct", "Diabetes %", "#8e24aa", "droplet"),
        disease!("malnutrition_prevalence_pct", "Malnutrition %", "#43a047", "nutrition"),
    ]
});

static DISEASE_MAP: Lazy<HashMap<String, usize>> = Lazy::new(|| {
    DISEASES
        .iter()
        .enumerate()
        .map(|(idx, d)| (d.slug.clone(), idx))
        .collect()
});

// ============================================================================
// REGISTRY STRUCT & IMPL
// ============================================================================

pub struct Registry;

impl Registry {
    /// All curated diseases
    pub fn get_all() -> &'static Vec<DiseaseMetadata> {
        &DISEASES
    }

    /// O(1) lookup of a curated entry
    pub fn get_metadata(slug: &str) -> Option<DiseaseMetadata> {
        DISEASE_MAP
            .get(slug)
            .and_then(|&idx| DISEASES.get(idx))
            .cloned()
    }

    /// Display metadata for any column id. Never fails: unknown ids get a
    /// derived label and the neutral color/icon.
    pub fn resolve(slug: &str) -> DiseaseMetadata {
        Self::get_metadata(slug).unwrap_or_else(|| DiseaseMetadata {
            slug: slug.to_string(),
            label: derive_label(slug),
            color: FALLBACK_COLOR.to_string(),
            icon: FALLBACK_ICON.to_string(),
        })
    }

    pub fn label(slug: &str) -> String {
        Self::resolve(slug).label
    }
}

/// `unknown_marker_cases` -> `Unknown Marker`, `anemia_prevalence_pct` -> `Anemia %`.
pub fn derive_label(slug: &str) -> String {
    let (stem, percent) = if let Some(stem) = slug.strip_suffix(PREVALENCE_SUFFIX) {
        (stem, true)
    } else if let Some(stem) = slug.strip_suffix(CASES_SUFFIX) {
        (stem, false)
    } else {
        (slug, false)
    };

    let words: Vec<String> = stem
        .split('_')
        .filter(|w| !w.is_empty())
        .map(capitalize)
        .collect();

    let mut label = words.join(" ");
    if percent {
        if label.is_empty() {
            label.push('%');
        } else {
            label.push_str(" %");
        }
    }
    label
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
