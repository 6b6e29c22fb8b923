//! Crop Lookup Table
//!
//! Maps the classifier's integer labels (1-22) to display names. Labels follow
//! the encoding used when the model was trained; anything outside the table
//! is shown as [`UNKNOWN_CROP`].

use serde::Serialize;

/// Display string for labels with no table entry
pub const UNKNOWN_CROP: &str = "Unknown crop";

/// A single crop entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Crop {
    pub label: i64,
    pub emoji: &'static str,
    pub name: &'static str,
}

impl Crop {
    /// Emoji followed by the name, e.g. "🌾 Rice"
    pub fn display_name(&self) -> String {
        format!("{} {}", self.emoji, self.name)
    }
}

// ============================================================================
// EMBEDDED CROP TABLE
// ============================================================================

pub static CROPS: &[Crop] = &[
    Crop { label: 1, emoji: "🌾", name: "Rice" },
    Crop { label: 2, emoji: "🌽", name: "Maize" },
    Crop { label: 3, emoji: "🌿", name: "Jute" },
    Crop { label: 4, emoji: "☁️", name: "Cotton" },
    Crop { label: 5, emoji: "🥥", name: "Coconut" },
    Crop { label: 6, emoji: "🥭", name: "Papaya" },
    Crop { label: 7, emoji: "🍊", name: "Orange" },
    Crop { label: 8, emoji: "🍎", name: "Apple" },
    Crop { label: 9, emoji: "🍈", name: "Muskmelon" },
    Crop { label: 10, emoji: "🍉", name: "Watermelon" },
    Crop { label: 11, emoji: "🍇", name: "Grapes" },
    Crop { label: 12, emoji: "🥭", name: "Mango" },
    Crop { label: 13, emoji: "🍌", name: "Banana" },
    Crop { label: 14, emoji: "🍑", name: "Pomegranate" },
    Crop { label: 15, emoji: "🫘", name: "Lentil" },
    Crop { label: 16, emoji: "🫘", name: "Black gram" },
    Crop { label: 17, emoji: "🫘", name: "Mung bean" },
    Crop { label: 18, emoji: "🫘", name: "Moth bean" },
    Crop { label: 19, emoji: "🫘", name: "Pigeon pea" },
    Crop { label: 20, emoji: "🫘", name: "Kidney bean" },
    Crop { label: 21, emoji: "🫘", name: "Chickpea" },
    Crop { label: 22, emoji: "☕", name: "Coffee" },
];

/// Crop for a classifier label
pub fn lookup(label: i64) -> Option<&'static Crop> {
    // Table is dense and ordered, label n sits at index n-1
    label
        .checked_sub(1)
        .and_then(|idx| usize::try_from(idx).ok())
        .and_then(|idx| CROPS.get(idx))
        .filter(|c| c.label == label)
}

/// Display name for a label, falling back to [`UNKNOWN_CROP`]
pub fn display_name(label: i64) -> String {
    lookup(label)
        .map(Crop::display_name)
        .unwrap_or_else(|| UNKNOWN_CROP.to_string())
}
