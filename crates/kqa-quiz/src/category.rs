//! Quiz categories and their display catalog.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// A quiz topic.
///
/// The wire form is the snake_case slug (`reading_adventure`), the display
/// form is the human name returned by [`Category::name`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Animals,
    FamousPeople,
    Flags,
    Logos,
    Countries,
    UsStates,
    Birds,
    MathWizards,
    ReadingAdventure,
    ScienceExplorers,
    SocialStudies,
    RamayanaForKids,
    MahabharataTales,
    IndianMythology,
    GlobalMythology,
}

impl Category {
    /// Every category, in declaration order.
    pub const ALL: [Self; 15] = [
        Self::Animals,
        Self::FamousPeople,
        Self::Flags,
        Self::Logos,
        Self::Countries,
        Self::UsStates,
        Self::Birds,
        Self::MathWizards,
        Self::ReadingAdventure,
        Self::ScienceExplorers,
        Self::SocialStudies,
        Self::RamayanaForKids,
        Self::MahabharataTales,
        Self::IndianMythology,
        Self::GlobalMythology,
    ];

    /// Human readable name, also used in generation prompts.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Animals => "Animals",
            Self::FamousPeople => "Famous People",
            Self::Flags => "Flags",
            Self::Logos => "Logos",
            Self::Countries => "Countries",
            Self::UsStates => "US States",
            Self::Birds => "Birds",
            Self::MathWizards => "Math Wizards",
            Self::ReadingAdventure => "Reading Adventure",
            Self::ScienceExplorers => "Science Explorers",
            Self::SocialStudies => "Social Studies",
            Self::RamayanaForKids => "Ramayana for Kids",
            Self::MahabharataTales => "Mahabharata Tales",
            Self::IndianMythology => "Indian Mythology",
            Self::GlobalMythology => "Global Mythology",
        }
    }

    /// Snake_case slug, identical to the serde representation.
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Animals => "animals",
            Self::FamousPeople => "famous_people",
            Self::Flags => "flags",
            Self::Logos => "logos",
            Self::Countries => "countries",
            Self::UsStates => "us_states",
            Self::Birds => "birds",
            Self::MathWizards => "math_wizards",
            Self::ReadingAdventure => "reading_adventure",
            Self::ScienceExplorers => "science_explorers",
            Self::SocialStudies => "social_studies",
            Self::RamayanaForKids => "ramayana_for_kids",
            Self::MahabharataTales => "mahabharata_tales",
            Self::IndianMythology => "indian_mythology",
            Self::GlobalMythology => "global_mythology",
        }
    }

    /// Whether questions in this category come with a reading passage.
    pub const fn is_comprehension(self) -> bool {
        matches!(self, Self::ReadingAdventure)
    }

    /// Display descriptor for this category.
    pub fn card(self) -> &'static CategoryCard {
        // Every variant has exactly one catalog entry, checked by the tests below.
        CATALOG
            .iter()
            .find(|card| card.category == self)
            .unwrap_or(&CATALOG[0])
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.slug() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Returned when parsing a slug that names no category.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category: '{0}'")]
pub struct UnknownCategory(pub String);

/// Static display metadata for one category card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryCard {
    /// The category this card starts
    pub category: Category,
    /// Emoji shown on the card
    pub icon: &'static str,
    /// Background color token
    pub color: &'static str,
}

/// The category selector, in display order.
pub const CATALOG: [CategoryCard; 15] = [
    CategoryCard { category: Category::Animals, icon: "🦁", color: "orange-500" },
    CategoryCard { category: Category::RamayanaForKids, icon: "🏹", color: "amber-600" },
    CategoryCard { category: Category::MahabharataTales, icon: "⚔️", color: "rose-600" },
    CategoryCard { category: Category::IndianMythology, icon: "🕉️", color: "orange-600" },
    CategoryCard { category: Category::ReadingAdventure, icon: "📖", color: "blue-600" },
    CategoryCard { category: Category::ScienceExplorers, icon: "🧪", color: "cyan-500" },
    CategoryCard { category: Category::MathWizards, icon: "➕", color: "pink-500" },
    CategoryCard { category: Category::GlobalMythology, icon: "⚡", color: "purple-600" },
    CategoryCard { category: Category::SocialStudies, icon: "🏘️", color: "emerald-600" },
    CategoryCard { category: Category::Flags, icon: "🚩", color: "red-500" },
    CategoryCard { category: Category::Birds, icon: "🦜", color: "yellow-500" },
    CategoryCard { category: Category::Countries, icon: "🌍", color: "green-500" },
    CategoryCard { category: Category::FamousPeople, icon: "🌟", color: "indigo-500" },
    CategoryCard { category: Category::UsStates, icon: "🗽", color: "teal-600" },
    CategoryCard { category: Category::Logos, icon: "🏷️", color: "slate-600" },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_covers_every_category_once() {
        for category in Category::ALL {
            let count = CATALOG.iter().filter(|c| c.category == category).count();
            assert_eq!(count, 1, "{category} should appear exactly once");
            assert_eq!(category.card().category, category);
        }
    }

    #[test]
    fn test_slug_matches_serde() {
        for category in Category::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.slug()));
            assert_eq!(category.slug().parse::<Category>().unwrap(), category);
        }
    }

    #[test]
    fn test_unknown_slug() {
        assert!("dinosaurs".parse::<Category>().is_err());
        assert!("Animals".parse::<Category>().is_err());
    }

    #[test]
    fn test_only_reading_is_comprehension() {
        let comprehension: Vec<_> = Category::ALL
            .into_iter()
            .filter(|c| c.is_comprehension())
            .collect();
        assert_eq!(comprehension, vec![Category::ReadingAdventure]);
    }

    #[test]
    fn test_display_uses_name() {
        assert_eq!(Category::UsStates.to_string(), "US States");
        assert_eq!(Category::RamayanaForKids.to_string(), "Ramayana for Kids");
    }
}
