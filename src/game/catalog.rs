//! Game Catalog
//!
//! Immutable catalog entries handed to the session controller.
//! Categories are a display grouping key only; the core never reads them.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Pseudo-category that selects every game.
pub const ALL_CATEGORY: &str = "All";

// =============================================================================
// GAME ID
// =============================================================================

/// Unique catalog identifier.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(pub String);

impl GameId {
    /// Create from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GameId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

// =============================================================================
// DIFFICULTY
// =============================================================================

/// Difficulty tier shown on the game card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    /// Short and forgiving.
    #[serde(alias = "Facile")]
    Easy,
    /// Default tier.
    #[serde(alias = "Moyen")]
    Medium,
    /// Longest games, biggest rewards.
    #[serde(alias = "Difficile")]
    Hard,
}

impl Difficulty {
    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

// =============================================================================
// GAME
// =============================================================================

/// A playable catalog entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    /// Unique identifier.
    pub id: GameId,
    /// Display title.
    pub title: String,
    /// One-line pitch.
    pub description: String,
    /// Grouping key for the category filter.
    pub category: String,
    /// Difficulty tier.
    pub difficulty: Difficulty,
    /// Reward credited on settlement (currency units).
    pub reward: u64,
    /// Simulated play time in seconds.
    pub duration_secs: u32,
    /// Card artwork.
    #[serde(default)]
    pub image: String,
}

impl Game {
    /// Check the entry can be played.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.duration_secs == 0 {
            return Err(CatalogError::ZeroDuration(self.id.clone()));
        }
        Ok(())
    }
}

// =============================================================================
// CATALOG
// =============================================================================

/// Ordered, validated list of games.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Catalog {
    games: Vec<Game>,
}

impl Catalog {
    /// Build a catalog, rejecting unplayable or duplicate entries.
    pub fn new(games: Vec<Game>) -> Result<Self, CatalogError> {
        let mut seen = BTreeSet::new();
        for game in &games {
            game.validate()?;
            if !seen.insert(game.id.clone()) {
                return Err(CatalogError::DuplicateId(game.id.clone()));
            }
        }
        Ok(Self { games })
    }

    /// Built-in mock catalog.
    pub fn builtin() -> Self {
        Self {
            games: builtin_games(),
        }
    }

    /// All games in catalog order.
    pub fn games(&self) -> &[Game] {
        &self.games
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.games.len()
    }

    /// True when the catalog has no entries.
    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    /// Look up a game by id.
    pub fn get(&self, id: &GameId) -> Result<&Game, CatalogError> {
        self.games
            .iter()
            .find(|g| &g.id == id)
            .ok_or_else(|| CatalogError::UnknownGame(id.clone()))
    }

    /// Filter labels: [`ALL_CATEGORY`] followed by each distinct category
    /// in first-seen order.
    pub fn categories(&self) -> Vec<String> {
        let mut out = vec![ALL_CATEGORY.to_string()];
        for game in &self.games {
            if !out.iter().any(|c| c == &game.category) {
                out.push(game.category.clone());
            }
        }
        out
    }

    /// Games shown under a category filter.
    pub fn in_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a Game> + 'a {
        self.games
            .iter()
            .filter(move |g| category == ALL_CATEGORY || g.category == category)
    }
}

/// Catalog errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// Duration must be positive.
    #[error("Game {0} has zero duration")]
    ZeroDuration(GameId),

    /// Two entries share an id.
    #[error("Duplicate game id {0}")]
    DuplicateId(GameId),

    /// Id not present in the catalog.
    #[error("Unknown game {0}")]
    UnknownGame(GameId),
}

fn game(
    id: &str,
    title: &str,
    description: &str,
    category: &str,
    difficulty: Difficulty,
    reward: u64,
    duration_secs: u32,
) -> Game {
    Game {
        id: GameId::from(id),
        title: title.to_string(),
        description: description.to_string(),
        category: category.to_string(),
        difficulty,
        reward,
        duration_secs,
        image: format!("https://picsum.photos/seed/{id}/400/300"),
    }
}

fn builtin_games() -> Vec<Game> {
    vec![
        game(
            "quiz-capitals",
            "Capital Quiz",
            "Name the capital before the clock runs out.",
            "Quiz",
            Difficulty::Easy,
            150,
            5,
        ),
        game(
            "quiz-football",
            "Football Trivia",
            "Ten questions on the continental cup.",
            "Quiz",
            Difficulty::Medium,
            300,
            8,
        ),
        game(
            "puzzle-tiles",
            "Sliding Tiles",
            "Restore the picture in as few moves as possible.",
            "Puzzle",
            Difficulty::Medium,
            400,
            10,
        ),
        game(
            "puzzle-words",
            "Word Hunt",
            "Find every hidden word in the grid.",
            "Puzzle",
            Difficulty::Hard,
            750,
            15,
        ),
        game(
            "arcade-runner",
            "Savanna Runner",
            "Dodge obstacles and grab the coins.",
            "Arcade",
            Difficulty::Easy,
            100,
            3,
        ),
        game(
            "survey-brands",
            "Brand Survey",
            "Share your opinion on local brands.",
            "Survey",
            Difficulty::Easy,
            500,
            12,
        ),
    ]
}
