//! Category classification and ribbon derivation.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::lobby::catalog::Game;

/// Synthetic category collecting every tag listed in [`CategoryMapping`].
pub const OTHER: &str = "other";
pub const NEW: &str = "new";
pub const TOP: &str = "top";

/// Tags that collapse into the synthetic `other` category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryMapping {
    other: HashSet<String>,
}

impl CategoryMapping {
    pub fn new<I, S>(other: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let other = other
            .into_iter()
            .map(|tag| {
                let tag: String = tag.into();
                tag.trim().to_string()
            })
            .filter(|tag| !tag.is_empty() && tag != OTHER)
            .collect();
        Self { other }
    }

    pub fn is_other(&self, tag: &str) -> bool {
        self.other.contains(tag)
    }

    pub fn other_tags(&self) -> impl Iterator<Item = &str> {
        self.other.iter().map(String::as_str)
    }
}

impl Default for CategoryMapping {
    fn default() -> Self {
        Self::new(["ball", "virtual", "fun"])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Ribbon {
    New,
    Top,
}

impl Ribbon {
    pub fn as_str(&self) -> &'static str {
        match self {
            Ribbon::New => NEW,
            Ribbon::Top => TOP,
        }
    }
}

impl fmt::Display for Ribbon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A game viewed through a [`CategoryMapping`].
#[derive(Debug, Clone, Copy)]
pub struct Classification<'a> {
    game: &'a Game,
    mapping: &'a CategoryMapping,
}

pub fn classify<'a>(game: &'a Game, mapping: &'a CategoryMapping) -> Classification<'a> {
    Classification { game, mapping }
}

impl Classification<'_> {
    pub fn matches_category(&self, category: &str) -> bool {
        if category == OTHER {
            self.game.categories.iter().any(|tag| self.mapping.is_other(tag))
        } else {
            self.game.has_tag(category)
        }
    }

    /// Badge for the game while `active_category` is selected.
    ///
    /// The `new` and `top` tabs never show ribbons. Otherwise `top` outranks `new`.
    pub fn ribbon(&self, active_category: &str) -> Option<Ribbon> {
        if active_category == NEW || active_category == TOP {
            return None;
        }
        if self.game.has_tag(TOP) {
            Some(Ribbon::Top)
        } else if self.game.has_tag(NEW) {
            Some(Ribbon::New)
        } else {
            None
        }
    }
}
