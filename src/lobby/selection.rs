//! Filtering the catalog into the displayed subset.

use serde::Serialize;

use crate::lobby::catalog::{Catalog, Game};
use crate::lobby::category::{classify, CategoryMapping, Ribbon};
use crate::lobby::jackpot::JackpotBook;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayGame {
    pub id: String,
    pub name: String,
    pub image: String,
    pub categories: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jackpot: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ribbon: Option<Ribbon>,
}

impl DisplayGame {
    fn from_game(game: &Game, ribbon: Option<Ribbon>, jackpots: &JackpotBook) -> Self {
        Self {
            id: game.id.clone(),
            name: game.name.clone(),
            image: game.image.clone(),
            categories: game.categories.clone(),
            jackpot: jackpots.get(&game.id).map(|j| j.formatted.clone()),
            ribbon,
        }
    }
}

/// Games matching `category`, in catalog order, with last known jackpots attached.
pub fn select(
    category: &str,
    catalog: &Catalog,
    mapping: &CategoryMapping,
    jackpots: &JackpotBook,
) -> Vec<DisplayGame> {
    catalog
        .games()
        .iter()
        .filter_map(|game| {
            let class = classify(game, mapping);
            class
                .matches_category(category)
                .then(|| DisplayGame::from_game(game, class.ribbon(category), jackpots))
        })
        .collect()
}

/// Overwrite jackpots of displayed games known to the book. Others are left alone.
pub fn refresh_jackpots(displayed: &mut [DisplayGame], jackpots: &JackpotBook) -> usize {
    let mut touched = 0;
    for game in displayed.iter_mut() {
        if let Some(jackpot) = jackpots.get(&game.id) {
            game.jackpot = Some(jackpot.formatted.clone());
            touched += 1;
        }
    }
    touched
}
