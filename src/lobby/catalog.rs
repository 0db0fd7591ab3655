//! Game catalog: loaded once per session, categories derived on arrival.

use serde::{Deserialize, Serialize};

use crate::feed::{FeedError, LobbyFeed};
use crate::lobby::category::{CategoryMapping, OTHER};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub id: String,
    pub name: String,
    pub image: String,
    #[serde(default)]
    pub categories: Vec<String>,
}

impl Game {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.categories.iter().any(|t| t == tag)
    }
}

/// Rewrite protocol-relative URLs (`//host/path`) to `https://host/path`.
pub fn normalize_image_url(url: &str) -> String {
    match url.strip_prefix("//") {
        Some(rest) => format!("https://{rest}"),
        None => url.to_string(),
    }
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    games: Vec<Game>,
    categories: Vec<String>,
}

impl Catalog {
    pub fn new(games: Vec<Game>) -> Self {
        let games: Vec<Game> = games
            .into_iter()
            .map(|mut game| {
                game.image = normalize_image_url(&game.image);
                game
            })
            .collect();

        let mut categories: Vec<String> = Vec::new();
        for tag in games.iter().flat_map(|g| g.categories.iter()) {
            if !categories.contains(tag) {
                categories.push(tag.clone());
            }
        }

        Self { games, categories }
    }

    pub fn games(&self) -> &[Game] { &self.games }

    /// Every tag referenced by the catalog, first-seen order.
    pub fn categories(&self) -> &[String] { &self.categories }

    pub fn default_category(&self) -> Option<&str> {
        self.categories.first().map(String::as_str)
    }

    /// Categories offered for selection: own categories first, then the synthetic `other`.
    pub fn tabs(&self, mapping: &CategoryMapping) -> Vec<String> {
        self.categories
            .iter()
            .filter(|c| !mapping.is_other(c))
            .cloned()
            .chain(std::iter::once(OTHER.to_string()))
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<&Game> {
        self.games.iter().find(|g| g.id == id)
    }

    pub fn len(&self) -> usize { self.games.len() }

    pub fn is_empty(&self) -> bool { self.games.is_empty() }
}

/// Fetch the game list once and build the catalog. Errors propagate to the caller.
pub async fn load<F: LobbyFeed>(feed: &F) -> Result<Catalog, FeedError> {
    let games = feed.games().await?;
    let catalog = Catalog::new(games);
    tracing::info!(
        games = catalog.len(),
        categories = catalog.categories().len(),
        default_category = ?catalog.default_category(),
        "catalog loaded"
    );
    Ok(catalog)
}
