//! Catalog lookups by external (IMDb) identifier.

pub mod tmdb;

pub use tmdb::TmdbProvider;

use crate::error::Result;

/// What an external identifier refers to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogEntry {
    Movie {
        title: String,
        /// `YYYY-MM-DD`
        release_date: String,
    },
    Show {
        name: String,
        /// Provider id used for season lookups
        id: u64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Episode {
    pub number: u32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Season {
    pub name: String,
    /// In provider order
    pub episodes: Vec<Episode>,
}

pub trait MetadataProvider {
    fn find_by_external_id(&self, id: &str) -> Result<CatalogEntry>;

    fn get_season(&self, show_id: u64, season_number: u32) -> Result<Season>;
}
