//! Client for the public cocktail catalogue at thecocktaildb.com.
//!
//! Only the name search endpoint is used: it maps a drink name to the glass
//! the drink is served in.

mod client;

pub mod error;

pub use client::{CocktailDbClient, DEFAULT_BASE_URL, parse_search};
pub use error::{Error, Result};
