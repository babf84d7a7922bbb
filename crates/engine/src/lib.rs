//! Recipes, inventory and fest planning for a cocktail bar.
//!
//! The crate has two halves:
//!
//! - pure planning functions ([`shopping_list`], [`advise_ratio`],
//!   [`Inventory::value`]) that work on values already in memory;
//! - [`Engine`], which reads and writes the SQLite database through sea-orm and
//!   feeds the pure half.
//!
//! ```rust
//! use std::num::NonZeroU32;
//!
//! use engine::{FestPlan, Verdict, advise_ratio};
//!
//! let plan = FestPlan::from([("Mojito".to_string(), 10)]);
//! let advice = advise_ratio(&plan, NonZeroU32::new(5).unwrap());
//! assert_eq!(advice.verdict, Verdict::Ok);
//! ```

pub use cocktails::{Cocktail, NewCocktail};
pub use error::EngineError;
pub use fests::{Fest, FestPlan, FestSelection};
pub use import::parse_recipes_csv;
pub use inventory::{Inventory, InventoryLine};
pub use money::{MoneyCents, format_cents};
pub use ops::{Engine, EngineBuilder, ImportReport};
pub use ratio::{HIGH_RATIO, LOW_RATIO, RatioAdvice, TARGET_RATIO, Verdict, advise_ratio};
pub use shopping::{ShoppingLine, ShoppingList, shopping_list};
pub use util::parse_fest_date;

mod cocktails;
mod error;
mod fest_cocktails;
mod fests;
mod import;
mod inventory;
mod money;
mod ops;
mod ratio;
mod recipe_lines;
mod shopping;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
