//! Terminal presentation of tag categories.
//!
//! Cards and forms are pure projections of their inputs. The [`Page`] owns
//! the catalog and routes card and form actions back into it.

mod card;
pub use card::{CardAction, CategoryCard};

mod form;
pub use form::FormView;

mod page;
pub use page::{Page, PageHead};

/// Terminal capability detection and colouring.
pub mod terminal;
