//! Promo Event Eligibility
//!
//! Decides which promo events an order qualifies for, given the set of
//! product categories present in the order.

use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::domain::promotions::{data::criteria::PromoCriteria, records::PromoEventRecord};

/// Lower-cased, trimmed category set.
pub type CategorySet = FxHashSet<String>;

/// Build the category set of an order from its items' categories.
pub fn order_categories<I, S>(categories: I) -> CategorySet
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    categories
        .into_iter()
        .map(|category| category.as_ref().trim().to_lowercase())
        .filter(|category| !category.is_empty())
        .collect()
}

/// Whether an order with `categories` satisfies `criteria`.
///
/// A category set matches when every listed category is present. An empty
/// list has nothing to qualify on and never matches.
#[must_use]
pub fn criteria_matches(criteria: &PromoCriteria, categories: &CategorySet) -> bool {
    match criteria {
        PromoCriteria::CategorySet { categories: wanted } => {
            !wanted.is_empty()
                && wanted
                    .iter()
                    .all(|category| categories.contains(&category.trim().to_lowercase()))
        }
    }
}

/// Active events with criteria that the order satisfies.
pub fn matching_events<'a>(
    events: &'a [PromoEventRecord],
    categories: &CategorySet,
) -> SmallVec<[&'a PromoEventRecord; 4]> {
    events
        .iter()
        .filter(|event| event.is_active)
        .filter(|event| {
            event
                .criteria
                .as_ref()
                .is_some_and(|criteria| criteria_matches(criteria, categories))
        })
        .collect()
}
