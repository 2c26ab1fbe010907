use std::cmp::Ordering;

use fetchql::ast::{OrderByItem, OrderDirection};

use crate::selection::filter::Filterable;
use crate::value::compare_values;

/// Compare two items by a list of ordering keys. Nulls sort before any value; values with no
/// common type tie, leaving them to later keys.
pub fn compare_by_order<T: Filterable>(a: &T, b: &T, order_by: &[OrderByItem]) -> Ordering {
    for order_item in order_by {
        let property_name = order_item.path.property();

        let cmp = match (a.value(property_name), b.value(property_name)) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(a_val), Some(b_val)) => compare_values(&a_val, &b_val).unwrap_or(Ordering::Equal),
        };

        let cmp = match order_item.direction {
            OrderDirection::Asc => cmp,
            OrderDirection::Desc => cmp.reverse(),
        };

        if cmp != Ordering::Equal {
            return cmp;
        }
    }
    Ordering::Equal
}

/// Stable sort: items equal under every key keep their incoming order.
pub fn sort_items_by_order<T: Filterable>(items: &mut [T], order_by: &[OrderByItem]) {
    if order_by.is_empty() {
        return;
    }
    items.sort_by(|a, b| compare_by_order(a, b, order_by));
}
