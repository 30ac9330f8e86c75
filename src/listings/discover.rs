use super::{Listing, SortKey};

/// Filters by a case-insensitive substring of title, location or description,
/// then orders by `sort`. Equal keys keep their input order.
pub fn discover(listings: Vec<Listing>, query: &str, sort: SortKey) -> Vec<Listing> {
    let needle = query.to_lowercase();
    let mut found: Vec<Listing> = listings
        .into_iter()
        .filter(|listing| matches_query(listing, &needle))
        .collect();

    match sort {
        SortKey::Newest => found.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortKey::Oldest => found.sort_by_key(|listing| listing.created_at),
        SortKey::PriceAsc => found.sort_by(|a, b| a.price.total_cmp(&b.price)),
        SortKey::PriceDesc => found.sort_by(|a, b| b.price.total_cmp(&a.price)),
    }

    found
}

fn matches_query(listing: &Listing, needle: &str) -> bool {
    needle.is_empty()
        || [&listing.title, &listing.location, &listing.description]
            .into_iter()
            .any(|field| field.to_lowercase().contains(needle))
}
