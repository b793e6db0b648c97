//! # Client-side Fallback Filtering
//!
//! The backend only lists everything, so category filtering, search,
//! pagination and category derivation are done here on the fetched list.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::models::{Category, Item, PaginatedItems, Pagination};

pub const MIN_LIMIT: i64 = 1;
pub const MAX_LIMIT: i64 = 100;
pub const DEFAULT_LIMIT: i64 = 20;

/// Optional filters applied after fetching all items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemFilters {
    pub category: Option<String>,
    pub search: Option<String>,
}

impl ItemFilters {
    pub fn category(category: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            search: None,
        }
    }

    pub fn search(query: impl Into<String>) -> Self {
        Self {
            category: None,
            search: Some(query.into()),
        }
    }

    fn active_category(&self) -> Option<String> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_lowercase)
    }

    fn active_search(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase)
    }

    pub fn is_empty(&self) -> bool {
        self.active_category().is_none() && self.active_search().is_none()
    }
}

/// True when `query` (already lowercased and trimmed) occurs in the item's
/// name, description or category.
pub fn matches_search(item: &Item, query: &str) -> bool {
    item.name.to_lowercase().contains(query)
        || item.description.to_lowercase().contains(query)
        || item.category.to_lowercase().contains(query)
}

/// Applies the category (case-insensitive equality) and search filters.
/// Empty or absent filters keep every item.
pub fn filter_items(items: Vec<Item>, filters: &ItemFilters) -> Vec<Item> {
    let category = filters.active_category();
    let search = filters.active_search();

    items
        .into_iter()
        .filter(|item| match &category {
            Some(c) => item.category.to_lowercase() == *c,
            None => true,
        })
        .filter(|item| match &search {
            Some(q) => matches_search(item, q),
            None => true,
        })
        .collect()
}

/// Clamps `page` to `>= 1` and `limit` to `[1, 100]`.
pub fn clamp_page_limit(page: i64, limit: i64) -> (u32, u32) {
    let page = page.clamp(1, u32::MAX as i64) as u32;
    let limit = limit.clamp(MIN_LIMIT, MAX_LIMIT) as u32;
    (page, limit)
}

/// Slices `items` into the requested page.
pub fn paginate(items: Vec<Item>, page: i64, limit: i64) -> PaginatedItems {
    let (page, limit) = clamp_page_limit(page, limit);
    let total = items.len();
    let limit_usize = limit as usize;
    let total_pages = total.div_ceil(limit_usize) as u32;

    let start = (page as usize - 1).saturating_mul(limit_usize).min(total);
    let end = start.saturating_add(limit_usize).min(total);
    let page_items: Vec<Item> = items.into_iter().skip(start).take(end - start).collect();

    PaginatedItems {
        items: page_items,
        pagination: Pagination {
            page,
            limit,
            total,
            total_pages,
            has_next_page: page < total_pages,
            has_prev_page: page > 1,
        },
    }
}

/// Groups by exact category string, sorted by the byte order of the name.
pub fn derive_categories(items: &[Item]) -> Vec<Category> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for item in items {
        *counts.entry(item.category.as_str()).or_insert(0) += 1;
    }

    // BTreeMap iteration is already byte order
    counts
        .into_iter()
        .map(|(name, count)| Category {
            name: name.to_string(),
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i64, name: &str, description: &str, category: &str) -> Item {
        Item {
            id,
            name: name.to_string(),
            description: description.to_string(),
            category: category.to_string(),
            price: "100".to_string(),
            has_ar_model: false,
            model_url_glb: None,
            model_url_usdz: None,
            image_url: None,
            dietary: vec![],
            rating: None,
            rating_count: None,
        }
    }

    fn menu() -> Vec<Item> {
        vec![
            item(1, "Adana Kebap", "Spicy minced lamb", "Ana Yemek"),
            item(2, "Mercimek", "Red lentil soup", "Çorba"),
            item(3, "Künefe", "Cheese dessert with syrup", "Tatlı"),
            item(4, "İskender", "Döner over bread with yogurt", "Ana Yemek"),
            item(5, "Ayran", "Salted yogurt drink", "İçecek"),
        ]
    }

    #[test]
    fn category_filter_is_case_insensitive_equality() {
        let out = filter_items(menu(), &ItemFilters::category("ana yemek"));
        assert_eq!(out.iter().map(|i| i.id).collect::<Vec<_>>(), vec![1, 4]);

        // substring of a category is not a match
        assert!(filter_items(menu(), &ItemFilters::category("Ana")).is_empty());
    }

    #[test]
    fn empty_or_absent_filters_return_everything() {
        assert_eq!(filter_items(menu(), &ItemFilters::default()).len(), 5);
        assert_eq!(filter_items(menu(), &ItemFilters::category("  ")).len(), 5);
        assert_eq!(filter_items(menu(), &ItemFilters::search("")).len(), 5);
    }

    #[test]
    fn search_covers_name_description_and_category() {
        let ids = |q: &str| {
            filter_items(menu(), &ItemFilters::search(q))
                .iter()
                .map(|i| i.id)
                .collect::<Vec<_>>()
        };
        assert_eq!(ids("  YOGURT "), vec![4, 5]);
        assert_eq!(ids("kebap"), vec![1]);
        assert_eq!(ids("tatlı"), vec![3]);
        assert!(ids("pizza").is_empty());
    }

    #[test]
    fn category_and_search_combine() {
        let filters = ItemFilters {
            category: Some("Ana Yemek".into()),
            search: Some("yogurt".into()),
        };
        let out = filter_items(menu(), &filters);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, 4);
    }

    #[test]
    fn first_page_of_two_single_item_pages() {
        let items = vec![item(1, "A", "", "Ana Yemek"), item(2, "B", "", "Çorba")];
        let page = paginate(items, 1, 1);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id, 1);
        assert_eq!(
            page.pagination,
            Pagination {
                page: 1,
                limit: 1,
                total: 2,
                total_pages: 2,
                has_next_page: true,
                has_prev_page: false,
            }
        );
    }

    #[test]
    fn page_length_matches_remaining_items() {
        let total = menu().len() as i64;
        for limit in 1..=6 {
            let pages = (total + limit - 1) / limit;
            for page in 1..=pages {
                let out = paginate(menu(), page, limit);
                let expected = limit.min(total - (page - 1) * limit) as usize;
                assert_eq!(out.items.len(), expected, "page {} limit {}", page, limit);
                assert_eq!(out.pagination.has_next_page, (page as u32) < out.pagination.total_pages);
                assert_eq!(out.pagination.has_prev_page, page > 1);
            }
        }
    }

    #[test]
    fn page_and_limit_are_clamped() {
        let out = paginate(menu(), 0, 0);
        assert_eq!(out.pagination.page, 1);
        assert_eq!(out.pagination.limit, 1);
        assert_eq!(out.items[0].id, 1);

        let out = paginate(menu(), -4, 1000);
        assert_eq!(out.pagination.page, 1);
        assert_eq!(out.pagination.limit, 100);
        assert_eq!(out.pagination.total_pages, 1);
        assert_eq!(out.items.len(), 5);
    }

    #[test]
    fn page_past_the_end_is_empty() {
        let out = paginate(menu(), 9, 2);
        assert!(out.items.is_empty());
        assert_eq!(out.pagination.total_pages, 3);
        assert!(!out.pagination.has_next_page);
        assert!(out.pagination.has_prev_page);
    }

    #[test]
    fn empty_list_has_zero_pages() {
        let out = paginate(vec![], 1, 10);
        assert_eq!(out.pagination.total, 0);
        assert_eq!(out.pagination.total_pages, 0);
        assert!(!out.pagination.has_next_page);
    }

    #[test]
    fn categories_for_two_items() {
        let items = vec![item(1, "A", "", "Ana Yemek"), item(2, "B", "", "Çorba")];
        assert_eq!(
            derive_categories(&items),
            vec![
                Category {
                    name: "Ana Yemek".into(),
                    count: 1
                },
                Category {
                    name: "Çorba".into(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn categories_are_sorted_and_counts_sum_to_total() {
        let cats = derive_categories(&menu());
        let names: Vec<&str> = cats.iter().map(|c| c.name.as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert_eq!(cats.iter().map(|c| c.count).sum::<usize>(), menu().len());
        assert_eq!(cats.iter().find(|c| c.name == "Ana Yemek").unwrap().count, 2);
    }

    #[test]
    fn mixed_case_categories_sort_by_bytes() {
        let items = vec![item(1, "x", "", "b"), item(2, "y", "", "A"), item(3, "z", "", "C")];
        let names: Vec<String> = derive_categories(&items).into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["A", "C", "b"]);
    }

    #[test]
    fn category_grouping_is_exact() {
        let items = vec![item(1, "A", "", "Tatlı"), item(2, "B", "", "tatlı")];
        let cats = derive_categories(&items);
        assert_eq!(cats.len(), 2);
    }
}
