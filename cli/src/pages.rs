//! Text rendering of the menu pages.

use std::fmt::Write as _;

use lib_armenu::hooks::ArSession;
use lib_armenu::menu::{Category, HealthStatus, Item, ItemDetail, ItemId, NutritionFacts, Pagination};
use lib_armenu::MenuError;

pub fn render_items(items: &[Item], pagination: Option<&Pagination>) -> String {
    let mut out = String::new();
    if items.is_empty() {
        out.push_str("No items match.\n");
    }
    for item in items {
        let ar = if item.ar_ready() { " [AR]" } else { "" };
        let _ = writeln!(out, "{:>4}  {:<28} {:<14} {:>8}{}", item.id, item.name, item.category, item.price, ar);
    }
    if let Some(p) = pagination {
        let _ = writeln!(
            out,
            "Page {} of {} ({} items, {} per page){}{}",
            p.page,
            p.total_pages.max(1),
            p.total,
            p.limit,
            if p.has_prev_page { "  --page for previous" } else { "" },
            if p.has_next_page { "  more pages available" } else { "" },
        );
    }
    out
}

pub fn render_categories(categories: &[Category]) -> String {
    let mut out = String::new();
    for c in categories {
        let _ = writeln!(out, "{:<20} {}", c.name, c.count);
    }
    let total: usize = categories.iter().map(|c| c.count).sum();
    let _ = writeln!(out, "{} categories, {} items", categories.len(), total);
    out
}

pub fn render_item_detail(detail: &ItemDetail, nutrition: Option<&NutritionFacts>) -> String {
    let item = &detail.item;
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", item.name, item.price);
    let _ = writeln!(out, "Category: {}", item.category);
    if !item.description.is_empty() {
        let _ = writeln!(out, "{}", item.description);
    }
    if let (Some(rating), Some(count)) = (item.rating, item.rating_count) {
        let _ = writeln!(out, "Rating: {:.1} ({} reviews)", rating, count);
    }
    if !item.dietary.is_empty() {
        let _ = writeln!(out, "Dietary: {}", item.dietary.join(", "));
    }
    if !detail.tags.is_empty() {
        let _ = writeln!(out, "Tags: {}", detail.tags.join(", "));
    }
    if detail.available == Some(false) {
        out.push_str("Currently unavailable\n");
    }
    let _ = writeln!(out, "AR model: {}", if item.ar_ready() { "available" } else { "none" });

    match nutrition {
        Some(facts) => out.push_str(&render_nutrition(facts)),
        None => out.push_str("Nutrition facts: not available\n"),
    }
    out
}

fn render_nutrition(facts: &NutritionFacts) -> String {
    let mut out = String::from("Nutrition facts:\n");
    let rows = [
        ("Calories", facts.calories, "kcal"),
        ("Protein", facts.protein_g, "g"),
        ("Carbohydrates", facts.carbs_g, "g"),
        ("Fat", facts.fat_g, "g"),
        ("Fiber", facts.fiber_g, "g"),
        ("Sugar", facts.sugar_g, "g"),
        ("Sodium", facts.sodium_mg, "mg"),
    ];
    for (label, value, unit) in rows {
        if let Some(v) = value {
            let _ = writeln!(out, "  {:<14} {} {}", label, v, unit);
        }
    }
    if !facts.allergens.is_empty() {
        let _ = writeln!(out, "  Allergens: {}", facts.allergens.join(", "));
    }
    out
}

pub fn render_ar_session(session: &ArSession) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} on {}", session.item.name, session.platform);
    let _ = writeln!(out, "Model ({:?}): {}", session.model.format, session.model.url);
    let _ = writeln!(out, "Open: {}", session.launch_url);
    out
}

pub fn render_health(status: &HealthStatus) -> String {
    if status.is_healthy() {
        format!("Backend is healthy ({})\n", status.status)
    } else {
        format!("Backend reports status '{}'\n", status.status)
    }
}

pub fn not_found_message(id: ItemId) -> String {
    format!("Item {} was not found. It may have been removed from the menu.", id)
}

/// Message for failures other than not-found.
pub fn failure_message(what: &str, err: &MenuError) -> String {
    match err {
        MenuError::Validation(v) => {
            let fields: Vec<&str> = v.fields().collect();
            format!("Could not load {}: {} [{}]", what, v.message, fields.join(", "))
        }
        MenuError::Api(e) if err.is_retryable() => {
            format!("Could not load {}: {}. Please try again.", what, e.message)
        }
        MenuError::Api(e) => format!("Could not load {}: {}", what, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lib_armenu::{ApiError, ErrorCode, FieldError, ValidationApiError};

    fn item(id: ItemId, name: &str, category: &str) -> Item {
        serde_json::from_value(serde_json::json!({
            "id": id, "name": name, "category": category, "price": "₺10"
        }))
        .unwrap()
    }

    #[test]
    fn item_list_shows_pagination_footer() {
        let items = vec![item(1, "Ayran", "İçecek")];
        let pagination = Pagination {
            page: 1,
            limit: 1,
            total: 2,
            total_pages: 2,
            has_next_page: true,
            has_prev_page: false,
        };
        let text = render_items(&items, Some(&pagination));
        assert!(text.contains("Ayran"));
        assert!(text.contains("Page 1 of 2 (2 items, 1 per page)"));
        assert!(text.contains("more pages available"));
        assert!(!text.contains("previous"));
    }

    #[test]
    fn empty_list_says_so() {
        assert_eq!(render_items(&[], None), "No items match.\n");
    }

    #[test]
    fn category_totals() {
        let categories = vec![
            Category { name: "Ana Yemek".to_string(), count: 2 },
            Category { name: "Çorba".to_string(), count: 1 },
        ];
        assert!(render_categories(&categories).ends_with("2 categories, 3 items\n"));
    }

    #[test]
    fn detail_without_nutrition() {
        let detail = ItemDetail::from(item(4, "Künefe", "Tatlı"));
        let text = render_item_detail(&detail, None);
        assert!(text.starts_with("Künefe (₺10)"));
        assert!(text.contains("Nutrition facts: not available"));
    }

    #[test]
    fn detail_with_nutrition_lists_known_figures_only() {
        let detail = ItemDetail::from(item(1, "Mercimek", "Çorba"));
        let facts = NutritionFacts {
            calories: Some(230.0),
            allergens: vec!["celery".to_string()],
            ..Default::default()
        };
        let text = render_item_detail(&detail, Some(&facts));
        assert!(text.contains("Calories"));
        assert!(!text.contains("Sodium"));
        assert!(text.contains("Allergens: celery"));
    }

    #[test]
    fn failure_messages() {
        let net: MenuError = ApiError::new(ErrorCode::NetworkError, "connection refused").into();
        assert!(failure_message("item", &net).ends_with("Please try again."));

        let invalid: MenuError = ValidationApiError::new(
            "Response failed schema validation",
            vec![FieldError::new("items[0].name", "must not be empty", None)],
        )
        .into();
        assert!(failure_message("item", &invalid).contains("items[0].name"));

        assert!(not_found_message(7).starts_with("Item 7 was not found"));
    }
}
