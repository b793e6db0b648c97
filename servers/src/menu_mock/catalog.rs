//! Built-in demo catalog and loading of custom catalogs.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use lib_armenu::menu::models::{Item, ItemId, NutritionFacts};
use lib_armenu::menu::validation::validate_all;

fn item(id: ItemId, name: &str, category: &str, price: &str, description: &str) -> Item {
    Item {
        id,
        name: name.to_string(),
        description: description.to_string(),
        category: category.to_string(),
        price: price.to_string(),
        has_ar_model: false,
        model_url_glb: None,
        model_url_usdz: None,
        image_url: Some(format!("/images/{}.jpg", id)),
        dietary: Vec::new(),
        rating: None,
        rating_count: None,
    }
}

fn with_models(mut item: Item, glb: Option<&str>, usdz: Option<&str>) -> Item {
    item.has_ar_model = true;
    item.model_url_glb = glb.map(str::to_string);
    item.model_url_usdz = usdz.map(str::to_string);
    item
}

pub fn demo_items() -> Vec<Item> {
    let mut lentil = item(1, "Mercimek Çorbası", "Çorba", "₺85", "Red lentil soup with lemon");
    lentil.dietary = vec!["vegan".to_string()];
    lentil.rating = Some(4.6);
    lentil.rating_count = Some(212);

    let mut adana = with_models(
        item(2, "Adana Kebap", "Ana Yemek", "₺320", "Spicy minced lamb kebab"),
        Some("/models/adana.glb"),
        Some("/models/adana.usdz"),
    );
    adana.rating = Some(4.8);
    adana.rating_count = Some(540);

    vec![
        lentil,
        adana,
        with_models(
            item(3, "Karnıyarık", "Ana Yemek", "₺260", "Stuffed aubergine with minced beef"),
            Some("/models/karniyarik.glb"),
            None,
        ),
        with_models(
            item(4, "Künefe", "Tatlı", "₺180", "Shredded pastry with cheese and syrup"),
            None,
            Some("/models/kunefe.usdz"),
        ),
        item(5, "Ayran", "İçecek", "₺40", "Cold yogurt drink"),
        item(6, "Çoban Salata", "Salata", "₺110", "Tomato, cucumber and pepper salad"),
    ]
}

pub fn demo_nutrition() -> HashMap<ItemId, NutritionFacts> {
    let mut facts = HashMap::new();
    facts.insert(
        1,
        NutritionFacts {
            calories: Some(230.0),
            protein_g: Some(12.5),
            carbs_g: Some(34.0),
            fat_g: Some(5.0),
            fiber_g: Some(8.0),
            sugar_g: Some(3.0),
            sodium_mg: Some(640.0),
            allergens: Vec::new(),
        },
    );
    facts.insert(
        2,
        NutritionFacts {
            calories: Some(780.0),
            protein_g: Some(45.0),
            fat_g: Some(52.0),
            allergens: vec!["gluten".to_string()],
            ..Default::default()
        },
    );
    facts.insert(
        4,
        NutritionFacts {
            calories: Some(560.0),
            sugar_g: Some(48.0),
            allergens: vec!["gluten".to_string(), "milk".to_string(), "nuts".to_string()],
            ..Default::default()
        },
    );
    facts
}

/// Reads a JSON array of items, rejecting records the client would reject.
pub fn load_items(path: &Path) -> Result<Vec<Item>> {
    let raw = fs::read_to_string(path).with_context(|| format!("Failed to read catalog {}", path.display()))?;
    let items: Vec<Item> =
        serde_json::from_str(&raw).with_context(|| format!("Failed to parse catalog {}", path.display()))?;
    validate_all(&items).with_context(|| format!("Catalog {} contains invalid items", path.display()))?;
    Ok(items)
}
