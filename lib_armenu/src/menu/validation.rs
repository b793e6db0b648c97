//! Post-deserialisation checks on fetched and outgoing records.
//!
//! Serde guarantees the shape; these checks reject values the UI cannot use.

use serde_json::Value;
use url::Url;

use super::models::{Item, NewItem};
use crate::retrieve::errors::{FieldError, ValidationApiError};

pub trait Validate {
    /// Appends one `FieldError` per problem, with field names under `prefix`.
    fn collect_errors(&self, prefix: &str, errors: &mut Vec<FieldError>);

    fn validate(&self) -> Result<(), ValidationApiError> {
        let mut errors = Vec::new();
        self.collect_errors("", &mut errors);
        into_result(errors)
    }
}

/// Validates a whole list, naming fields `items[i].field`.
pub fn validate_all<T: Validate>(records: &[T]) -> Result<(), ValidationApiError> {
    let mut errors = Vec::new();
    for (i, record) in records.iter().enumerate() {
        record.collect_errors(&format!("items[{}].", i), &mut errors);
    }
    into_result(errors)
}

fn into_result(errors: Vec<FieldError>) -> Result<(), ValidationApiError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationApiError::new("Response failed schema validation", errors))
    }
}

fn require_text(prefix: &str, field: &str, value: &str, errors: &mut Vec<FieldError>) {
    if value.trim().is_empty() {
        errors.push(FieldError::new(
            format!("{}{}", prefix, field),
            "must not be empty",
            Some(Value::String(value.to_string())),
        ));
    }
}

fn check_url(prefix: &str, field: &str, value: Option<&str>, errors: &mut Vec<FieldError>) {
    let Some(raw) = value else { return };
    let ok = raw.starts_with('/') || Url::parse(raw).map(|u| !u.cannot_be_a_base()).unwrap_or(false);
    if !ok {
        errors.push(FieldError::new(
            format!("{}{}", prefix, field),
            "must be an absolute URL or a root-relative path",
            Some(Value::String(raw.to_string())),
        ));
    }
}

impl Validate for Item {
    fn collect_errors(&self, prefix: &str, errors: &mut Vec<FieldError>) {
        if self.id <= 0 {
            errors.push(FieldError::new(format!("{}id", prefix), "must be positive", Some(Value::from(self.id))));
        }
        require_text(prefix, "name", &self.name, errors);
        require_text(prefix, "category", &self.category, errors);
        require_text(prefix, "price", &self.price, errors);
        check_url(prefix, "model_url_glb", self.model_url_glb.as_deref(), errors);
        check_url(prefix, "model_url_usdz", self.model_url_usdz.as_deref(), errors);
        check_url(prefix, "image_url", self.image_url.as_deref(), errors);
    }
}

impl Validate for NewItem {
    fn collect_errors(&self, prefix: &str, errors: &mut Vec<FieldError>) {
        require_text(prefix, "name", &self.name, errors);
        require_text(prefix, "category", &self.category, errors);
        require_text(prefix, "price", &self.price, errors);
        check_url(prefix, "model_url_glb", self.model_url_glb.as_deref(), errors);
        check_url(prefix, "model_url_usdz", self.model_url_usdz.as_deref(), errors);
        check_url(prefix, "image_url", self.image_url.as_deref(), errors);
        if self.has_ar_model && self.model_url_glb.is_none() && self.model_url_usdz.is_none() {
            errors.push(FieldError::new(
                format!("{}has_ar_model", prefix),
                "AR items need a GLB or USDZ model URL",
                Some(Value::Bool(true)),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i64, name: &str) -> Item {
        Item {
            id,
            name: name.to_string(),
            description: String::new(),
            category: "Ana Yemek".to_string(),
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

    #[test]
    fn valid_item_passes() {
        let mut it = item(1, "Köfte");
        it.image_url = Some("https://cdn.example/kofte.jpg".into());
        it.model_url_glb = Some("/models/kofte.glb".into());
        assert!(it.validate().is_ok());
    }

    #[test]
    fn list_errors_are_indexed() {
        let mut bad = item(0, " ");
        bad.image_url = Some("not a url".into());
        let err = validate_all(&[item(1, "ok"), bad]).unwrap_err();
        let fields: Vec<&str> = err.fields().collect();
        assert_eq!(fields, vec!["items[1].id", "items[1].name", "items[1].image_url"]);
    }

    #[test]
    fn new_ar_item_requires_a_model() {
        let new_item = NewItem {
            name: "Pizza".into(),
            description: String::new(),
            category: "Ana Yemek".into(),
            price: "200".into(),
            has_ar_model: true,
            model_url_glb: None,
            model_url_usdz: None,
            image_url: None,
            dietary: vec![],
        };
        let err = new_item.validate().unwrap_err();
        assert_eq!(err.fields().collect::<Vec<_>>(), vec!["has_ar_model"]);
    }
}
