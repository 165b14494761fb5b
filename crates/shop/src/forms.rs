//! Typed form inputs and their validation.
//!
//! Each mutating operation deserializes a raw input struct from the form
//! body and validates it explicitly, producing either a typed value the
//! repository layer accepts or a [`FormErrors`] set the templates render
//! next to the form. HTML forms submit everything as strings, so numeric
//! fields are parsed here.

use serde::Deserialize;

use copperpot_core::{CategoryId, Price, PriceError};

use crate::db::ProductChanges;

/// Maximum length for names, matching typical varchar sizing.
const MAX_NAME_LEN: usize = 255;

/// A validation error attached to one form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// The form field the message belongs to.
    pub field: &'static str,
    /// Human-readable message rendered next to the field.
    pub message: String,
}

/// An ordered set of field errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors(Vec<FieldError>);

impl FormErrors {
    /// Record an error against a field.
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// Whether validation passed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate the errors in the order they were recorded.
    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.0.iter()
    }

    /// Number of recorded errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl<'a> IntoIterator for &'a FormErrors {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Raw category creation form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryInput {
    #[serde(default)]
    pub name: String,
}

impl CategoryInput {
    /// Validate the form, returning the trimmed name.
    ///
    /// # Errors
    ///
    /// Returns the field errors when the name is blank or too long.
    pub fn validate(&self) -> Result<String, FormErrors> {
        let mut errors = FormErrors::default();
        let name = validate_name(&self.name, &mut errors);
        if errors.is_empty() {
            Ok(name)
        } else {
            Err(errors)
        }
    }
}

/// Raw product form, shared by creation and edit.
///
/// All fields arrive as strings. On the creation path every field is
/// required; on the edit path a blank field means "keep the stored value".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
}

/// Validated fields for creating a product (category comes from the URL).
#[derive(Debug, Clone)]
pub struct ValidProduct {
    pub name: String,
    pub price: Price,
    pub amount: i32,
    pub description: String,
}

impl ProductInput {
    /// Validate for product creation: every field is required.
    ///
    /// # Errors
    ///
    /// Returns the accumulated field errors; all fields are checked so the
    /// form can show every problem at once.
    pub fn validate_new(&self) -> Result<ValidProduct, FormErrors> {
        let mut errors = FormErrors::default();

        let name = validate_name(&self.name, &mut errors);

        let price = parse_price(&self.price, &mut errors).unwrap_or(Price::ZERO);
        let amount = parse_amount(&self.amount, &mut errors).unwrap_or(0);

        let description = self.description.trim().to_owned();
        if description.is_empty() {
            errors.push("description", "This field is required.");
        }

        if errors.is_empty() {
            Ok(ValidProduct {
                name,
                price,
                amount,
                description,
            })
        } else {
            Err(errors)
        }
    }

    /// Validate for product edit: blank fields keep the stored value.
    ///
    /// # Errors
    ///
    /// Returns the field errors for any present-but-invalid field.
    pub fn validate_edit(&self) -> Result<ProductChanges, FormErrors> {
        let mut errors = FormErrors::default();
        let mut changes = ProductChanges::default();

        let name = self.name.trim();
        if !name.is_empty() {
            changes.name = Some(validate_name(name, &mut errors));
        }

        if !self.price.trim().is_empty() {
            changes.price = parse_price(&self.price, &mut errors);
        }

        if !self.amount.trim().is_empty() {
            changes.amount = parse_amount(&self.amount, &mut errors);
        }

        let description = self.description.trim();
        if !description.is_empty() {
            changes.description = Some(description.to_owned());
        }

        let category = self.category.trim();
        if !category.is_empty() {
            match category.parse::<i32>() {
                Ok(id) => changes.category_id = Some(CategoryId::new(id)),
                Err(_) => errors.push("category", "Select a valid category."),
            }
        }

        if errors.is_empty() {
            Ok(changes)
        } else {
            Err(errors)
        }
    }
}

/// Trim and length-check a name field.
fn validate_name(raw: &str, errors: &mut FormErrors) -> String {
    let name = raw.trim().to_owned();
    if name.is_empty() {
        errors.push("name", "This field is required.");
    } else if name.len() > MAX_NAME_LEN {
        errors.push(
            "name",
            format!("Ensure this value has at most {MAX_NAME_LEN} characters."),
        );
    }
    name
}

fn parse_price(raw: &str, errors: &mut FormErrors) -> Option<Price> {
    match Price::parse(raw) {
        Ok(price) => Some(price),
        Err(PriceError::Invalid) => {
            errors.push("price", "Enter a number.");
            None
        }
        Err(PriceError::Negative) => {
            errors.push("price", "Price must not be negative.");
            None
        }
    }
}

fn parse_amount(raw: &str, errors: &mut FormErrors) -> Option<i32> {
    match raw.trim().parse::<i32>() {
        Ok(amount) if amount >= 0 => Some(amount),
        Ok(_) => {
            errors.push("amount", "Amount must not be negative.");
            None
        }
        Err(_) => {
            errors.push("amount", "Enter a whole number.");
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product_input(name: &str, price: &str, amount: &str, description: &str) -> ProductInput {
        ProductInput {
            name: name.to_string(),
            price: price.to_string(),
            amount: amount.to_string(),
            description: description.to_string(),
            category: String::new(),
        }
    }

    #[test]
    fn category_name_is_trimmed() {
        let input = CategoryInput {
            name: "  Garden Tools  ".to_string(),
        };
        assert_eq!(input.validate().unwrap(), "Garden Tools");
    }

    #[test]
    fn blank_category_name_is_rejected() {
        let input = CategoryInput {
            name: "   ".to_string(),
        };
        let errors = input.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.iter().next().unwrap().field, "name");
    }

    #[test]
    fn over_long_category_name_is_rejected() {
        let input = CategoryInput {
            name: "x".repeat(MAX_NAME_LEN + 1),
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn valid_product_passes() {
        let input = product_input("Widget", "19.99", "3", "A fine widget");
        let valid = input.validate_new().unwrap();
        assert_eq!(valid.name, "Widget");
        assert_eq!(valid.price, Price::parse("19.99").unwrap());
        assert_eq!(valid.amount, 3);
        assert_eq!(valid.description, "A fine widget");
    }

    #[test]
    fn new_product_requires_every_field() {
        let input = product_input("", "", "", "");
        let errors = input.validate_new().unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["name", "price", "amount", "description"]);
    }

    #[test]
    fn negative_price_and_amount_are_rejected() {
        let input = product_input("Widget", "-1", "-2", "x");
        let errors = input.validate_new().unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["price", "amount"]);
    }

    #[test]
    fn edit_with_blank_fields_keeps_stored_values() {
        let input = product_input("", "", "", "");
        let changes = input.validate_edit().unwrap();
        assert!(changes.name.is_none());
        assert!(changes.price.is_none());
        assert!(changes.amount.is_none());
        assert!(changes.description.is_none());
        assert!(changes.category_id.is_none());
    }

    #[test]
    fn edit_overwrites_only_present_fields() {
        let mut input = product_input("New Name", "", "7", "");
        input.category = "2".to_string();
        let changes = input.validate_edit().unwrap();
        assert_eq!(changes.name.as_deref(), Some("New Name"));
        assert!(changes.price.is_none());
        assert_eq!(changes.amount, Some(7));
        assert!(changes.description.is_none());
        assert_eq!(changes.category_id, Some(CategoryId::new(2)));
    }

    #[test]
    fn edit_rejects_present_but_invalid_fields() {
        let input = product_input("", "cheap", "many", "");
        let errors = input.validate_edit().unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["price", "amount"]);
    }

    #[test]
    fn edit_rejects_non_numeric_category() {
        let mut input = product_input("", "", "", "");
        input.category = "garden".to_string();
        let errors = input.validate_edit().unwrap_err();
        assert_eq!(errors.iter().next().unwrap().field, "category");
    }
}
