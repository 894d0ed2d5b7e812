use serde::de::{self, Unexpected};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Amount given to ingredients entered on a recipe form.
pub const DEFAULT_AMOUNT: f64 = 1.0;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ingredient {
    pub name: String,
    /// Form inputs have stored this as a string (`"2"`) in older records.
    #[serde(deserialize_with = "number_or_numeric_string")]
    pub amount: f64,
}

impl Ingredient {
    pub fn new(name: impl Into<String>, amount: f64) -> Self {
        Self {
            name: name.into(),
            amount,
        }
    }

    /// Ingredient as listed on a recipe, where only the name is entered.
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(name, DEFAULT_AMOUNT)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Number(f64),
    Text(String),
}

fn number_or_numeric_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match RawAmount::deserialize(deserializer)? {
        RawAmount::Number(amount) => Ok(amount),
        RawAmount::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| de::Error::invalid_value(Unexpected::Str(&text), &"a number")),
    }
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingredient_new() {
        let ingredient = Ingredient::new("flour", 2.5);
        assert_eq!(ingredient.name, "flour");
        assert_eq!(ingredient.amount, 2.5);
    }

    #[test]
    fn test_ingredient_named_defaults_amount() {
        let ingredient = Ingredient::named("Salt");
        assert_eq!(ingredient.amount, 1.0);
    }

    #[test]
    fn test_ingredient_display() {
        assert_eq!(format!("{}", Ingredient::new("Milk", 2.0)), "Milk (2)");
        assert_eq!(format!("{}", Ingredient::new("Flour", 0.5)), "Flour (0.5)");
    }

    #[test]
    fn test_amount_accepts_numeric_string() {
        let ingredient: Ingredient =
            serde_json::from_value(serde_json::json!({ "name": "Milk", "amount": " 2.5 " }))
                .unwrap();
        assert_eq!(ingredient, Ingredient::new("Milk", 2.5));

        let ingredient: Ingredient =
            serde_json::from_value(serde_json::json!({ "name": "Eggs", "amount": 6 })).unwrap();
        assert_eq!(ingredient.amount, 6.0);
    }

    #[test]
    fn test_amount_rejects_non_numeric_string() {
        let result: Result<Ingredient, _> =
            serde_json::from_value(serde_json::json!({ "name": "Milk", "amount": "lots" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_ingredient_wire_fields() {
        let json = serde_json::to_value(Ingredient::new("Salt", 1.0)).unwrap();
        assert_eq!(json, serde_json::json!({ "name": "Salt", "amount": 1.0 }));
    }
}
