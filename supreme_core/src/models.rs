use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Product category. The serialized names match the storefront's data attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "whey")]
    Whey,
    #[serde(rename = "creatina")]
    Creatina,
    #[serde(rename = "pre-treino")]
    PreTreino,
}

impl Category {
    /// Catalog order of the category groups.
    pub const ALL: [Category; 3] = [Category::Whey, Category::Creatina, Category::PreTreino];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Whey => "whey",
            Category::Creatina => "creatina",
            Category::PreTreino => "pre-treino",
        }
    }

    /// Display label used in the "try searching for" hints.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Whey => "Whey Protein",
            Category::Creatina => "Creatina",
            Category::PreTreino => "Pré-Treino",
        }
    }

    /// Parse a category name. `preTreino` is accepted as the grouping key
    /// used by older page markup.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "whey" => Some(Category::Whey),
            "creatina" => Some(Category::Creatina),
            "pre-treino" | "preTreino" => Some(Category::PreTreino),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Promotional badge shown on a product card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Badge {
    Sale,
    New,
}

impl Badge {
    pub fn as_str(&self) -> &'static str {
        match self {
            Badge::Sale => "sale",
            Badge::New => "new",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Badge::Sale => "Oferta",
            Badge::New => "Novo",
        }
    }
}

/// A purchasable product. Immutable once the catalog is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Decimal>,
    pub image: String,
    pub category: Category,
    pub brand: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<Badge>,
    pub rating: f32,
    pub reviews: u32,
}

impl Product {
    /// Case-insensitive substring match over name, brand and description.
    /// `needle` must already be lowercased.
    pub fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.brand.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }
}

/// One line of the cart. Name, price and image are captured from the product
/// at the time it was first added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    pub image: String,
    pub quantity: u32,
}

impl CartLineItem {
    pub fn from_product(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            image: product.image.clone(),
            quantity: 1,
        }
    }

    /// price x quantity
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Colour scheme of the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn from_system(prefers_dark: bool) -> Self {
        if prefers_dark {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    /// Parse a stored theme value. Accepts both the bare word and its JSON
    /// string form (`dark` and `"dark"`).
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().trim_matches('"') {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    /// Material symbol shown on the toggle
    pub fn icon(&self) -> &'static str {
        match self {
            Theme::Light => "light_mode",
            Theme::Dark => "dark_mode",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Format an amount as Brazilian reais, e.g. `R$ 101,99`.
pub fn format_price(amount: Decimal) -> String {
    let fixed = format!("{:.2}", amount.round_dp(2));
    format!("R$ {}", fixed.replace('.', ","))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(Decimal::new(10199, 2)), "R$ 101,99");
        assert_eq!(format_price(Decimal::ZERO), "R$ 0,00");
        assert_eq!(format_price(Decimal::new(2040, 1)), "R$ 204,00");
    }

    #[test]
    fn test_category_parse() {
        assert_eq!(Category::parse("whey"), Some(Category::Whey));
        assert_eq!(Category::parse("pre-treino"), Some(Category::PreTreino));
        assert_eq!(Category::parse("preTreino"), Some(Category::PreTreino));
        assert_eq!(Category::parse("vitaminas"), None);
    }

    #[test]
    fn test_theme_parse_accepts_bare_and_json() {
        assert_eq!(Theme::parse("dark"), Some(Theme::Dark));
        assert_eq!(Theme::parse("\"light\""), Some(Theme::Light));
        assert_eq!(Theme::parse("blue"), None);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
    }

    #[test]
    fn test_line_total() {
        let item = CartLineItem {
            id: "whey-1".to_string(),
            name: "Whey".to_string(),
            price: Decimal::new(1050, 2),
            image: String::new(),
            quantity: 3,
        };
        assert_eq!(item.line_total(), Decimal::new(3150, 2));
    }
}
