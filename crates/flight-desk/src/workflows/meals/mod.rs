//! In-flight meal menus: composition per airline and class, preference
//! filtering, and the running order total.

mod catalog;
mod order;

pub use catalog::{CatalogError, MealCatalog};
pub use order::{MealOrder, OrderTotal};

use crate::workflows::domain::{Airline, TravelClass, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MealCategory {
    Meal,
    Snack,
}

/// Which menu an item was listed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuSection {
    #[default]
    Base,
    Premium,
    Seasonal,
}

impl MenuSection {
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::Premium => "premium",
            Self::Seasonal => "seasonal",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub name: String,
    pub price: u32,
    pub is_vegetarian: bool,
    pub category: MealCategory,
    #[serde(default, skip_deserializing)]
    pub section: MenuSection,
}

impl MenuItem {
    /// Identifier unique within a composed menu.
    pub fn key(&self) -> String {
        format!("{}:{}", self.section.slug(), self.name)
    }

    pub fn label(&self, travel_class: TravelClass) -> String {
        format!("{} - \u{20b9}{} ({})", self.name, self.price, travel_class)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MealPreference {
    #[default]
    All,
    Veg,
    #[serde(rename = "Non-Veg")]
    NonVeg,
    #[serde(rename = "Snacks Only")]
    SnacksOnly,
}

impl MealPreference {
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Veg => "Veg",
            Self::NonVeg => "Non-Veg",
            Self::SnacksOnly => "Snacks Only",
        }
    }

    /// Veg and Non-Veg both drop every snack, vegetarian or not.
    pub fn admits(self, item: &MenuItem) -> bool {
        let is_snack = item.category == MealCategory::Snack;
        match self {
            Self::All => true,
            Self::Veg => item.is_vegetarian && !is_snack,
            Self::NonVeg => !item.is_vegetarian && !is_snack,
            Self::SnacksOnly => is_snack,
        }
    }
}

impl FromStr for MealPreference {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "veg" => Ok(Self::Veg),
            "non-veg" | "nonveg" | "non_veg" => Ok(Self::NonVeg),
            "snacks only" | "snacks-only" | "snacks" => Ok(Self::SnacksOnly),
            other => Err(ValidationError::UnknownPreference(other.to_string())),
        }
    }
}

impl fmt::Display for MealPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MenuError {
    #[error("no meal menu is available for {0}")]
    UnknownAirline(Airline),
    #[error("'{0}' is not on the current menu")]
    UnknownMenuItem(String),
    #[error("'{0}' matches more than one menu item; use its menu key")]
    AmbiguousMenuItem(String),
}

/// Concatenates base, premium (Business only), and seasonal items in that order.
pub fn compose_menu(
    catalog: &MealCatalog,
    airline: Airline,
    travel_class: TravelClass,
    include_seasonal: bool,
) -> Result<Vec<MenuItem>, MenuError> {
    let mut items = catalog
        .base_menu(airline)
        .ok_or(MenuError::UnknownAirline(airline))?
        .to_vec();

    if travel_class == TravelClass::Business {
        if let Some(premium) = catalog.premium_menu(airline) {
            items.extend_from_slice(premium);
        }
    }

    if include_seasonal {
        items.extend_from_slice(catalog.seasonal_menu());
    }

    Ok(items)
}

pub fn filter_menu(items: &[MenuItem], preference: MealPreference) -> Vec<MenuItem> {
    items
        .iter()
        .filter(|item| preference.admits(item))
        .cloned()
        .collect()
}

/// Finds a visible item by menu key, falling back to a unique name match.
pub fn find_item<'a>(items: &'a [MenuItem], selector: &str) -> Result<&'a MenuItem, MenuError> {
    if let Some(item) = items.iter().find(|item| item.key() == selector) {
        return Ok(item);
    }

    let mut by_name = items.iter().filter(|item| item.name == selector);
    match (by_name.next(), by_name.next()) {
        (Some(item), None) => Ok(item),
        (Some(_), Some(_)) => Err(MenuError::AmbiguousMenuItem(selector.to_string())),
        (None, _) => Err(MenuError::UnknownMenuItem(selector.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[MenuItem]) -> Vec<&str> {
        items.iter().map(|item| item.name.as_str()).collect()
    }

    #[test]
    fn economy_without_seasonal_is_the_base_menu() {
        let catalog = MealCatalog::standard().expect("bundled catalog");
        let menu = compose_menu(&catalog, Airline::Indigo, TravelClass::Economy, false)
            .expect("indigo has a menu");
        assert_eq!(menu, catalog.base_menu(Airline::Indigo).expect("base").to_vec());
        assert_eq!(menu.len(), 12);
        assert_eq!(menu[0].name, "Vegetable Biryani");
        assert!(menu.iter().all(|item| item.section == MenuSection::Base));
    }

    #[test]
    fn business_with_seasonal_concatenates_in_order() {
        let catalog = MealCatalog::standard().expect("bundled catalog");
        let menu = compose_menu(&catalog, Airline::Indigo, TravelClass::Business, true)
            .expect("indigo has a menu");

        let mut expected = catalog.base_menu(Airline::Indigo).expect("base").to_vec();
        expected.extend_from_slice(catalog.premium_menu(Airline::Indigo).expect("premium"));
        expected.extend_from_slice(catalog.seasonal_menu());
        assert_eq!(menu, expected);
        assert_eq!(menu.len(), 12 + 10 + 3);
        assert_eq!(menu.last().map(|item| item.name.as_str()), Some("Jackfruit Biryani"));
    }

    #[test]
    fn economy_with_seasonal_skips_premium() {
        let catalog = MealCatalog::standard().expect("bundled catalog");
        let menu = compose_menu(&catalog, Airline::AirAsia, TravelClass::Economy, true)
            .expect("airasia has a menu");
        assert!(menu.iter().all(|item| item.section != MenuSection::Premium));
        assert_eq!(menu.len(), 15);
    }

    #[test]
    fn airline_without_base_menu_is_unknown() {
        let catalog = MealCatalog::standard().expect("bundled catalog");
        assert_eq!(
            compose_menu(&catalog, Airline::SpiceJet, TravelClass::Economy, false),
            Err(MenuError::UnknownAirline(Airline::SpiceJet))
        );
    }

    #[test]
    fn veg_filter_excludes_vegetarian_snacks() {
        let catalog = MealCatalog::standard().expect("bundled catalog");
        let menu = compose_menu(&catalog, Airline::Indigo, TravelClass::Business, true)
            .expect("menu");
        let veg = filter_menu(&menu, MealPreference::Veg);

        assert!(!veg.is_empty());
        assert!(veg.iter().all(|item| item.category != MealCategory::Snack));
        assert!(veg.iter().all(|item| item.is_vegetarian));
        assert!(!names(&veg).contains(&"Veg Puff"));
        assert!(!names(&veg).contains(&"Mango Kulfi"));
        assert!(names(&veg).contains(&"Jackfruit Biryani"));
    }

    #[test]
    fn non_veg_and_snack_filters() {
        let catalog = MealCatalog::standard().expect("bundled catalog");
        let menu = compose_menu(&catalog, Airline::Indigo, TravelClass::Economy, false)
            .expect("menu");

        assert_eq!(
            names(&filter_menu(&menu, MealPreference::NonVeg)),
            vec![
                "Chicken Biryani",
                "Chicken Curry & Rice",
                "Egg Fried Rice",
                "Fish Biryani"
            ]
        );
        assert_eq!(
            names(&filter_menu(&menu, MealPreference::SnacksOnly)),
            vec!["Veg Puff", "Chicken 65", "Mutton Keema Roll"]
        );
        assert_eq!(filter_menu(&menu, MealPreference::All), menu);
    }

    #[test]
    fn preference_parses_dashboard_labels() {
        assert_eq!("Non-Veg".parse::<MealPreference>(), Ok(MealPreference::NonVeg));
        assert_eq!(
            "Snacks Only".parse::<MealPreference>(),
            Ok(MealPreference::SnacksOnly)
        );
        assert!("vegan".parse::<MealPreference>().is_err());
    }

    #[test]
    fn find_item_prefers_keys_and_flags_ambiguous_names() {
        let catalog = MealCatalog::standard().expect("bundled catalog");
        let menu = compose_menu(&catalog, Airline::Vistara, TravelClass::Business, false)
            .expect("menu");

        assert_eq!(
            find_item(&menu, "Chicken Samosa"),
            Err(MenuError::AmbiguousMenuItem("Chicken Samosa".to_string()))
        );
        let premium = find_item(&menu, "premium:Chicken Samosa").expect("premium key");
        assert_eq!(premium.price, 60);
        assert_eq!(find_item(&menu, "Khakhra").map(|item| item.price), Ok(30));
        assert!(matches!(
            find_item(&menu, "Pizza"),
            Err(MenuError::UnknownMenuItem(_))
        ));
    }

    #[test]
    fn label_shows_price_and_class() {
        let catalog = MealCatalog::standard().expect("bundled catalog");
        let item = &catalog.seasonal_menu()[0];
        assert_eq!(
            item.label(TravelClass::Economy),
            "Mango Kulfi - \u{20b9}50 (Economy)"
        );
    }
}
