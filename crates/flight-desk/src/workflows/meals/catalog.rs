use super::{MenuItem, MenuSection};
use crate::workflows::domain::Airline;
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::io::Read;
use std::path::Path;

const STANDARD_CATALOG: &str = include_str!("../../../data/meal_catalog.json");

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read meal catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("meal catalog is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("meal catalog lists unknown airline '{0}'")]
    InvalidAirline(String),
    #[error("{menu} menu contains an item without a name")]
    EmptyName { menu: String },
    #[error("{menu} menu lists '{item}' more than once")]
    DuplicateItem { menu: String, item: String },
}

#[derive(Debug, Deserialize)]
struct RawCatalog {
    base: BTreeMap<String, Vec<MenuItem>>,
    #[serde(default)]
    premium: BTreeMap<String, Vec<MenuItem>>,
    #[serde(default)]
    seasonal: Vec<MenuItem>,
}

/// Validated menu tables keyed by airline.
#[derive(Debug, Clone, PartialEq)]
pub struct MealCatalog {
    base: BTreeMap<Airline, Vec<MenuItem>>,
    premium: BTreeMap<Airline, Vec<MenuItem>>,
    seasonal: Vec<MenuItem>,
}

impl MealCatalog {
    /// Catalog bundled with the crate.
    pub fn standard() -> Result<Self, CatalogError> {
        Self::from_json_str(STANDARD_CATALOG)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let raw: RawCatalog = serde_json::from_reader(reader)?;
        Self::from_raw(raw)
    }

    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let raw: RawCatalog = serde_json::from_str(json)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawCatalog) -> Result<Self, CatalogError> {
        Ok(Self {
            base: keyed_menus(raw.base, MenuSection::Base)?,
            premium: keyed_menus(raw.premium, MenuSection::Premium)?,
            seasonal: checked_menu("seasonal".to_string(), raw.seasonal, MenuSection::Seasonal)?,
        })
    }

    pub fn base_menu(&self, airline: Airline) -> Option<&[MenuItem]> {
        self.base.get(&airline).map(Vec::as_slice)
    }

    pub fn premium_menu(&self, airline: Airline) -> Option<&[MenuItem]> {
        self.premium.get(&airline).map(Vec::as_slice)
    }

    pub fn seasonal_menu(&self) -> &[MenuItem] {
        &self.seasonal
    }

    pub fn airlines(&self) -> impl Iterator<Item = Airline> + '_ {
        self.base.keys().copied()
    }
}

fn keyed_menus(
    menus: BTreeMap<String, Vec<MenuItem>>,
    section: MenuSection,
) -> Result<BTreeMap<Airline, Vec<MenuItem>>, CatalogError> {
    menus
        .into_iter()
        .map(|(name, items)| {
            let airline = name
                .parse::<Airline>()
                .map_err(|_| CatalogError::InvalidAirline(name.clone()))?;
            let label = format!("{} {}", airline, section.slug());
            Ok((airline, checked_menu(label, items, section)?))
        })
        .collect()
}

fn checked_menu(
    menu: String,
    items: Vec<MenuItem>,
    section: MenuSection,
) -> Result<Vec<MenuItem>, CatalogError> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .map(|mut item| {
            let name = item.name.trim().to_string();
            if name.is_empty() {
                return Err(CatalogError::EmptyName { menu: menu.clone() });
            }
            if !seen.insert(name.clone()) {
                return Err(CatalogError::DuplicateItem {
                    menu: menu.clone(),
                    item: name,
                });
            }
            item.name = name;
            item.section = section;
            Ok(item)
        })
        .collect()
}
