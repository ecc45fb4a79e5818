use super::MenuItem;
use crate::workflows::domain::Notice;
use serde::Serialize;

/// Items the passenger has ticked during the current session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MealOrder {
    items: Vec<MenuItem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "amount", rename_all = "snake_case")]
pub enum OrderTotal {
    NothingSelected,
    Total(u32),
}

impl OrderTotal {
    pub fn amount(self) -> u32 {
        match self {
            Self::NothingSelected => 0,
            Self::Total(amount) => amount,
        }
    }

    pub fn notice(self) -> Notice {
        match self {
            Self::NothingSelected => Notice::info("Select items to view total."),
            Self::Total(amount) => Notice::success(format!("Total Meal Cost: \u{20b9}{amount}")),
        }
    }
}

impl MealOrder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the item if absent, removes it otherwise. Returns whether it is now selected.
    pub fn toggle(&mut self, item: &MenuItem) -> bool {
        let key = item.key();
        if let Some(position) = self.items.iter().position(|selected| selected.key() == key) {
            self.items.remove(position);
            false
        } else {
            self.items.push(item.clone());
            true
        }
    }

    pub fn contains(&self, item: &MenuItem) -> bool {
        let key = item.key();
        self.items.iter().any(|selected| selected.key() == key)
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total(&self) -> OrderTotal {
        if self.items.is_empty() {
            OrderTotal::NothingSelected
        } else {
            OrderTotal::Total(self.items.iter().map(|item| item.price).sum())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::domain::NoticeTone;
    use crate::workflows::meals::{MealCategory, MenuSection};

    fn item(name: &str, price: u32, section: MenuSection) -> MenuItem {
        MenuItem {
            name: name.to_string(),
            price,
            is_vegetarian: true,
            category: MealCategory::Snack,
            section,
        }
    }

    #[test]
    fn empty_order_is_distinct_from_a_free_one() {
        let mut order = MealOrder::new();
        assert_eq!(order.total(), OrderTotal::NothingSelected);
        assert_eq!(order.total().amount(), 0);
        assert_eq!(order.total().notice().tone, NoticeTone::Info);
        assert_eq!(order.total().notice().message, "Select items to view total.");

        order.toggle(&item("Water", 0, MenuSection::Base));
        assert_eq!(order.total(), OrderTotal::Total(0));
        assert_eq!(order.total().notice().message, "Total Meal Cost: \u{20b9}0");
    }

    #[test]
    fn toggle_adds_then_removes() {
        let puff = item("Veg Puff", 45, MenuSection::Base);
        let kulfi = item("Mango Kulfi", 50, MenuSection::Seasonal);
        let mut order = MealOrder::new();

        assert!(order.toggle(&puff));
        assert!(order.toggle(&kulfi));
        assert_eq!(order.total(), OrderTotal::Total(95));

        assert!(!order.toggle(&puff));
        assert!(!order.contains(&puff));
        assert_eq!(order.total(), OrderTotal::Total(50));

        order.toggle(&kulfi);
        assert!(order.is_empty());
    }

    #[test]
    fn same_name_in_different_sections_are_separate_selections() {
        let base = item("Chicken Samosa", 50, MenuSection::Base);
        let premium = item("Chicken Samosa", 60, MenuSection::Premium);
        let mut order = MealOrder::new();
        order.toggle(&base);
        order.toggle(&premium);
        assert_eq!(order.total(), OrderTotal::Total(110));
    }
}
