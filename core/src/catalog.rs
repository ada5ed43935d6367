use std::collections::BTreeMap;

use serde::Serialize;

/// A catalog food: calories per portion, where `unit` names the portion
/// ("per piece", "per bowl", "per 100g", ...).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoodItem {
    pub name: String,
    pub calorie_base: f64,
    pub unit: String,
}

/// Built-in food table: (name, calories per portion, portion unit).
const BUILTIN_FOODS: &[(&str, f64, &str)] = &[
    // Traditional South Indian Breakfast
    ("idli", 35.0, "per piece"),
    ("dosa", 133.0, "per piece"),
    ("masala dosa", 250.0, "per piece"),
    ("vada", 97.0, "per piece"),
    ("upma", 180.0, "per bowl"),
    ("pongal", 250.0, "per bowl"),
    ("uttapam", 200.0, "per piece"),
    ("pesarattu", 150.0, "per piece"),
    ("paniyaram", 45.0, "per piece"),
    ("appam", 120.0, "per piece"),

    // Rice & Grains
    ("rice", 200.0, "per bowl"),
    ("brown rice", 170.0, "per bowl"),
    ("lemon rice", 180.0, "per bowl"),
    ("tamarind rice", 280.0, "per bowl"),
    ("curd rice", 150.0, "per bowl"),
    ("bisibelebath", 300.0, "per bowl"),
    ("pulao", 200.0, "per bowl"),
    ("biryani", 300.0, "per bowl"),
    ("chapati", 100.0, "per piece"),
    ("roti", 90.0, "per piece"),
    ("paratha", 150.0, "per piece"),
    ("naan", 260.0, "per piece"),
    ("puri", 120.0, "per piece"),
    ("poori", 120.0, "per piece"),

    // Curries & Gravies
    ("sambar", 50.0, "per cup"),
    ("rasam", 40.0, "per cup"),
    ("dal", 120.0, "per cup"),
    ("dal makhani", 250.0, "per cup"),
    ("chole", 200.0, "per cup"),
    ("rajma", 180.0, "per cup"),
    ("kadhi", 100.0, "per cup"),
    ("korma", 220.0, "per cup"),
    ("paneer butter masala", 280.0, "per cup"),
    ("palak paneer", 200.0, "per cup"),

    // Poriyal (South Indian Stir-fry)
    ("beans poriyal", 80.0, "per bowl"),
    ("cabbage poriyal", 60.0, "per bowl"),
    ("carrot poriyal", 70.0, "per bowl"),
    ("potato poriyal", 120.0, "per bowl"),
    ("beetroot poriyal", 75.0, "per bowl"),
    ("brinjal poriyal", 90.0, "per bowl"),

    // Dairy
    ("curd", 100.0, "per bowl"),
    ("buttermilk", 40.0, "per glass"),
    ("paneer", 265.0, "per 100g"),
    ("ghee", 120.0, "per tablespoon"),
    ("milk", 150.0, "per cup"),

    // Beverages
    ("filter coffee", 80.0, "per cup"),
    ("tea", 70.0, "per cup"),
    ("masala chai", 90.0, "per cup"),
    ("badam milk", 200.0, "per glass"),
    ("rose milk", 180.0, "per glass"),
    ("water", 0.0, "per glass"),
    ("coconut water", 45.0, "per cup"),

    // Snacks & Fried Items
    ("samosa", 252.0, "per piece"),
    ("pakora", 50.0, "per piece"),
    ("bonda", 80.0, "per piece"),
    ("bajji", 70.0, "per piece"),
    ("muruku", 120.0, "per piece (big)"),
    ("kai murukku", 110.0, "per piece"),
    ("ribbon pakoda", 140.0, "per 25g"),
    ("mixture", 180.0, "per 28g"),
    ("banana chips", 150.0, "per 28g"),
    ("appalam", 149.0, "per piece"),
    ("papad", 149.0, "per piece"),
    ("vadaam", 80.0, "per piece"),

    // Dry Fruits
    ("badam", 7.0, "per piece"),
    ("pistah", 4.0, "per piece"),
    ("cashew", 9.0, "per piece"),
    ("walnut", 26.0, "per half"),
    ("raisins", 3.0, "per piece"),
    ("dates", 23.0, "per piece"),
    ("dried figs", 20.0, "per piece"),
    ("dried apricot", 8.0, "per piece"),
    ("prunes", 20.0, "per piece"),

    // Sweets & Desserts
    ("sugar candy", 10.0, "per piece (2-4g)"),
    ("athirasam", 180.0, "per piece"),
    ("jalebi", 150.0, "per piece"),
    ("gulab jamun", 150.0, "per piece"),
    ("rasgulla", 106.0, "per piece"),
    ("ladoo", 180.0, "per piece"),
    ("mysore pak", 200.0, "per piece"),
    ("halwa", 250.0, "per 100g"),
    ("payasam", 200.0, "per cup"),
    ("kheer", 200.0, "per cup"),
    ("kesari", 180.0, "per serving"),
    ("peda", 100.0, "per piece"),
    ("barfi", 120.0, "per piece"),

    // Snacks - Healthy
    ("makhana", 35.0, "per 10g"),
    ("roasted chana", 120.0, "per 30g"),
    ("groundnuts", 170.0, "per 30g"),
    ("peanuts", 166.0, "per 30g"),

    // Chutneys & Condiments
    ("coconut chutney", 80.0, "per 2 tbsp"),
    ("tomato chutney", 40.0, "per 2 tbsp"),
    ("mint chutney", 15.0, "per 2 tbsp"),
    ("coriander chutney", 20.0, "per 2 tbsp"),
    ("peanut chutney", 90.0, "per 2 tbsp"),
    ("pickle", 15.0, "per tsp"),

    // Cold Drinks
    ("coca cola", 140.0, "per 330ml can"),
    ("pepsi", 150.0, "per 330ml can"),
    ("sprite", 140.0, "per 330ml can"),
    ("fanta", 160.0, "per 330ml can"),
    ("lassi", 180.0, "per glass"),
    ("mango lassi", 220.0, "per glass"),

    // Additional Items
    ("kachori", 150.0, "per piece"),
    ("dhokla", 160.0, "per 100g"),
    ("idiyappam", 120.0, "per serving"),
    ("sevai", 150.0, "per cup"),
    ("kozhukattai", 90.0, "per piece"),
];

/// Read-only lookup table of foods keyed by lowercased name.
#[derive(Debug, Clone)]
pub struct FoodCatalog {
    foods: BTreeMap<String, FoodItem>,
}

impl FoodCatalog {
    #[must_use]
    pub fn builtin() -> Self {
        Self::from_items(
            BUILTIN_FOODS
                .iter()
                .map(|&(name, calorie_base, unit)| FoodItem {
                    name: name.to_string(),
                    calorie_base,
                    unit: unit.to_string(),
                }),
        )
    }

    /// Build a catalog from arbitrary items. Names are lowercased; a later
    /// item with the same name replaces an earlier one.
    pub fn from_items(items: impl IntoIterator<Item = FoodItem>) -> Self {
        let foods = items
            .into_iter()
            .map(|mut item| {
                item.name = normalize(&item.name);
                (item.name.clone(), item)
            })
            .collect();
        Self { foods }
    }

    /// Case-insensitive lookup.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FoodItem> {
        self.foods.get(&normalize(name))
    }

    /// All foods, ordered by name.
    pub fn iter(&self) -> impl Iterator<Item = &FoodItem> {
        self.foods.values()
    }

    /// Foods whose name contains `query` (case-insensitive).
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&FoodItem> {
        let query = normalize(query);
        self.foods
            .values()
            .filter(|f| f.name.contains(&query))
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.foods.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.foods.is_empty()
    }
}

impl Default for FoodCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}
