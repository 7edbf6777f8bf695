//! # Catalog
//!
//! Recipes and packaging options, read straight from the spreadsheet on every request.
//!
//! Cells are free text typed by hand, so parsing never fails:
//! - Missing names, descriptions and types are empty
//! - Prices and sizes read like `parseFloat`, anything else is 0
//! - Missing discounts are `"0%"`
use kitchen::{
    models::{MAX_INGREDIENTS, PackagingOption, Recipe},
    utils::{parse_number, parse_percent},
};

use crate::store::{CatalogStore, StoreError};

pub const RECIPES_RANGE: &str = "Recipes!A2:AA";
pub const PACKAGES_RANGE: &str = "Packages!A2:C";

const RECIPE_DESCRIPTION: usize = 0;
const RECIPE_PRICE: usize = 1;
const RECIPE_NAME: usize = 2;
const RECIPE_INGREDIENTS: usize = 3;

const PACKAGE_TYPE: usize = 0;
const PACKAGE_SIZE: usize = 1;
const PACKAGE_DISCOUNT: usize = 2;

pub async fn list_recipes(store: &dyn CatalogStore) -> Result<Vec<Recipe>, StoreError> {
    let rows = store.read(RECIPES_RANGE).await?;

    Ok(rows.iter().map(|row| parse_recipe(row)).collect())
}

pub async fn list_packaging_options(
    store: &dyn CatalogStore,
) -> Result<Vec<PackagingOption>, StoreError> {
    let rows = store.read(PACKAGES_RANGE).await?;

    Ok(rows.iter().map(|row| parse_packaging(row)).collect())
}

fn cell(row: &[String], index: usize) -> &str {
    row.get(index).map_or("", String::as_str)
}

pub fn parse_recipe(row: &[String]) -> Recipe {
    let ingredients = row
        .iter()
        .skip(RECIPE_INGREDIENTS)
        .take(MAX_INGREDIENTS)
        .filter(|ingredient| !ingredient.trim().is_empty())
        .cloned()
        .collect();

    Recipe {
        name: cell(row, RECIPE_NAME).to_string(),
        unit_price: parse_number(cell(row, RECIPE_PRICE)),
        description: cell(row, RECIPE_DESCRIPTION).to_string(),
        ingredients,
    }
}

pub fn parse_packaging(row: &[String]) -> PackagingOption {
    let discount = match cell(row, PACKAGE_DISCOUNT) {
        "" => "0%",
        discount => discount,
    };

    PackagingOption {
        kind: cell(row, PACKAGE_TYPE).to_string(),
        container_size: parse_number(cell(row, PACKAGE_SIZE)),
        discount_percent: parse_percent(discount),
    }
}
