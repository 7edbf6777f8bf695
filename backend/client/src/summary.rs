use kitchen::{
    models::{PackagingOption, Recipe},
    pricing::PriceQuote,
};

pub fn order_summary(quote: &PriceQuote) -> String {
    format!(
        "Order Summary\n\
         Subtotal: ${:.2}\n\
         Discount: -${:.2}\n\
         Tax: ${:.2}\n\
         -----------------\n\
         Total: ${:.2}",
        quote.subtotal, quote.discount, quote.tax, quote.total
    )
}

pub fn recipe_listing(recipes: &[Recipe]) -> String {
    recipes
        .iter()
        .flat_map(|recipe| {
            let mut lines = vec![format!("{} (${:.2}/lb)", recipe.name, recipe.unit_price)];

            if !recipe.description.is_empty() {
                lines.push(format!("  {}", recipe.description));
            }

            if !recipe.ingredients.is_empty() {
                lines.push(format!("  Ingredients: {}", recipe.ingredients.join(", ")));
            }

            lines
        })
        .map(|line| line + "\n")
        .collect()
}

pub fn package_listing(packages: &[PackagingOption]) -> String {
    packages
        .iter()
        .map(|package| {
            format!(
                "{} ({}% off)\n",
                package.label(),
                package.discount_percent.normalize()
            )
        })
        .collect()
}
