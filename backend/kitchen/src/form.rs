//! # Order Form
//!
//! Client logic behind the order page.
//!
//! ## Flow
//!
//! - Recipes and packaging options are fetched independently at load, in any order
//! - First recipe and first packaging become the selection if nothing was picked yet
//! - Every edit goes through [`OrderSession::apply`], which filters the input and
//!   recomputes the quote and the container check from scratch
//! - Submitting runs the required field checks, then builds the payload with the
//!   packaging label instead of the selection key
//! - Once the backend accepts the order the form resets to catalog defaults
//!
//! ## Notes
//! - Coupon codes are collected and stored with the order but never change the price.
//! - A failed catalog fetch leaves that catalog empty. The quote then stays at zero.
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::{
    models::{OrderSubmission, PackagingOption, Recipe},
    pricing::{PriceQuote, package_error, quote},
    utils::{coerce_pounds, digits_only},
};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderForm {
    pub phone: String,
    pub name: String,
    pub email: String,
    pub address: String,
    pub recipe: String,
    pub pounds: u32,
    pub packaging: String,
    pub coupon: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Phone,
    Name,
    Email,
    Address,
    Recipe,
    Pounds,
    Packaging,
}

impl Field {
    pub const REQUIRED: [Field; 7] = [
        Field::Phone,
        Field::Name,
        Field::Email,
        Field::Address,
        Field::Recipe,
        Field::Pounds,
        Field::Packaging,
    ];

    pub fn message(self) -> &'static str {
        match self {
            Field::Phone => "Phone number is required",
            Field::Name => "Name is required",
            Field::Email => "Email is required",
            Field::Address => "Address is required",
            Field::Recipe => "Please select a recipe",
            Field::Pounds => "Please enter pounds",
            Field::Packaging => "Please select a package",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Phone => "phone",
            Field::Name => "name",
            Field::Email => "email",
            Field::Address => "address",
            Field::Recipe => "recipe",
            Field::Pounds => "pounds",
            Field::Packaging => "packaging",
        };

        f.write_str(name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

/// Everything required that is still missing, in form order.
pub fn missing_fields(
    phone: &str,
    name: &str,
    email: &str,
    address: &str,
    recipe: &str,
    pounds: u32,
    packaging: &str,
) -> Vec<FieldError> {
    Field::REQUIRED
        .into_iter()
        .filter(|field| match field {
            Field::Phone => phone.is_empty(),
            Field::Name => name.is_empty(),
            Field::Email => email.is_empty(),
            Field::Address => address.is_empty(),
            Field::Recipe => recipe.is_empty(),
            Field::Pounds => pounds == 0,
            Field::Packaging => packaging.is_empty(),
        })
        .map(|field| FieldError {
            field,
            message: field.message().to_string(),
        })
        .collect()
}

impl OrderForm {
    pub fn validate(&self) -> Vec<FieldError> {
        missing_fields(
            &self.phone,
            &self.name,
            &self.email,
            &self.address,
            &self.recipe,
            self.pounds,
            &self.packaging,
        )
    }
}

impl OrderSubmission {
    pub fn validate(&self) -> Vec<FieldError> {
        missing_fields(
            &self.phone,
            &self.name,
            &self.email,
            &self.address,
            &self.recipe,
            self.pounds,
            &self.packaging,
        )
    }
}

/// A single user edit, carrying raw input as typed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormEdit {
    Phone(String),
    Name(String),
    Email(String),
    Address(String),
    Recipe(String),
    Pounds(String),
    Packaging(String),
    Coupon(String),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum Rejected {
    #[error("Missing fields: {}", list(.0))]
    MissingFields(Vec<FieldError>),

    #[error("{0}")]
    PackageSize(String),
}

fn list(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.field.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Values handed over from the feeding calculator page.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Prefill {
    pub recipe: Option<String>,
    pub total_food: Option<f64>,
}

impl Prefill {
    fn pounds(&self) -> u32 {
        match self.total_food {
            Some(total) if total.is_finite() && total > 0.0 => total.ceil().min(u32::MAX as f64) as u32,
            _ => 1,
        }
    }
}

#[derive(Debug, Default)]
pub struct OrderSession {
    form: OrderForm,
    recipes: Vec<Recipe>,
    packages: Vec<PackagingOption>,
    quote: PriceQuote,
    package_error: Option<String>,
    errors: Vec<FieldError>,
}

impl OrderSession {
    pub fn new(prefill: Prefill) -> Self {
        let form = OrderForm {
            pounds: prefill.pounds(),
            recipe: prefill.recipe.unwrap_or_default(),
            ..Default::default()
        };

        let mut session = Self {
            form,
            ..Default::default()
        };
        session.recompute();

        session
    }

    pub fn load_recipes<E: fmt::Display>(&mut self, fetched: Result<Vec<Recipe>, E>) {
        self.recipes = fetched.unwrap_or_else(|e| {
            warn!("Failed to load recipes: {e}");
            Vec::new()
        });

        if self.form.recipe.is_empty() {
            if let Some(first) = self.recipes.first() {
                self.form.recipe = first.name.clone();
            }
        }

        self.recompute();
    }

    pub fn load_packages<E: fmt::Display>(&mut self, fetched: Result<Vec<PackagingOption>, E>) {
        self.packages = fetched.unwrap_or_else(|e| {
            warn!("Failed to load packaging options: {e}");
            Vec::new()
        });

        if self.form.packaging.is_empty() {
            if let Some(first) = self.packages.first() {
                self.form.packaging = first.kind.clone();
            }
        }

        self.recompute();
    }

    pub fn apply(&mut self, edit: FormEdit) {
        match edit {
            FormEdit::Phone(value) => self.form.phone = digits_only(&value),
            FormEdit::Name(value) => self.form.name = value,
            FormEdit::Email(value) => self.form.email = value,
            FormEdit::Address(value) => self.form.address = value,
            FormEdit::Recipe(value) => self.form.recipe = value,
            FormEdit::Pounds(value) => self.form.pounds = coerce_pounds(&value),
            FormEdit::Packaging(value) => self.form.packaging = value,
            FormEdit::Coupon(value) => self.form.coupon = value,
        }

        self.recompute();
    }

    fn recompute(&mut self) {
        let recipe = self.selected_recipe();
        let packaging = self.selected_packaging();

        let quote = quote(recipe, self.form.pounds, packaging);
        // Container check only applies once there is something priced.
        let package_error = recipe.and_then(|_| package_error(self.form.pounds, packaging));

        self.quote = quote;
        self.package_error = package_error;
    }

    pub fn selected_recipe(&self) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.name == self.form.recipe)
    }

    pub fn selected_packaging(&self) -> Option<&PackagingOption> {
        self.packages.iter().find(|p| p.kind == self.form.packaging)
    }

    pub fn form(&self) -> &OrderForm {
        &self.form
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn packages(&self) -> &[PackagingOption] {
        &self.packages
    }

    pub fn quote(&self) -> PriceQuote {
        self.quote
    }

    pub fn package_error(&self) -> Option<&str> {
        self.package_error.as_deref()
    }

    /// Field errors from the last submit attempt.
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn can_submit(&self) -> bool {
        self.form.validate().is_empty() && self.package_error.is_none()
    }

    pub fn prepare_submission(&mut self) -> Result<OrderSubmission, Rejected> {
        self.errors = self.form.validate();

        if !self.errors.is_empty() {
            return Err(Rejected::MissingFields(self.errors.clone()));
        }

        if let Some(message) = &self.package_error {
            return Err(Rejected::PackageSize(message.clone()));
        }

        let packaging = self
            .selected_packaging()
            .map_or_else(|| self.form.packaging.clone(), PackagingOption::label);

        let form = self.form.clone();

        Ok(OrderSubmission {
            phone: form.phone,
            name: form.name,
            email: form.email,
            address: form.address,
            recipe: form.recipe,
            pounds: form.pounds,
            packaging,
            coupon: form.coupon,
            subtotal: self.quote.subtotal,
            discount: self.quote.discount,
            tax: self.quote.tax,
            total: self.quote.total,
        })
    }

    /// Backend accepted the order: start over from catalog defaults.
    pub fn submitted(&mut self) {
        self.form = OrderForm {
            recipe: self.recipes.first().map(|r| r.name.clone()).unwrap_or_default(),
            pounds: 1,
            packaging: self.packages.first().map(|p| p.kind.clone()).unwrap_or_default(),
            ..Default::default()
        };

        self.quote = PriceQuote::ZERO;
        self.package_error = None;
        self.errors.clear();
    }
}
