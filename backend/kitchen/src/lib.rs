//! # Kitchen
//!
//! Shared pieces between the order backend and the order form.
//!
//! - [`models`]: catalog entries, order payloads and persisted order rows
//! - [`pricing`]: quote computation and the container size check
//! - [`form`]: the order form session
//! - [`utils`]: lenient parsing of spreadsheet cells and form input
//!
//! Nothing in here does I/O.
pub mod form;
pub mod models;
pub mod pricing;
pub mod utils;

pub use form::{Field, FieldError, FormEdit, OrderForm, OrderSession, Prefill, Rejected};
pub use models::{Message, OrderRecord, OrderSubmission, PackagingOption, Recipe};
pub use pricing::{PriceQuote, TAX_RATE};
