//! SeaORM entities for the `product` and `product_option` tables.
//!
//! There is no relation between the two tables: options outlive their
//! product.

pub mod product;
pub mod product_option;
