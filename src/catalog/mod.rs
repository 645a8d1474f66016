//! Catalog module: products, their variants, and the repositories that
//! persist them.

mod product_repository;
mod types;
mod variant_repository;

pub use product_repository::ProductRepository;
pub use types::{
    ListFilter, NewProduct, NewVariant, Page, Product, ProductUpdate, Variant, VariantUpdate,
    DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
pub use variant_repository::VariantRepository;
