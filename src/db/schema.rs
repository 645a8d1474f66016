//! Database schema and migrations.
//!
//! Migrations are applied in order; the schema_version table tracks which
//! ones have run.

/// Database migrations.
pub const MIGRATIONS: &[&str] = &[
    // v1: Administrators
    r#"
CREATE TABLE admins (
    uuid        TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    email       TEXT NOT NULL UNIQUE COLLATE NOCASE,
    password    TEXT NOT NULL,           -- Argon2 hash
    created_at  TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at  TEXT NOT NULL DEFAULT (datetime('now'))
);
"#,
    // v2: Products, each owned by one administrator
    r#"
CREATE TABLE products (
    uuid        TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    image_url   TEXT NOT NULL,
    admin_uuid  TEXT NOT NULL REFERENCES admins(uuid) ON DELETE CASCADE,
    created_at  TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at  TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_products_admin_uuid ON products(admin_uuid);
CREATE INDEX idx_products_name ON products(name);
"#,
    // v3: Variants, each belonging to one product
    r#"
CREATE TABLE variants (
    uuid          TEXT PRIMARY KEY,
    name          TEXT NOT NULL,
    quantity      INTEGER NOT NULL CHECK (quantity >= 0),
    product_uuid  TEXT NOT NULL REFERENCES products(uuid),
    created_at    TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at    TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_variants_product_uuid ON variants(product_uuid);
CREATE INDEX idx_variants_name ON variants(name);
"#,
];
