//! # oxide-schema-core
//!
//! Flavor-aware schema normalization and diffing for MySQL-family servers.
//!
//! This crate provides:
//! - A model of server flavors (vendor, variants, version) and the
//!   capability and rendering quirks that depend on them
//! - A per-flavor character set catalog
//! - An object model that renders the exact DDL `SHOW CREATE` prints
//! - A diff engine producing minimal ALTER clause lists, with an explicit
//!   verdict for tables whose DDL cannot be diffed
//!
//! ## Rendering
//!
//! ```rust
//! use oxide_schema_core::flavor::Flavor;
//! use oxide_schema_core::model::{Column, Index, Table};
//!
//! let flavor: Flavor = "mysql:8.0.36".parse().unwrap();
//! let table = Table {
//!     name: "users".into(),
//!     engine: "InnoDB".into(),
//!     charset: "utf8mb4".into(),
//!     collation: "utf8mb4_0900_ai_ci".into(),
//!     columns: vec![Column::new("id", "int")],
//!     primary_key: Some(Index::primary(["id"])),
//!     ..Table::default()
//! };
//! assert!(table.generated_create_statement(flavor).starts_with("CREATE TABLE `users`"));
//! ```
//!
//! ## Diffing
//!
//! ```rust
//! use oxide_schema_core::diff::StatementModifiers;
//! use oxide_schema_core::model::{Column, Schema, Table};
//!
//! let mut from = Schema::default();
//! from.tables.push(Table {
//!     name: "t".into(),
//!     columns: vec![Column::new("a", "int")],
//!     ..Table::default()
//! });
//! let mut to = from.clone();
//! to.tables[0].columns[0].default = Some("'5'".into());
//!
//! let diff = from.diff(&to);
//! let statements = diff.statements(&StatementModifiers::default()).unwrap();
//! assert_eq!(statements, ["ALTER TABLE `t` MODIFY COLUMN `a` int NOT NULL DEFAULT '5'"]);
//! ```

pub mod charset;
pub mod diff;
mod error;
pub mod flavor;
pub mod introspect;
pub mod model;
pub mod server_error;

pub use charset::{CharacterSet, CharsetCatalog, CharsetError, CharsetView};
pub use diff::{SchemaDiff, StatementModifiers, TableAlterClause};
pub use error::{DiffError, Result};
pub use flavor::{Flavor, ParseFlavorError, ParseVersionError, Variant, Vendor, Version};
pub use introspect::Queryer;
pub use model::{ObjectKey, ObjectType, Schema, Table};
pub use server_error::{classify_statement_error, ErrorCategory, ServerError};
