//! Object model and canonical DDL generation.
//!
//! Every entity renders the exact fragment SHOW CREATE would print for it
//! on a given [`Flavor`](crate::flavor::Flavor). Rendered text doubles as
//! a round-trip oracle: a table whose raw introspected statement does not
//! match its generated one is flagged as unsupported for diffing.

mod check;
mod column;
mod escape;
mod foreign_key;
mod index;
mod object;
mod partition;
mod routine;
mod schema;
mod table;

pub use check::Check;
pub use column::{strip_display_width, Column};
pub use escape::{escape_identifier, escape_value_for_create_table, quote_identifier};
pub use foreign_key::{ForeignKey, ReferentialAction};
pub use index::{Index, IndexPart};
pub use object::{ObjectKey, ObjectPattern, ObjectType};
pub use partition::{Partition, TablePartitioning};
pub use routine::{Routine, RoutineType};
pub use schema::{Schema, SchemaObject};
pub use table::Table;

pub(crate) use column::{normalize_charset, normalize_collation};
