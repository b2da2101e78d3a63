//! # sqlts — schema in, typed source out
//!
//! sqlts turns an introspected database schema into generated source code:
//!
//! 1. **Decorate** every table with an interface name and every column with a
//!    target-language type ([`decorate`], driven by a [`resolve::Resolver`])
//! 2. **Group** tables by schema namespace ([`group`])
//! 3. **Render** the grouped schema through a Handlebars template ([`render`])
//!
//! ## Quick Example
//!
//! ```rust
//! use sqlts::prelude::*;
//!
//! let db = Database::new()
//!     .table(Table::new("public", "user_accounts").column("id", "int4").nullable("bio", "text"));
//!
//! let code = sqlts::generate(db, &Config::default()).unwrap();
//! assert!(code.contains("export interface UserAccountsEntity {"));
//! ```
//!
//! ## Template contract
//!
//! | Path                                   | Value                                  |
//! |----------------------------------------|----------------------------------------|
//! | `grouped`                              | namespace → `{ enums, tables }`        |
//! | `grouped.<ns>.enums`                   | every enum of the database             |
//! | `grouped.<ns>.tables[].interfaceName`  | resolved interface name                |
//! | `...columns[].decoratedType`           | resolved column type                   |
//! | `config`                               | the configuration, camelCase keys      |

pub mod config;
pub mod decorate;
pub mod error;
pub mod group;
pub mod model;
pub mod pipeline;
pub mod render;
pub mod resolve;

pub use config::Config;
pub use error::{Error, Result};
pub use model::{Column, Database, Enum, Table};
pub use pipeline::{Generator, generate};

pub mod prelude {
    pub use crate::config::Config;
    pub use crate::decorate::decorate_database;
    pub use crate::error::Error;
    pub use crate::group::{GroupedSchema, SchemaGroup, group_by_schema};
    pub use crate::model::*;
    pub use crate::pipeline::{Generator, generate};
    pub use crate::render::{Renderer, stringify_database};
    pub use crate::resolve::{DefaultResolver, ResolveError, Resolver};
}
