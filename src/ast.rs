//! # dataql - Resource Tree
//!
//! This module defines the tree a query parses into. A query names the shape
//! of the data it wants; the solver walks the tree against live values and
//! returns exactly that shape.
//!
//! ## Architecture Overview
//!
//! The AST module is organized into focused submodules:
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[arguments]** - Literal method arguments, positional or named
//! - **[filters]** - Resolution steps (attribute, method, index, slice)
//! - **[resources]** - Field, list and object nodes
//! - **[query]** - The parsed query and its entry point
//!
//! ## Quick Start
//!
//! ```text
//! User.get('Elon Musk') {
//!     name,
//!     birthday.strftime('%x'),
//!     companies[{ name, year: created_year }],
//!     company_names: companies[name],
//!     first_company: companies.0.name,
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Resources
//!
//! - **Field** `name` - a leaf, resolved to a scalar
//! - **Object** `user { ... }` - a mapping from each child's key to its result
//! - **List** `companies[...]` - the value is iterated, each element resolved
//!   through the body between brackets
//!
//! ### Filter Chains
//!
//! Every resource carries a chain of steps joined by `.`. The first step is
//! always a name. Steps are applied left to right, and the chain stops as soon
//! as a step yields null.
//!
//! ### Keys
//!
//! A child's key is its alias (`year: created_year`) or, without one, the name
//! of its first step. Keys must be unique among the children of one object.
//!
//! ### Canonical Form
//!
//! Every node implements `Display`, printing canonical query text. Indexes and
//! slices are printed with brackets, so `companies.0.name` prints as
//! `companies[0].name`. Parsing the canonical text gives back the same tree
//! up to positions.
pub mod arguments;
pub mod filters;
pub mod query;
pub mod resources;
pub mod tokens;

pub use arguments::{Arg, Literal};
pub use filters::Filter;
pub use query::Query;
pub use resources::{Field, List, Object, Resource};
pub use tokens::{SpannedToken, Token};
