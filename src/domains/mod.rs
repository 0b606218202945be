//! Domains module containing business logic organized by bounded contexts.
//!
//! The server has one domain: the store tools in [`tools`].

pub mod tools;
