//! Character attributes and effective-stat resolution.

#![allow(unused_imports)]

pub mod attributes;
pub mod resolver;

pub use attributes::*;
pub use resolver::*;
