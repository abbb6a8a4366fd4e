//! Import resolution.
//!
//! `import` names either a package (a `.boink` file) or a library (a
//! directory of packages and nested libraries), relative to the
//! directory of the importing file. Names not found there fall back to
//! the built-in standard libraries such as `io`.

pub mod directory_cache;
pub mod resolver;
