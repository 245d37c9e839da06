mod builtin_catalog;

pub use builtin_catalog::builtin_catalog;
