pub mod assembler;
pub mod categories;
pub mod model;
pub mod writer;
