//! Ready-made pipelines: a Python code debugging crew and a product team
//! simulation.

pub mod code_review;
pub mod product_team;

pub use code_review::code_review;
pub use product_team::product_team;
