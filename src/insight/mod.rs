pub mod engine;
pub mod exec;
pub mod rules;

pub use engine::evaluate;
pub use exec::exec;
