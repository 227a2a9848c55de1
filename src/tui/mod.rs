pub mod run;
pub mod views;

pub use run::run;
pub use views::*;
