pub mod export;
pub mod filters;
pub mod meld;
pub mod mri;
pub mod patient;

pub use export::*;
pub use filters::*;
pub use meld::*;
pub use mri::*;
pub use patient::*;
