pub mod card;
pub mod collection;
pub mod timer;

pub use card::*;
pub use collection::*;
pub use timer::*;
