pub mod constants;
pub mod error;
pub mod panel;
pub mod scene;
pub mod shadow;

pub use constants::*;
pub use error::*;
pub use panel::*;
pub use scene::*;
pub use shadow::*;
