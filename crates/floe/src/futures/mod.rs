mod flake;
mod runtime;
mod sleep_provider;

pub use self::flake::*;
pub use self::runtime::*;
pub use self::sleep_provider::*;
