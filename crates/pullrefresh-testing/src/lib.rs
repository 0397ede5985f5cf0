//! Testing utilities and harness for the pull-to-refresh controller

pub mod testing;

pub use testing::*;

pub mod prelude {
    pub use crate::testing::*;
}
