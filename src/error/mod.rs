pub mod relay;

pub use relay::{RelayError, RelayResult};
