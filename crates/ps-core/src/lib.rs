//! ps-core: shared foundation for pidsim.
//!
//! Contains:
//! - numeric (Real, finiteness checks, uniform grids)
//! - poly (dense real polynomials, highest power first)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod poly;

pub use error::{CoreError, CoreResult};
pub use numeric::*;
