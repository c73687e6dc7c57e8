//! Linear plant models for pidsim.
//!
//! A plant is described by a rational [`TransferFunction`] `N(s)/D(s)` and
//! integrated through its controllable-canonical [`StateSpaceModel`]. The
//! transfer-function algebra here (series connection, unity feedback) is what
//! the continuous closed-loop composition is built from.

pub mod error;
pub mod state_space;
pub mod transfer_function;

pub use error::{ModelError, ModelResult};
pub use state_space::StateSpaceModel;
pub use transfer_function::TransferFunction;
