pub mod api;
pub mod dual;
pub mod error;
pub mod float;
pub mod sparsity;
pub mod workspace;
mod traits;

pub use api::{derivative, gradient, jacobian, jacobian_with, jvp};
pub use dual::Dual;
pub use error::{Error, Result};
pub use float::Float;
pub use sparsity::Sparsity;
pub use workspace::Workspace;

/// Type alias for forward-mode dual numbers over `f64`.
pub type Dual64 = Dual<f64>;
/// Type alias for forward-mode dual numbers over `f32`.
pub type Dual32 = Dual<f32>;
