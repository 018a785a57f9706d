//! Use cases - request orchestration on top of the pure domain pipeline.
//!
//! Each module owns one user-facing flow and talks to the outside world only
//! through the ports in `infrastructure::ports`.

pub mod llm_json;
pub mod scene;
pub mod session;
pub mod variation;

pub use scene::SceneUseCases;
pub use session::{RequestSequencer, RequestTicket};
pub use variation::VariationService;
