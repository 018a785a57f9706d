//! PromptPlay Protocol - wire types exchanged between the engine and the game UI.
//!
//! # Design Principles
//!
//! 1. **No business logic** - pure data types and serialization
//! 2. **Domain scripts pass through** - `SceneScript` and `TagAssignment` are sent as-is
//! 3. **Forward compatible** - unknown enum variants deserialize to `Unknown`

pub mod requests;
pub mod responses;

pub use requests::{ResolveRequest, VariationRequest};
pub use responses::{
    ErrorCode, ErrorResponse, HealthResponse, ResolveResponse, ResponseSource, VariationResponse,
    VariationSource,
};
