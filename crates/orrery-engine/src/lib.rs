pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod renderer;
pub mod bridge;
pub mod input;
pub mod extensions;

// Re-export key types at crate root for convenience
pub use api::game::{Game, GameConfig, EngineContext};
pub use api::types::{EntityId, GameEvent};
pub use components::entity::Entity;
pub use components::mesh::{MeshComponent, MeshShape, MeshColor};
pub use core::scene::Scene;
pub use core::time::{FixedTimestep, FramePacing};
pub use core::rng::Rng;
pub use renderer::instance::{MeshInstance, RenderBuffer};
pub use renderer::camera::{Camera3D, CameraUniform};
pub use input::queue::{InputEvent, InputQueue};
pub use bridge::protocol::{ProtocolLayout, LIGHT_FLOATS, DEFAULT_MAX_LIGHTS};
pub use systems::lighting::{PointLight, LightState};
pub use systems::raycast::{Ray, RayHit, RayCaster};
pub use systems::starfield::{Star, StarField};
pub use extensions::{TransformGraph, LocalTransform};
