// extensions/mod.rs
//
// Optional extension modules for OrreryEngine.
// Decoupled from core Entity/Scene; games reach them through EngineContext.

pub mod transform;

pub use transform::{LocalTransform, TransformGraph};
