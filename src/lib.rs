//! # Arix - Signature Collection
//!
//! An interactive 3D tree of emerald foliage and gold ornaments that morphs
//! between a scattered cloud (CHAOS) and a cone-shaped tree (FORM).
//!
//! ## Quick Start
//!
//! ```ignore
//! use arix::prelude::*;
//!
//! fn main() -> Result<(), arix::AppError> {
//!     arix::run(SceneConfig::new().with_foliage_count(20_000).with_seed(7))
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Fields
//!
//! A field is a fixed-size set of particles that share one progress value.
//! Every particle gets two positions at generation time, one inside a sphere
//! and one on or in the tree cone, and never gets new ones afterwards.
//!
//! - [`FoliageField`]: thousands of points; blending and secondary motion
//!   happen in the vertex shader, so the CPU only produces [`FoliageUniforms`].
//! - [`OrnamentField`]: instanced meshes (baubles, gifts, lights). Transforms
//!   are computed on the CPU and written into an [`InstanceSink`].
//!
//! ### Progress
//!
//! [`Progress`] chases the target of the current [`TreeState`] with frame-rate
//! independent exponential damping and snaps once close enough. Flipping the
//! state mid-transition reverses smoothly from wherever it is.
//!
//! ```ignore
//! let mut scene = TreeScene::new(&SceneConfig::new());
//! let mut clock = FrameClock::new();
//! loop {
//!     let uniforms = scene.tick(TreeState::TreeShape, clock.tick());
//!     // upload `uniforms` and `scene.buffers_mut()` ...
//! }
//! ```
//!
//! ## Controls
//!
//! | Input | Action |
//! |-------|--------|
//! | Space | Toggle CHAOS / FORM |
//! | C / F | CHAOS / FORM |
//! | P | Pause animation |
//! | Drag / wheel | Orbit / zoom |

mod app;
pub mod config;
pub mod easing;
pub mod error;
pub mod foliage;
mod gpu;
pub mod greeting;
pub mod ornaments;
pub mod progress;
pub mod scene;
pub mod shaders;
pub mod sink;
pub mod spawn;
pub mod state;
pub mod time;
pub mod visuals;

pub use app::run;
pub use config::{SceneConfig, TreeDimensions};
pub use error::{AppError, GpuError};
pub use foliage::{FoliageField, FoliageParticle, FoliageUniforms};
pub use glam::{Vec2, Vec3, Vec4};
pub use greeting::{resolve_greeting, GreetingError, GreetingSource};
pub use ornaments::{
    compute_transforms, InstanceTransform, Material, Ornament, OrnamentConfig, OrnamentField,
    OrnamentShape,
};
pub use progress::Progress;
pub use scene::TreeScene;
pub use sink::{InstanceBuffer, InstanceRaw, InstanceSink};
pub use spawn::SpawnContext;
pub use state::TreeState;
pub use time::{FrameClock, FrameTime};
pub use visuals::{Palette, VisualConfig};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use arix::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{SceneConfig, TreeDimensions};
    pub use crate::easing::{ease_in_out_cubic, lerp, lerp_vec3};
    pub use crate::foliage::{FoliageField, FoliageUniforms};
    pub use crate::ornaments::{InstanceTransform, OrnamentConfig, OrnamentField, OrnamentShape};
    pub use crate::progress::Progress;
    pub use crate::scene::TreeScene;
    pub use crate::sink::{InstanceBuffer, InstanceSink};
    pub use crate::state::TreeState;
    pub use crate::time::{FrameClock, FrameTime};
    pub use crate::visuals::{Palette, VisualConfig};
    pub use crate::{Vec2, Vec3, Vec4};
}
