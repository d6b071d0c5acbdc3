//! Job template rendering.
//!
//! Templates are rendered with [Tera](https://keats.github.io/tera/). The
//! context exposes:
//!
//! - `name`: the job name
//! - `properties`: the job's spec defaults overlaid with its manifest values
//! - `links.<name>`: each consumed link, with `address`, `instances` and
//!   `properties`
//!
//! and the functions `p`, `has_p`, `link_p` and `has_link` (see
//! [`functions`]).
//!
//! ```text
//! listen: 0.0.0.0:{{ p(name="port") }}
//! database: {{ link_p(link="db", name="address") }}:{{ links.db.properties.port }}
//! ```

pub mod context;
pub mod error;
pub mod functions;
pub mod renderer;
pub mod utils;

pub use context::RenderContext;
pub use error::{ErrorLocation, TemplateError};
pub use renderer::{RenderingMetadata, TemplateRenderer};
pub use utils::deep_merge_json;
