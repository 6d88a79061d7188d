//! Core ETL (Extract, Transform, Load) abstractions
//!
//! Sampling articles, deriving metadata and uploading blobs are each expressed
//! as one stage so the binary can chain them with a [`Pipeline`].

mod extract;
mod load;
mod pipeline;
mod transform;

pub use extract::Extractor;
pub use load::Loader;
pub use pipeline::Pipeline;
pub use transform::{IdentityTransformer, Transformer};
