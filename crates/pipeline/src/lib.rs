//! Coloring-page generation pipeline.
//!
//! [`Generator`] turns a validated request into stored line-art images:
//! reserve units from the caller's quota or credits, ask the text model for
//! a story outline, render each scene with the image model, upload the
//! results and settle the reservation against what was actually produced.

pub mod billing;
pub mod caller;
pub mod error;
pub mod generator;
pub mod page;
pub mod request;

pub use caller::Caller;
pub use error::PipelineError;
pub use generator::Generator;
pub use page::PageResult;
pub use request::{PageRequest, SceneOutcome, SceneReport, SeriesImage, SeriesRequest, SeriesResult};
