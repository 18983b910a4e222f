// Application layer - Use case interactors

pub mod container;
pub mod materializer;
pub mod remix_interactor;
pub mod resources;

// Re-export interactors
pub use materializer::Materializer;
pub use remix_interactor::RemixInteractor;
