// Application layer - Use case interactors

pub mod assess_interactor;
pub mod container;
pub mod merge_interactor;
pub mod report;
pub mod scene_interactor;

// Re-export interactors
pub use assess_interactor::AssessInteractor;
pub use container::{AppContainer, DefaultAppContainer};
pub use merge_interactor::MergeInteractor;
pub use report::{render, ReportFormat, TextReport};
pub use scene_interactor::SceneInteractor;
