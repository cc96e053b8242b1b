use std::sync::Arc;

use crate::adapters::{FfprobeAdapter, LocalFsAdapter, TracingLogAdapter};
use crate::app::{
    assess_interactor::AssessInteractor, merge_interactor::MergeInteractor,
    scene_interactor::SceneInteractor,
};
use crate::ports::{AnalysisConfig, FsPort, LogPort, ProbePort};

pub trait AppContainer: Send + Sync {
    fn assess_interactor(&self) -> Arc<AssessInteractor>;
    fn merge_interactor(&self) -> Arc<MergeInteractor>;
    fn scene_interactor(&self) -> Arc<SceneInteractor>;
}

pub struct DefaultAppContainer {
    assess_interactor: Arc<AssessInteractor>,
    merge_interactor: Arc<MergeInteractor>,
    scene_interactor: Arc<SceneInteractor>,
}

impl DefaultAppContainer {
    pub fn new(config: &AnalysisConfig) -> Self {
        let probe_port = Arc::new(FfprobeAdapter::new(
            config.probe.ffprobe_path.clone(),
            config.probe.timeout_secs,
        ));
        let fs_port = Arc::new(LocalFsAdapter::new());
        let log_port = Arc::new(TracingLogAdapter::new());

        Self::with_ports(probe_port, fs_port, log_port)
    }

    /// Wire interactors over arbitrary port implementations
    pub fn with_ports(
        probe_port: Arc<dyn ProbePort>,
        fs_port: Arc<dyn FsPort>,
        log_port: Arc<dyn LogPort>,
    ) -> Self {
        let assess_interactor = Arc::new(AssessInteractor::new(
            Arc::clone(&probe_port),
            Arc::clone(&fs_port),
            Arc::clone(&log_port),
        ));

        let merge_interactor = Arc::new(MergeInteractor::new(
            Arc::clone(&fs_port),
            Arc::clone(&log_port),
        ));

        let scene_interactor = Arc::new(SceneInteractor::new(
            Arc::clone(&fs_port),
            Arc::clone(&log_port),
        ));

        Self {
            assess_interactor,
            merge_interactor,
            scene_interactor,
        }
    }
}

impl AppContainer for DefaultAppContainer {
    fn assess_interactor(&self) -> Arc<AssessInteractor> {
        Arc::clone(&self.assess_interactor)
    }

    fn merge_interactor(&self) -> Arc<MergeInteractor> {
        Arc::clone(&self.merge_interactor)
    }

    fn scene_interactor(&self) -> Arc<SceneInteractor> {
        Arc::clone(&self.scene_interactor)
    }
}
