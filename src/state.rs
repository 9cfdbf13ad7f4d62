use std::sync::Arc;

use axum::extract::FromRef;

use crate::pipeline::Pipeline;

/// Shared handler state. The pipeline holds only immutable configuration and the
/// data source, so requests never share datasets or trained models.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
}

impl FromRef<AppState> for Arc<Pipeline> {
    fn from_ref(state: &AppState) -> Self {
        state.pipeline.clone()
    }
}
