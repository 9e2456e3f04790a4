//! Orchestration for the offline fitter and the interactive dashboard

pub mod fitting;
pub mod interactive;

pub use fitting::{join_history, DistrictFit, FitReport, FittingPipeline, JoinedHistory};
pub use interactive::{
    load_dataset, load_model, open_session, prepare_district, run_forecast, DistrictSession,
    ForecastView, PipelineStage, SliderSpec,
};
