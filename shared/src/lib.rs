pub mod assets;
pub mod band;
pub mod config;
pub mod error;
pub mod render;
pub mod response;
pub mod state;
pub mod transport;
pub mod validation;

pub use assets::resolve_asset_url;
pub use band::ConfidenceBand;
pub use config::{ClientConfig, ConfigError};
pub use error::{AnalysisError, FileRejection};
pub use render::{render, ResultView};
pub use response::{AnalysisOutcome, AnalysisResponse, AnalysisStatus};
pub use state::{transition, Effect, ImageSource, RequestId, UiEvent, UiState};
pub use transport::{classify_transport_failure, interpret_health, interpret_http, race_with_deadline};
pub use validation::{validate_image, ImageCandidate, ImageId};
