/// One interaction: load the guide, then on a button press locate the plant and ask
/// for advice.
///
/// ```text
/// Idle -> FetchingAndExtracting -> (AwaitingInput | Ready)
/// Ready -> Locating -> (NotFound | Found) -> AdviceRequested -> (AdviceReady | AdviceFailed)
/// ```
///
/// Every failure is converted to a message here; nothing escapes to the HTTP layer.
use std::sync::Arc;

use tracing::{error, info};

use crate::advisor::CareAdvisor;
use crate::document::{Document, DocumentStore};
use crate::locate::{locate_plant_info, PlantInfo};

pub const MISSING_INPUT_MESSAGE: &str =
    "Please enter a plant name and ensure the PDF is accessible.";

/// Result of the eager load done on every render.
#[derive(Debug, Clone)]
pub enum DocumentState {
    Ready(Arc<Document>),
    /// Load failed; carries the user-facing message.
    Unavailable(String),
}

impl DocumentState {
    pub fn text(&self) -> &str {
        match self {
            DocumentState::Ready(doc) => &doc.text,
            DocumentState::Unavailable(_) => "",
        }
    }
}

/// Terminal state of a button press; each renders exactly one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    AdviceReady { plant_name: String, advice: String },
    NotFound,
    MissingInput,
    AdviceFailed(String),
}

impl Outcome {
    pub fn kind(&self) -> &'static str {
        match self {
            Outcome::AdviceReady { .. } => "advice_ready",
            Outcome::NotFound => "not_found",
            Outcome::MissingInput => "missing_input",
            Outcome::AdviceFailed(_) => "advice_failed",
        }
    }
}

pub struct CarePipeline {
    documents: DocumentStore,
    advisor: CareAdvisor,
}

impl CarePipeline {
    pub fn new(documents: DocumentStore, advisor: CareAdvisor) -> Self {
        Self { documents, advisor }
    }

    pub fn documents(&self) -> &DocumentStore {
        &self.documents
    }

    pub async fn load_document(&self) -> DocumentState {
        match self.documents.load().await {
            Ok(doc) => DocumentState::Ready(doc),
            Err(e) => {
                error!(url = self.documents.url(), error = %e, "guide unavailable");
                DocumentState::Unavailable(e.to_string())
            }
        }
    }

    /// The button action. `text` is empty when the guide could not be loaded.
    pub async fn answer(&self, plant_name: &str, text: &str) -> Outcome {
        let plant_name = plant_name.trim();
        if plant_name.is_empty() || text.is_empty() {
            return Outcome::MissingInput;
        }

        let outcome = match locate_plant_info(plant_name, text) {
            PlantInfo::NotFound => Outcome::NotFound,
            PlantInfo::Found(snippet) => match self.advisor.advise(plant_name, &snippet).await {
                Ok(advice) => Outcome::AdviceReady {
                    plant_name: plant_name.to_string(),
                    advice,
                },
                Err(e) => Outcome::AdviceFailed(format!(
                    "An error occurred while calling the care model: {e}"
                )),
            },
        };
        info!(plant = plant_name, outcome = outcome.kind(), "button action handled");
        outcome
    }
}
