//! Classification form (HTML page)

use askama_axum::Template;
use axum::{
    extract::{rejection::FormRejection, State},
    response::IntoResponse,
    Form,
};
use serde::Deserialize;
use tracing::{debug, info};

use crate::api::handlers::AppState;
use crate::classifier::Classifier;
use crate::dataset::Label;

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub message: String,
    pub verdict: Option<&'static str>,
    pub css_class: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct ClassifyForm {
    #[serde(default)]
    pub message: String,
}

/// State of the form page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormState {
    /// Bare form, no result shown
    AwaitingInput { message: String },
    /// Form annotated with the verdict for the submitted text
    ShowingResult { message: String, label: Label },
}

impl FormState {
    /// Classify a submission; blank text yields no verdict
    pub fn from_submission(classifier: &dyn Classifier, message: String) -> Self {
        if message.trim().is_empty() {
            return FormState::AwaitingInput { message };
        }

        let label = classifier.predict(&message);
        FormState::ShowingResult { message, label }
    }

    pub fn label(&self) -> Option<Label> {
        match self {
            FormState::AwaitingInput { .. } => None,
            FormState::ShowingResult { label, .. } => Some(*label),
        }
    }

    fn into_template(self) -> IndexTemplate {
        match self {
            FormState::AwaitingInput { message } => IndexTemplate {
                message,
                verdict: None,
                css_class: "",
            },
            FormState::ShowingResult { message, label } => IndexTemplate {
                message,
                verdict: Some(label.verdict()),
                css_class: if label.is_spam() { "spam" } else { "ham" },
            },
        }
    }
}

impl Default for FormState {
    fn default() -> Self {
        FormState::AwaitingInput {
            message: String::new(),
        }
    }
}

// Form page (GET)
pub async fn index_page() -> impl IntoResponse {
    FormState::default().into_template()
}

// Form submission (POST)
pub async fn classify_submit(
    State(state): State<AppState>,
    form: Result<Form<ClassifyForm>, FormRejection>,
) -> impl IntoResponse {
    let message = match form {
        Ok(Form(form)) => form.message,
        Err(rejection) => {
            debug!("Unusable form submission: {}", rejection);
            return FormState::default().into_template();
        }
    };

    let page = FormState::from_submission(state.classifier.as_ref(), message);
    if let Some(label) = page.label() {
        info!("Classified submission as {}", label);
    }

    page.into_template()
}
