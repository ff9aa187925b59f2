use serde::Deserialize;

use crate::domain::posts::PostFormFields;

/// Editor form as posted by the browser. Every field is optional so that
/// missing values surface as validation messages instead of a rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct AdminPostForm {
    pub(crate) intent: Option<String>,
    pub(crate) title: Option<String>,
    pub(crate) slug: Option<String>,
    pub(crate) markdown: Option<String>,
}

impl AdminPostForm {
    pub(crate) fn into_parts(self) -> (Option<String>, PostFormFields) {
        let Self {
            intent,
            title,
            slug,
            markdown,
        } = self;
        (
            intent,
            PostFormFields {
                title,
                slug,
                markdown,
            },
        )
    }
}
