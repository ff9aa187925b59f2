use thiserror::Error;

use crate::{
    application::repos::RepoError,
    domain::posts::{PostFormFields, PostIntent, SlugParam, ValidationErrors},
};

#[derive(Debug, Error)]
pub enum AdminPostError {
    #[error("post `{slug}` does not exist")]
    NotFound { slug: String },
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Where the client goes after a successful mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationDirective {
    AdminListing,
}

impl NavigationDirective {
    pub fn href(self) -> &'static str {
        match self {
            Self::AdminListing => "/posts/admin",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Redirect(NavigationDirective),
    Invalid(ValidationErrors),
}

#[derive(Debug, Clone)]
pub struct SubmitPostCommand {
    pub intent: PostIntent,
    pub slug_param: SlugParam,
    pub fields: PostFormFields,
}
