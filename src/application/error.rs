use std::error::Error as StdError;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::{
    application::{admin::posts::AdminPostError, auth::AuthError, posts::PostServiceError},
    domain::{
        error::DomainError,
        posts::{PostFormFields, SlugParam, ValidationErrors},
    },
    infra::error::InfraError,
};

#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub source: &'static str,
    pub status: StatusCode,
    pub messages: Vec<String>,
}

impl ErrorReport {
    pub fn from_error(source: &'static str, status: StatusCode, error: &dyn StdError) -> Self {
        let mut messages = Vec::new();
        messages.push(error.to_string());
        let mut current = error.source();
        while let Some(inner) = current {
            messages.push(inner.to_string());
            current = inner.source();
        }
        Self {
            source,
            status,
            messages,
        }
    }

    pub fn from_message(
        source: &'static str,
        status: StatusCode,
        message: impl Into<String>,
    ) -> Self {
        Self {
            source,
            status,
            messages: vec![message.into()],
        }
    }

    pub fn attach(self, response: &mut Response) {
        response.extensions_mut().insert(self);
    }
}

#[derive(Debug)]
pub struct HttpError {
    status: StatusCode,
    public_message: &'static str,
    report: ErrorReport,
}

impl HttpError {
    pub fn from_error(
        source: &'static str,
        status: StatusCode,
        public_message: &'static str,
        error: &dyn StdError,
    ) -> Self {
        let report = ErrorReport::from_error(source, status, error);
        Self {
            status,
            public_message,
            report,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let mut response = (self.status, self.public_message).into_response();
        self.report.attach(&mut response);
        response
    }
}

/// Failures that abort startup or a CLI command.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }
}

/// Closed set of outcomes a page handler can fail with. Each variant maps to
/// exactly one response shape at the HTTP boundary.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("submitted post form is invalid")]
    ValidationFailure {
        slug_param: SlugParam,
        fields: PostFormFields,
        errors: ValidationErrors,
    },
    #[error("post `{slug}` does not exist")]
    NotFound { slug: String },
    #[error("admin session required for `{redirect_to}`")]
    Unauthorized { redirect_to: String },
    #[error("{detail}")]
    Fatal { detail: String },
}

impl PageError {
    pub fn not_found(slug: impl Into<String>) -> Self {
        Self::NotFound { slug: slug.into() }
    }

    pub fn fatal(detail: impl std::fmt::Display) -> Self {
        Self::Fatal {
            detail: detail.to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::ValidationFailure { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::Fatal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<AdminPostError> for PageError {
    fn from(error: AdminPostError) -> Self {
        match error {
            AdminPostError::NotFound { slug } => Self::NotFound { slug },
            AdminPostError::Repo(err) => Self::fatal(err),
        }
    }
}

impl From<PostServiceError> for PageError {
    fn from(error: PostServiceError) -> Self {
        Self::fatal(error)
    }
}

impl From<DomainError> for PageError {
    fn from(error: DomainError) -> Self {
        Self::fatal(error)
    }
}

impl From<AuthError> for PageError {
    fn from(error: AuthError) -> Self {
        Self::fatal(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::repos::RepoError;

    #[test]
    fn admin_not_found_keeps_slug() {
        let error = PageError::from(AdminPostError::NotFound {
            slug: "missing".into(),
        });
        assert!(matches!(&error, PageError::NotFound { slug } if slug == "missing"));
        assert_eq!(error.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn repo_failures_become_fatal() {
        let error = PageError::from(AdminPostError::Repo(RepoError::Timeout));
        assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error.to_string(), "database timeout");
    }

    #[test]
    fn error_report_collects_source_chain() {
        let error = AppError::from(InfraError::from(std::io::Error::other("disk gone")));
        let report = ErrorReport::from_error("test", StatusCode::INTERNAL_SERVER_ERROR, &error);
        assert_eq!(report.messages[0], "io error: disk gone");
    }
}
