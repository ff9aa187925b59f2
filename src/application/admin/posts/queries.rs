use crate::domain::entities::{PostRecord, PostSummary};
use crate::domain::posts::SlugParam;

use super::service::AdminPostService;
use super::types::AdminPostError;

impl AdminPostService {
    pub async fn list(&self) -> Result<Vec<PostSummary>, AdminPostError> {
        self.reader
            .list_summaries()
            .await
            .map_err(AdminPostError::from)
    }

    /// Load the post behind an editor route. The `new` sentinel yields `None`.
    pub async fn load_editor(
        &self,
        slug_param: &SlugParam,
    ) -> Result<Option<PostRecord>, AdminPostError> {
        let SlugParam::Existing(slug) = slug_param else {
            return Ok(None);
        };

        match self.reader.find_by_slug(slug).await? {
            Some(post) => Ok(Some(post)),
            None => Err(AdminPostError::NotFound { slug: slug.clone() }),
        }
    }
}
