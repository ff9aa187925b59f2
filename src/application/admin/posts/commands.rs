use metrics::counter;
use tracing::info;

use crate::application::repos::{CreatePostParams, RepoError, UpdatePostParams};
use crate::domain::entities::PostRecord;
use crate::domain::posts::{PostDraft, PostIntent, SlugParam};
use crate::infra::telemetry::POST_MUTATIONS_TOTAL;

use super::service::AdminPostService;
use super::types::{AdminPostError, NavigationDirective, SubmitOutcome, SubmitPostCommand};

impl AdminPostService {
    /// Apply a submitted editor form. Validation failures are an outcome, not
    /// an error, and never reach the store.
    pub async fn submit(&self, command: SubmitPostCommand) -> Result<SubmitOutcome, AdminPostError> {
        let SubmitPostCommand {
            intent,
            slug_param,
            fields,
        } = command;

        if intent == PostIntent::Delete {
            self.delete_post(slug_param.as_str()).await?;
            return Ok(SubmitOutcome::Redirect(NavigationDirective::AdminListing));
        }

        let draft = match fields.validate() {
            Ok(draft) => draft,
            Err(errors) => return Ok(SubmitOutcome::Invalid(errors)),
        };

        match slug_param {
            SlugParam::New => {
                self.create_post(draft).await?;
            }
            SlugParam::Existing(current_slug) => {
                self.update_post(current_slug, draft).await?;
            }
        }

        Ok(SubmitOutcome::Redirect(NavigationDirective::AdminListing))
    }

    pub async fn create_post(&self, draft: PostDraft) -> Result<PostRecord, AdminPostError> {
        let post = self
            .writer
            .create_post(CreatePostParams {
                slug: draft.slug,
                title: draft.title,
                markdown: draft.markdown,
            })
            .await?;

        record_mutation(PostIntent::Create, &post.slug);
        Ok(post)
    }

    pub async fn update_post(
        &self,
        current_slug: String,
        draft: PostDraft,
    ) -> Result<PostRecord, AdminPostError> {
        let params = UpdatePostParams {
            current_slug: current_slug.clone(),
            slug: draft.slug,
            title: draft.title,
            markdown: draft.markdown,
        };

        let post = match self.writer.update_post(params).await {
            Ok(post) => post,
            Err(RepoError::NotFound) => {
                return Err(AdminPostError::NotFound { slug: current_slug });
            }
            Err(err) => return Err(err.into()),
        };

        record_mutation(PostIntent::Update, &post.slug);
        Ok(post)
    }

    /// Remove the post stored under `slug`. Unknown slugs succeed.
    pub async fn delete_post(&self, slug: &str) -> Result<(), AdminPostError> {
        self.writer.delete_post(slug).await?;
        record_mutation(PostIntent::Delete, slug);
        Ok(())
    }
}

fn record_mutation(action: PostIntent, slug: &str) {
    counter!(POST_MUTATIONS_TOTAL, "action" => action.as_str()).increment(1);
    info!(
        target = "quill::admin::posts",
        action = action.as_str(),
        slug,
        "post mutated"
    );
}
