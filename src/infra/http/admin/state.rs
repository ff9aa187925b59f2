use std::sync::Arc;

use crate::application::admin::posts::AdminPostService;

#[derive(Clone)]
pub struct AdminState {
    pub posts: Arc<AdminPostService>,
}
