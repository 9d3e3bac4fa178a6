use super::layout::ShellContext;
use askama::Template;

#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub shell: ShellContext,
}

/// Profile details for the signed-in user
#[derive(Template)]
#[template(path = "profile.html")]
pub struct ProfileTemplate {
    pub shell: ShellContext,
    pub user_id: String,
    pub username: String,
    pub email: String,
    pub image: Option<String>,
}

#[derive(Template)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate {
    pub shell: ShellContext,
}
