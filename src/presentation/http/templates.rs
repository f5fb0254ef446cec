use crate::application::error::ApplicationError;
use crate::presentation::http::error::{HttpError, HttpResult};
use axum::response::Html;
use minijinja::{Environment, Value};

/// All pages ship embedded; the environment is built once at startup.
pub fn build_environment() -> Result<Environment<'static>, minijinja::Error> {
    let mut env = Environment::new();
    env.add_template("layout.html", include_str!("../../../templates/layout.html"))?;
    env.add_template("login.html", include_str!("../../../templates/login.html"))?;
    env.add_template(
        "articles/list.html",
        include_str!("../../../templates/articles/list.html"),
    )?;
    env.add_template(
        "articles/show.html",
        include_str!("../../../templates/articles/show.html"),
    )?;
    env.add_template(
        "articles/form.html",
        include_str!("../../../templates/articles/form.html"),
    )?;
    Ok(env)
}

pub fn render_page(
    env: &Environment<'static>,
    name: &str,
    ctx: Value,
) -> HttpResult<Html<String>> {
    let template = env.get_template(name).map_err(render_error)?;
    let body = template.render(ctx).map_err(render_error)?;
    Ok(Html(body))
}

fn render_error(err: minijinja::Error) -> HttpError {
    HttpError::from_error(ApplicationError::infrastructure(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::context;

    #[test]
    fn environment_builds_and_renders_the_login_page() {
        let env = build_environment().unwrap();
        let page = render_page(&env, "login.html", context! {}).unwrap();
        assert!(page.0.contains("form"));
    }
}
