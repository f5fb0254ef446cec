use crate::application::{
    dto::AuthenticatedUser,
    error::ApplicationError,
    services::articles::ArticleInput,
};
use crate::domain::policy::Permission;
use crate::presentation::http::{
    error::HttpError,
    extractors::Authenticated,
    flash::{Flash, IncomingFlash, clear_flash, redirect_with_flash},
    state::HttpState,
    templates::render_page,
};
use axum::{
    Extension, Form,
    extract::{Path, Query},
    response::{IntoResponse, Response},
};
use minijinja::{Value, context};
use serde::Deserialize;

const ARTICLES_PATH: &str = "/admin/articles";

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ArticleForm {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteForm {
    #[serde(rename = "_token")]
    pub token: String,
}

pub async fn list(
    Extension(state): Extension<HttpState>,
    Authenticated(actor): Authenticated,
    IncomingFlash(flash): IncomingFlash,
    Query(params): Query<ListParams>,
) -> Response {
    let query = params.q.unwrap_or_default();
    let result = if query.trim().is_empty() {
        state.services.articles.list_articles(&actor).await
    } else {
        state.services.articles.search_articles(&actor, &query).await
    };

    let articles = match result {
        Ok(articles) => articles,
        Err(err) => return HttpError::from_error(err).into_response(),
    };

    let had_flash = flash.is_some();
    let page = render_page(
        &state.templates,
        "articles/list.html",
        context! {
            articles => articles,
            query => query,
            flash => flash,
            actor => actor_ctx(&actor),
        },
    );

    finish_page(page, had_flash)
}

pub async fn show(
    Extension(state): Extension<HttpState>,
    Authenticated(actor): Authenticated,
    IncomingFlash(flash): IncomingFlash,
    Path(id): Path<i64>,
) -> Response {
    match state.services.articles.find_article(&actor, id).await {
        Ok(article) => {
            let delete_token = state
                .services
                .csrf()
                .issue(&delete_intent(article.id, &actor));

            let had_flash = flash.is_some();
            let page = render_page(
                &state.templates,
                "articles/show.html",
                context! {
                    article => article,
                    delete_token => delete_token,
                    flash => flash,
                    actor => actor_ctx(&actor),
                },
            );
            finish_page(page, had_flash)
        }
        Err(err) => redirect_with_flash(ARTICLES_PATH, Flash::error(user_message(&err))),
    }
}

pub async fn new_form(
    Extension(state): Extension<HttpState>,
    Authenticated(actor): Authenticated,
    IncomingFlash(flash): IncomingFlash,
) -> Response {
    let had_flash = flash.is_some();
    let page = render_page(
        &state.templates,
        "articles/form.html",
        context! {
            heading => "New article",
            action => format!("{ARTICLES_PATH}/new"),
            submit_label => "Create",
            title_value => "",
            description_value => "",
            flash => flash,
            actor => actor_ctx(&actor),
        },
    );
    finish_page(page, had_flash)
}

pub async fn create(
    Extension(state): Extension<HttpState>,
    Authenticated(actor): Authenticated,
    Form(form): Form<ArticleForm>,
) -> Response {
    let input = ArticleInput {
        title: form.title,
        description: form.description,
    };

    match state.services.articles.create_article(&actor, input).await {
        Ok(article) => redirect_with_flash(
            ARTICLES_PATH,
            Flash::success(format!("Article \"{}\" created.", article.title)),
        ),
        Err(err) => redirect_with_flash(
            &format!("{ARTICLES_PATH}/new"),
            Flash::error(user_message(&err)),
        ),
    }
}

pub async fn edit_form(
    Extension(state): Extension<HttpState>,
    Authenticated(actor): Authenticated,
    IncomingFlash(flash): IncomingFlash,
    Path(id): Path<i64>,
) -> Response {
    match state.services.articles.find_article(&actor, id).await {
        Ok(article) => {
            let had_flash = flash.is_some();
            let page = render_page(
                &state.templates,
                "articles/form.html",
                context! {
                    heading => format!("Edit \"{}\"", article.title),
                    action => format!("{ARTICLES_PATH}/{}/edit", article.id),
                    submit_label => "Save",
                    title_value => article.title,
                    description_value => article.description,
                    flash => flash,
                    actor => actor_ctx(&actor),
                },
            );
            finish_page(page, had_flash)
        }
        Err(err) => redirect_with_flash(ARTICLES_PATH, Flash::error(user_message(&err))),
    }
}

pub async fn update(
    Extension(state): Extension<HttpState>,
    Authenticated(actor): Authenticated,
    Path(id): Path<i64>,
    Form(form): Form<ArticleForm>,
) -> Response {
    let input = ArticleInput {
        title: form.title,
        description: form.description,
    };

    match state.services.articles.update_article(&actor, id, input).await {
        Ok(article) => redirect_with_flash(
            ARTICLES_PATH,
            Flash::success(format!("Article \"{}\" updated.", article.title)),
        ),
        Err(err) if err.is_not_found() => {
            redirect_with_flash(ARTICLES_PATH, Flash::error(user_message(&err)))
        }
        Err(err) => redirect_with_flash(
            &format!("{ARTICLES_PATH}/{id}/edit"),
            Flash::error(user_message(&err)),
        ),
    }
}

pub async fn delete(
    Extension(state): Extension<HttpState>,
    Authenticated(actor): Authenticated,
    Path(id): Path<i64>,
    Form(form): Form<DeleteForm>,
) -> Response {
    if !state
        .services
        .csrf()
        .verify(&delete_intent(id, &actor), &form.token)
    {
        return redirect_with_flash(
            ARTICLES_PATH,
            Flash::error("Invalid security token, the article was not deleted."),
        );
    }

    match state.services.articles.delete_article(&actor, id).await {
        Ok(()) => redirect_with_flash(ARTICLES_PATH, Flash::success("Article deleted.")),
        Err(err) => redirect_with_flash(ARTICLES_PATH, Flash::error(user_message(&err))),
    }
}

fn actor_ctx(actor: &AuthenticatedUser) -> Value {
    context! {
        username => actor.username.clone(),
        can_edit => actor.is_granted(Permission::Edit),
        can_delete => actor.is_granted(Permission::Delete),
    }
}

fn delete_intent(id: i64, actor: &AuthenticatedUser) -> String {
    format!("delete-article-{id}:{}", i64::from(actor.id))
}

fn user_message(err: &ApplicationError) -> String {
    if err.is_not_found() {
        "Article not found.".into()
    } else {
        err.to_string()
    }
}

fn finish_page(
    page: Result<axum::response::Html<String>, HttpError>,
    had_flash: bool,
) -> Response {
    match page {
        Ok(html) => {
            let mut response = html.into_response();
            if had_flash {
                clear_flash(&mut response);
            }
            response
        }
        Err(err) => err.into_response(),
    }
}
