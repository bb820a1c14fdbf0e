use axum::{
    Form, Router,
    extract::{Path, State, rejection::FormRejection},
    http::header,
    response::{Html, IntoResponse, Redirect},
    routing::get,
};
use feedback_core::model::{ResponseSheet, Token};
use tracing::debug;

use crate::context::AppContext;
use crate::error::WebError;
use crate::views::render_form_page;
use crate::vm::{form_path, map_form_page};

/// All application routes, with `ctx` attached as state.
pub fn router(ctx: AppContext) -> Router {
    Router::new()
        .route("/", get(new_form))
        .route("/form/", get(new_form))
        .route("/form/{token}", get(add_trailing_slash))
        .route("/form/{token}/", get(show_form).post(submit_form))
        .route("/results.csv", get(results_csv))
        .with_state(ctx)
}

async fn new_form(State(ctx): State<AppContext>) -> Html<String> {
    let feedback = ctx.feedback();
    let token = feedback.issue_token();
    debug!("issued new token");
    let page = map_form_page(feedback.layout(), &token, &ResponseSheet::default());
    Html(render_form_page(page))
}

async fn add_trailing_slash(Path(raw): Path<String>) -> Result<Redirect, WebError> {
    let token = Token::parse(&raw)?;
    Ok(Redirect::permanent(&form_path(&token)))
}

async fn show_form(
    State(ctx): State<AppContext>,
    Path(raw): Path<String>,
) -> Result<Html<String>, WebError> {
    let token = Token::parse(&raw)?;
    let feedback = ctx.feedback();
    let sheet = feedback.load(&token).await?;
    let page = map_form_page(feedback.layout(), &token, &sheet);
    Ok(Html(render_form_page(page)))
}

async fn submit_form(
    State(ctx): State<AppContext>,
    Path(raw): Path<String>,
    form: Result<Form<Vec<(String, String)>>, FormRejection>,
) -> Result<Redirect, WebError> {
    let token = Token::parse(&raw)?;
    // An absent or undecodable body is a submission with every field missing.
    let fields = match form {
        Ok(Form(fields)) => fields,
        Err(rejection) => {
            debug!(%rejection, "treating unreadable form body as empty");
            Vec::new()
        }
    };
    ctx.feedback().submit(&token, fields).await?;
    Ok(Redirect::to(&form_path(&token)))
}

async fn results_csv(State(ctx): State<AppContext>) -> Result<impl IntoResponse, WebError> {
    let body = ctx.export().csv().await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (header::CONTENT_DISPOSITION, "inline"),
        ],
        body,
    ))
}
