use actix_web::{HttpRequest, HttpResponse, web};
use serde_json::json;

use crate::comment::model::{COMMENT_FORM, Comment, CommentForm};
use crate::comment::service::CommentService;
use crate::middleware::auth::AuthUser;
use crate::news::index::detail_url;
use crate::news::model::News;
use crate::news::service::NewsService;
use crate::utils::error::CustomError;
use crate::utils::form::{FormOutcome, RenderedForm, decode_form};
use crate::utils::ids::parse_id;
use crate::utils::response::{redirect, render};

/// Home page feed
/// GET /
pub async fn home(news_service: web::Data<NewsService>) -> Result<HttpResponse, CustomError> {
    let news_feed = news_service.home_feed().await?;

    Ok(render("News feed retrieved successfully", json!({ "news_feed": news_feed })))
}

fn detail_page(news: &News, comments: &[Comment], form: Option<RenderedForm<CommentForm>>) -> HttpResponse {
    let mut context = json!({
        "news": news,
        "comments": comments,
    });
    // anonymous visitors get no comment form
    if let Some(form) = form {
        context["form"] = json!(form);
    }

    render("News retrieved successfully", context)
}

/// News item with its comment thread
/// GET /news/{id}/
pub async fn news_detail(
    user: Option<AuthUser>,
    path: web::Path<String>,
    news_service: web::Data<NewsService>,
    comment_service: web::Data<CommentService>,
) -> Result<HttpResponse, CustomError> {
    let news_id = parse_id(&path, "News")?;
    let news = news_service.get_news(&news_id).await?;
    let comments = comment_service.thread(&news_id).await?;

    let form = user.map(|_| RenderedForm::unbound(COMMENT_FORM, CommentForm::default()));
    Ok(detail_page(&news, &comments, form))
}

/// Submit a comment
/// POST /news/{id}/
pub async fn post_comment(
    user: AuthUser,
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Bytes,
    news_service: web::Data<NewsService>,
    comment_service: web::Data<CommentService>,
) -> Result<HttpResponse, CustomError> {
    let news_id = parse_id(&path, "News")?;
    let form: CommentForm = decode_form(&req, &body)?;

    match comment_service.submit(&news_id, &user, &form).await? {
        FormOutcome::Saved(_) => Ok(redirect(&format!("{}#comments", detail_url(&news_id)))),
        FormOutcome::Invalid(errors) => {
            let news = news_service.get_news(&news_id).await?;
            let comments = comment_service.thread(&news_id).await?;
            let form = RenderedForm::with_errors(COMMENT_FORM, form, errors);
            Ok(detail_page(&news, &comments, Some(form)))
        }
    }
}
