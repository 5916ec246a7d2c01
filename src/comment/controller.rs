use actix_web::{HttpRequest, HttpResponse, web};
use serde_json::json;

use crate::comment::model::{COMMENT_FORM, Comment, CommentForm};
use crate::comment::service::CommentService;
use crate::middleware::auth::AuthUser;
use crate::news::index::detail_url;
use crate::utils::error::CustomError;
use crate::utils::form::{FormOutcome, RenderedForm, decode_form};
use crate::utils::ids::parse_id;
use crate::utils::response::{redirect, render};

fn thread_url(comment: &Comment) -> String {
    format!("{}#comments", detail_url(&comment.news_id))
}

/// Edit form for the user's own comment
/// GET /edit_comment/{id}/
pub async fn edit_comment_page(
    user: AuthUser,
    path: web::Path<String>,
    comment_service: web::Data<CommentService>,
) -> Result<HttpResponse, CustomError> {
    let comment_id = parse_id(&path, "Comment")?;
    let comment = comment_service.get_owned(&comment_id, &user).await?;

    let form = RenderedForm::unbound(
        COMMENT_FORM,
        CommentForm {
            text: comment.text.clone(),
        },
    );
    Ok(render(
        "Comment retrieved successfully",
        json!({ "comment": comment, "form": form }),
    ))
}

/// Update the user's own comment
/// POST /edit_comment/{id}/
pub async fn edit_comment(
    user: AuthUser,
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Bytes,
    comment_service: web::Data<CommentService>,
) -> Result<HttpResponse, CustomError> {
    let comment_id = parse_id(&path, "Comment")?;
    let form: CommentForm = decode_form(&req, &body)?;

    match comment_service.edit(&comment_id, &user, &form).await? {
        FormOutcome::Saved(comment) => Ok(redirect(&thread_url(&comment))),
        FormOutcome::Invalid(errors) => {
            let comment = comment_service.get_owned(&comment_id, &user).await?;
            let form = RenderedForm::with_errors(COMMENT_FORM, form, errors);
            Ok(render(
                "Comment was not updated",
                json!({ "comment": comment, "form": form }),
            ))
        }
    }
}

/// Delete confirmation for the user's own comment
/// GET /delete_comment/{id}/
pub async fn delete_comment_page(
    user: AuthUser,
    path: web::Path<String>,
    comment_service: web::Data<CommentService>,
) -> Result<HttpResponse, CustomError> {
    let comment_id = parse_id(&path, "Comment")?;
    let comment = comment_service.get_owned(&comment_id, &user).await?;

    Ok(render(
        "Confirm comment deletion",
        json!({ "comment": comment }),
    ))
}

/// Delete the user's own comment
/// POST /delete_comment/{id}/
pub async fn delete_comment(
    user: AuthUser,
    path: web::Path<String>,
    comment_service: web::Data<CommentService>,
) -> Result<HttpResponse, CustomError> {
    let comment_id = parse_id(&path, "Comment")?;
    let comment = comment_service.delete(&comment_id, &user).await?;

    Ok(redirect(&thread_url(&comment)))
}
