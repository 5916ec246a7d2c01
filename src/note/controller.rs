use actix_web::{HttpRequest, HttpResponse, web};
use serde_json::json;

use crate::middleware::auth::AuthUser;
use crate::note::index::SUCCESS_URL;
use crate::note::model::{NOTE_FORM, NoteForm};
use crate::note::service::NoteService;
use crate::utils::error::CustomError;
use crate::utils::form::{FormOutcome, RenderedForm, decode_form};
use crate::utils::response::{redirect, render};

/// Landing page, open to everyone
/// GET /notes/
pub async fn home(user: Option<AuthUser>) -> HttpResponse {
    render(
        "Notes home",
        json!({ "username": user.map(|user| user.username) }),
    )
}

/// GET /notes/list/
pub async fn note_list(
    user: AuthUser,
    note_service: web::Data<NoteService>,
) -> Result<HttpResponse, CustomError> {
    let notes = note_service.list_for(&user).await?;

    Ok(render(
        "Notes retrieved successfully",
        json!({ "object_list": notes }),
    ))
}

/// GET /notes/add/
pub async fn add_note_page(_user: AuthUser) -> HttpResponse {
    let form = RenderedForm::unbound(NOTE_FORM, NoteForm::default());
    render("New note", json!({ "form": form }))
}

/// POST /notes/add/
pub async fn add_note(
    user: AuthUser,
    req: HttpRequest,
    body: web::Bytes,
    note_service: web::Data<NoteService>,
) -> Result<HttpResponse, CustomError> {
    let form: NoteForm = decode_form(&req, &body)?;

    match note_service.create(&user, &form).await? {
        FormOutcome::Saved(_) => Ok(redirect(SUCCESS_URL)),
        FormOutcome::Invalid(errors) => {
            let form = RenderedForm::with_errors(NOTE_FORM, form, errors);
            Ok(render("Note was not saved", json!({ "form": form })))
        }
    }
}

/// GET /notes/done/
pub async fn success(_user: AuthUser) -> HttpResponse {
    render("Done", json!({}))
}

/// GET /notes/note/{slug}/
pub async fn note_detail(
    user: AuthUser,
    path: web::Path<String>,
    note_service: web::Data<NoteService>,
) -> Result<HttpResponse, CustomError> {
    let note = note_service.get_owned(&path, &user).await?;

    Ok(render("Note retrieved successfully", json!({ "note": note })))
}

/// GET /notes/edit/{slug}/
pub async fn edit_note_page(
    user: AuthUser,
    path: web::Path<String>,
    note_service: web::Data<NoteService>,
) -> Result<HttpResponse, CustomError> {
    let note = note_service.get_owned(&path, &user).await?;
    let form = RenderedForm::unbound(NOTE_FORM, NoteForm::from(&note));

    Ok(render("Edit note", json!({ "note": note, "form": form })))
}

/// POST /notes/edit/{slug}/
pub async fn edit_note(
    user: AuthUser,
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Bytes,
    note_service: web::Data<NoteService>,
) -> Result<HttpResponse, CustomError> {
    let form: NoteForm = decode_form(&req, &body)?;

    match note_service.update(&path, &user, &form).await? {
        FormOutcome::Saved(_) => Ok(redirect(SUCCESS_URL)),
        FormOutcome::Invalid(errors) => {
            let note = note_service.get_owned(&path, &user).await?;
            let form = RenderedForm::with_errors(NOTE_FORM, form, errors);
            Ok(render(
                "Note was not updated",
                json!({ "note": note, "form": form }),
            ))
        }
    }
}

/// GET /notes/delete/{slug}/
pub async fn delete_note_page(
    user: AuthUser,
    path: web::Path<String>,
    note_service: web::Data<NoteService>,
) -> Result<HttpResponse, CustomError> {
    let note = note_service.get_owned(&path, &user).await?;

    Ok(render("Confirm note deletion", json!({ "note": note })))
}

/// POST /notes/delete/{slug}/
pub async fn delete_note(
    user: AuthUser,
    path: web::Path<String>,
    note_service: web::Data<NoteService>,
) -> Result<HttpResponse, CustomError> {
    note_service.delete(&path, &user).await?;

    Ok(redirect(SUCCESS_URL))
}
