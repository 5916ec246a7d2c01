use super::controller::{delete_comment, delete_comment_page, edit_comment, edit_comment_page};
use actix_web::web;

pub fn comment_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/edit_comment/{id}/")
            .route(web::get().to(edit_comment_page))
            .route(web::post().to(edit_comment)),
    )
    .service(
        web::resource("/delete_comment/{id}/")
            .route(web::get().to(delete_comment_page))
            .route(web::post().to(delete_comment)),
    );
}
