use super::controller::{
    add_note, add_note_page, delete_note, delete_note_page, edit_note, edit_note_page, home,
    note_detail, note_list, success,
};
use actix_web::web;

pub const SUCCESS_URL: &str = "/notes/done/";

pub fn note_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/notes")
            .route("/", web::get().to(home))
            .route("/list/", web::get().to(note_list))
            .service(
                web::resource("/add/")
                    .route(web::get().to(add_note_page))
                    .route(web::post().to(add_note)),
            )
            .route("/done/", web::get().to(success))
            .route("/note/{slug}/", web::get().to(note_detail))
            .service(
                web::resource("/edit/{slug}/")
                    .route(web::get().to(edit_note_page))
                    .route(web::post().to(edit_note)),
            )
            .service(
                web::resource("/delete/{slug}/")
                    .route(web::get().to(delete_note_page))
                    .route(web::post().to(delete_note)),
            ),
    );
}
