use super::controller::{home, news_detail, post_comment};
use actix_web::web;
use mongodb::bson::oid::ObjectId;

pub fn detail_url(news_id: &ObjectId) -> String {
    format!("/news/{}/", news_id.to_hex())
}

pub fn news_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(home)).service(
        web::resource("/news/{id}/")
            .route(web::get().to(news_detail))
            .route(web::post().to(post_comment)),
    );
}
