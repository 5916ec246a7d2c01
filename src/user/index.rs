use super::controller::{login_page, login_user, logout_user, register_user, signup_page};
use actix_web::web;

pub fn user_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/signup/")
                    .route(web::get().to(signup_page))
                    .route(web::post().to(register_user)),
            )
            .service(
                web::resource("/login/")
                    .route(web::get().to(login_page))
                    .route(web::post().to(login_user)),
            )
            .service(
                web::resource("/logout/")
                    .route(web::get().to(logout_user))
                    .route(web::post().to(logout_user)),
            ),
    );
}
