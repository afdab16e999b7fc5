//! HTTP route table

use crate::handlers::{auth, chat, comments, health, notifications, posts, users, ws};
use crate::middleware::JwtAuth;
use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig, jwt_secret: &str) {
    cfg.route("/health", web::get().to(health::health))
        .route("/health/ready", web::get().to(health::ready))
        .route("/ws/notifications", web::get().to(ws::notifications_ws))
        .service(
            web::scope("/api/v1")
                .service(
                    web::scope("/auth")
                        .route("/signup", web::post().to(auth::signup))
                        .route("/signin", web::post().to(auth::signin))
                        .route("/signout", web::post().to(auth::signout))
                        .route("/forgot-password", web::post().to(auth::forgot_password))
                        .route(
                            "/reset-password/{token}",
                            web::post().to(auth::reset_password),
                        ),
                )
                .service(
                    web::scope("/users")
                        .wrap(JwtAuth::new(jwt_secret))
                        .route("/change-password", web::put().to(users::change_password)),
                )
                .service(
                    web::resource("/posts")
                        .wrap(JwtAuth::new(jwt_secret))
                        .route(web::post().to(posts::create_post)),
                )
                .service(web::resource("/posts/{id}").route(web::get().to(posts::get_post)))
                .service(
                    web::resource("/comments")
                        .wrap(JwtAuth::new(jwt_secret))
                        .route(web::post().to(comments::create_comment)),
                )
                // names route first so it is not captured by /comments/{post_id}
                .service(
                    web::resource("/comments/names/{post_id}")
                        .route(web::get().to(comments::get_comment_names)),
                )
                .service(
                    web::resource("/comments/{post_id}")
                        .route(web::get().to(comments::get_comments)),
                )
                .service(
                    web::scope("/notifications")
                        .wrap(JwtAuth::new(jwt_secret))
                        .route("", web::get().to(notifications::get_notifications))
                        .route("/{id}", web::put().to(notifications::update_notification))
                        .route(
                            "/{id}",
                            web::delete().to(notifications::delete_notification),
                        ),
                )
                .service(
                    web::scope("/chat")
                        .wrap(JwtAuth::new(jwt_secret))
                        .route("/message", web::post().to(chat::add_message))
                        .route("/message/read", web::put().to(chat::mark_messages_read))
                        .route("/message/reaction", web::put().to(chat::update_reaction))
                        .route(
                            "/message/{message_id}",
                            web::delete().to(chat::delete_message),
                        ),
                ),
        );
}
