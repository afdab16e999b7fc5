//! OpenAPI document aggregation

use crate::models;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::auth::signup,
        crate::handlers::auth::signin,
        crate::handlers::auth::forgot_password,
        crate::handlers::auth::reset_password,
        crate::handlers::users::change_password,
        crate::handlers::posts::create_post,
        crate::handlers::posts::get_post,
        crate::handlers::comments::create_comment,
        crate::handlers::comments::get_comments,
        crate::handlers::comments::get_comment_names,
        crate::handlers::notifications::get_notifications,
        crate::handlers::notifications::update_notification,
        crate::handlers::notifications::delete_notification,
        crate::handlers::chat::add_message,
        crate::handlers::chat::mark_messages_read,
        crate::handlers::chat::update_reaction,
        crate::handlers::chat::delete_message,
    ),
    components(schemas(
        models::auth::SignupRequest,
        models::auth::SigninRequest,
        models::auth::ForgotPasswordRequest,
        models::auth::ResetPasswordRequest,
        models::auth::AuthUserView,
        models::user::ChangePasswordRequest,
        models::User,
        models::Post,
        models::post::CreatePostRequest,
        models::Comment,
        models::comment::CreateCommentRequest,
        models::comment::CommentNames,
        models::Notification,
        models::ChatMessage,
        models::chat::AddChatMessageRequest,
        models::chat::MarkMessagesReadRequest,
        models::chat::MessageReactionRequest,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "auth", description = "Signup, signin and password recovery"),
        (name = "users", description = "Authenticated user operations"),
        (name = "posts", description = "Posts"),
        (name = "comments", description = "Comments on posts"),
        (name = "notifications", description = "Notification feed"),
        (name = "chat", description = "Chat message mutations"),
    )
)]
pub struct ApiDoc;
