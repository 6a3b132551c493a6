use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::config::AppConfig;
use crate::handlers;
use crate::state::AppState;

pub fn api_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .merge(auth_routes())
        .nest("/student", student_routes())
        .nest("/attendance", attendance_routes())
        .nest("/claims", claim_routes(config))
        .nest("/teacher", teacher_routes())
        .nest("/ipm", ipm_routes())
}

fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::auth::register))
        .routes(routes!(handlers::auth::login))
        .routes(routes!(handlers::auth::me))
}

fn student_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::student::create_student))
        .routes(routes!(handlers::student::student_info))
        .routes(routes!(handlers::student::list_attendance))
}

fn attendance_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(handlers::attendance::create_attendance))
}

fn claim_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    let submit = OpenApiRouter::new()
        .routes(routes!(handlers::claim::create_claim))
        .layer(handlers::claim::claim_body_limit(config.storage.max_blob_size));

    OpenApiRouter::new()
        .routes(routes!(handlers::claim::list_my_claims))
        .routes(routes!(handlers::claim::get_claim))
        .routes(routes!(handlers::claim::download_claim_file))
        .merge(submit)
}

fn teacher_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::teacher::create_teacher))
        .routes(routes!(handlers::teacher::teacher_self))
        .routes(routes!(handlers::teacher::list_reviews))
        .routes(routes!(handlers::teacher::review_claim))
}

fn ipm_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::ipm::list_claims))
        .routes(routes!(handlers::ipm::update_claim))
}
