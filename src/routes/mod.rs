pub mod auth;

pub mod users;

pub mod teachers;

pub mod instruments;

pub mod batches;

pub mod students;

pub mod enrollments;

pub mod packages;

pub mod payments;

pub mod finance;

pub mod prospects;

pub mod notifications;

pub mod system;

pub use auth::configure_auth_routes;
pub use batches::configure_batch_routes;
pub use enrollments::configure_enrollment_routes;
pub use finance::configure_finance_routes;
pub use instruments::configure_instrument_routes;
pub use notifications::configure_notification_routes;
pub use packages::configure_package_routes;
pub use payments::configure_payment_routes;
pub use prospects::configure_prospect_routes;
pub use students::configure_student_routes;
pub use system::configure_system_routes;
pub use teachers::configure_teacher_routes;
pub use users::configure_user_routes;

use actix_web::web;

/// 注册全部 API 路由，main 与集成测试共用
pub fn configure_api_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(configure_auth_routes)
        .configure(configure_user_routes)
        .configure(configure_teacher_routes)
        .configure(configure_instrument_routes)
        .configure(configure_batch_routes)
        .configure(configure_student_routes)
        .configure(configure_enrollment_routes)
        .configure(configure_package_routes)
        .configure(configure_payment_routes)
        .configure(configure_finance_routes)
        .configure(configure_prospect_routes)
        .configure(configure_notification_routes)
        .configure(configure_system_routes);
}
