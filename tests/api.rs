//! 通过真实路由驱动的接口测试，数据库为迁移后的内存 SQLite

use std::sync::Arc;

use actix_web::{App, http::StatusCode, test, web};
use chrono::{Duration, NaiveDate};
use serde_json::{Value, json};

use music_school_admin::cache::ObjectCache;
use music_school_admin::cache::object_cache::MokaCacheWrapper;
use music_school_admin::config::AppConfig;
use music_school_admin::models::teachers::entities::{PayoutType, Teacher};
use music_school_admin::models::teachers::requests::CreateTeacherRequest;
use music_school_admin::models::users::entities::{User, UserRole};
use music_school_admin::models::users::requests::CreateUserRequest;
use music_school_admin::models::batches::{entities::Batch, requests::CreateBatchRequest};
use music_school_admin::models::notifications::entities::NotificationKind;
use music_school_admin::models::{AppStartTime, ErrorCode};
use music_school_admin::routes;
use music_school_admin::storage::sea_orm_storage::SeaOrmStorage;
use music_school_admin::storage::{
    BatchStorage, FinanceStorage, InstrumentStorage, NotificationStorage, Storage,
    StudentStorage, TeacherStorage, UserStorage,
};
use music_school_admin::utils::jwt::JwtUtils;
use music_school_admin::utils::password::hash_password;

macro_rules! init_app {
    ($storage:expr) => {{
        let cache: Arc<dyn ObjectCache> = Arc::new(MokaCacheWrapper::with_settings(1_000, 60));
        test::init_service(
            App::new()
                .app_data(web::Data::new($storage.clone()))
                .app_data(web::Data::new(cache))
                .app_data(web::Data::new(AppStartTime {
                    start_datetime: chrono::Utc::now(),
                }))
                .configure(routes::configure_api_routes),
        )
        .await
    }};
}

async fn storage() -> Arc<dyn Storage> {
    Arc::new(SeaOrmStorage::new_in_memory().await.unwrap())
}

async fn create_user(storage: &Arc<dyn Storage>, email: &str, roles: Vec<UserRole>) -> User {
    storage
        .create_user(CreateUserRequest {
            email: email.to_string(),
            password: Some(hash_password("Violin2024").unwrap()),
            display_name: email.to_string(),
            avatar_url: None,
            roles,
        })
        .await
        .unwrap()
}

fn bearer(user: &User) -> (&'static str, String) {
    let roles: Vec<String> = user.roles.iter().map(|r| r.to_string()).collect();
    let token = JwtUtils::generate_access_token(user.id, &roles).unwrap();
    ("Authorization", format!("Bearer {token}"))
}

async fn create_teacher(storage: &Arc<dyn Storage>, name: &str, rate: i64) -> Teacher {
    storage
        .create_teacher(CreateTeacherRequest {
            name: name.to_string(),
            email: None,
            phone: None,
            payout_type: PayoutType::PerClass,
            rate,
            joined_on: None,
            notes: None,
        })
        .await
        .unwrap()
}

/// 教师账号：Teacher 角色并关联教师档案
async fn teacher_account(storage: &Arc<dyn Storage>, email: &str, teacher: &Teacher) -> User {
    let user = create_user(storage, email, vec![UserRole::Teacher]).await;
    storage
        .link_user_teacher(user.id, Some(teacher.id))
        .await
        .unwrap()
        .unwrap()
}

async fn create_batch(storage: &Arc<dyn Storage>, teacher: &Teacher, instrument_id: i64) -> Batch {
    storage
        .create_batch(CreateBatchRequest {
            name: format!("{} group", teacher.name),
            instrument_id,
            teacher_id: teacher.id,
            recurrence: "MON,WED 17:00-18:00".to_string(),
            capacity: 6,
        })
        .await
        .unwrap()
}

#[actix_web::test]
async fn test_health_reports_database_ok() {
    let storage = storage().await;
    let app = init_app!(storage);

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["database"], "up");
    assert!(body["data"]["notification_streams"].is_u64());
}

#[actix_web::test]
async fn test_requires_authentication() {
    let storage = storage().await;
    let app = init_app!(storage);

    let req = test::TestRequest::get().uri("/api/students").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_create_student_returns_created() {
    let storage = storage().await;
    let staff = create_user(&storage, "office@school.test", vec![UserRole::Staff]).await;
    let app = init_app!(storage);

    let req = test::TestRequest::post()
        .uri("/api/students")
        .insert_header(bearer(&staff))
        .set_json(json!({
            "first_name": "Asha",
            "last_name": "Rao",
            "email": "Asha@Example.com",
            "metadata": {"grade": "3"}
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    let id = body["data"]["id"].as_i64().unwrap();
    let student = storage.get_student_by_id(id).await.unwrap().unwrap();
    assert_eq!(student.first_name, "Asha");
}

#[actix_web::test]
async fn test_teacher_cannot_manage_students() {
    let storage = storage().await;
    let teacher = create_teacher(&storage, "Meera", 500).await;
    let user = teacher_account(&storage, "meera@school.test", &teacher).await;
    let app = init_app!(storage);

    let req = test::TestRequest::post()
        .uri("/api/students")
        .insert_header(bearer(&user))
        .set_json(json!({"first_name": "Asha", "last_name": "Rao"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_refresh_token_rotation() {
    let storage = storage().await;
    create_user(&storage, "admin@school.test", vec![UserRole::Admin]).await;
    let app = init_app!(storage);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({"email": "admin@school.test", "password": "Violin2024"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let first = resp
        .response()
        .cookies()
        .find(|c| c.name() == "refresh_token")
        .map(|c| c.value().to_string())
        .unwrap();

    let req = test::TestRequest::post()
        .uri("/api/auth/refresh")
        .set_json(json!({"refresh_token": first}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let second = resp
        .response()
        .cookies()
        .find(|c| c.name() == "refresh_token")
        .map(|c| c.value().to_string())
        .unwrap();
    assert_ne!(first, second);

    // 旧令牌已被吊销，再次使用视为重放
    let req = test::TestRequest::post()
        .uri("/api/auth/refresh")
        .set_json(json!({"refresh_token": first}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], ErrorCode::RefreshTokenReused as i32);

    // 重放后该用户全部会话失效
    let req = test::TestRequest::post()
        .uri("/api/auth/refresh")
        .set_json(json!({"refresh_token": second}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_teacher_cannot_mark_other_teachers_batch() {
    let storage = storage().await;
    let instrument = storage.create_instrument("Piano").await.unwrap();
    let meera = create_teacher(&storage, "Meera", 500).await;
    let ravi = create_teacher(&storage, "Ravi", 500).await;
    let ravi_batch = create_batch(&storage, &ravi, instrument.id).await;
    let user = teacher_account(&storage, "meera@school.test", &meera).await;
    let app = init_app!(storage);

    let req = test::TestRequest::post()
        .uri(&format!("/api/batches/{}/attendance", ravi_batch.id))
        .insert_header(bearer(&user))
        .set_json(json!({"entries": [{"student_id": 1, "status": "present"}]}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], ErrorCode::BatchPermissionDenied as i32);
}

#[actix_web::test]
async fn test_teacher_can_only_mark_today() {
    let storage = storage().await;
    let instrument = storage.create_instrument("Guitar").await.unwrap();
    let meera = create_teacher(&storage, "Meera", 500).await;
    let batch = create_batch(&storage, &meera, instrument.id).await;
    let user = teacher_account(&storage, "meera@school.test", &meera).await;
    let app = init_app!(storage);

    let yesterday = AppConfig::get().school_today() - Duration::days(1);
    let req = test::TestRequest::post()
        .uri(&format!("/api/batches/{}/attendance", batch.id))
        .insert_header(bearer(&user))
        .set_json(json!({
            "date": yesterday,
            "entries": [{"student_id": 1, "status": "present"}]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], ErrorCode::AttendanceDateNotAllowed as i32);
}

#[actix_web::test]
async fn test_credits_follow_payments_and_attendance() {
    let storage = storage().await;
    let admin = create_user(&storage, "admin@school.test", vec![UserRole::Admin]).await;
    let instrument = storage.create_instrument("Violin").await.unwrap();
    let teacher = create_teacher(&storage, "Meera", 500).await;
    let batch = create_batch(&storage, &teacher, instrument.id).await;
    let app = init_app!(storage);

    let req = test::TestRequest::post()
        .uri("/api/students")
        .insert_header(bearer(&admin))
        .set_json(json!({"first_name": "Kabir", "last_name": "Shah"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let student_id = body["data"]["id"].as_i64().unwrap();

    let req = test::TestRequest::post()
        .uri("/api/enrollments")
        .insert_header(bearer(&admin))
        .set_json(json!({
            "student_id": student_id,
            "instrument_id": instrument.id,
            "batch_ids": [batch.id]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let enrollment_id = body["data"]["id"].as_i64().unwrap();

    let req = test::TestRequest::post()
        .uri("/api/payments")
        .insert_header(bearer(&admin))
        .set_json(json!({
            "student_id": student_id,
            "enrollment_id": enrollment_id,
            "amount": 400_000,
            "credits": 8,
            "method": "cash"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    // 教务可以补登历史日期
    let today = AppConfig::get().school_today();
    for (offset, status) in [(0, "present"), (1, "absent"), (2, "excused")] {
        let req = test::TestRequest::post()
            .uri(&format!("/api/batches/{}/attendance", batch.id))
            .insert_header(bearer(&admin))
            .set_json(json!({
                "date": today - Duration::days(offset),
                "entries": [{"student_id": student_id, "status": status}]
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let req = test::TestRequest::get()
        .uri(&format!("/api/students/{student_id}/credits"))
        .insert_header(bearer(&admin))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    let total = &body["data"]["total"];
    assert_eq!(total["purchased"], 8);
    assert_eq!(total["consumed"], 2);
    assert_eq!(total["remaining"], 6);
    assert_eq!(body["data"]["enrollments"][0]["credits"]["remaining"], 6);
}

#[actix_web::test]
async fn test_payout_projection_counts_weekdays() {
    let storage = storage().await;
    let admin = create_user(&storage, "admin@school.test", vec![UserRole::Admin]).await;
    let instrument = storage.create_instrument("Drums").await.unwrap();
    let teacher = create_teacher(&storage, "Meera", 500).await;
    create_batch(&storage, &teacher, instrument.id).await;
    let app = init_app!(storage);

    // 2024-09 有 5 个周一、4 个周三
    let req = test::TestRequest::get()
        .uri(&format!(
            "/api/teachers/{}/payouts/projection?month=2024-09",
            teacher.id
        ))
        .insert_header(bearer(&admin))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["month"], "2024-09");
    assert_eq!(body["data"]["scheduled_sessions"], 9);
    assert_eq!(body["data"]["projected_amount"], 4_500);
    assert_eq!(body["data"]["delivered_sessions"], 0);
}

#[actix_web::test]
async fn test_teacher_cannot_view_other_projection() {
    let storage = storage().await;
    let meera = create_teacher(&storage, "Meera", 500).await;
    let ravi = create_teacher(&storage, "Ravi", 500).await;
    let user = teacher_account(&storage, "meera@school.test", &meera).await;
    let app = init_app!(storage);

    let req = test::TestRequest::get()
        .uri(&format!("/api/teachers/{}/payouts/projection", ravi.id))
        .insert_header(bearer(&user))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_teacher_rate_above_cap_is_rejected() {
    let storage = storage().await;
    let admin = create_user(&storage, "admin@school.test", vec![UserRole::Admin]).await;
    let app = init_app!(storage);

    let req = test::TestRequest::post()
        .uri("/api/teachers")
        .insert_header(bearer(&admin))
        .set_json(json!({
            "name": "Meera",
            "payout_type": "per_class",
            "rate": i64::MAX / 2 + 1
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], ErrorCode::TeacherRateInvalid as i32);
}

#[actix_web::test]
async fn test_payout_can_only_be_paid_once() {
    let storage = storage().await;
    let admin = create_user(&storage, "admin@school.test", vec![UserRole::Admin]).await;
    let instrument = storage.create_instrument("Flute").await.unwrap();
    let teacher = create_teacher(&storage, "Meera", 500).await;
    create_batch(&storage, &teacher, instrument.id).await;
    let app = init_app!(storage);

    let req = test::TestRequest::post()
        .uri("/api/finance/payouts/generate?month=2024-09")
        .insert_header(bearer(&admin))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let payout_id = body["data"]["created"][0]["id"].as_i64().unwrap();

    let mark = |paid_on: &str| {
        test::TestRequest::put()
            .uri(&format!("/api/finance/payouts/{payout_id}/paid"))
            .insert_header(bearer(&admin))
            .set_json(json!({"paid_on": paid_on}))
            .to_request()
    };

    let resp = test::call_service(&app, mark("2024-10-01")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["status"], "paid");

    let resp = test::call_service(&app, mark("2024-10-05")).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], ErrorCode::PayoutAlreadyPaid as i32);

    let payouts = storage
        .list_payouts(Some(teacher.id), Some("2024-09"))
        .await
        .unwrap();
    assert_eq!(payouts[0].paid_on, NaiveDate::from_ymd_opt(2024, 10, 1));
}

#[actix_web::test]
async fn test_low_credits_notify_office_only() {
    let storage = storage().await;
    let admin = create_user(&storage, "admin@school.test", vec![UserRole::Admin]).await;
    let staff = create_user(&storage, "office@school.test", vec![UserRole::Staff]).await;
    let instrument = storage.create_instrument("Cello").await.unwrap();
    let teacher = create_teacher(&storage, "Meera", 500).await;
    let batch = create_batch(&storage, &teacher, instrument.id).await;
    let teacher_user = teacher_account(&storage, "meera@school.test", &teacher).await;
    let app = init_app!(storage);

    let req = test::TestRequest::post()
        .uri("/api/students")
        .insert_header(bearer(&staff))
        .set_json(json!({"first_name": "Isha", "last_name": "Nair"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let student_id = body["data"]["id"].as_i64().unwrap();

    let req = test::TestRequest::post()
        .uri("/api/enrollments")
        .insert_header(bearer(&staff))
        .set_json(json!({
            "student_id": student_id,
            "instrument_id": instrument.id,
            "batch_ids": [batch.id]
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let enrollment_id = body["data"]["id"].as_i64().unwrap();

    let req = test::TestRequest::post()
        .uri("/api/payments")
        .insert_header(bearer(&staff))
        .set_json(json!({
            "student_id": student_id,
            "enrollment_id": enrollment_id,
            "amount": 50_000,
            "credits": 1,
            "method": "upi"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let admin_before = storage.count_unread_notifications(admin.id).await.unwrap();
    let staff_before = storage.count_unread_notifications(staff.id).await.unwrap();

    // 唯一的课时被消耗，余额降到阈值以下
    let req = test::TestRequest::post()
        .uri(&format!("/api/batches/{}/attendance", batch.id))
        .insert_header(bearer(&teacher_user))
        .set_json(json!({"entries": [{"student_id": student_id, "status": "present"}]}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    assert_eq!(
        storage.count_unread_notifications(admin.id).await.unwrap(),
        admin_before + 1
    );
    assert_eq!(
        storage.count_unread_notifications(staff.id).await.unwrap(),
        staff_before + 1
    );
    assert_eq!(
        storage
            .count_unread_notifications(teacher_user.id)
            .await
            .unwrap(),
        0
    );

    let latest = storage
        .list_notifications_with_pagination(staff.id, true, 1, 10)
        .await
        .unwrap();
    assert!(
        latest
            .items
            .iter()
            .any(|n| n.kind == NotificationKind::LowCredits)
    );
}
