use serde::{Deserialize, Serialize};
use ts_rs::TS;

define_string_enum! {
    /// 用户角色，一个用户可以同时拥有多个角色
    UserRole("用户角色", "user.ts") {
        Admin => "admin",     // 管理员
        Staff => "staff",     // 前台/教务
        Teacher => "teacher", // 教师
    }
}

impl UserRole {
    pub fn admin_roles() -> &'static [&'static UserRole] {
        &[&Self::Admin]
    }
    pub fn staff_roles() -> &'static [&'static UserRole] {
        &[&Self::Admin, &Self::Staff]
    }
    pub fn teacher_roles() -> &'static [&'static UserRole] {
        &[&Self::Admin, &Self::Teacher]
    }
    pub fn all_roles() -> &'static [&'static UserRole] {
        &[&Self::Admin, &Self::Staff, &Self::Teacher]
    }
}

define_string_enum! {
    /// 用户状态
    UserStatus("用户状态", "user.ts") {
        Active => "active",
        Inactive => "inactive",
        Suspended => "suspended",
    }
}

// 用户实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "user.ts")]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing, default)] // 不序列化到JSON响应中
    #[ts(skip)]
    pub password_hash: Option<String>,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub status: UserStatus,
    pub roles: Vec<UserRole>,
    /// 关联的教师档案
    pub teacher_id: Option<i64>,
    pub last_login: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl User {
    pub fn has_role(&self, role: UserRole) -> bool {
        self.roles.contains(&role)
    }

    pub fn has_any_role(&self, roles: &[&UserRole]) -> bool {
        roles.iter().any(|role| self.roles.contains(role))
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(UserRole::Admin)
    }

    /// 管理员或教务
    pub fn is_office(&self) -> bool {
        self.has_any_role(UserRole::staff_roles())
    }

    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with(roles: Vec<UserRole>) -> User {
        User {
            id: 1,
            email: "a@b.c".into(),
            password_hash: None,
            display_name: "A".into(),
            avatar_url: None,
            status: UserStatus::Active,
            roles,
            teacher_id: None,
            last_login: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_role_round_trip_and_error() {
        assert_eq!("staff".parse::<UserRole>().unwrap(), UserRole::Staff);
        assert_eq!(UserRole::Teacher.to_string(), "teacher");
        let err = serde_json::from_str::<UserRole>("\"owner\"").unwrap_err();
        assert!(err.to_string().contains("admin, staff, teacher"));
    }

    #[test]
    fn test_role_checks() {
        let teacher = user_with(vec![UserRole::Teacher]);
        assert!(!teacher.is_office());
        assert!(teacher.has_any_role(UserRole::teacher_roles()));

        let staff = user_with(vec![UserRole::Staff, UserRole::Teacher]);
        assert!(staff.is_office());
        assert!(!staff.is_admin());
    }
}
