/// 业务错误码
///
/// 响应体中的 `code` 字段，与 HTTP 状态码配合使用：
/// 0 表示成功，1xxx 为通用错误，2xxx 起按业务领域划分。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1009,
    RateLimitExceeded = 1029,
    InternalServerError = 1500,

    // 认证
    AuthFailed = 2000,
    RefreshTokenInvalid = 2001,
    RefreshTokenReused = 2002,
    OAuthNotConfigured = 2003,
    OAuthStateMismatch = 2004,
    OAuthFailed = 2005,
    AccountDisabled = 2006,

    // 用户
    UserNotFound = 3000,
    UserEmailAlreadyExists = 3001,
    UserEmailInvalid = 3002,
    UserNameInvalid = 3003,
    UserPasswordInvalid = 3004,
    UserRolesInvalid = 3005,
    CanNotDeleteCurrentUser = 3006,

    // 教师
    TeacherNotFound = 4000,
    TeacherAlreadyLinked = 4001,
    TeacherInUse = 4002,
    TeacherRateInvalid = 4003,

    // 乐器 / 课程包
    InstrumentNotFound = 5000,
    InstrumentAlreadyExists = 5001,
    InstrumentInUse = 5002,
    PackageNotFound = 5100,
    PackageAlreadyExists = 5101,
    PackageInvalid = 5102,

    // 班次与考勤
    BatchNotFound = 6000,
    BatchRecurrenceInvalid = 6001,
    BatchCapacityExceeded = 6002,
    BatchPermissionDenied = 6003,
    AttendanceDateNotAllowed = 6100,
    AttendanceStudentNotEnrolled = 6101,
    AttendanceEmpty = 6102,

    // 学生
    StudentNotFound = 7000,
    StudentInvalid = 7001,
    GuardianNotFound = 7100,
    DocumentNotFound = 7200,
    FileTypeNotAllowed = 7201,
    FileSizeExceeded = 7202,
    FileUploadFailed = 7203,
    MultifileUploadNotAllowed = 7204,
    EvaluationInvalid = 7300,
    ProspectNotFound = 7400,

    // 报名与收费
    EnrollmentNotFound = 8000,
    EnrollmentInvalid = 8001,
    PaymentNotFound = 8100,
    PaymentInvalid = 8101,

    // 财务
    ExpenseNotFound = 9000,
    MonthInvalid = 9001,
    PayoutNotFound = 9100,
    PayoutAlreadyPaid = 9101,

    // 通知
    NotificationNotFound = 9500,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success as i32, 0);
        assert_eq!(ErrorCode::Unauthorized as i32, 1001);
        assert_eq!(ErrorCode::StudentNotFound as i32, 7000);
    }
}
