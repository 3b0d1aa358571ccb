//! 出勤存储操作

use chrono::NaiveDate;

use super::{SeaOrmStorage, db_err, now_ts};
use crate::entity::attendance_records::{
    ActiveModel as RecordActiveModel, Column as RecordColumn, Entity as AttendanceRecords,
};
use crate::entity::teacher_attendance::{
    ActiveModel as TeacherActiveModel, Column as TeacherColumn, Entity as TeacherAttendances,
    Model as TeacherModel,
};
use crate::errors::Result;
use crate::models::{
    attendance::entities::{AttendanceMark, AttendanceRecord},
    teachers::entities::{TeacherAttendance, TeacherAttendanceStatus},
};
use crate::storage::AttendanceStorage;
use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

impl SeaOrmStorage {
    /// 按 (batch_id, date) 写入或覆盖教师出勤
    async fn upsert_teacher_attendance_in<C: ConnectionTrait>(
        db: &C,
        teacher_id: i64,
        batch_id: i64,
        date: NaiveDate,
        status: TeacherAttendanceStatus,
        marked_by: i64,
    ) -> Result<TeacherModel> {
        let existing = TeacherAttendances::find()
            .filter(TeacherColumn::BatchId.eq(batch_id))
            .filter(TeacherColumn::Date.eq(date))
            .one(db)
            .await
            .map_err(db_err("查询教师出勤失败"))?;

        let model = match existing {
            Some(row) => {
                let mut model: TeacherActiveModel = row.into();
                model.teacher_id = Set(teacher_id);
                model.status = Set(status.to_string());
                model.marked_by = Set(marked_by);
                model.update(db).await
            }
            None => {
                TeacherActiveModel {
                    teacher_id: Set(teacher_id),
                    batch_id: Set(batch_id),
                    date: Set(date),
                    status: Set(status.to_string()),
                    marked_by: Set(marked_by),
                    created_at: Set(now_ts()),
                    ..Default::default()
                }
                .insert(db)
                .await
            }
        };
        model.map_err(db_err("写入教师出勤失败"))
    }
}

#[async_trait]
impl AttendanceStorage for SeaOrmStorage {
    async fn mark_batch_attendance(
        &self,
        batch_id: i64,
        teacher_id: i64,
        date: NaiveDate,
        marks: Vec<AttendanceMark>,
        marked_by: i64,
    ) -> Result<Vec<AttendanceRecord>> {
        let now = now_ts();
        let txn = self.db.begin().await.map_err(db_err("开启事务失败"))?;
        let mut records = Vec::with_capacity(marks.len());

        for mark in marks {
            let existing = AttendanceRecords::find()
                .filter(RecordColumn::EnrollmentId.eq(mark.enrollment_id))
                .filter(RecordColumn::BatchId.eq(batch_id))
                .filter(RecordColumn::Date.eq(date))
                .one(&txn)
                .await
                .map_err(db_err("查询出勤记录失败"))?;

            let saved = match existing {
                Some(row) => {
                    let mut model: RecordActiveModel = row.into();
                    model.status = Set(mark.status.to_string());
                    model.marked_by = Set(marked_by);
                    model.update(&txn).await
                }
                None => {
                    RecordActiveModel {
                        enrollment_id: Set(mark.enrollment_id),
                        student_id: Set(mark.student_id),
                        batch_id: Set(batch_id),
                        date: Set(date),
                        status: Set(mark.status.to_string()),
                        marked_by: Set(marked_by),
                        created_at: Set(now),
                        ..Default::default()
                    }
                    .insert(&txn)
                    .await
                }
            }
            .map_err(db_err("写入出勤记录失败"))?;
            records.push(saved.into_record());
        }

        // 点名即视为教师到课，已登记的代课保持不变
        let recorded = TeacherAttendances::find()
            .filter(TeacherColumn::BatchId.eq(batch_id))
            .filter(TeacherColumn::Date.eq(date))
            .one(&txn)
            .await
            .map_err(db_err("查询教师出勤失败"))?
            .and_then(|row| row.status.parse::<TeacherAttendanceStatus>().ok());
        if recorded != Some(TeacherAttendanceStatus::Substituted) {
            Self::upsert_teacher_attendance_in(
                &txn,
                teacher_id,
                batch_id,
                date,
                TeacherAttendanceStatus::Present,
                marked_by,
            )
            .await?;
        }

        txn.commit().await.map_err(db_err("提交事务失败"))?;
        Ok(records)
    }

    async fn list_batch_attendance(
        &self,
        batch_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>> {
        let models = AttendanceRecords::find()
            .filter(RecordColumn::BatchId.eq(batch_id))
            .filter(RecordColumn::Date.eq(date))
            .order_by_asc(RecordColumn::StudentId)
            .all(&self.db)
            .await
            .map_err(db_err("查询班次出勤失败"))?;
        Ok(models.into_iter().map(|m| m.into_record()).collect())
    }

    async fn list_student_attendance(&self, student_id: i64) -> Result<Vec<AttendanceRecord>> {
        let models = AttendanceRecords::find()
            .filter(RecordColumn::StudentId.eq(student_id))
            .order_by_asc(RecordColumn::Date)
            .all(&self.db)
            .await
            .map_err(db_err("查询学生出勤失败"))?;
        Ok(models.into_iter().map(|m| m.into_record()).collect())
    }

    async fn list_enrollment_attendance(
        &self,
        enrollment_id: i64,
    ) -> Result<Vec<AttendanceRecord>> {
        let models = AttendanceRecords::find()
            .filter(RecordColumn::EnrollmentId.eq(enrollment_id))
            .order_by_asc(RecordColumn::Date)
            .all(&self.db)
            .await
            .map_err(db_err("查询报名出勤失败"))?;
        Ok(models.into_iter().map(|m| m.into_record()).collect())
    }

    async fn upsert_teacher_attendance(
        &self,
        teacher_id: i64,
        batch_id: i64,
        date: NaiveDate,
        status: TeacherAttendanceStatus,
        marked_by: i64,
    ) -> Result<TeacherAttendance> {
        let model = Self::upsert_teacher_attendance_in(
            &self.db, teacher_id, batch_id, date, status, marked_by,
        )
        .await?;
        Ok(model.into_teacher_attendance())
    }

    async fn get_teacher_attendance(
        &self,
        batch_id: i64,
        date: NaiveDate,
    ) -> Result<Option<TeacherAttendance>> {
        let model = TeacherAttendances::find()
            .filter(TeacherColumn::BatchId.eq(batch_id))
            .filter(TeacherColumn::Date.eq(date))
            .one(&self.db)
            .await
            .map_err(db_err("查询教师出勤失败"))?;
        Ok(model.map(|m| m.into_teacher_attendance()))
    }

    async fn list_teacher_attendance(
        &self,
        teacher_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<TeacherAttendance>> {
        let models = TeacherAttendances::find()
            .filter(TeacherColumn::TeacherId.eq(teacher_id))
            .filter(TeacherColumn::Date.between(from, to))
            .order_by_asc(TeacherColumn::Date)
            .all(&self.db)
            .await
            .map_err(db_err("查询教师出勤失败"))?;
        Ok(models.into_iter().map(|m| m.into_teacher_attendance()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{seed_batch, seed_student, storage};
    use super::*;
    use crate::models::attendance::entities::AttendanceStatus;
    use crate::models::enrollments::requests::NewEnrollment;
    use crate::storage::EnrollmentStorage;

    #[tokio::test]
    async fn test_marking_is_an_upsert_and_marks_teacher_present() {
        let storage = storage().await;
        let (teacher_id, instrument_id, batch_id) = seed_batch(&storage, 5).await;
        let student_id = seed_student(&storage, "Isha").await;
        let date = NaiveDate::from_ymd_opt(2024, 9, 2).unwrap();
        let enrollment = storage
            .create_enrollment(NewEnrollment {
                student_id,
                instrument_id,
                package_id: None,
                start_date: date,
                end_date: None,
                batch_ids: vec![batch_id],
            })
            .await
            .unwrap();

        for status in [AttendanceStatus::Absent, AttendanceStatus::Excused] {
            storage
                .mark_batch_attendance(
                    batch_id,
                    teacher_id,
                    date,
                    vec![AttendanceMark {
                        enrollment_id: enrollment.id,
                        student_id,
                        status,
                    }],
                    1,
                )
                .await
                .unwrap();
        }

        let records = storage.list_batch_attendance(batch_id, date).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status, AttendanceStatus::Excused);

        let teacher = storage
            .get_teacher_attendance(batch_id, date)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(teacher.status, TeacherAttendanceStatus::Present);

        let month = storage
            .list_teacher_attendance(
                teacher_id,
                NaiveDate::from_ymd_opt(2024, 9, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 9, 30).unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(month.len(), 1);
    }

    #[tokio::test]
    async fn test_marking_keeps_recorded_substitution() {
        let storage = storage().await;
        let (teacher_id, instrument_id, batch_id) = seed_batch(&storage, 5).await;
        let student_id = seed_student(&storage, "Dev").await;
        let date = NaiveDate::from_ymd_opt(2024, 9, 4).unwrap();
        let enrollment = storage
            .create_enrollment(NewEnrollment {
                student_id,
                instrument_id,
                package_id: None,
                start_date: date,
                end_date: None,
                batch_ids: vec![batch_id],
            })
            .await
            .unwrap();

        storage
            .upsert_teacher_attendance(
                teacher_id,
                batch_id,
                date,
                TeacherAttendanceStatus::Substituted,
                1,
            )
            .await
            .unwrap();
        storage
            .mark_batch_attendance(
                batch_id,
                teacher_id,
                date,
                vec![AttendanceMark {
                    enrollment_id: enrollment.id,
                    student_id,
                    status: AttendanceStatus::Present,
                }],
                2,
            )
            .await
            .unwrap();

        let teacher = storage
            .get_teacher_attendance(batch_id, date)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(teacher.status, TeacherAttendanceStatus::Substituted);
    }

    #[tokio::test]
    async fn test_failed_mark_rolls_back() {
        let storage = storage().await;
        let (teacher_id, _, batch_id) = seed_batch(&storage, 5).await;
        let date = NaiveDate::from_ymd_opt(2024, 9, 2).unwrap();

        // 不存在的报名触发外键错误，教师出勤也不应写入
        let result = storage
            .mark_batch_attendance(
                batch_id,
                teacher_id,
                date,
                vec![AttendanceMark {
                    enrollment_id: 4242,
                    student_id: 4242,
                    status: AttendanceStatus::Present,
                }],
                1,
            )
            .await;
        assert!(result.is_err());
        assert!(
            storage
                .get_teacher_attendance(batch_id, date)
                .await
                .unwrap()
                .is_none()
        );
    }
}
