use chrono::{Duration, NaiveDate, Utc};
use uuid::Uuid;

use rollcall_attendance::domain::types::{
    AttendanceFilter, NOT_AVAILABLE, UNKNOWN_STUDENT, UNKNOWN_TEACHER,
};
use rollcall_attendance::error::AttendanceServiceError;
use rollcall_attendance::usecase::report::{
    AttendanceReportUseCase, StudentHistoryUseCase, StudentReportUseCase, TeacherReportUseCase,
};

use crate::helpers::{MockAttendanceRepo, MockUserRepo, PERIOD, record, test_student, test_teacher};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
}

#[tokio::test]
async fn history_should_survive_teacher_deletion() {
    let teacher = test_teacher("Tanaka");
    let student = test_student("Sana", "R-001", &[teacher.id]);
    let users = MockUserRepo::new(vec![teacher.clone(), student.clone()]);
    let attendance = MockAttendanceRepo::new(vec![record(
        student.id,
        teacher.id,
        PERIOD,
        day(3),
        Utc::now(),
    )]);
    users.remove(teacher.id);

    let uc = StudentHistoryUseCase {
        users,
        attendance,
    };
    let history = uc.execute(student.id, None).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].marked_by, UNKNOWN_TEACHER);
    assert_eq!(history[0].period, PERIOD);
}

#[tokio::test]
async fn history_should_order_by_date_desc_then_creation() {
    let teacher = test_teacher("Tanaka");
    let student = test_student("Sana", "R-001", &[teacher.id]);
    let t0 = Utc::now();
    let attendance = MockAttendanceRepo::new(vec![
        record(student.id, teacher.id, "P2", day(3), t0 + Duration::hours(2)),
        record(student.id, teacher.id, "P1", day(4), t0),
        record(student.id, teacher.id, "P1", day(3), t0 + Duration::hours(1)),
        record(Uuid::now_v7(), teacher.id, "P1", day(5), t0),
    ]);
    let uc = StudentHistoryUseCase {
        users: MockUserRepo::new(vec![teacher.clone(), student.clone()]),
        attendance,
    };

    let history = uc.execute(student.id, None).await.unwrap();
    let order: Vec<(NaiveDate, &str)> = history
        .iter()
        .map(|h| (h.date, h.period.as_str()))
        .collect();
    assert_eq!(order, vec![(day(4), "P1"), (day(3), "P1"), (day(3), "P2")]);

    let one_day = uc.execute(student.id, Some(day(4))).await.unwrap();
    assert_eq!(one_day.len(), 1);
    assert_eq!(one_day[0].marked_by, "Tanaka");
}

#[tokio::test]
async fn teacher_report_should_default_to_today() {
    let teacher = test_teacher("Tanaka");
    let present = test_student("Sana", "R-001", &[teacher.id]);
    let gone = test_student("Ravi", "R-002", &[teacher.id]);
    let today = Utc::now().date_naive();
    let users = MockUserRepo::new(vec![teacher.clone(), present.clone(), gone.clone()]);
    let attendance = MockAttendanceRepo::new(vec![
        record(present.id, teacher.id, PERIOD, today, Utc::now()),
        record(gone.id, teacher.id, "P9", today, Utc::now()),
        record(present.id, teacher.id, PERIOD, today - Duration::days(1), Utc::now()),
        record(present.id, Uuid::now_v7(), "P7", today, Utc::now()),
    ]);
    users.remove(gone.id);

    let uc = TeacherReportUseCase { users, attendance };

    let report = uc.execute(teacher.id, None, None).await.unwrap();
    assert_eq!(report.len(), 2);
    assert_eq!(report[0].name, "Sana");
    assert_eq!(report[0].roll_number, "R-001");
    assert_eq!(report[1].name, UNKNOWN_STUDENT);
    assert_eq!(report[1].roll_number, NOT_AVAILABLE);

    let one_period = uc
        .execute(teacher.id, Some(today), Some(PERIOD.to_owned()))
        .await
        .unwrap();
    assert_eq!(one_period.len(), 1);
    assert_eq!(one_period[0].student_id, present.id);
}

#[tokio::test]
async fn admin_report_should_filter_and_fill_placeholders() {
    let teacher = test_teacher("Tanaka");
    let student = test_student("Sana", "R-001", &[teacher.id]);
    let ghost_teacher = Uuid::now_v7();
    let mut other_class = record(student.id, teacher.id, "P2", day(3), Utc::now());
    other_class.class_id = Some("9-C".to_owned());
    let attendance = MockAttendanceRepo::new(vec![
        record(student.id, ghost_teacher, "P1", day(3), Utc::now()),
        other_class,
    ]);
    let uc = AttendanceReportUseCase {
        users: MockUserRepo::new(vec![teacher.clone(), student.clone()]),
        attendance,
    };

    let all = uc.execute(AttendanceFilter::default()).await.unwrap();
    assert_eq!(all.len(), 2);

    let class = uc
        .execute(AttendanceFilter {
            class_id: Some("10-A".to_owned()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(class.len(), 1);
    assert_eq!(class[0].student.name, "Sana");
    assert_eq!(class[0].student.roll_number, "R-001");
    assert_eq!(class[0].teacher.id, ghost_teacher);
    assert_eq!(class[0].teacher.name, UNKNOWN_TEACHER);
    assert_eq!(class[0].teacher.email, NOT_AVAILABLE);
}

#[tokio::test]
async fn student_report_should_require_existing_student() {
    let teacher = test_teacher("Tanaka");
    let uc = StudentReportUseCase {
        users: MockUserRepo::new(vec![teacher.clone()]),
        attendance: MockAttendanceRepo::empty(),
    };

    let missing = uc.execute(Uuid::now_v7(), None).await;
    let not_a_student = uc.execute(teacher.id, None).await;
    assert!(matches!(missing, Err(AttendanceServiceError::StudentNotFound)));
    assert!(matches!(
        not_a_student,
        Err(AttendanceServiceError::StudentNotFound)
    ));
}

#[tokio::test]
async fn student_report_should_list_that_students_records() {
    let teacher = test_teacher("Tanaka");
    let student = test_student("Sana", "R-001", &[teacher.id]);
    let attendance = MockAttendanceRepo::new(vec![
        record(student.id, teacher.id, "P1", day(3), Utc::now()),
        record(student.id, teacher.id, "P1", day(4), Utc::now()),
        record(Uuid::now_v7(), teacher.id, "P1", day(3), Utc::now()),
    ]);
    let uc = StudentReportUseCase {
        users: MockUserRepo::new(vec![teacher.clone(), student.clone()]),
        attendance,
    };

    let report = uc.execute(student.id, None).await.unwrap();
    assert_eq!(report.student.id, student.id);
    assert_eq!(report.entries.len(), 2);
    assert!(report.entries.iter().all(|e| e.teacher.name == "Tanaka"));

    let dated = uc.execute(student.id, Some(day(3))).await.unwrap();
    assert_eq!(dated.entries.len(), 1);
}
