/// Basic unit tests exercising the public API surface
use chrono::NaiveDate;
use consistency_tracker::*;

#[test]
fn test_habit_creation_and_validation() {
    let user_id = UserId::new();

    let habit = Habit::new(
        user_id,
        "Morning Run".to_string(),
        Some("5k before work".to_string()),
        Some("#ff8800".to_string()),
        None,
    );
    assert!(habit.is_ok());
    let habit = habit.unwrap();
    assert_eq!(habit.name, "Morning Run");
    assert!(habit.is_active);

    // Empty names and malformed colors are rejected
    assert!(Habit::new(user_id, "".to_string(), None, None, None).is_err());
    assert!(Habit::new(user_id, "Run".to_string(), None, Some("orange".to_string()), None).is_err());
}

#[test]
fn test_user_email_validation() {
    assert!(User::new("ada@example.com".to_string(), "Ada".to_string()).is_ok());
    assert!(User::new("not-an-email".to_string(), "Ada".to_string()).is_err());
}

#[test]
fn test_streak_lifecycle_transitions() {
    let habit_id = HabitId::new();
    let start = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();

    let mut streak = Streak::start(habit_id, 2, start);
    assert_eq!(streak.status, StreakStatus::Active);
    assert_eq!(streak.days_remaining(), 2);

    streak.record_check_in(start);
    streak.record_check_in(start + chrono::Duration::days(1));
    assert!(streak.target_reached());

    streak.complete(start + chrono::Duration::days(1));
    streak.update_max_streak();
    assert_eq!(streak.status, StreakStatus::Completed);
    assert_eq!(streak.max_streak_achieved, 2);
}

#[test]
fn test_check_in_rejects_future_dates() {
    let streak_id = StreakId::new();
    let tomorrow = chrono::Utc::now().date_naive() + chrono::Duration::days(1);

    assert!(CheckIn::new(streak_id, tomorrow, None).is_err());
    assert!(CheckIn::new(streak_id, chrono::Utc::now().date_naive(), None).is_ok());
}

#[test]
fn test_status_and_achievement_type_round_trip() {
    assert_eq!(StreakStatus::parse("active"), Some(StreakStatus::Active));
    assert_eq!(StreakStatus::Completed.as_str(), "completed");
    assert_eq!(StreakStatus::parse("bogus"), None);

    assert_eq!(
        AchievementType::parse("streak_completed"),
        AchievementType::StreakCompleted
    );
    let custom = AchievementType::parse("first_week");
    assert_eq!(custom.as_str(), "first_week");
}

#[test]
fn test_error_kinds_classify_for_transport() {
    assert_eq!(ServiceError::HabitNotFound.kind(), ErrorKind::NotFound);
    assert_eq!(ServiceError::EmailTaken.kind(), ErrorKind::Conflict);
    assert_eq!(ServiceError::StreakBroken.kind(), ErrorKind::BadRequest);
    assert_eq!(
        ServiceError::Storage(StorageError::Connection("down".to_string())).kind(),
        ErrorKind::Internal
    );
}

#[test]
fn test_typed_ids_parse_and_display() {
    let id = HabitId::new();
    let parsed = HabitId::from_string(&id.to_string()).unwrap();
    assert_eq!(id, parsed);

    assert!(HabitId::from_string("not-a-uuid").is_err());
}
