/// End-to-end scenarios over the SQLite backend
use chrono::NaiveDate;
use tempfile::NamedTempFile;

use consistency_tracker::analytics;
use consistency_tracker::service::{
    check_in_on, create_habit, create_streak_on, create_user, get_habit, list_achievements,
    list_check_ins, CheckInParams, CreateHabitParams, CreateStreakParams, CreateUserParams,
};
use consistency_tracker::storage::StreakStore;
use consistency_tracker::{
    AchievementType, ConsistencyTracker, ErrorKind, Habit, ServiceError, SqliteStorage,
    StreakStatus, User,
};

fn day(n: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, n).unwrap()
}

fn open_tracker() -> (ConsistencyTracker, NamedTempFile) {
    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    let tracker = ConsistencyTracker::open(temp_file.path().to_path_buf())
        .expect("Failed to open tracker");
    (tracker, temp_file)
}

fn setup_habit(storage: &SqliteStorage) -> (User, Habit) {
    let user = create_user(
        storage,
        CreateUserParams {
            email: "runner@example.com".to_string(),
            name: "Runner".to_string(),
        },
    )
    .expect("Failed to create user");

    let habit = create_habit(
        storage,
        user.id,
        CreateHabitParams {
            name: "Morning Run".to_string(),
            description: Some("5k before work".to_string()),
            color: Some("#ff8800".to_string()),
            icon: None,
        },
    )
    .expect("Failed to create habit");

    (user, habit)
}

#[test]
fn test_three_day_streak_completes_and_awards_achievement() {
    let (tracker, _file) = open_tracker();
    let storage = tracker.storage();
    let (user, habit) = setup_habit(storage);

    create_streak_on(
        storage,
        user.id,
        habit.id,
        CreateStreakParams { target_days: 3 },
        day(1),
    )
    .expect("Failed to start streak");

    for n in 1..=3 {
        check_in_on(storage, user.id, habit.id, CheckInParams::default(), day(n))
            .expect("Check-in failed");
    }

    // The streak is completed, not active anymore
    assert!(storage.find_active_streak(habit.id).unwrap().is_none());
    let streaks = storage.find_streaks_by_habit(habit.id).unwrap();
    assert_eq!(streaks.len(), 1);
    assert_eq!(streaks[0].status, StreakStatus::Completed);
    assert_eq!(streaks[0].current_streak, 3);
    assert_eq!(streaks[0].max_streak_achieved, 3);
    assert_eq!(streaks[0].completed_at, Some(day(3)));

    // Exactly one achievement, pointing back at the streak
    let achievements = list_achievements(storage, user.id).unwrap();
    assert_eq!(achievements.len(), 1);
    assert_eq!(
        achievements[0].achievement.achievement_type,
        AchievementType::StreakCompleted
    );
    assert_eq!(achievements[0].achievement.target_days, 3);
    assert_eq!(achievements[0].habit_name.as_deref(), Some("Morning Run"));

    // History survives completion
    let check_ins = list_check_ins(storage, user.id, habit.id).unwrap();
    assert_eq!(check_ins.len(), 3);
}

#[test]
fn test_missed_day_deletes_streak_and_history() {
    let (tracker, _file) = open_tracker();
    let storage = tracker.storage();
    let (user, habit) = setup_habit(storage);

    create_streak_on(
        storage,
        user.id,
        habit.id,
        CreateStreakParams { target_days: 7 },
        day(1),
    )
    .unwrap();

    check_in_on(storage, user.id, habit.id, CheckInParams::default(), day(1)).unwrap();
    check_in_on(storage, user.id, habit.id, CheckInParams::default(), day(2)).unwrap();

    // Skipping day 3 breaks the attempt on day 4
    let result = check_in_on(storage, user.id, habit.id, CheckInParams::default(), day(4));
    assert!(matches!(result, Err(ServiceError::StreakBroken)));

    // The streak and every check-in it owned are gone
    assert!(storage.find_streaks_by_habit(habit.id).unwrap().is_empty());
    assert!(list_check_ins(storage, user.id, habit.id).unwrap().is_empty());

    // A fresh attempt can start immediately and check in the same day
    create_streak_on(
        storage,
        user.id,
        habit.id,
        CreateStreakParams { target_days: 7 },
        day(4),
    )
    .unwrap();
    check_in_on(storage, user.id, habit.id, CheckInParams::default(), day(4)).unwrap();

    let details = get_habit(storage, user.id, habit.id).unwrap();
    let streak = details.current_streak.expect("new streak should be active");
    assert_eq!(streak.current_streak, 1);
}

#[test]
fn test_double_check_in_rejected_without_side_effects() {
    let (tracker, _file) = open_tracker();
    let storage = tracker.storage();
    let (user, habit) = setup_habit(storage);

    create_streak_on(
        storage,
        user.id,
        habit.id,
        CreateStreakParams { target_days: 7 },
        day(1),
    )
    .unwrap();
    check_in_on(storage, user.id, habit.id, CheckInParams::default(), day(1)).unwrap();

    let result = check_in_on(storage, user.id, habit.id, CheckInParams::default(), day(1));
    assert!(matches!(&result, Err(ServiceError::AlreadyCheckedIn)));
    assert_eq!(result.unwrap_err().kind(), ErrorKind::Conflict);

    // Counter and history unchanged
    let streak = storage.find_active_streak(habit.id).unwrap().unwrap();
    assert_eq!(streak.current_streak, 1);
    assert_eq!(list_check_ins(storage, user.id, habit.id).unwrap().len(), 1);
}

#[test]
fn test_one_active_streak_per_habit() {
    let (tracker, _file) = open_tracker();
    let storage = tracker.storage();
    let (user, habit) = setup_habit(storage);

    create_streak_on(
        storage,
        user.id,
        habit.id,
        CreateStreakParams { target_days: 7 },
        day(1),
    )
    .unwrap();

    let result = create_streak_on(
        storage,
        user.id,
        habit.id,
        CreateStreakParams { target_days: 14 },
        day(1),
    );
    assert!(matches!(result, Err(ServiceError::ActiveStreakExists)));

    let bad_target = create_streak_on(
        storage,
        user.id,
        habit.id,
        CreateStreakParams { target_days: 0 },
        day(1),
    );
    assert_eq!(bad_target.unwrap_err().kind(), ErrorKind::BadRequest);
}

#[test]
fn test_foreign_habit_reported_as_missing() {
    let (tracker, _file) = open_tracker();
    let storage = tracker.storage();
    let (_owner, habit) = setup_habit(storage);

    let intruder = create_user(
        storage,
        CreateUserParams {
            email: "other@example.com".to_string(),
            name: "Other".to_string(),
        },
    )
    .unwrap();

    let result = create_streak_on(
        storage,
        intruder.id,
        habit.id,
        CreateStreakParams { target_days: 7 },
        day(1),
    );
    assert!(matches!(&result, Err(ServiceError::HabitNotFound)));
    assert_eq!(result.unwrap_err().kind(), ErrorKind::NotFound);
}

#[test]
fn test_database_persists_across_reopen() {
    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = temp_file.path().to_path_buf();

    let user_id;
    let habit_id;
    {
        let tracker = ConsistencyTracker::open(db_path.clone()).unwrap();
        let (user, habit) = setup_habit(tracker.storage());
        user_id = user.id;
        habit_id = habit.id;

        create_streak_on(
            tracker.storage(),
            user.id,
            habit.id,
            CreateStreakParams { target_days: 5 },
            day(1),
        )
        .unwrap();
        check_in_on(
            tracker.storage(),
            user.id,
            habit.id,
            CheckInParams {
                notes: Some("felt great".to_string()),
            },
            day(1),
        )
        .unwrap();
    }

    // Reopen and verify everything came back
    let tracker = ConsistencyTracker::open(db_path).unwrap();
    let storage = tracker.storage();

    let details = get_habit(storage, user_id, habit_id).unwrap();
    assert_eq!(details.habit.name, "Morning Run");
    let streak = details.current_streak.expect("streak should persist");
    assert_eq!(streak.current_streak, 1);
    assert_eq!(streak.last_check_in_date, Some(day(1)));

    let check_ins = list_check_ins(storage, user_id, habit_id).unwrap();
    assert_eq!(check_ins[0].notes.as_deref(), Some("felt great"));
}

#[test]
fn test_profile_over_sqlite_backend() {
    let (tracker, _file) = open_tracker();
    let storage = tracker.storage();
    let (user, habit) = setup_habit(storage);

    create_streak_on(
        storage,
        user.id,
        habit.id,
        CreateStreakParams { target_days: 3 },
        day(1),
    )
    .unwrap();
    for n in 1..=3 {
        check_in_on(storage, user.id, habit.id, CheckInParams::default(), day(n)).unwrap();
    }

    let profile = analytics::user_profile(storage, user.id).unwrap();

    assert_eq!(profile.email, "runner@example.com");
    assert_eq!(profile.overview.total_habits, 1);
    assert_eq!(profile.overview.total_check_ins, 3);
    assert_eq!(profile.overview.total_achievements, 1);
    assert_eq!(profile.streak_insights.best_streak_ever, 3);
    assert_eq!(profile.consistency_chart.len(), analytics::CHART_DAYS as usize);
    assert_eq!(profile.top_habits.len(), 1);
    assert_eq!(profile.recent_achievements.len(), 1);
}
