/// Analytics engine: read-side aggregations over the tracker's history
///
/// Everything here is derived on demand from the stored habits, streaks,
/// check-ins, and achievements - no persisted aggregates, no mutation, safe
/// to recompute on every request. Public entry points take an explicit
/// instant so tests control time; the convenience wrappers use now.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Achievement, Habit, HabitId, StreakStatus, User, UserId};
use crate::service::ServiceError;
use crate::storage::{AchievementStore, CheckInStore, HabitStore, StreakStore, UserStore};

/// Number of days in the consistency chart
pub const CHART_DAYS: i64 = 30;

/// How many habits the top-habit ranking keeps
const TOP_HABITS_LIMIT: usize = 5;

/// How many achievements count as "recent"
const RECENT_ACHIEVEMENTS_LIMIT: usize = 5;

/// Headline counters for the profile view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverviewStats {
    pub total_habits: usize,
    pub active_habits: usize,
    pub total_check_ins: usize,
    pub total_achievements: usize,
    pub days_since_joined: i64,
    /// Percentage of possible days checked in since each habit's creation
    pub overall_consistency: f64,
    /// Same, over the trailing 7 days
    pub weekly_consistency: f64,
    /// Same, over the trailing 30 days
    pub monthly_consistency: f64,
}

/// Aggregate streak statistics across every attempt the user ever made
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreakInsight {
    pub current_longest_streak: i32,
    pub best_streak_ever: i32,
    pub average_streak_length: f64,
    pub active_streaks_count: usize,
}

/// One day of the consistency chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyDataPoint {
    pub date: NaiveDate,
    pub percentage: f64,
    pub check_ins: usize,
    pub total_habits: usize,
}

/// Per-habit performance summary backing the top-habit ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitPerformance {
    pub habit_id: HabitId,
    pub habit_name: String,
    /// Check-ins per day since creation, capped at 100
    pub consistency_rate: f64,
    pub current_streak: i32,
    pub total_check_ins: usize,
    pub last_check_in: Option<NaiveDate>,
}

/// Direction of the last week's consistency relative to the week before
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImprovementTrend {
    Improving,
    Declining,
    Stable,
    InsufficientData,
}

/// A predicted, unpersisted milestone: an active streak within three days
/// of its target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MilestonePreview {
    pub habit_id: HabitId,
    pub habit_name: String,
    pub achievement_type: String,
    pub target_days: i32,
}

/// The full profile view assembled for one user
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,

    pub overview: OverviewStats,
    pub streak_insights: StreakInsight,
    pub consistency_chart: Vec<ConsistencyDataPoint>,
    pub top_habits: Vec<HabitPerformance>,
    pub recent_achievements: Vec<Achievement>,

    pub most_consistent_habit: Option<HabitPerformance>,
    pub improvement_trend: ImprovementTrend,
    pub next_milestone: Option<MilestonePreview>,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

/// Assemble the profile view as of now
pub fn user_profile<S>(store: &S, user_id: UserId) -> Result<UserProfile, ServiceError>
where
    S: UserStore + HabitStore + StreakStore + CheckInStore + AchievementStore,
{
    profile_at(store, user_id, Utc::now())
}

/// Instant-explicit variant of [`user_profile`]
pub fn profile_at<S>(
    store: &S,
    user_id: UserId,
    now: DateTime<Utc>,
) -> Result<UserProfile, ServiceError>
where
    S: UserStore + HabitStore + StreakStore + CheckInStore + AchievementStore,
{
    let user = store
        .find_user(user_id)?
        .ok_or(ServiceError::UserNotFound)?;

    let habits = store.find_habits_by_user(user_id)?;
    let achievements = store.find_achievements_by_user(user_id)?;

    let overview = overview_stats(store, &user, &habits, &achievements, now)?;
    let streak_insights = streak_insights(store, &habits)?;
    let consistency_chart = consistency_chart(store, &habits, CHART_DAYS, now.date_naive())?;
    let top_habits = top_habits(store, &habits, now)?;
    let recent_achievements = recent_achievements(achievements);

    let most_consistent_habit = top_habits.first().cloned();
    let improvement_trend = improvement_trend(&consistency_chart);
    let next_milestone = next_milestone(store, &habits)?;

    Ok(UserProfile {
        id: user.id,
        email: user.email,
        name: user.name,
        created_at: user.created_at,
        overview,
        streak_insights,
        consistency_chart,
        top_habits,
        recent_achievements,
        most_consistent_habit,
        improvement_trend,
        next_milestone,
    })
}

fn overview_stats<S: StreakStore + CheckInStore>(
    store: &S,
    user: &User,
    habits: &[Habit],
    achievements: &[Achievement],
    now: DateTime<Utc>,
) -> Result<OverviewStats, ServiceError> {
    let days_since_joined = (now - user.created_at).num_days();
    let active_habits = habits.iter().filter(|h| h.is_active).count();
    let total_check_ins = total_check_ins(store, habits)?;

    Ok(OverviewStats {
        total_habits: habits.len(),
        active_habits,
        total_check_ins,
        total_achievements: achievements.len(),
        days_since_joined,
        overall_consistency: consistency_for_period(store, habits, 0, now)?,
        weekly_consistency: consistency_for_period(store, habits, 7, now)?,
        monthly_consistency: consistency_for_period(store, habits, 30, now)?,
    })
}

fn total_check_ins<S: StreakStore + CheckInStore>(
    store: &S,
    habits: &[Habit],
) -> Result<usize, ServiceError> {
    let mut total = 0;
    for habit in habits {
        for streak in store.find_streaks_by_habit(habit.id)? {
            total += store.find_check_ins_by_streak(streak.id)?.len();
        }
    }
    Ok(total)
}

/// Percentage of possible days with a check-in, over a trailing window
///
/// A window of 0 days means all-time. Per active habit, the window starts at
/// the later of the habit's creation and now minus the window; a check-in
/// counts when its day lies strictly inside (window_start, now). The result
/// is not capped: stacked history from older streaks can push a short
/// window past 100.
pub fn consistency_for_period<S: StreakStore + CheckInStore>(
    store: &S,
    habits: &[Habit],
    window_days: i64,
    now: DateTime<Utc>,
) -> Result<f64, ServiceError> {
    if habits.is_empty() {
        return Ok(0.0);
    }

    let mut total_possible: i64 = 0;
    let mut total_actual: i64 = 0;

    for habit in habits {
        if !habit.is_active {
            continue;
        }

        let mut window_start = if window_days > 0 {
            now - chrono::Duration::days(window_days)
        } else {
            habit.created_at
        };
        if habit.created_at > window_start {
            window_start = habit.created_at;
        }

        let days_in_window = (now - window_start).num_days();
        if days_in_window <= 0 {
            continue;
        }
        total_possible += days_in_window;

        for streak in store.find_streaks_by_habit(habit.id)? {
            for check_in in store.find_check_ins_by_streak(streak.id)? {
                let at = midnight_utc(check_in.check_in_date);
                if at > window_start && at < now {
                    total_actual += 1;
                }
            }
        }
    }

    if total_possible == 0 {
        return Ok(0.0);
    }

    Ok(round2(total_actual as f64 / total_possible as f64 * 100.0))
}

/// Cross-habit streak statistics
pub fn streak_insights<S: StreakStore>(
    store: &S,
    habits: &[Habit],
) -> Result<StreakInsight, ServiceError> {
    let mut current_longest = 0;
    let mut best_ever = 0;
    let mut active_count = 0;
    let mut streak_lengths: Vec<i32> = Vec::new();

    for habit in habits {
        for streak in store.find_streaks_by_habit(habit.id)? {
            if streak.status == StreakStatus::Active {
                active_count += 1;
                if streak.current_streak > current_longest {
                    current_longest = streak.current_streak;
                }
            }

            if streak.max_streak_achieved > best_ever {
                best_ever = streak.max_streak_achieved;
            }

            if streak.max_streak_achieved > 0 {
                streak_lengths.push(streak.max_streak_achieved);
            }
        }
    }

    let average_streak_length = if streak_lengths.is_empty() {
        0.0
    } else {
        let sum: i32 = streak_lengths.iter().sum();
        round2(sum as f64 / streak_lengths.len() as f64)
    };

    Ok(StreakInsight {
        current_longest_streak: current_longest,
        best_streak_ever: best_ever,
        average_streak_length,
        active_streaks_count: active_count,
    })
}

/// Daily consistency series ending today, oldest point first
///
/// A habit counts toward a day when it was active and already existed on
/// that day; it scores when any of its streaks - historical ones included -
/// has a check-in on that exact day, counted once per habit.
pub fn consistency_chart<S: StreakStore + CheckInStore>(
    store: &S,
    habits: &[Habit],
    days: i64,
    today: NaiveDate,
) -> Result<Vec<ConsistencyDataPoint>, ServiceError> {
    let mut data_points = Vec::with_capacity(days as usize);

    for i in (0..days).rev() {
        let date = today - chrono::Duration::days(i);

        let mut check_ins = 0;
        let mut active_habits = 0;

        for habit in habits {
            if !habit.is_active || habit.created_at.date_naive() > date {
                continue;
            }
            active_habits += 1;

            for streak in store.find_streaks_by_habit(habit.id)? {
                if store.find_check_in_by_date(streak.id, date)?.is_some() {
                    check_ins += 1;
                    break;
                }
            }
        }

        let percentage = if active_habits > 0 {
            round2(check_ins as f64 / active_habits as f64 * 100.0)
        } else {
            0.0
        };

        data_points.push(ConsistencyDataPoint {
            date,
            percentage,
            check_ins,
            total_habits: active_habits,
        });
    }

    Ok(data_points)
}

/// Rank habits by consistency rate, keeping the top five
pub fn top_habits<S: StreakStore + CheckInStore>(
    store: &S,
    habits: &[Habit],
    now: DateTime<Utc>,
) -> Result<Vec<HabitPerformance>, ServiceError> {
    let mut performances = Vec::with_capacity(habits.len());
    for habit in habits {
        performances.push(habit_performance(store, habit, now)?);
    }

    performances.sort_by(|a, b| {
        b.consistency_rate
            .partial_cmp(&a.consistency_rate)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    performances.truncate(TOP_HABITS_LIMIT);

    Ok(performances)
}

fn habit_performance<S: StreakStore + CheckInStore>(
    store: &S,
    habit: &Habit,
    now: DateTime<Utc>,
) -> Result<HabitPerformance, ServiceError> {
    let mut total_check_ins = 0;
    let mut current_streak = 0;
    let mut last_check_in = None;

    for streak in store.find_streaks_by_habit(habit.id)? {
        if streak.status == StreakStatus::Active {
            current_streak = streak.current_streak;
            if streak.last_check_in_date.is_some() {
                last_check_in = streak.last_check_in_date;
            }
        }

        total_check_ins += store.find_check_ins_by_streak(streak.id)?.len();
    }

    let mut days_since_created = (now - habit.created_at).num_days();
    if days_since_created == 0 {
        days_since_created = 1;
    }

    let mut consistency_rate = total_check_ins as f64 / days_since_created as f64 * 100.0;
    if consistency_rate > 100.0 {
        consistency_rate = 100.0;
    }

    Ok(HabitPerformance {
        habit_id: habit.id,
        habit_name: habit.name.clone(),
        consistency_rate: round2(consistency_rate),
        current_streak,
        total_check_ins,
        last_check_in,
    })
}

/// The five most recent achievements, newest first
pub fn recent_achievements(mut achievements: Vec<Achievement>) -> Vec<Achievement> {
    achievements.sort_by(|a, b| b.achieved_at.cmp(&a.achieved_at));
    achievements.truncate(RECENT_ACHIEVEMENTS_LIMIT);
    achievements
}

/// Compare the last week of the chart against the week before it
///
/// A swing of more than five percentage points either way counts as a
/// trend; anything less is stable.
pub fn improvement_trend(chart: &[ConsistencyDataPoint]) -> ImprovementTrend {
    if chart.len() < 14 {
        return ImprovementTrend::InsufficientData;
    }

    let last_week = average_percentage(&chart[chart.len() - 7..]);
    let prev_week = average_percentage(&chart[chart.len() - 14..chart.len() - 7]);

    let diff = last_week - prev_week;
    if diff > 5.0 {
        ImprovementTrend::Improving
    } else if diff < -5.0 {
        ImprovementTrend::Declining
    } else {
        ImprovementTrend::Stable
    }
}

fn average_percentage(points: &[ConsistencyDataPoint]) -> f64 {
    if points.is_empty() {
        return 0.0;
    }
    points.iter().map(|p| p.percentage).sum::<f64>() / points.len() as f64
}

/// The first active streak within three days of completing, if any
///
/// Iteration follows storage order over habits; nothing is persisted, the
/// preview only hints at the next likely achievement.
pub fn next_milestone<S: StreakStore>(
    store: &S,
    habits: &[Habit],
) -> Result<Option<MilestonePreview>, ServiceError> {
    for habit in habits {
        for streak in store.find_streaks_by_habit(habit.id)? {
            if streak.status != StreakStatus::Active {
                continue;
            }
            if streak.current_streak > 0 && streak.current_streak < streak.target_days {
                let remaining = streak.target_days - streak.current_streak;
                if remaining <= 3 {
                    return Ok(Some(MilestonePreview {
                        habit_id: habit.id,
                        habit_name: habit.name.clone(),
                        achievement_type: "streak_completion_prediction".to_string(),
                        target_days: streak.target_days,
                    }));
                }
            }
        }
    }

    Ok(None)
}
