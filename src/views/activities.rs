//! Personal activity log, newest first.

use jiff::civil::{Date, DateTime, Time};
use jiff::{Timestamp, tz::TimeZone};
use moveminds_dto::{Activity, NewActivity, Page};

use crate::api::{ActivityQuery, ApiClient};
use crate::collection::{
    CollectionSource, DeleteDialog, DeleteTarget, FilterSet, FilterState, RemoteCollection,
    same_text, search_matches,
};
use crate::error::{MoveMindsError, Result};
use crate::forms::{FormValues, activity_form};
use crate::notices::Notices;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityFilter {
    pub activity_type: Option<String>,
}

impl FilterSet<Activity> for ActivityFilter {
    fn matches(&self, activity: &Activity, search: &str) -> bool {
        self.activity_type
            .as_deref()
            .is_none_or(|t| same_text(&activity.activity_type, t))
            && search_matches(
                search,
                &[Some(&activity.activity_type), activity.notes.as_deref()],
            )
    }
}

pub struct ActivitySource {
    api: ApiClient,
}

impl CollectionSource for ActivitySource {
    type Item = Activity;
    type Filter = ActivityFilter;

    async fn fetch(&self, request: &FilterState<ActivityFilter>) -> Result<Page<Activity>> {
        self.api
            .my_activities(&ActivityQuery {
                page: request.current_page,
                size: request.page_size,
            })
            .await
    }

    /// The endpoint takes no filters at all.
    fn supports(&self, filters: &ActivityFilter) -> bool {
        filters.activity_type.is_none()
    }

    fn arrange(&self, items: &mut [Activity]) {
        sort_newest_first(items);
    }
}

/// Order by `activity_date`, falling back to `created_at`; undated last.
pub fn sort_newest_first(items: &mut [Activity]) {
    items.sort_by_cached_key(|a| std::cmp::Reverse(activity_time(a)));
}

fn activity_time(activity: &Activity) -> Option<DateTime> {
    activity
        .activity_date
        .as_deref()
        .and_then(parse_time)
        .or_else(|| activity.created_at.as_deref().and_then(parse_time))
}

/// Accepts RFC 3339 timestamps, civil date-times and plain dates.
fn parse_time(value: &str) -> Option<DateTime> {
    if let Ok(ts) = value.parse::<Timestamp>() {
        return Some(ts.to_zoned(TimeZone::UTC).datetime());
    }
    if let Ok(dt) = value.parse::<DateTime>() {
        return Some(dt);
    }
    value
        .parse::<Date>()
        .ok()
        .map(|d| d.to_datetime(Time::midnight()))
}

/// Label typed back to confirm a delete.
pub fn activity_label(activity: &Activity) -> String {
    match activity.activity_date.as_deref() {
        Some(date) => format!("{} {}", activity.activity_type, date),
        None => activity.activity_type.clone(),
    }
}

/// Build the request body from a validated activity form.
pub fn new_activity(values: &FormValues) -> Result<NewActivity> {
    activity_form().validate(values)?;
    let number = |field: &str| {
        values
            .text(field)
            .and_then(|v| v.parse::<f64>().ok())
            .map(|v| v.round() as u32)
    };
    Ok(NewActivity {
        activity_type: values.text("activityType").unwrap_or_default(),
        duration_minutes: number("durationMinutes").unwrap_or_default(),
        calories_burned: number("caloriesBurned"),
        program_id: values.text("programId").and_then(|v| v.parse().ok()),
        notes: values.text("notes"),
        activity_date: values.text("activityDate"),
    })
}

pub struct ActivitiesView {
    api: ApiClient,
    activities: RemoteCollection<ActivitySource>,
    delete: DeleteDialog,
}

impl ActivitiesView {
    pub fn new(api: ApiClient, page_size: usize, notices: Notices) -> Self {
        let source = ActivitySource { api: api.clone() };
        Self {
            api,
            activities: RemoteCollection::with_notices(source, page_size, notices),
            delete: DeleteDialog::new(),
        }
    }

    pub fn activities(&self) -> &RemoteCollection<ActivitySource> {
        &self.activities
    }

    pub async fn log(&self, values: &FormValues) -> Result<Activity> {
        let activity = new_activity(values)?;
        let logged = self.api.log_activity(&activity).await?;
        self.activities
            .notices()
            .success(format!("Logged {}", logged.activity_type));
        Ok(logged)
    }

    pub async fn request_delete(&mut self, activity_id: i64) -> Result<&DeleteTarget> {
        let activity = self
            .activities
            .locate(activity_id)
            .await?
            .ok_or_else(|| MoveMindsError::NotFound(format!("activity {activity_id}")))?;
        self.delete
            .open(activity.id, activity_label(&activity), "activity");
        self.delete
            .target()
            .ok_or_else(|| MoveMindsError::Other("delete dialog did not open".to_string()))
    }

    pub async fn confirm_delete(&mut self, typed_label: &str) -> Result<()> {
        let api = &self.api;
        self.delete
            .confirm(&self.activities, typed_label, |id| api.delete_activity(id))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn activity(id: i64, date: Option<&str>, created: Option<&str>) -> Activity {
        Activity {
            id,
            program_id: None,
            activity_type: "Running".to_string(),
            duration_minutes: Some(30),
            calories_burned: None,
            notes: None,
            activity_date: date.map(str::to_string),
            created_at: created.map(str::to_string),
        }
    }

    #[test]
    fn test_sort_newest_first_with_fallback() {
        let mut items = vec![
            activity(1, Some("2024-03-01"), None),
            activity(2, None, Some("2024-05-10T08:30:00")),
            activity(3, None, None),
            activity(4, Some("2024-04-15T06:00:00Z"), Some("2024-01-01T00:00:00")),
        ];
        sort_newest_first(&mut items);
        let ids: Vec<i64> = items.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![2, 4, 1, 3]);
    }

    #[test]
    fn test_new_activity_from_form() {
        let values = FormValues::new()
            .with("activityType", "Cycling")
            .with("durationMinutes", "45")
            .with("caloriesBurned", "320")
            .with("activityDate", "2024-05-01");
        let activity = new_activity(&values).unwrap();
        assert_eq!(activity.duration_minutes, 45);
        assert_eq!(activity.calories_burned, Some(320));
        assert_eq!(activity.notes, None);

        assert!(new_activity(&FormValues::new().with("activityType", "Cycling")).is_err());
    }

    #[test]
    fn test_activity_label() {
        assert_eq!(
            activity_label(&activity(1, Some("2024-03-01"), None)),
            "Running 2024-03-01"
        );
        assert_eq!(activity_label(&activity(1, None, None)), "Running");
    }
}
