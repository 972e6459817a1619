//! Activity and user display formatting

use crate::models::{Activity, User};

/// Format activities as a table
pub fn format_activity_list(activities: &[Activity]) -> String {
    if activities.is_empty() {
        return "No activities found.".to_string();
    }

    let title_width = activities
        .iter()
        .map(|a| a.title.len())
        .max()
        .unwrap_or(5)
        .max(5);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<12}  {:<title_width$}  {:<16}  {:<16}  {}\n",
        "ID",
        "Title",
        "Start",
        "End",
        "Repeats",
        title_width = title_width,
    ));
    output.push_str(&format!(
        "{:-<12}  {:-<title_width$}  {:-<16}  {:-<16}  {:-<10}\n",
        "",
        "",
        "",
        "",
        "",
        title_width = title_width,
    ));

    for activity in activities {
        let repeats: Vec<String> = activity
            .recurrence
            .rrules
            .iter()
            .map(|r| r.to_text())
            .collect();

        output.push_str(&format!(
            "{:<12}  {:<title_width$}  {:<16}  {:<16}  {}\n",
            activity.id.to_string(),
            activity.title,
            activity.start.format("%Y-%m-%d %H:%M").to_string(),
            activity.end.format("%Y-%m-%d %H:%M").to_string(),
            repeats.join("; "),
            title_width = title_width,
        ));
    }

    output
}

/// Format users as a table
pub fn format_user_list(users: &[User]) -> String {
    if users.is_empty() {
        return "No users found.".to_string();
    }

    let name_width = users
        .iter()
        .map(|u| u.username.len())
        .max()
        .unwrap_or(8)
        .max(8);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:<30}  {:<5}  {}\n",
        "Username",
        "Email",
        "Admin",
        "Nickname",
        name_width = name_width,
    ));
    for user in users {
        output.push_str(&format!(
            "{:<name_width$}  {:<30}  {:<5}  {}\n",
            user.username,
            user.email,
            if user.is_admin { "yes" } else { "no" },
            user.nickname,
            name_width = name_width,
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Frequency, RecurrenceRule};
    use chrono::{Duration, Utc};

    #[test]
    fn test_activity_list_shows_rules() {
        let now = Utc::now();
        let mut activity = Activity::new("Borrel", now, now + Duration::hours(3));
        activity
            .recurrence
            .rrules
            .push(RecurrenceRule::new(Frequency::Weekly));

        let output = format_activity_list(&[activity]);
        assert!(output.contains("Borrel"));
        assert!(output.contains("weekly"));
    }

    #[test]
    fn test_user_list() {
        let mut admin = User::new("board", "board@example.com", "Bestuur", "hash");
        admin.is_admin = true;

        let output = format_user_list(&[admin]);
        assert!(output.contains("board"));
        assert!(output.contains("yes"));
        assert_eq!(format_user_list(&[]), "No users found.");
    }
}
