//! Schemas for the forms the client submits.

use std::sync::LazyLock;

use regex::Regex;

use super::{FormSchema, Rule};

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("username regex should be valid"));

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://\S+$").expect("url regex should be valid"));

const DIFFICULTY_LEVELS: &[&str] = &["BEGINNER", "INTERMEDIATE", "ADVANCED"];

const ROLES: &[&str] = &["USER", "INSTRUCTOR"];

pub fn registration_form() -> FormSchema {
    FormSchema::new()
        .field(
            "username",
            "Username",
            [
                Rule::Required,
                Rule::MinLength(3),
                Rule::MaxLength(50),
                Rule::Pattern(
                    USERNAME_RE.clone(),
                    "Username can only contain letters, numbers and underscores",
                ),
            ],
        )
        .field("email", "Email", [Rule::Required, Rule::Email])
        .field("firstName", "First name", [Rule::Required, Rule::MaxLength(50)])
        .field("lastName", "Last name", [Rule::Required, Rule::MaxLength(50)])
        .field("password", "Password", [Rule::Required, Rule::MinLength(8)])
        .field(
            "confirmPassword",
            "Password confirmation",
            [
                Rule::Required,
                Rule::Equals("password", "Passwords do not match"),
            ],
        )
        .field("role", "Role", [Rule::OneOf(ROLES)])
}

pub fn login_form() -> FormSchema {
    FormSchema::new()
        .field("username", "Username", [Rule::Required])
        .field("password", "Password", [Rule::Required])
}

pub fn change_password_form() -> FormSchema {
    FormSchema::new()
        .field("currentPassword", "Current password", [Rule::Required])
        .field("newPassword", "New password", [Rule::Required, Rule::MinLength(8)])
        .field(
            "confirmPassword",
            "Password confirmation",
            [
                Rule::Required,
                Rule::Equals("newPassword", "Passwords do not match"),
            ],
        )
}

pub fn program_form() -> FormSchema {
    FormSchema::new()
        .field("name", "Program name", [Rule::Required, Rule::MaxLength(100)])
        .field(
            "description",
            "Description",
            [Rule::Required, Rule::MinLength(10)],
        )
        .field(
            "price",
            "Price",
            [Rule::Required, Rule::Numeric, Rule::AtLeast(0.0)],
        )
        .field("durationWeeks", "Duration", [Rule::PositiveNumber])
        .field(
            "difficultyLevel",
            "Difficulty level",
            [Rule::Required, Rule::OneOf(DIFFICULTY_LEVELS)],
        )
}

pub fn activity_form() -> FormSchema {
    FormSchema::new()
        .field("activityType", "Activity type", [Rule::Required])
        .field(
            "durationMinutes",
            "Duration",
            [Rule::Required, Rule::PositiveNumber],
        )
        .field("caloriesBurned", "Calories", [Rule::Numeric, Rule::AtLeast(0.0)])
        .field("notes", "Notes", [Rule::MaxLength(500)])
}

pub fn module_form() -> FormSchema {
    FormSchema::new()
        .field("title", "Module title", [Rule::Required, Rule::MaxLength(200)])
        .field("orderIndex", "Order", [Rule::Numeric, Rule::AtLeast(0.0)])
}

pub fn lesson_form() -> FormSchema {
    FormSchema::new()
        .field("title", "Lesson title", [Rule::Required, Rule::MaxLength(200)])
        .field(
            "videoUrl",
            "Video URL",
            [Rule::Pattern(URL_RE.clone(), "Please enter a valid URL")],
        )
        .field("orderIndex", "Order", [Rule::Numeric, Rule::AtLeast(0.0)])
}

pub fn category_form() -> FormSchema {
    FormSchema::new()
        .field("name", "Category name", [Rule::Required, Rule::MaxLength(50)])
        .field("description", "Description", [Rule::MaxLength(255)])
}

pub fn comment_form() -> FormSchema {
    FormSchema::new()
        .field("content", "Comment", [Rule::Required, Rule::MaxLength(1000)])
        .field(
            "rating",
            "Rating",
            [Rule::OneOf(&["1", "2", "3", "4", "5"])],
        )
}

pub fn message_form() -> FormSchema {
    FormSchema::new().field("content", "Message", [Rule::Required, Rule::MaxLength(2000)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::FormValues;

    fn valid_registration() -> FormValues {
        FormValues::new()
            .with("username", "kasun_p")
            .with("email", "kasun@moveminds.lk")
            .with("firstName", "Kasun")
            .with("lastName", "Perera")
            .with("password", "s3cretpass")
            .with("confirmPassword", "s3cretpass")
    }

    #[test]
    fn test_registration_accepts_valid_input() {
        assert!(registration_form().validate(&valid_registration()).is_ok());
    }

    #[test]
    fn test_registration_username_rules() {
        let short = valid_registration().with("username", "ab");
        let errors = registration_form().validate(&short).unwrap_err();
        assert_eq!(
            errors.get("username"),
            Some("Username must be at least 3 characters")
        );

        let symbols = valid_registration().with("username", "kasun.p");
        let errors = registration_form().validate(&symbols).unwrap_err();
        assert_eq!(
            errors.get("username"),
            Some("Username can only contain letters, numbers and underscores")
        );
    }

    #[test]
    fn test_registration_password_confirmation() {
        let mismatch = valid_registration().with("confirmPassword", "s3cretpasS");
        let errors = registration_form().validate(&mismatch).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("confirmPassword"), Some("Passwords do not match"));

        let short = valid_registration()
            .with("password", "short")
            .with("confirmPassword", "short");
        let errors = registration_form().validate(&short).unwrap_err();
        assert_eq!(
            errors.get("password"),
            Some("Password must be at least 8 characters")
        );
    }

    #[test]
    fn test_program_price_may_be_free() {
        let values = FormValues::new()
            .with("name", "Couch to 5K")
            .with("description", "Nine weeks from the sofa to a 5K run.")
            .with("price", "0")
            .with("durationWeeks", "9")
            .with("difficultyLevel", "BEGINNER");
        assert!(program_form().validate(&values).is_ok());

        let negative = values.clone().with("price", "-1");
        assert!(program_form().validate(&negative).is_err());
    }

    #[test]
    fn test_activity_requires_positive_duration() {
        let values = FormValues::new()
            .with("activityType", "Running")
            .with("durationMinutes", "0");
        let errors = activity_form().validate(&values).unwrap_err();
        assert_eq!(
            errors.get("durationMinutes"),
            Some("Duration must be greater than 0")
        );
    }

    #[test]
    fn test_lesson_video_url() {
        let values = FormValues::new()
            .with("title", "Warm-up")
            .with("videoUrl", "youtube");
        assert!(lesson_form().validate(&values).is_err());
        let values = values.with("videoUrl", "https://videos.moveminds.lk/warmup.mp4");
        assert!(lesson_form().validate(&values).is_ok());
    }

    #[test]
    fn test_message_and_comment_require_content() {
        assert!(message_form().validate(&FormValues::new()).is_err());
        let comment = FormValues::new().with("content", "Great plan").with("rating", "6");
        let errors = comment_form().validate(&comment).unwrap_err();
        assert!(errors.get("rating").is_some());
    }
}
