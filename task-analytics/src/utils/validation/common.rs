// task-analytics/src/utils/validation/common.rs

//! タスク入力の共通バリデーション定数と関数

use validator::ValidationError;

use crate::domain::task_metadata::parse_due_date;
use crate::domain::task_priority::TaskPriority;
use crate::domain::task_status::TaskStatus;

// =============================================================================
// バリデーション定数
// =============================================================================

/// タスク関連の制約
pub mod task {
    pub const TITLE_MIN_LENGTH: u64 = 1;
    pub const TITLE_MAX_LENGTH: u64 = 200;
    pub const DESCRIPTION_MAX_LENGTH: u64 = 2000;
    pub const MAX_TAGS: u64 = 20;
    pub const TAG_MIN_LENGTH: usize = 1;
    pub const TAG_MAX_LENGTH: usize = 50;
}

// =============================================================================
// カスタムバリデーション関数
// =============================================================================

fn error_with_message(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

/// 空文字や空白のみでないことを確認
pub fn validate_not_empty_or_whitespace(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(error_with_message(
            "empty_or_whitespace",
            "Value cannot be empty or contain only whitespace",
        ));
    }
    Ok(())
}

/// タスクタイトルの形式
pub fn validate_task_title(title: &str) -> Result<(), ValidationError> {
    validate_not_empty_or_whitespace(title)?;

    if title.contains('\0') || title.contains('\r') || title.contains('\n') {
        return Err(error_with_message(
            "invalid_characters",
            "Title cannot contain null, carriage return, or newline characters",
        ));
    }

    Ok(())
}

pub fn validate_task_status(status: &str) -> Result<(), ValidationError> {
    if TaskStatus::from_str(status).is_none() {
        return Err(error_with_message(
            "invalid_status",
            "Status must be one of: pending, in-progress, done",
        ));
    }
    Ok(())
}

pub fn validate_task_priority(priority: &str) -> Result<(), ValidationError> {
    if TaskPriority::from_str(priority).is_none() {
        return Err(error_with_message(
            "invalid_priority",
            "Priority must be one of: low, medium, high",
        ));
    }
    Ok(())
}

/// 新規入力の期限は解釈できる形式に限る
pub fn validate_due_date(due_date: &str) -> Result<(), ValidationError> {
    if parse_due_date(due_date).is_none() {
        return Err(error_with_message(
            "invalid_due_date",
            "Due date must be an ISO 8601 date or date-time",
        ));
    }
    Ok(())
}

/// 各タグの長さ。件数は `length` で別途検証する
pub fn validate_tags(tags: &[String]) -> Result<(), ValidationError> {
    let invalid = tags.iter().any(|tag| {
        let len = tag.chars().count();
        !(task::TAG_MIN_LENGTH..=task::TAG_MAX_LENGTH).contains(&len)
    });
    if invalid {
        return Err(error_with_message(
            "invalid_tag",
            "Each tag must be between 1 and 50 characters",
        ));
    }
    Ok(())
}

// =============================================================================
// テスト
// =============================================================================
