use crate::error::{ApiError, ApiResult};
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use common::model::contact::{
    ContactDraft, BUYER_PREFERENCE, DATE_FIELDS, DEFAULT_BUYER_PREFERENCE,
    DEFAULT_SUBSCRIPTION_STATUS, SUBSCRIPTION_STATUS_EMAIL, SUBSCRIPTION_STATUS_SMS, TAGS,
};
use serde_json::Value;

const DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Timestamps with a numeric offset that RFC 3339 refuses, e.g. `+0200`.
const OFFSET_DATETIME_FORMATS: [&str; 2] = [
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
];

const DATE_FORMATS: [&str; 7] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
];

/// Converts the well-known fields of a mapped record in place.
///
/// Only string values are touched. With `strict_dates` an unparseable date
/// fails the record; otherwise it is stored as null.
pub fn coerce(draft: &mut ContactDraft, strict_dates: bool) -> ApiResult<()> {
    for (field, value) in draft.fields_mut() {
        let Value::String(raw) = value else {
            continue;
        };

        let coerced = match field.as_str() {
            f if DATE_FIELDS.contains(&f) => coerce_date(f, raw, strict_dates)?,
            SUBSCRIPTION_STATUS_EMAIL | SUBSCRIPTION_STATUS_SMS => {
                lower_or_default(raw, DEFAULT_SUBSCRIPTION_STATUS)
            }
            BUYER_PREFERENCE => lower_or_default(raw, DEFAULT_BUYER_PREFERENCE),
            TAGS => split_tags(raw),
            _ => continue,
        };
        *value = coerced;
    }
    Ok(())
}

fn coerce_date(field: &str, raw: &str, strict: bool) -> ApiResult<Value> {
    if raw.is_empty() {
        return Ok(Value::Null);
    }
    match parse_date(raw) {
        Some(date) => Ok(Value::String(
            date.to_rfc3339_opts(SecondsFormat::Millis, true),
        )),
        None if strict => Err(ApiError::InvalidDate {
            field: field.to_string(),
            value: raw.to_string(),
        }),
        None => Ok(Value::Null),
    }
}

/// Parses the date and timestamp shapes commonly found in CRM exports.
/// Values without an offset are read as UTC; a bare `YYYY-MM` is the first
/// day of that month.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Some(date.with_timezone(&Utc));
    }
    if let Ok(date) = DateTime::parse_from_rfc2822(raw) {
        return Some(date.with_timezone(&Utc));
    }
    if let Some(date) = OFFSET_DATETIME_FORMATS
        .iter()
        .find_map(|format| DateTime::parse_from_str(raw, format).ok())
    {
        return Some(date.with_timezone(&Utc));
    }
    if let Some(naive) = DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
    {
        return Some(naive.and_utc());
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
        .or_else(|| parse_year_month(raw))
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn parse_year_month(raw: &str) -> Option<NaiveDate> {
    let (year, month) = raw.split_once('-')?;
    if year.len() != 4 || month.len() != 2 {
        return None;
    }
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, 1)
}

fn lower_or_default(raw: &str, default: &str) -> Value {
    if raw.is_empty() {
        Value::String(default.to_string())
    } else {
        Value::String(raw.to_lowercase())
    }
}

/// Empty segments between commas are kept.
fn split_tags(raw: &str) -> Value {
    if raw.is_empty() {
        return Value::Array(Vec::new());
    }
    Value::Array(
        raw.split(',')
            .map(|tag| Value::String(tag.trim().to_string()))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn coerced(value: Value, strict: bool) -> ApiResult<ContactDraft> {
        let mut draft: ContactDraft = serde_json::from_value(value).unwrap();
        coerce(&mut draft, strict)?;
        Ok(draft)
    }

    #[test]
    fn tags_are_split_and_trimmed() {
        let draft = coerced(json!({"tags": "a, b ,c"}), true).unwrap();
        assert_eq!(draft.get("tags"), Some(&json!(["a", "b", "c"])));
    }

    #[test]
    fn tags_keep_empty_segments() {
        let draft = coerced(json!({"tags": ",a,,b,"}), true).unwrap();
        assert_eq!(draft.get("tags"), Some(&json!(["", "a", "", "b", ""])));
    }

    #[test]
    fn empty_tags_become_an_empty_list() {
        let draft = coerced(json!({"tags": ""}), true).unwrap();
        assert_eq!(draft.get("tags"), Some(&json!([])));
    }

    #[test]
    fn statuses_are_lower_cased_or_defaulted() {
        let draft = coerced(
            json!({
                "subscription_status_email": "Active",
                "subscription_status_sms": "",
                "buyer_preference": ""
            }),
            true,
        )
        .unwrap();

        assert_eq!(draft.get_str("subscription_status_email"), Some("active"));
        assert_eq!(draft.get_str("subscription_status_sms"), Some("pending"));
        assert_eq!(draft.get_str("buyer_preference"), Some("email"));
    }

    #[test]
    fn buyer_preference_is_lower_cased() {
        let draft = coerced(json!({"buyer_preference": "SMS"}), true).unwrap();
        assert_eq!(draft.get_str("buyer_preference"), Some("sms"));
    }

    #[test]
    fn dates_are_normalised_to_utc_timestamps() {
        let draft = coerced(
            json!({
                "birthday": "1990-05-17",
                "subscription_date": "2024-01-02T03:04:05+02:00",
                "latest_interaction": "03/15/2024",
                "unsubscription_date": ""
            }),
            true,
        )
        .unwrap();

        assert_eq!(draft.get_str("birthday"), Some("1990-05-17T00:00:00.000Z"));
        assert_eq!(
            draft.get_str("subscription_date"),
            Some("2024-01-02T01:04:05.000Z")
        );
        assert_eq!(
            draft.get_str("latest_interaction"),
            Some("2024-03-15T00:00:00.000Z")
        );
        assert_eq!(draft.get("unsubscription_date"), Some(&Value::Null));
    }

    #[test]
    fn naive_timestamps_are_read_as_utc() {
        let date = parse_date("2024-06-30 18:45:00").unwrap();
        assert_eq!(
            date.to_rfc3339_opts(SecondsFormat::Millis, true),
            "2024-06-30T18:45:00.000Z"
        );
    }

    fn normalised(raw: &str) -> String {
        let draft = coerced(json!({ "birthday": raw }), true).unwrap();
        draft.get_str("birthday").unwrap().to_string()
    }

    #[test]
    fn rfc2822_dates_are_accepted() {
        assert_eq!(
            normalised("Fri, 15 Mar 2024 10:00:00 GMT"),
            "2024-03-15T10:00:00.000Z"
        );
    }

    #[test]
    fn offsets_without_colon_are_accepted() {
        assert_eq!(
            normalised("2024-03-15T10:00:00.000+0200"),
            "2024-03-15T08:00:00.000Z"
        );
    }

    #[test]
    fn month_names_are_accepted() {
        assert_eq!(normalised("March 15, 2024"), "2024-03-15T00:00:00.000Z");
        assert_eq!(normalised("Mar 15, 2024"), "2024-03-15T00:00:00.000Z");
        assert_eq!(normalised("15 March 2024"), "2024-03-15T00:00:00.000Z");
    }

    #[test]
    fn year_month_is_the_first_of_the_month() {
        assert_eq!(normalised("2024-03"), "2024-03-01T00:00:00.000Z");
        assert!(parse_date("2024-13").is_none());
        assert!(parse_date("24-03").is_none());
    }

    #[test]
    fn invalid_dates_fail_in_strict_mode() {
        let err = coerced(json!({"birthday": "not a date"}), true).unwrap_err();
        match err {
            ApiError::InvalidDate { field, value } => {
                assert_eq!(field, "birthday");
                assert_eq!(value, "not a date");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn invalid_dates_become_null_in_lenient_mode() {
        let draft = coerced(json!({"birthday": "31/31/2024"}), false).unwrap();
        assert_eq!(draft.get("birthday"), Some(&Value::Null));
    }

    #[test]
    fn other_fields_pass_through() {
        let draft = coerced(json!({"first_name": "Jane", "company": "ACME"}), true).unwrap();
        assert_eq!(draft.get_str("first_name"), Some("Jane"));
        assert_eq!(draft.get_str("company"), Some("ACME"));
    }
}
