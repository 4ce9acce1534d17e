use chrono::{Local, NaiveDate};

/// Format a date the way the rate feed expects it in `date_req`.
pub fn format_request_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Today's local date in request format.
pub fn current_request_date() -> String {
    format_request_date(Local::now().date_naive())
}

/// The feed endpoint is the base URL with the date appended as-is.
pub fn request_url(base_url: &str, request_date: &str) -> String {
    format!("{}{}", base_url, request_date)
}
