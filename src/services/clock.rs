use chrono::Utc;

/// Current Unix time in whole seconds.
pub fn current_epoch_time() -> i64 {
    Utc::now().timestamp()
}
